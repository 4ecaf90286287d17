//! Per-language plural category selection
//!
//! Message templates may branch on a numeric argument through a `plural`
//! placeable. The category split modeled here is `one`/`other`, which
//! covers the shipped message set; languages like French and Spanish put
//! zero in the singular category.

/// Plural category a number falls into for a given language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralCategory {
    /// Singular form
    One,
    /// Plural form (the required default arm)
    Other,
}

impl PluralCategory {
    /// The keyword used for this category in message templates
    pub fn keyword(self) -> &'static str {
        match self {
            Self::One => "one",
            Self::Other => "other",
        }
    }

    /// Parse a template arm keyword into a category
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "one" => Some(Self::One),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Languages where 0 takes the singular category
const ZERO_AS_ONE: [&str; 3] = ["fr", "es", "pt"];

/// Pick the plural category for a value in a language
///
/// Only the primary subtag matters; `fr-ca` follows the same rule as
/// `fr`. Unknown languages use the English rule (1 is singular).
pub fn plural_category(language: &str, value: f64) -> PluralCategory {
    let base = language.split('-').next().unwrap_or(language);
    let singular = if ZERO_AS_ONE.contains(&base) {
        value == 0.0 || value == 1.0
    } else {
        value == 1.0
    };
    if singular {
        PluralCategory::One
    } else {
        PluralCategory::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_one_only_for_one() {
        assert_eq!(plural_category("en", 1.0), PluralCategory::One);
        assert_eq!(plural_category("en", 0.0), PluralCategory::Other);
        assert_eq!(plural_category("en", 5.0), PluralCategory::Other);
        assert_eq!(plural_category("en", 1.5), PluralCategory::Other);
    }

    #[test]
    fn test_french_zero_is_singular() {
        assert_eq!(plural_category("fr", 0.0), PluralCategory::One);
        assert_eq!(plural_category("fr", 1.0), PluralCategory::One);
        assert_eq!(plural_category("fr", 2.0), PluralCategory::Other);
    }

    #[test]
    fn test_regional_tag_uses_base_rule() {
        assert_eq!(plural_category("fr-ca", 0.0), PluralCategory::One);
        assert_eq!(plural_category("es-mx", 0.0), PluralCategory::One);
        assert_eq!(plural_category("de-de", 0.0), PluralCategory::Other);
    }

    #[test]
    fn test_unknown_language_uses_english_rule() {
        assert_eq!(plural_category("xx", 1.0), PluralCategory::One);
        assert_eq!(plural_category("xx", 0.0), PluralCategory::Other);
    }

    #[test]
    fn test_keyword_round_trip() {
        assert_eq!(PluralCategory::from_keyword("one"), Some(PluralCategory::One));
        assert_eq!(PluralCategory::from_keyword("other"), Some(PluralCategory::Other));
        assert_eq!(PluralCategory::from_keyword("few"), None);
    }
}
