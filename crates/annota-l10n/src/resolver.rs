//! Candidate-language derivation and catalog resolution
//!
//! The document supplies at most two language tags (the page language and
//! its configured fallback). Resolution turns those into an ordered
//! candidate list, ending with the universal `en-us`/`en` fallback, and
//! picks the first candidate a catalog actually has a bundle for.

use crate::catalog::LocaleCatalog;
use std::str::FromStr;
use unic_langid::LanguageIdentifier;

/// Universal fallback tags appended to every candidate list
const UNIVERSAL_FALLBACKS: [&str; 2] = ["en-us", "en"];

/// Extract the primary language subtag of a tag, lowercased
///
/// Parses through `unic-langid` where possible so that oddly cased or
/// extended tags (`zh-Hant-TW`) still yield their base language; falls
/// back to splitting at the first hyphen for tags the parser rejects.
fn base_language(tag: &str) -> Option<String> {
    if !tag.contains('-') {
        return None;
    }
    match LanguageIdentifier::from_str(tag) {
        Ok(langid) => Some(langid.language.as_str().to_lowercase()),
        Err(_) => tag.split('-').next().map(str::to_lowercase),
    }
}

/// Derive the ordered candidate list for a document language pair
///
/// Produces `[language, language-base, fallback, fallback-base, "en-us",
/// "en"]` with the base entries present only for hyphenated tags. All
/// entries are lowercased. Duplicates are kept; resolution takes the
/// first match regardless, so removing them would change nothing.
pub fn candidate_languages(language: Option<&str>, fallback: Option<&str>) -> Vec<String> {
    let mut candidates = Vec::with_capacity(6);

    for tag in [language, fallback].into_iter().flatten() {
        let tag = tag.trim();
        if tag.is_empty() {
            continue;
        }
        let lowered = tag.to_lowercase();
        if let Some(base) = base_language(&lowered) {
            candidates.push(lowered);
            candidates.push(base);
        } else {
            candidates.push(lowered);
        }
    }

    candidates.extend(UNIVERSAL_FALLBACKS.iter().map(|t| t.to_string()));
    candidates
}

/// Pick the first candidate present in the catalog
///
/// Returns `None` when no candidate matches; callers treat that as "no
/// resources available yet", not as an error.
pub fn resolve(candidates: &[String], catalog: &LocaleCatalog) -> Option<String> {
    candidates
        .iter()
        .find(|tag| catalog.contains(tag))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ResourceBundle;

    fn catalog_with(tags: &[&str]) -> LocaleCatalog {
        let mut catalog = LocaleCatalog::new();
        for tag in tags {
            catalog.insert_bundle(*tag, ResourceBundle::new());
        }
        catalog
    }

    #[test]
    fn test_candidates_full_pair() {
        let candidates = candidate_languages(Some("fr-CA"), Some("de-DE"));
        assert_eq!(candidates, vec!["fr-ca", "fr", "de-de", "de", "en-us", "en"]);
    }

    #[test]
    fn test_candidates_plain_tags_have_no_base_entry() {
        let candidates = candidate_languages(Some("fr"), None);
        assert_eq!(candidates, vec!["fr", "en-us", "en"]);
    }

    #[test]
    fn test_candidates_empty_settings_keep_universal_fallback() {
        let candidates = candidate_languages(None, None);
        assert_eq!(candidates, vec!["en-us", "en"]);
    }

    #[test]
    fn test_candidates_keep_duplicates() {
        let candidates = candidate_languages(Some("en-US"), Some("en-us"));
        assert_eq!(
            candidates,
            vec!["en-us", "en", "en-us", "en", "en-us", "en"]
        );
    }

    #[test]
    fn test_candidates_extended_tag_base() {
        let candidates = candidate_languages(Some("zh-Hant-TW"), None);
        assert_eq!(candidates, vec!["zh-hant-tw", "zh", "en-us", "en"]);
    }

    #[test]
    fn test_resolve_first_match_wins() {
        let catalog = catalog_with(&["fr", "en"]);
        let candidates = candidate_languages(Some("fr-CA"), None);
        assert_eq!(resolve(&candidates, &catalog).as_deref(), Some("fr"));
    }

    #[test]
    fn test_resolve_falls_through_to_universal() {
        let catalog = catalog_with(&["en"]);
        let candidates = candidate_languages(Some("fr-fr"), None);
        assert_eq!(resolve(&candidates, &catalog).as_deref(), Some("en"));
    }

    #[test]
    fn test_resolve_no_match() {
        let catalog = catalog_with(&["ja"]);
        let candidates = candidate_languages(Some("fr"), None);
        assert_eq!(resolve(&candidates, &catalog), None);
    }
}
