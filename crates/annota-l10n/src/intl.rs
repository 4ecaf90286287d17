//! Locale-aware date, time, number, and file-size formatting
//!
//! The controller delegates all value formatting and parsing here,
//! passing the resolved language, the document's override map, and the
//! configured timezone. [`ChronoIntl`] is the built-in implementation:
//! a static per-language data table consulted after any host overrides.

use crate::error::{LocalizeError, LocalizeResult};
use crate::settings::TimezoneDescriptor;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Named date/time format length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateTimeStyle {
    Full,
    #[default]
    Medium,
    Short,
}

/// Host-supplied partial overrides for locale data
///
/// Deserialized from the document's override attribute; every field is
/// optional and unknown fields are ignored, so hosts can ship the
/// subset they care about. Overrides are consulted ahead of the
/// built-in per-language table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntlOverrides {
    pub date: Option<DateOverrides>,
    pub number: Option<NumberOverrides>,
    #[serde(rename = "fileSize")]
    pub file_size: Option<FileSizeOverrides>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateOverrides {
    pub hour24: Option<bool>,
    pub formats: Option<DateFormatOverrides>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateFormatOverrides {
    #[serde(rename = "dateFormats")]
    pub date_formats: Option<StyleOverrides>,
    #[serde(rename = "timeFormats")]
    pub time_formats: Option<StyleOverrides>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOverrides {
    pub full: Option<String>,
    pub medium: Option<String>,
    pub short: Option<String>,
}

impl StyleOverrides {
    fn for_style(&self, style: DateTimeStyle) -> Option<&str> {
        match style {
            DateTimeStyle::Full => self.full.as_deref(),
            DateTimeStyle::Medium => self.medium.as_deref(),
            DateTimeStyle::Short => self.short.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberOverrides {
    pub symbols: Option<NumberSymbolOverrides>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberSymbolOverrides {
    pub decimal: Option<String>,
    pub group: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSizeOverrides {
    pub units: Option<FileSizeUnitOverrides>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSizeUnitOverrides {
    pub gigabyte: Option<String>,
    pub megabyte: Option<String>,
    pub kilobyte: Option<String>,
    pub bytes: Option<String>,
    pub byte: Option<String>,
}

/// Locale-aware formatting and parsing service
///
/// Implementations must be pure with respect to their inputs: the same
/// language, overrides, timezone, and value always format the same way.
pub trait IntlFormat: Send + Sync {
    fn format_date_time(
        &self,
        language: &str,
        overrides: &IntlOverrides,
        timezone: &TimezoneDescriptor,
        value: DateTime<Utc>,
        style: DateTimeStyle,
    ) -> String;

    fn format_date(
        &self,
        language: &str,
        overrides: &IntlOverrides,
        timezone: &TimezoneDescriptor,
        value: DateTime<Utc>,
        style: DateTimeStyle,
    ) -> String;

    fn format_time(
        &self,
        language: &str,
        overrides: &IntlOverrides,
        timezone: &TimezoneDescriptor,
        value: DateTime<Utc>,
    ) -> String;

    fn format_number(&self, language: &str, overrides: &IntlOverrides, value: f64) -> String;

    fn format_file_size(&self, language: &str, overrides: &IntlOverrides, bytes: u64) -> String;

    fn parse_date(
        &self,
        language: &str,
        overrides: &IntlOverrides,
        input: &str,
    ) -> LocalizeResult<NaiveDate>;

    fn parse_time(
        &self,
        language: &str,
        overrides: &IntlOverrides,
        input: &str,
    ) -> LocalizeResult<NaiveTime>;

    fn parse_number(
        &self,
        language: &str,
        overrides: &IntlOverrides,
        input: &str,
    ) -> LocalizeResult<f64>;
}

/// Built-in per-language formatting data
#[derive(Debug, Clone)]
struct LocaleData {
    date_full: &'static str,
    date_medium: &'static str,
    date_short: &'static str,
    hour24: bool,
    decimal: char,
    group: char,
}

impl LocaleData {
    fn date_pattern(&self, style: DateTimeStyle) -> &'static str {
        match style {
            DateTimeStyle::Full => self.date_full,
            DateTimeStyle::Medium => self.date_medium,
            DateTimeStyle::Short => self.date_short,
        }
    }

    fn time_pattern(&self) -> &'static str {
        if self.hour24 {
            "%H:%M"
        } else {
            "%-I:%M %p"
        }
    }
}

const EN_DATA: LocaleData = LocaleData {
    date_full: "%A, %B %-d, %Y",
    date_medium: "%b %-d, %Y",
    date_short: "%-m/%-d/%Y",
    hour24: false,
    decimal: '.',
    group: ',',
};

/// Static data table keyed by primary language subtag
static LOCALE_DATA: Lazy<HashMap<&'static str, LocaleData>> = Lazy::new(|| {
    let dotted = |full, medium, short| LocaleData {
        date_full: full,
        date_medium: medium,
        date_short: short,
        hour24: true,
        decimal: ',',
        group: '.',
    };
    HashMap::from([
        ("en", EN_DATA),
        (
            "ar",
            LocaleData {
                date_full: "%d/%m/%Y",
                date_medium: "%d/%m/%Y",
                date_short: "%d/%m/%Y",
                hour24: false,
                decimal: ',',
                group: '.',
            },
        ),
        ("de", dotted("%d.%m.%Y", "%d.%m.%Y", "%d.%m.%y")),
        (
            "es",
            LocaleData {
                date_full: "%-d/%-m/%Y",
                date_medium: "%-d/%-m/%Y",
                date_short: "%-d/%-m/%y",
                hour24: true,
                decimal: ',',
                group: '.',
            },
        ),
        (
            "fr",
            LocaleData {
                date_full: "%-d/%m/%Y",
                date_medium: "%-d/%m/%Y",
                date_short: "%d/%m/%y",
                hour24: true,
                decimal: ',',
                group: '\u{202f}',
            },
        ),
        (
            "ja",
            LocaleData {
                date_full: "%Y年%-m月%-d日",
                date_medium: "%Y/%m/%d",
                date_short: "%Y/%m/%d",
                hour24: true,
                decimal: '.',
                group: ',',
            },
        ),
        (
            "ko",
            LocaleData {
                date_full: "%Y년 %-m월 %-d일",
                date_medium: "%Y. %-m. %-d.",
                date_short: "%y. %-m. %-d.",
                hour24: false,
                decimal: '.',
                group: ',',
            },
        ),
        ("nl", LocaleData {
            date_full: "%-d-%-m-%Y",
            date_medium: "%-d-%-m-%Y",
            date_short: "%-d-%-m-%y",
            hour24: true,
            decimal: ',',
            group: '.',
        }),
        ("pt", dotted("%d/%m/%Y", "%d/%m/%Y", "%d/%m/%y")),
        (
            "sv",
            LocaleData {
                date_full: "%Y-%m-%d",
                date_medium: "%Y-%m-%d",
                date_short: "%Y-%m-%d",
                hour24: true,
                decimal: ',',
                group: '\u{a0}',
            },
        ),
        ("tr", dotted("%d.%m.%Y", "%d.%m.%Y", "%d.%m.%Y")),
        (
            "zh",
            LocaleData {
                date_full: "%Y年%-m月%-d日",
                date_medium: "%Y/%-m/%-d",
                date_short: "%Y/%-m/%-d",
                hour24: false,
                decimal: '.',
                group: ',',
            },
        ),
    ])
});

/// Resolve locale data for a tag: exact base match, then `en`
fn locale_data(language: &str) -> &'static LocaleData {
    let base = language.split('-').next().unwrap_or(language);
    LOCALE_DATA.get(base).unwrap_or(&EN_DATA)
}

/// File-size units, binary multiples
const FILE_SIZE_STEPS: [(f64, &str); 3] = [
    (1024.0 * 1024.0 * 1024.0, "GB"),
    (1024.0 * 1024.0, "MB"),
    (1024.0, "KB"),
];

/// Chrono-backed [`IntlFormat`] implementation
///
/// Timezone descriptors whose identifier is a fixed offset of the form
/// `+HH:MM` / `-HH:MM` (optionally prefixed with `UTC`) shift formatted
/// output by that offset; any other identifier formats in UTC.
#[derive(Debug, Clone, Default)]
pub struct ChronoIntl;

impl ChronoIntl {
    pub fn new() -> Self {
        Self
    }

    fn offset(timezone: &TimezoneDescriptor) -> FixedOffset {
        let identifier = timezone.identifier.trim();
        if identifier.is_empty() {
            return Utc.fix();
        }
        match parse_fixed_offset(identifier) {
            Some(offset) => offset,
            None => {
                debug!(identifier = %identifier, "unsupported timezone identifier; formatting in UTC");
                Utc.fix()
            }
        }
    }

    fn date_pattern<'a>(
        language: &str,
        overrides: &'a IntlOverrides,
        style: DateTimeStyle,
    ) -> &'a str {
        overrides
            .date
            .as_ref()
            .and_then(|d| d.formats.as_ref())
            .and_then(|f| f.date_formats.as_ref())
            .and_then(|s| s.for_style(style))
            .unwrap_or_else(|| locale_data(language).date_pattern(style))
    }

    fn time_pattern<'a>(language: &str, overrides: &'a IntlOverrides) -> &'a str {
        if let Some(pattern) = overrides
            .date
            .as_ref()
            .and_then(|d| d.formats.as_ref())
            .and_then(|f| f.time_formats.as_ref())
            .and_then(|s| s.medium.as_deref())
        {
            return pattern;
        }
        let data = locale_data(language);
        let hour24 = overrides
            .date
            .as_ref()
            .and_then(|d| d.hour24)
            .unwrap_or(data.hour24);
        if hour24 {
            "%H:%M"
        } else {
            "%-I:%M %p"
        }
    }

    fn number_symbols(language: &str, overrides: &IntlOverrides) -> (char, char) {
        let data = locale_data(language);
        let symbols = overrides.number.as_ref().and_then(|n| n.symbols.as_ref());
        let decimal = symbols
            .and_then(|s| s.decimal.as_deref())
            .and_then(|s| s.chars().next())
            .unwrap_or(data.decimal);
        let group = symbols
            .and_then(|s| s.group.as_deref())
            .and_then(|s| s.chars().next())
            .unwrap_or(data.group);
        (decimal, group)
    }
}

/// Parse `+HH:MM`, `-HH:MM`, or `UTC±HH:MM` into a fixed offset
fn parse_fixed_offset(identifier: &str) -> Option<FixedOffset> {
    let stripped = identifier.strip_prefix("UTC").unwrap_or(identifier);
    let (sign, rest) = match stripped.strip_prefix('+') {
        Some(rest) => (1, rest),
        None => (-1, stripped.strip_prefix('-')?),
    };
    let (hours, minutes) = rest.split_once(':')?;
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 14 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

impl IntlFormat for ChronoIntl {
    fn format_date_time(
        &self,
        language: &str,
        overrides: &IntlOverrides,
        timezone: &TimezoneDescriptor,
        value: DateTime<Utc>,
        style: DateTimeStyle,
    ) -> String {
        let local = value.with_timezone(&Self::offset(timezone));
        let date = local
            .format(Self::date_pattern(language, overrides, style))
            .to_string();
        let time = local.format(Self::time_pattern(language, overrides)).to_string();
        format!("{date} {time}")
    }

    fn format_date(
        &self,
        language: &str,
        overrides: &IntlOverrides,
        timezone: &TimezoneDescriptor,
        value: DateTime<Utc>,
        style: DateTimeStyle,
    ) -> String {
        value
            .with_timezone(&Self::offset(timezone))
            .format(Self::date_pattern(language, overrides, style))
            .to_string()
    }

    fn format_time(
        &self,
        language: &str,
        overrides: &IntlOverrides,
        timezone: &TimezoneDescriptor,
        value: DateTime<Utc>,
    ) -> String {
        value
            .with_timezone(&Self::offset(timezone))
            .format(Self::time_pattern(language, overrides))
            .to_string()
    }

    fn format_number(&self, language: &str, overrides: &IntlOverrides, value: f64) -> String {
        let (decimal, group) = Self::number_symbols(language, overrides);
        let negative = value.is_sign_negative() && value != 0.0;
        let rounded = (value.abs() * 1000.0).round() / 1000.0;
        let text = format!("{rounded}");
        let (int_part, frac_part) = match text.split_once('.') {
            Some((i, f)) => (i.to_string(), Some(f.to_string())),
            None => (text, None),
        };

        let mut grouped = String::new();
        let digits: Vec<char> = int_part.chars().collect();
        for (i, c) in digits.iter().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(group);
            }
            grouped.push(*c);
        }

        let mut out = String::new();
        if negative {
            out.push('-');
        }
        out.push_str(&grouped);
        if let Some(frac) = frac_part {
            out.push(decimal);
            out.push_str(&frac);
        }
        out
    }

    fn format_file_size(&self, language: &str, overrides: &IntlOverrides, bytes: u64) -> String {
        let units = overrides
            .file_size
            .as_ref()
            .and_then(|f| f.units.as_ref());
        let value = bytes as f64;
        for (scale, default_unit) in FILE_SIZE_STEPS {
            if value >= scale {
                let unit = match (default_unit, units) {
                    ("GB", Some(u)) => u.gigabyte.as_deref().unwrap_or("GB"),
                    ("MB", Some(u)) => u.megabyte.as_deref().unwrap_or("MB"),
                    ("KB", Some(u)) => u.kilobyte.as_deref().unwrap_or("KB"),
                    (unit, _) => unit,
                };
                let scaled = (value / scale * 100.0).round() / 100.0;
                return format!("{} {unit}", self.format_number(language, overrides, scaled));
            }
        }
        let unit = if bytes == 1 {
            units
                .and_then(|u| u.byte.as_deref())
                .unwrap_or("byte")
        } else {
            units
                .and_then(|u| u.bytes.as_deref())
                .unwrap_or("bytes")
        };
        format!("{} {unit}", self.format_number(language, overrides, value))
    }

    fn parse_date(
        &self,
        language: &str,
        overrides: &IntlOverrides,
        input: &str,
    ) -> LocalizeResult<NaiveDate> {
        let input = input.trim();
        let patterns = [
            Self::date_pattern(language, overrides, DateTimeStyle::Short),
            Self::date_pattern(language, overrides, DateTimeStyle::Medium),
        ];
        for pattern in patterns {
            if let Ok(date) = NaiveDate::parse_from_str(input, pattern) {
                return Ok(date);
            }
        }
        Err(LocalizeError::ValueParse {
            kind: "date",
            input: input.to_string(),
            language: language.to_string(),
        })
    }

    fn parse_time(
        &self,
        language: &str,
        _overrides: &IntlOverrides,
        input: &str,
    ) -> LocalizeResult<NaiveTime> {
        let input = input.trim();
        // Accept both clock conventions regardless of the locale default;
        // users paste either form.
        for pattern in ["%H:%M", "%-I:%M %p"] {
            if let Ok(time) = NaiveTime::parse_from_str(input, pattern) {
                return Ok(time);
            }
        }
        Err(LocalizeError::ValueParse {
            kind: "time",
            input: input.to_string(),
            language: language.to_string(),
        })
    }

    fn parse_number(
        &self,
        language: &str,
        overrides: &IntlOverrides,
        input: &str,
    ) -> LocalizeResult<f64> {
        let (decimal, group) = Self::number_symbols(language, overrides);
        let normalized: String = input
            .trim()
            .chars()
            .filter(|c| *c != group && !c.is_whitespace())
            .map(|c| if c == decimal { '.' } else { c })
            .collect();
        normalized
            .parse()
            .map_err(|_| LocalizeError::ValueParse {
                kind: "number",
                input: input.to_string(),
                language: language.to_string(),
            })
    }
}
