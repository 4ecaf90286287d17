//! Process-wide document locale settings
//!
//! The host environment owns a single [`DocumentLocaleSettings`] per
//! page and mutates it at any time (language, fallback, intl override
//! attribute, timezone attribute). The localization core only reads
//! snapshots and observes changes through a watch channel; it never
//! writes back.

use crate::intl::IntlOverrides;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Timezone descriptor supplied by the host
///
/// `name` is the display label; `identifier` selects the offset used
/// for date/time formatting. Both default to empty, which formats in
/// UTC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimezoneDescriptor {
    pub name: String,
    pub identifier: String,
}

/// Immutable view of the settings at one point in time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocaleSettingsSnapshot {
    pub language: Option<String>,
    pub fallback_language: Option<String>,
    pub overrides: IntlOverrides,
    pub timezone: TimezoneDescriptor,
}

/// Shared, externally mutated locale configuration
///
/// Every mutator publishes a fresh snapshot to subscribers. The raw
/// attribute setters mirror how hosts deliver overrides and timezone
/// configuration: as JSON attribute text that may be malformed, in
/// which case the documented default applies and a warning is logged.
#[derive(Debug)]
pub struct DocumentLocaleSettings {
    state: RwLock<LocaleSettingsSnapshot>,
    tx: watch::Sender<LocaleSettingsSnapshot>,
}

impl DocumentLocaleSettings {
    /// Create settings with no language configured
    pub fn new() -> Self {
        Self::with_languages(None, None)
    }

    /// Create settings with an initial language pair
    pub fn with_languages(language: Option<&str>, fallback: Option<&str>) -> Self {
        let snapshot = LocaleSettingsSnapshot {
            language: language.map(str::to_string),
            fallback_language: fallback.map(str::to_string),
            ..LocaleSettingsSnapshot::default()
        };
        let (tx, _) = watch::channel(snapshot.clone());
        Self {
            state: RwLock::new(snapshot),
            tx,
        }
    }

    /// Current settings snapshot
    pub fn snapshot(&self) -> LocaleSettingsSnapshot {
        self.state.read().clone()
    }

    /// Subscribe to settings changes
    ///
    /// The receiver observes the snapshot that was current at
    /// subscription time and every published change after it.
    pub fn subscribe(&self) -> watch::Receiver<LocaleSettingsSnapshot> {
        self.tx.subscribe()
    }

    /// Set or clear the document language
    pub fn set_language(&self, language: Option<&str>) {
        self.mutate(|state| state.language = language.map(str::to_string));
    }

    /// Set or clear the document fallback language
    pub fn set_fallback_language(&self, fallback: Option<&str>) {
        self.mutate(|state| state.fallback_language = fallback.map(str::to_string));
    }

    /// Replace the intl overrides directly
    pub fn set_overrides(&self, overrides: IntlOverrides) {
        self.mutate(|state| state.overrides = overrides);
    }

    /// Parse the intl overrides attribute text
    ///
    /// Malformed JSON falls back to the empty override map.
    pub fn set_overrides_attr(&self, json: &str) {
        let overrides = try_parse_attr(json, "intl overrides");
        self.set_overrides(overrides);
    }

    /// Replace the timezone descriptor directly
    pub fn set_timezone(&self, timezone: TimezoneDescriptor) {
        self.mutate(|state| state.timezone = timezone);
    }

    /// Parse the timezone attribute text
    ///
    /// Malformed JSON falls back to the empty descriptor (UTC).
    pub fn set_timezone_attr(&self, json: &str) {
        let timezone = try_parse_attr(json, "timezone");
        self.set_timezone(timezone);
    }

    fn mutate(&self, apply: impl FnOnce(&mut LocaleSettingsSnapshot)) {
        let snapshot = {
            let mut state = self.state.write();
            apply(&mut state);
            state.clone()
        };
        debug!(
            language = ?snapshot.language,
            fallback = ?snapshot.fallback_language,
            "locale settings changed"
        );
        // Send fails only when no subscriber exists, which is fine: the
        // next subscriber starts from the stored snapshot.
        let _ = self.tx.send(snapshot);
    }
}

impl Default for DocumentLocaleSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a JSON attribute value, falling back to the type's default
fn try_parse_attr<T: DeserializeOwned + Default>(json: &str, what: &str) -> T {
    match serde_json::from_str(json) {
        Ok(value) => value,
        Err(e) => {
            warn!(attribute = %what, error = %e, "malformed attribute JSON; using default");
            T::default()
        }
    }
}
