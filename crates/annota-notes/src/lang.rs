//! Embedded locale catalog for the note components
//!
//! Thirteen shipped languages over a twelve-term key set. Bundles are
//! embedded at compile time and exposed as one shared catalog; every
//! non-English bundle is audited against `en` in the test suite so a
//! missing key shows up as a failing build rather than a blank label
//! in production.

use annota_l10n::{CatalogProvider, LocaleCatalog};
use once_cell::sync::Lazy;
use tracing::debug;

/// Embedded bundles, keyed by the lowercase tag they resolve under
const LOCALES: [(&str, &str); 13] = [
    ("ar", include_str!("../locales/ar.json")),
    ("de", include_str!("../locales/de.json")),
    ("en", include_str!("../locales/en.json")),
    ("es", include_str!("../locales/es.json")),
    ("fr", include_str!("../locales/fr.json")),
    ("ja", include_str!("../locales/ja.json")),
    ("ko", include_str!("../locales/ko.json")),
    ("nl", include_str!("../locales/nl.json")),
    ("pt", include_str!("../locales/pt.json")),
    ("sv", include_str!("../locales/sv.json")),
    ("tr", include_str!("../locales/tr.json")),
    ("zh", include_str!("../locales/zh.json")),
    ("zh-tw", include_str!("../locales/zh-tw.json")),
];

static CATALOG: Lazy<LocaleCatalog> = Lazy::new(|| {
    let mut catalog = LocaleCatalog::new();
    for (tag, json) in LOCALES {
        catalog
            .insert_bundle_json(tag, json)
            .expect("embedded locale bundle is valid JSON");
    }
    debug!(languages = catalog.len(), "note locale catalog loaded");
    catalog
});

/// The shared note-component locale catalog
pub fn catalog() -> &'static LocaleCatalog {
    &CATALOG
}

/// Resource provider over the embedded catalog
pub fn provider() -> CatalogProvider {
    CatalogProvider::new(catalog().clone())
}
