//! Locale catalogs and resource bundles
//!
//! A resource bundle is a flat key → template-string map for one language.
//! A catalog groups the bundles of one component family by lowercase
//! language tag. Bundles are plain JSON objects on disk; no other encoding
//! is supported.

use crate::error::{LocalizeError, LocalizeResult};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Flat mapping from message key to raw template string
pub type ResourceBundle = HashMap<String, String>;

/// Mapping from lowercase language tag to the bundle for that language
#[derive(Debug, Clone, Default)]
pub struct LocaleCatalog {
    bundles: HashMap<String, ResourceBundle>,
}

impl LocaleCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a bundle for a language tag, replacing any existing one
    ///
    /// The tag is lowercased; resolution always works on lowercase tags.
    pub fn insert_bundle(&mut self, tag: impl Into<String>, bundle: ResourceBundle) {
        let tag = tag.into().to_lowercase();
        debug!(tag = %tag, keys = bundle.len(), "inserting resource bundle");
        self.bundles.insert(tag, bundle);
    }

    /// Get the bundle for a language tag, if present
    pub fn bundle(&self, tag: &str) -> Option<&ResourceBundle> {
        self.bundles.get(tag)
    }

    /// Check whether a language tag has a bundle
    pub fn contains(&self, tag: &str) -> bool {
        self.bundles.contains_key(tag)
    }

    /// All language tags with a bundle, sorted for stable iteration
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.bundles.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Number of bundles in the catalog
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    /// Whether the catalog has no bundles
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Parse a whole catalog from a JSON string of the form
    /// `{"<tag>": {"<key>": "<template>", ...}, ...}`
    pub fn from_json_str(json: &str) -> LocalizeResult<Self> {
        let bundles: HashMap<String, ResourceBundle> =
            serde_json::from_str(json).map_err(|e| LocalizeError::BundleParse {
                message: "catalog is not a tag -> bundle object".to_string(),
                source: Some(e),
            })?;

        let mut catalog = Self::new();
        for (tag, bundle) in bundles {
            catalog.insert_bundle(tag, bundle);
        }
        Ok(catalog)
    }

    /// Parse a single bundle from a JSON string and insert it under `tag`
    pub fn insert_bundle_json(&mut self, tag: impl Into<String>, json: &str) -> LocalizeResult<()> {
        let bundle: ResourceBundle =
            serde_json::from_str(json).map_err(|e| LocalizeError::BundleParse {
                message: "bundle is not a key -> string object".to_string(),
                source: Some(e),
            })?;
        self.insert_bundle(tag, bundle);
        Ok(())
    }

    /// Load every `<tag>.json` file in a directory into a catalog
    ///
    /// Non-JSON files are skipped. A file that fails to parse aborts the
    /// load; a partially usable catalog would hide translation defects.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> LocalizeResult<Self> {
        let dir = dir.as_ref();
        let mut catalog = Self::new();

        let entries = fs::read_dir(dir).map_err(|_| LocalizeError::BundleLoad {
            path: dir.to_string_lossy().to_string(),
        })?;

        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(tag) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let content = fs::read_to_string(&path).map_err(|_| LocalizeError::BundleLoad {
                path: path.to_string_lossy().to_string(),
            })?;
            catalog.insert_bundle_json(tag.to_string(), &content)?;
        }

        debug!(dir = %dir.display(), bundles = catalog.len(), "loaded locale catalog");
        Ok(catalog)
    }

    /// Audit bundle completeness against a baseline tag (usually `en`)
    ///
    /// Returns, per non-baseline tag, the keys defined in the baseline
    /// bundle but absent from that tag's bundle. Missing keys render as
    /// empty strings at runtime; this audit exists so tests can keep the
    /// count at zero.
    pub fn missing_keys(&self, baseline: &str) -> BTreeMap<String, Vec<String>> {
        let mut report = BTreeMap::new();
        let Some(base) = self.bundles.get(baseline) else {
            warn!(baseline = %baseline, "completeness audit skipped: baseline bundle missing");
            return report;
        };

        for (tag, bundle) in &self.bundles {
            if tag == baseline {
                continue;
            }
            let mut missing: Vec<String> = base
                .keys()
                .filter(|key| !bundle.contains_key(*key))
                .cloned()
                .collect();
            if !missing.is_empty() {
                missing.sort_unstable();
                report.insert(tag.clone(), missing);
            }
        }
        report
    }
}
