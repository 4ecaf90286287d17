//! Document-driven localization core for annota components
//!
//! The pieces layer bottom-up: [`catalog`] stores per-language resource
//! bundles, [`resolver`] turns document language settings into an
//! ordered candidate list and picks the first available bundle,
//! [`formatter`] compiles and caches message templates, [`settings`]
//! carries the externally mutated document configuration, [`provider`]
//! is the async seam resources are fetched through, [`intl`] formats
//! and parses locale-aware values, and [`controller`] ties it all
//! together per component instance.

pub mod catalog;
pub mod controller;
pub mod error;
pub mod formatter;
pub mod intl;
pub mod plural;
pub mod provider;
pub mod resolver;
pub mod settings;

pub use catalog::{LocaleCatalog, ResourceBundle};
pub use controller::{
    ControllerPhase, LocaleEvent, LocalizationController, Readiness, ResolvedLocaleState,
};
pub use error::{LocalizeError, LocalizeResult};
pub use formatter::{ArgValue, CompiledMessage, MessageArgs, MessageCache};
pub use intl::{ChronoIntl, DateTimeStyle, IntlFormat, IntlOverrides};
pub use plural::{plural_category, PluralCategory};
pub use provider::{CatalogProvider, ResolvedResources, ResourceProvider};
pub use resolver::{candidate_languages, resolve};
pub use settings::{DocumentLocaleSettings, LocaleSettingsSnapshot, TimezoneDescriptor};
