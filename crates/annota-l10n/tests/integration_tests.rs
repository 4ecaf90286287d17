//! Integration tests for the localization core
//!
//! These drive the controller through a real settings object and
//! provider rather than poking internals: attach, await readiness,
//! mutate the document settings, observe the resolved state.

use annota_l10n::{
    candidate_languages, resolve, CatalogProvider, ControllerPhase, DocumentLocaleSettings,
    LocaleCatalog, LocaleEvent, LocalizationController, LocalizeError, LocalizeResult,
    MessageArgs, ResolvedResources, ResourceProvider,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;

fn notes_catalog() -> LocaleCatalog {
    LocaleCatalog::from_json_str(
        r#"{
            "en": {"greeting": "Hello, {0}!", "x": "Y"},
            "fr": {"greeting": "Bonjour, {0}!", "x": "Y-fr"}
        }"#,
    )
    .unwrap()
}

fn controller_over(
    catalog: LocaleCatalog,
    language: Option<&str>,
) -> (Arc<DocumentLocaleSettings>, Arc<LocalizationController>) {
    let settings = Arc::new(DocumentLocaleSettings::with_languages(language, None));
    let provider: Arc<dyn ResourceProvider> = Arc::new(CatalogProvider::new(catalog));
    let controller = LocalizationController::attached(Arc::clone(&settings), provider);
    (settings, controller)
}

/// Provider that delays each language by a scripted amount, for
/// exercising the last-write-wins ordering guarantee
struct ScriptedProvider {
    catalog: LocaleCatalog,
    delays: HashMap<String, Duration>,
}

#[async_trait]
impl ResourceProvider for ScriptedProvider {
    async fn get_resources(
        &self,
        candidates: &[String],
    ) -> LocalizeResult<Option<ResolvedResources>> {
        let resolved = resolve(candidates, &self.catalog);
        if let Some(language) = &resolved {
            if let Some(delay) = self.delays.get(language) {
                tokio::time::sleep(*delay).await;
            }
        }
        Ok(resolved.map(|language| ResolvedResources {
            resources: self.catalog.bundle(&language).cloned().unwrap_or_default(),
            language,
        }))
    }
}

/// Provider whose fetches always fail
struct FailingProvider;

#[async_trait]
impl ResourceProvider for FailingProvider {
    async fn get_resources(
        &self,
        _candidates: &[String],
    ) -> LocalizeResult<Option<ResolvedResources>> {
        Err(LocalizeError::ResourceFetch {
            message: "backend unavailable".to_string(),
        })
    }
}

#[tokio::test]
async fn test_localize_empty_until_ready_then_serves() {
    let (_settings, controller) = controller_over(notes_catalog(), None);

    // Attach has happened but the fetch may not have committed yet; the
    // unready answer is always the empty string.
    if !controller.is_ready() {
        assert_eq!(controller.localize("x", &MessageArgs::new()), "");
    }

    controller.resource_fetch_complete().await.unwrap();
    assert_eq!(controller.localize("x", &MessageArgs::new()), "Y");
}

#[tokio::test]
async fn test_unmatched_language_falls_back_to_en() {
    let catalog = LocaleCatalog::from_json_str(r#"{"en": {"x": "Y"}}"#).unwrap();
    let (_settings, controller) = controller_over(catalog, Some("fr-fr"));

    controller.resource_fetch_complete().await.unwrap();
    assert_eq!(controller.language().as_deref(), Some("en"));
}

#[tokio::test]
async fn test_empty_settings_resolve_via_universal_fallback() {
    let catalog = LocaleCatalog::from_json_str(r#"{"en-us": {"x": "Y"}}"#).unwrap();
    let (_settings, controller) = controller_over(catalog, None);

    controller.resource_fetch_complete().await.unwrap();
    assert_eq!(controller.language().as_deref(), Some("en-us"));
}

#[tokio::test]
async fn test_both_localize_calling_conventions_agree() {
    let (_settings, controller) = controller_over(notes_catalog(), None);
    controller.resource_fetch_complete().await.unwrap();

    let positional = controller.localize("greeting", &MessageArgs::positional(["World"]));
    let named = controller.localize("greeting", &MessageArgs::new().set("0", "World"));
    assert_eq!(positional, "Hello, World!");
    assert_eq!(positional, named);
}

#[tokio::test]
async fn test_settings_change_refetches_and_notifies() {
    let (settings, controller) = controller_over(notes_catalog(), None);
    let mut events = controller.events();

    controller.resource_fetch_complete().await.unwrap();
    assert_eq!(controller.language().as_deref(), Some("en"));
    // The initial resolution is silent.
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

    settings.set_language(Some("fr"));
    let event = events.recv().await.unwrap();
    assert_eq!(
        event,
        LocaleEvent::LanguageChanged {
            language: "fr".to_string()
        }
    );
    assert_eq!(controller.language().as_deref(), Some("fr"));
    assert_eq!(controller.localize("x", &MessageArgs::new()), "Y-fr");
}

#[tokio::test]
async fn test_timezone_change_dispatches_event() {
    let (settings, controller) = controller_over(notes_catalog(), None);
    let mut events = controller.events();
    controller.resource_fetch_complete().await.unwrap();

    settings.set_timezone_attr(r#"{"name": "Eastern", "identifier": "-05:00"}"#);
    let event = events.recv().await.unwrap();
    match event {
        LocaleEvent::TimezoneChanged { timezone } => {
            assert_eq!(timezone.name, "Eastern");
            assert_eq!(timezone.identifier, "-05:00");
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert_eq!(controller.timezone().name, "Eastern");
}

#[tokio::test(start_paused = true)]
async fn test_stale_fetch_never_overwrites_newer_state() {
    let settings = Arc::new(DocumentLocaleSettings::with_languages(Some("en"), None));
    let provider: Arc<dyn ResourceProvider> = Arc::new(ScriptedProvider {
        catalog: notes_catalog(),
        delays: HashMap::from([
            ("en".to_string(), Duration::from_millis(200)),
            ("fr".to_string(), Duration::from_millis(50)),
        ]),
    });
    let controller = LocalizationController::attached(Arc::clone(&settings), provider);

    // Supersede the slow English fetch before it completes.
    settings.set_language(Some("fr"));

    // Wait past both fetch completions.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(controller.language().as_deref(), Some("fr"));
    assert_eq!(controller.localize("x", &MessageArgs::new()), "Y-fr");
}

#[tokio::test]
async fn test_fetch_failure_rejects_readiness() {
    let settings = Arc::new(DocumentLocaleSettings::new());
    let provider: Arc<dyn ResourceProvider> = Arc::new(FailingProvider);
    let controller = LocalizationController::attached(settings, provider);

    let err = controller.resource_fetch_complete().await.unwrap_err();
    assert!(matches!(err, LocalizeError::ResourceFetch { .. }));
    assert!(!controller.is_ready());
    assert_eq!(controller.localize("x", &MessageArgs::new()), "");
}

#[tokio::test(start_paused = true)]
async fn test_no_matching_catalog_entry_stays_unready() {
    let settings = Arc::new(DocumentLocaleSettings::with_languages(Some("fr"), None));
    let provider: Arc<dyn ResourceProvider> =
        Arc::new(CatalogProvider::new(LocaleCatalog::new()));
    let controller = LocalizationController::attached(settings, provider);

    // The readiness future never settles for a catalog with no
    // universal fallback entry.
    let waited = tokio::time::timeout(
        Duration::from_secs(5),
        controller.resource_fetch_complete(),
    )
    .await;
    assert!(waited.is_err());
    assert_eq!(controller.phase(), ControllerPhase::AwaitingLanguage);
    assert!(!controller.is_ready());
}

#[tokio::test]
async fn test_malformed_overrides_fall_back_to_base_locale_rules() {
    let (settings, controller) = controller_over(notes_catalog(), None);
    controller.resource_fetch_complete().await.unwrap();

    settings.set_overrides_attr("{definitely not json");
    assert_eq!(controller.format_number(1234.5), "1,234.5");
}

#[tokio::test]
async fn test_catalog_loaded_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("en.json"),
        r#"{"greeting": "Hello, {0}!"}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("fr.json"),
        r#"{"greeting": "Bonjour, {0}!"}"#,
    )
    .unwrap();
    fs::write(dir.path().join("README.md"), "not a bundle").unwrap();

    let catalog = LocaleCatalog::load_dir(dir.path()).unwrap();
    assert_eq!(catalog.len(), 2);

    let candidates = candidate_languages(Some("fr-CA"), None);
    assert_eq!(resolve(&candidates, &catalog).as_deref(), Some("fr"));

    let (_settings, controller) = controller_over(catalog, Some("fr"));
    controller.resource_fetch_complete().await.unwrap();
    assert_eq!(
        controller.localize("greeting", &MessageArgs::positional(["World"])),
        "Bonjour, World!"
    );
}
