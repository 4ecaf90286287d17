//! End-to-end localization walkthrough
//!
//! Wires document settings, an in-memory catalog provider, and a
//! controller together, then drives a language switch the way a host
//! page would.

use annota_common::init_dev_logging;
use annota_l10n::{
    CatalogProvider, DateTimeStyle, DocumentLocaleSettings, LocaleCatalog,
    LocalizationController, MessageArgs, ResourceProvider,
};
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    init_dev_logging().map_err(|e| anyhow::anyhow!(e))?;

    let catalog = LocaleCatalog::from_json_str(
        r#"{
            "en": {
                "greeting": "Hello, {0}!",
                "noteCount": "{count, plural, =0 {No notes} one {# note} other {# notes}}"
            },
            "fr": {
                "greeting": "Bonjour, {0}!",
                "noteCount": "{count, plural, =0 {Aucune note} one {# note} other {# notes}}"
            }
        }"#,
    )?;

    let settings = Arc::new(DocumentLocaleSettings::with_languages(Some("en-US"), None));
    let provider: Arc<dyn ResourceProvider> = Arc::new(CatalogProvider::new(catalog));
    let controller = LocalizationController::attached(Arc::clone(&settings), provider);

    controller.resource_fetch_complete().await?;
    println!("resolved language: {:?}", controller.language());
    println!(
        "greeting: {}",
        controller.localize("greeting", &MessageArgs::positional(["World"]))
    );
    for count in [0, 1, 4] {
        println!(
            "note count ({count}): {}",
            controller.localize("noteCount", &MessageArgs::new().set("count", count))
        );
    }

    let now = Utc::now();
    println!("date: {}", controller.format_date(now, DateTimeStyle::Medium));
    println!("time: {}", controller.format_time(now));
    println!("number: {}", controller.format_number(1234567.5));
    println!("file size: {}", controller.format_file_size(3 * 1024 * 1024));

    // Simulate the host page switching its language.
    let mut events = controller.events();
    settings.set_language(Some("fr"));
    let event = events.recv().await?;
    println!("event: {event:?}");
    println!(
        "greeting now: {}",
        controller.localize("greeting", &MessageArgs::positional(["Monde"]))
    );
    println!("number now: {}", controller.format_number(1234567.5));

    Ok(())
}
