//! Integration tests for the note components
//!
//! The components render their labels through a real controller
//! attached to the embedded locale catalog, exactly as a host would
//! wire them.

use annota_l10n::{DocumentLocaleSettings, LocalizationController, MessageArgs, ResourceProvider};
use annota_notes::{lang, EditorEvent, ListEvent, Note, NoteEditor, NotesList};
use chrono::{TimeZone, Utc};
use std::sync::Arc;

async fn controller_for(
    language: Option<&str>,
) -> (Arc<DocumentLocaleSettings>, Arc<LocalizationController>) {
    let settings = Arc::new(DocumentLocaleSettings::with_languages(language, None));
    let provider: Arc<dyn ResourceProvider> = Arc::new(lang::provider());
    let controller = LocalizationController::attached(Arc::clone(&settings), provider);
    controller
        .resource_fetch_complete()
        .await
        .expect("embedded catalog always resolves");
    (settings, controller)
}

#[tokio::test]
async fn test_unready_controller_renders_empty_labels() {
    let settings = Arc::new(DocumentLocaleSettings::new());
    let provider: Arc<dyn ResourceProvider> = Arc::new(lang::provider());
    let controller = LocalizationController::new(settings, provider);

    let note = Note::with_text("n1", "hello");
    assert_eq!(note.edit_label(&controller), "");
    assert_eq!(note.context_menu_label(&controller), "");
}

#[tokio::test]
async fn test_note_labels_resolve_for_document_language() {
    let (_settings, controller) = controller_for(Some("fr-CA")).await;
    assert_eq!(controller.language().as_deref(), Some("fr"));

    let note = Note::with_text("n1", "hello");
    assert_eq!(note.edit_label(&controller), "Modifier");
    assert_eq!(note.delete_label(&controller), "Supprimer");
    assert_eq!(note.private_label(&controller), "Privé");
    assert_eq!(note.context_menu_label(&controller), "Menu contextuel");
}

#[tokio::test]
async fn test_host_override_strings_take_precedence() {
    let (_settings, controller) = controller_for(Some("en")).await;

    let mut note = Note::with_text("n1", "hello");
    note.edit_string = Some("Edit Note".to_string());
    assert_eq!(note.edit_label(&controller), "Edit Note");
    assert_eq!(note.delete_label(&controller), "Delete");
}

#[tokio::test]
async fn test_me_attribution_is_localized() {
    let (_settings, controller) = controller_for(Some("de")).await;

    let mut note = Note::with_text("n1", "hello");
    note.show_avatar = true;
    note.me = true;
    assert_eq!(note.display_name(&controller).as_deref(), Some("Ich"));
}

#[tokio::test]
async fn test_subtext_marks_updated_notes_as_edited() {
    let (_settings, controller) = controller_for(Some("en")).await;

    let mut note = Note::with_text("n1", "hello");
    note.created_at = Some(Utc.with_ymd_and_hms(2019, 4, 23, 17, 8, 33).unwrap());
    assert_eq!(note.subtext(&controller), "Apr 23, 2019 5:08 PM");

    note.updated_at = Some(Utc.with_ymd_and_hms(2019, 4, 24, 17, 8, 33).unwrap());
    assert_eq!(note.subtext(&controller), "Apr 23, 2019 5:08 PM (Edited)");
}

#[tokio::test]
async fn test_editor_labels_per_mode() {
    let (_settings, controller) = controller_for(Some("en")).await;

    let entry = NoteEditor::new_entry("edit-1");
    assert_eq!(entry.action_label(&controller), "Add");
    assert_eq!(entry.discard_label(&controller), "Discard");

    let mut note = Note::with_text("n1", "existing");
    note.can_edit = true;
    let editor = NoteEditor::for_note(&note);
    assert_eq!(editor.action_label(&controller), "Save");
}

#[tokio::test]
async fn test_note_edit_cycle_emits_expected_events() {
    let (_settings, controller) = controller_for(Some("en")).await;

    let mut note = Note::with_text("n1", "first draft");
    note.can_edit = true;
    assert!(note.start_editing());

    let mut editor = NoteEditor::for_note(&note);
    assert_eq!(editor.action_label(&controller), "Save");
    editor.input("second draft");

    let events = editor.submit();
    assert_eq!(
        events,
        vec![
            EditorEvent::Save {
                id: "n1".to_string(),
                text: "second draft".to_string()
            },
            EditorEvent::Finished {
                id: "n1".to_string(),
                value: "second draft".to_string()
            },
        ]
    );
    note.finish_editing();
    assert!(!note.is_editing());
}

#[tokio::test]
async fn test_list_pagination_and_labels() {
    let (_settings, controller) = controller_for(Some("en")).await;

    let mut list = NotesList::new();
    list.set_notes(
        (0..6)
            .map(|i| Note::with_text(format!("n{i}"), format!("note {i}")))
            .collect(),
    );

    assert_eq!(list.visible_notes().len(), 4);
    assert_eq!(list.more_less_label(&controller), "more");

    assert_eq!(list.toggle_more_less(), Some(ListEvent::LoadMore));
    assert_eq!(list.visible_notes().len(), 6);
    assert_eq!(list.more_less_label(&controller), "less");

    assert_eq!(list.toggle_more_less(), Some(ListEvent::LoadLess));
    assert_eq!(list.visible_notes().len(), 4);
}

#[tokio::test]
async fn test_empty_list_label() {
    let (_settings, controller) = controller_for(Some("sv")).await;

    let list = NotesList::new();
    assert!(list.is_empty());
    assert_eq!(list.empty_label(&controller), "Inga anteckningar");

    let mut list = NotesList::new();
    list.empty_string = Some("Nothing here".to_string());
    assert_eq!(list.empty_label(&controller), "Nothing here");
}

#[tokio::test]
async fn test_document_language_switch_relabels_components() {
    let (settings, controller) = controller_for(Some("en")).await;
    let note = Note::with_text("n1", "hello");
    assert_eq!(note.edit_label(&controller), "Edit");

    let mut events = controller.events();
    settings.set_language(Some("ja"));
    events.recv().await.expect("language change notification");

    assert_eq!(note.edit_label(&controller), "編集");
    assert_eq!(
        controller.localize("subtextEdited", &MessageArgs::positional(["4/23"])),
        "4/23(編集済み)"
    );
}

#[tokio::test]
async fn test_regional_chinese_resolves_to_traditional_bundle() {
    let (_settings, controller) = controller_for(Some("zh-TW")).await;
    assert_eq!(controller.language().as_deref(), Some("zh-tw"));

    let note = Note::with_text("n1", "hello");
    assert_eq!(note.delete_label(&controller), "刪除");
}
