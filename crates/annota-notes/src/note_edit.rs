//! Note editor view-model
//!
//! Backs both the "add a note" entry area and the in-place editor of
//! an existing note. Submit emits `Add` or `Save` depending on which
//! of the two it is, always followed by `Finished`; discard emits
//! `Discard` then `Finished` and collapses the editor.

use crate::events::EditorEvent;
use crate::note::Note;
use annota_l10n::{LocalizationController, MessageArgs};
use tracing::debug;

/// Editor state for creating or editing one note
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteEditor {
    pub id: String,
    /// True when this editor creates a new note rather than editing
    new_note: bool,
    /// Current text buffer, updated as the user types
    pub value: String,
    pub placeholder: String,
    expanded: bool,
    error_message: Option<String>,
    /// Host override for the 'Add' action label
    pub add_note_string: Option<String>,
    /// Host override for the 'Save' action label
    pub save_note_string: Option<String>,
    /// Host override for the 'Discard' action label
    pub discard_note_string: Option<String>,
}

impl NoteEditor {
    /// Editor for creating a new note
    pub fn new_entry(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            new_note: true,
            ..Self::default()
        }
    }

    /// Editor for an existing note, seeded with its text
    pub fn for_note(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            new_note: false,
            value: note.text.clone(),
            // The in-place editor opens already focused.
            expanded: true,
            ..Self::default()
        }
    }

    pub fn is_new(&self) -> bool {
        self.new_note
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Focus expands the editor to its full height
    pub fn focus(&mut self) {
        self.expanded = true;
    }

    /// Replace the text buffer (the textarea input handler)
    pub fn input(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Label of the primary action button
    pub fn action_label(&self, localize: &LocalizationController) -> String {
        let (host_override, key) = if self.new_note {
            (&self.add_note_string, "add")
        } else {
            (&self.save_note_string, "save")
        };
        match host_override {
            Some(value) => value.clone(),
            None => localize.localize(key, &MessageArgs::new()),
        }
    }

    /// Label of the discard button
    pub fn discard_label(&self, localize: &LocalizationController) -> String {
        match &self.discard_note_string {
            Some(value) => value.clone(),
            None => localize.localize("discard", &MessageArgs::new()),
        }
    }

    /// Submit the buffer
    ///
    /// Emits `Add` (new) or `Save` (editing) followed by `Finished`,
    /// then clears the buffer. Any previous error is dismissed.
    pub fn submit(&mut self) -> Vec<EditorEvent> {
        self.error_message = None;
        let text = self.value.clone();
        debug!(id = %self.id, new = self.new_note, "editor submit");
        let action = if self.new_note {
            EditorEvent::Add {
                id: self.id.clone(),
                text: text.clone(),
            }
        } else {
            EditorEvent::Save {
                id: self.id.clone(),
                text: text.clone(),
            }
        };
        let finished = EditorEvent::Finished {
            id: self.id.clone(),
            value: text,
        };
        self.value.clear();
        vec![action, finished]
    }

    /// Discard the buffer and collapse the editor
    pub fn discard(&mut self) -> Vec<EditorEvent> {
        self.error_message = None;
        let value = self.value.clone();
        debug!(id = %self.id, "editor discard");
        let events = vec![
            EditorEvent::Discard {
                id: self.id.clone(),
                value: value.clone(),
            },
            EditorEvent::Finished {
                id: self.id.clone(),
                value,
            },
        ];
        self.value.clear();
        self.expanded = false;
        events
    }

    /// Show a failure from the host's note-persistence call
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }
}
