//! A single timestamped, attributable note
//!
//! The view-model behind one rendered note: attribution, timestamps,
//! visibility, permissions, and the edit-mode flag. All user-visible
//! labels resolve through the owning component's localization
//! controller, with host-supplied override strings taking precedence
//! over the bundled translations.

use crate::events::NoteEvent;
use annota_l10n::{DateTimeStyle, LocalizationController, MessageArgs};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Attribution shown next to a note
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteUser {
    pub name: String,
    /// Avatar image location, if the host renders avatars
    pub avatar_url: Option<String>,
    /// Whether fetching the avatar requires the host token
    pub require_token_auth: bool,
    /// Profile link for the user
    pub href: Option<String>,
}

/// One note and its presentation state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Note {
    pub id: String,
    pub user: Option<NoteUser>,
    /// Token used when the avatar requires authentication
    pub token: Option<String>,
    pub show_avatar: bool,
    /// The note belongs to the current user
    pub me: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub text: String,
    pub can_edit: bool,
    pub can_delete: bool,
    pub private: bool,
    pub date_style: DateTimeStyle,
    editing: bool,
    /// Host override for the context menu label
    pub context_menu_string: Option<String>,
    /// Host override for the edit menu item
    pub edit_string: Option<String>,
    /// Host override for the delete menu item
    pub delete_string: Option<String>,
    /// Host override for the private indicator label
    pub private_string: Option<String>,
}

impl Note {
    /// Create an empty note with a fresh id
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ..Self::default()
        }
    }

    /// Create a note with host-supplied id and text
    pub fn with_text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Name to display for the note's author
    ///
    /// Only meaningful when avatars are shown; the current user renders
    /// as the localized "me" term rather than their account name.
    pub fn display_name(&self, localize: &LocalizationController) -> Option<String> {
        if !self.show_avatar {
            return None;
        }
        if self.me {
            return Some(localize.localize("me", &MessageArgs::new()));
        }
        self.user.as_ref().map(|user| user.name.clone())
    }

    /// Attribution subtext: the creation timestamp, marked as edited
    /// when the note was updated after creation
    pub fn subtext(&self, localize: &LocalizationController) -> String {
        let Some(created_at) = self.created_at else {
            return String::new();
        };
        let date_time = localize.format_date_time(created_at, self.date_style);
        if self.updated_at.is_some() {
            localize.localize("subtextEdited", &MessageArgs::new().set("0", date_time))
        } else {
            date_time
        }
    }

    /// Whether the edit/delete context menu should render
    pub fn has_context_menu(&self) -> bool {
        self.can_edit || self.can_delete
    }

    pub fn context_menu_label(&self, localize: &LocalizationController) -> String {
        self.label(&self.context_menu_string, "contextMenu", localize)
    }

    pub fn edit_label(&self, localize: &LocalizationController) -> String {
        self.label(&self.edit_string, "edit", localize)
    }

    pub fn delete_label(&self, localize: &LocalizationController) -> String {
        self.label(&self.delete_string, "delete", localize)
    }

    pub fn private_label(&self, localize: &LocalizationController) -> String {
        self.label(&self.private_string, "private", localize)
    }

    fn label(
        &self,
        host_override: &Option<String>,
        key: &str,
        localize: &LocalizationController,
    ) -> String {
        match host_override {
            Some(value) => value.clone(),
            None => localize.localize(key, &MessageArgs::new()),
        }
    }

    /// Whether the note is showing its editor
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Switch into edit mode, when permitted
    pub fn start_editing(&mut self) -> bool {
        if !self.can_edit || self.editing {
            return false;
        }
        debug!(id = %self.id, "note entering edit mode");
        self.editing = true;
        true
    }

    /// Leave edit mode (editor finished or was discarded)
    pub fn finish_editing(&mut self) {
        self.editing = false;
    }

    /// Request deletion; emits only when the current user may delete
    pub fn delete(&self) -> Option<NoteEvent> {
        if !self.can_delete {
            return None;
        }
        Some(NoteEvent::Delete {
            id: self.id.clone(),
        })
    }
}
