//! Paginated notes list view-model
//!
//! Shows a collapsed window over the notes until the user asks for
//! more. The `has_more` flag lets a host that pages notes server-side
//! keep the load-more control visible regardless of how many notes are
//! currently loaded.

use crate::events::ListEvent;
use crate::note::Note;
use annota_l10n::{LocalizationController, MessageArgs};
use tracing::debug;

/// Number of notes shown while collapsed, unless configured otherwise
const DEFAULT_COLLAPSED_SIZE: usize = 4;

/// The notes list and its pagination state
#[derive(Debug, Clone, PartialEq)]
pub struct NotesList {
    notes: Vec<Note>,
    /// Whether the current user may create new notes
    pub can_create: bool,
    /// Host flag: more notes exist beyond those loaded
    pub has_more: bool,
    collapsed: bool,
    collapsed_size: usize,
    /// Host override for the load-more control text
    pub load_more_string: Option<String>,
    /// Host override for the load-less control text
    pub load_less_string: Option<String>,
    /// Host override for the empty-list text
    pub empty_string: Option<String>,
}

impl Default for NotesList {
    fn default() -> Self {
        Self {
            notes: Vec::new(),
            can_create: false,
            has_more: false,
            collapsed: true,
            collapsed_size: DEFAULT_COLLAPSED_SIZE,
            load_more_string: None,
            load_less_string: None,
            empty_string: None,
        }
    }
}

impl NotesList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn set_notes(&mut self, notes: Vec<Note>) {
        self.notes = notes;
    }

    pub fn push_note(&mut self, note: Note) {
        self.notes.push(note);
    }

    /// Remove a note by id, returning whether anything was removed
    pub fn remove_note(&mut self, id: &str) -> bool {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != id);
        self.notes.len() != before
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn collapsed_size(&self) -> usize {
        self.collapsed_size
    }

    pub fn set_collapsed_size(&mut self, size: usize) {
        self.collapsed_size = size;
    }

    /// The notes currently visible
    pub fn visible_notes(&self) -> &[Note] {
        if self.collapsed {
            let end = self.collapsed_size.min(self.notes.len());
            &self.notes[..end]
        } else {
            &self.notes
        }
    }

    /// Whether the more/less control should render
    pub fn shows_more_less(&self) -> bool {
        self.has_more || self.notes.len() > self.collapsed_size
    }

    /// Toggle between the collapsed window and the full list
    ///
    /// Expanding emits `LoadMore` so a host that pages server-side can
    /// fetch the rest; collapsing emits `LoadLess`. No event while the
    /// control is hidden.
    pub fn toggle_more_less(&mut self) -> Option<ListEvent> {
        if !self.shows_more_less() {
            return None;
        }
        if self.has_more || self.collapsed {
            debug!(notes = self.notes.len(), "notes list expanding");
            self.collapsed = false;
            Some(ListEvent::LoadMore)
        } else {
            debug!(notes = self.notes.len(), "notes list collapsing");
            self.collapsed = true;
            Some(ListEvent::LoadLess)
        }
    }

    /// Text of the more/less control
    pub fn more_less_label(&self, localize: &LocalizationController) -> String {
        if self.has_more || self.collapsed {
            match &self.load_more_string {
                Some(value) => value.clone(),
                None => localize.localize("more", &MessageArgs::new()),
            }
        } else {
            match &self.load_less_string {
                Some(value) => value.clone(),
                None => localize.localize("less", &MessageArgs::new()),
            }
        }
    }

    /// Text shown when there are no notes
    pub fn empty_label(&self, localize: &LocalizationController) -> String {
        match &self.empty_string {
            Some(value) => value.clone(),
            None => localize.localize("empty", &MessageArgs::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_with(count: usize) -> NotesList {
        let mut list = NotesList::new();
        list.set_notes(
            (0..count)
                .map(|i| Note::with_text(format!("n{i}"), format!("note {i}")))
                .collect(),
        );
        list
    }

    #[test]
    fn test_collapsed_window_defaults_to_four() {
        let list = list_with(6);
        assert!(list.is_collapsed());
        assert_eq!(list.visible_notes().len(), 4);
        assert_eq!(list.visible_notes()[0].id, "n0");
    }

    #[test]
    fn test_short_list_shows_everything_and_no_control() {
        let list = list_with(3);
        assert_eq!(list.visible_notes().len(), 3);
        assert!(!list.shows_more_less());
    }

    #[test]
    fn test_toggle_expands_then_collapses() {
        let mut list = list_with(6);
        assert_eq!(list.toggle_more_less(), Some(ListEvent::LoadMore));
        assert!(!list.is_collapsed());
        assert_eq!(list.visible_notes().len(), 6);

        assert_eq!(list.toggle_more_less(), Some(ListEvent::LoadLess));
        assert!(list.is_collapsed());
        assert_eq!(list.visible_notes().len(), 4);
    }

    #[test]
    fn test_toggle_without_control_is_inert() {
        let mut list = list_with(2);
        assert_eq!(list.toggle_more_less(), None);
        assert!(list.is_collapsed());
    }

    #[test]
    fn test_has_more_keeps_load_more_active() {
        let mut list = list_with(2);
        list.has_more = true;
        assert!(list.shows_more_less());
        // With server-side paging, every toggle asks for more.
        assert_eq!(list.toggle_more_less(), Some(ListEvent::LoadMore));
        assert_eq!(list.toggle_more_less(), Some(ListEvent::LoadMore));
    }

    #[test]
    fn test_remove_note() {
        let mut list = list_with(3);
        assert!(list.remove_note("n1"));
        assert!(!list.remove_note("n1"));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_custom_collapsed_size() {
        let mut list = list_with(6);
        list.set_collapsed_size(2);
        assert_eq!(list.visible_notes().len(), 2);
        assert!(list.shows_more_less());
    }
}
