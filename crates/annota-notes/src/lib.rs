//! Localized note components
//!
//! View-models for a note, a note editor, and a paginated notes list,
//! with all user-visible strings resolved through an
//! [`annota_l10n::LocalizationController`]. Presentation (markup,
//! styling, focus handling) belongs to the host; these types carry the
//! state logic and the event contracts.

pub mod events;
pub mod lang;
pub mod note;
pub mod note_edit;
pub mod notes_list;

pub use events::{EditorEvent, ListEvent, NoteEvent};
pub use note::{Note, NoteUser};
pub use note_edit::NoteEditor;
pub use notes_list::NotesList;
