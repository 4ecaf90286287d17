//! Events emitted by the note components
//!
//! The components return events from their transition methods; the
//! host decides how to propagate them (to a DOM event bus, a message
//! channel, or directly to application code).

/// Events from a [`Note`](crate::Note)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteEvent {
    /// The delete menu item was chosen
    Delete { id: String },
}

/// Events from a [`NoteEditor`](crate::NoteEditor)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// A new note was submitted
    Add { id: String, text: String },
    /// An edited note was submitted
    Save { id: String, text: String },
    /// The pending text was discarded
    Discard { id: String, value: String },
    /// Editing finished, by submit or discard
    Finished { id: String, value: String },
}

/// Events from a [`NotesList`](crate::NotesList)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEvent {
    /// The user asked for the full list
    LoadMore,
    /// The user collapsed back to the windowed view
    LoadLess,
}
