//! Core domain types, notes parsing, crop resolution and Anki deck
//! formatting for slide-based flashcards.

pub mod crop;
pub mod deck;
pub mod error;
pub mod parser;
pub mod types;

pub use crop::{resolve_crop, CropResolution, CropSpec, PercentRange};
pub use deck::{Card, CardField, DeckFormatter, MediaRequest};
pub use error::{Error, Result};
pub use parser::{parse_notes, NotesParser};
pub use types::{
    Category, ParseWarning, ParsedNotes, Separator, SlideNumber, SlideRecord, DEFAULT_SEPARATOR,
};
