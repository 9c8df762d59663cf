//! Note domain types shared across the editor components.

pub mod domain;
pub mod error;

pub use domain::note::NoteConfig;
pub use error::CoreError;
