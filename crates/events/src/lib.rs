//! Event system for the note editor
//!
//! This crate provides the typed events exchanged between editor components
//! and the emitter that fans them out to subscribers.

mod emitter;
mod error;
mod types;

pub use emitter::{Emitter, EventCallback};
pub use error::{EventError, Result};
pub use types::*;
