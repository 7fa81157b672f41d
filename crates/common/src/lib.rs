//! Shared types for the playlist annotator workspace

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
