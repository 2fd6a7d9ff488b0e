//! Environment configuration documents and controller settings.

pub mod document;
pub mod error;
pub mod settings;

pub use document::*;
pub use error::*;
pub use settings::*;
