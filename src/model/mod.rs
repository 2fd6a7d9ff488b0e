//! Plain data structures shared by the registry, discovery and launcher layers.

pub mod event;
pub mod service;

pub use event::*;
pub use service::*;
