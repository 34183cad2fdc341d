//! Image building engine.
//!
//! This module drives an external image-building daemon through its streaming
//! protocol: record classification, layer tracking, failure diagnosis, layer
//! squashing and tag application.

pub mod driver;
pub mod events;
pub mod layers;
pub mod output;
pub mod squash;
pub mod tags;

pub use driver::ImageBuilder;
pub use events::{classify, strip_ansi, BuildEvent};
pub use layers::LayerTracker;
pub use output::{BuildLog, TracingLog};
pub use squash::{LayerSquasher, SquashError};
