//! gantry — container-image build orchestration.
//!
//! Given a generated build context, gantry drives an external image-building
//! daemon through its streaming protocol, classifies and logs the output,
//! tracks intermediate layer ids, squashes the result anchored at a base
//! layer, and applies secondary tags.

pub mod builder;
pub mod config;
pub mod daemon;
pub mod deps;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use builder::{BuildEvent, BuildLog, ImageBuilder, LayerSquasher, LayerTracker, TracingLog};
pub use config::{daemon_timeout, BuildConfig};
pub use daemon::{BuildRequest, ContainerDaemon, RawRecord, RecordStream, TransportError};
pub use error::{GantryError, Result};
pub use types::{BuiltImage, LayerId};
