//! Error types for gantry.
//!
//! All errors use `thiserror` for ergonomic error handling and proper error chains.

use crate::daemon::TransportError;
use crate::types::LayerId;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gantry operations.
pub type Result<T> = std::result::Result<T, GantryError>;

/// Main error type for gantry.
#[derive(Error, Debug)]
pub enum GantryError {
    // Configuration errors
    #[error("Provided timeout value '{value}' cannot be used, it must be a positive number of seconds")]
    InvalidTimeout { value: String },

    #[error("No image tags configured, at least the primary (build) tag is required")]
    MissingPrimaryTag,

    // Daemon connection errors, classified at the client boundary
    #[error("Unable to contact the Docker daemon. Is it correctly set up? Running the client as a user without access to the daemon socket fails this way")]
    DaemonPermissionDenied {
        #[source]
        source: TransportError,
    },

    #[error("Unable to contact the Docker daemon. Is it started?")]
    DaemonNotRunning {
        #[source]
        source: TransportError,
    },

    #[error("Unknown connection error from the Docker daemon. Is it started and correctly set up?")]
    DaemonUnreachable {
        #[source]
        source: TransportError,
    },

    // Streaming errors
    #[error("Image build failed: '{message}'")]
    DaemonReported { message: String },

    #[error("Could not decode build record from the daemon stream")]
    MalformedRecord {
        record: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Daemon signalled a successful build but no layer ids were found in the build output")]
    MissingLayerId,

    // Diagnosed build failures
    #[error("Image build failed with a yum error and you don't have any yum repository configured, please check your image/module descriptor for proper repository definitions")]
    RepositoryConfigMissing {
        #[source]
        source: Box<GantryError>,
    },

    #[error("Image build failed, see logs above{}", suggestion_text(.suggestion))]
    BuildFailed {
        suggestion: Option<LayerId>,
        #[source]
        source: Box<GantryError>,
    },

    // Post-build errors
    #[error("Squashing image {image} failed")]
    SquashFailed {
        image: LayerId,
        #[source]
        source: crate::builder::squash::SquashError,
    },

    #[error("Failed to apply tag '{tag}'")]
    TagFailed {
        tag: String,
        #[source]
        source: TransportError,
    },

    // File system errors
    #[error("I/O error at {path:?}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn suggestion_text(suggestion: &Option<LayerId>) -> String {
    match suggestion {
        Some(layer) => format!(
            ". You can look inside the failed image by running 'docker run --rm -ti {layer} bash'"
        ),
        None => String::new(),
    }
}

impl From<TransportError> for GantryError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::PermissionDenied { .. } => Self::DaemonPermissionDenied { source: err },
            TransportError::NotRunning { .. } => Self::DaemonNotRunning { source: err },
            TransportError::ConnectionFailed { .. } | TransportError::TimedOut { .. } => {
                Self::DaemonUnreachable { source: err }
            }
        }
    }
}
