//! Client abstraction for the container build daemon.
//!
//! The engine never talks to a daemon socket directly; it drives whatever
//! implements [`ContainerDaemon`]. Connection-level failures are classified
//! here, at the client boundary, so the build driver never has to inspect
//! formatted error text to tell a permission problem from a stopped daemon.

use async_trait::async_trait;
use std::path::PathBuf;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tokio_stream::Stream;

/// A single build invocation, immutable once constructed.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Absolute path to the generated build context.
    pub context_path: PathBuf,
    /// Primary (build-time) tag.
    pub tag: String,
    /// Pull newer versions of the base image before building.
    pub pull: bool,
    /// Remove intermediate containers after each step.
    pub remove_intermediate: bool,
}

/// Transport-level failure while talking to the daemon.
///
/// The variants carry the operator-relevant distinction directly; callers
/// match on them instead of probing error chains.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("permission denied on the daemon socket")]
    PermissionDenied {
        #[source]
        source: std::io::Error,
    },

    #[error("daemon socket not found, the daemon process is not running")]
    NotRunning {
        #[source]
        source: std::io::Error,
    },

    #[error("daemon connection failed: {reason}")]
    ConnectionFailed { reason: String },

    #[error("daemon communication timed out after {after:?}")]
    TimedOut { after: Duration },
}

/// One raw record from the daemon's streaming build endpoint, as an
/// undecoded JSON document.
pub type RawRecord = String;

/// The daemon's streaming build output.
pub type RecordStream =
    Pin<Box<dyn Stream<Item = std::result::Result<RawRecord, TransportError>> + Send>>;

/// Streaming build and tagging operations exposed by the daemon.
#[async_trait]
pub trait ContainerDaemon: Send + Sync {
    /// Start a build and return its record stream.
    ///
    /// Records arrive in daemon order; the caller consumes them synchronously.
    async fn build(&self, request: &BuildRequest)
        -> std::result::Result<RecordStream, TransportError>;

    /// Apply `repository[:tag]` to an existing image.
    async fn tag(
        &self,
        image: &str,
        repository: &str,
        tag: Option<&str>,
    ) -> std::result::Result<(), TransportError>;
}

#[async_trait]
impl<T> ContainerDaemon for std::sync::Arc<T>
where
    T: ContainerDaemon + ?Sized,
{
    async fn build(
        &self,
        request: &BuildRequest,
    ) -> std::result::Result<RecordStream, TransportError> {
        (**self).build(request).await
    }

    async fn tag(
        &self,
        image: &str,
        repository: &str,
        tag: Option<&str>,
    ) -> std::result::Result<(), TransportError> {
        (**self).tag(image, repository, tag).await
    }
}
