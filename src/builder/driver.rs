//! Build driver: the engine that walks a build from request to tagged image.
//!
//! One `build()` call covers the whole invocation: open the streaming build
//! call against the daemon, classify and track every record, then squash and
//! tag the result. Classification, tracking and operator logging happen in
//! strict arrival order; nothing is retried automatically.

use crate::builder::events::{classify, BuildEvent};
use crate::builder::layers::LayerTracker;
use crate::builder::output::{BuildLog, TracingLog};
use crate::builder::squash::{compact, LayerSquasher};
use crate::builder::tags::apply_tags;
use crate::config::{daemon_timeout, BuildConfig};
use crate::daemon::{BuildRequest, ContainerDaemon, TransportError};
use crate::deps::{DeclaredDependencies, ExternalDependency};
use crate::error::{GantryError, Result};
use crate::types::BuiltImage;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tokio_stream::StreamExt;
use tracing::{debug, instrument};

/// Marker the daemon logs when a yum step fails for lack of enabled
/// repositories on a subscribed base image.
const SUBSCRIPTION_MARKER: &str = "To enable Red Hat Subscription Management repositories:";

/// Drives the external daemon to build, squash and tag one image.
///
/// Tracker state and the request are scoped to a single `build()` call, so a
/// builder can be reused for sequential builds but must not be shared across
/// parallel builds of different images.
pub struct ImageBuilder<D, S> {
    daemon: D,
    squasher: S,
    config: BuildConfig,
    context_path: PathBuf,
    timeout: Duration,
    log: Arc<dyn BuildLog>,
}

impl<D, S> ImageBuilder<D, S>
where
    D: ContainerDaemon,
    S: LayerSquasher,
{
    /// Create a builder for one build context.
    ///
    /// Reads the daemon communication timeout from the environment; an
    /// invalid or non-positive value fails here, before any daemon call.
    pub fn new(daemon: D, squasher: S, config: BuildConfig, context_path: PathBuf) -> Result<Self> {
        let timeout = daemon_timeout()?;
        Ok(Self {
            daemon,
            squasher,
            config,
            context_path,
            timeout,
            log: Arc::new(TracingLog),
        })
    }

    /// Replace the operator log sink.
    pub fn with_log(mut self, log: Arc<dyn BuildLog>) -> Self {
        self.log = log;
        self
    }

    /// Override the daemon communication timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the image, squash it unless disabled, and apply secondary tags.
    #[instrument(skip(self))]
    pub async fn build(&self) -> Result<BuiltImage> {
        let primary = self.config.primary_tag()?;

        self.log.info("Building container image using Docker...");

        let image = self.stream_build(primary).await?;

        if !self.config.no_squash {
            compact(
                &self.daemon,
                &self.squasher,
                &image.id,
                self.config.base.as_ref(),
                primary,
                self.log.as_ref(),
            )
            .await?;
        }

        apply_tags(&self.daemon, primary, self.config.secondary_tags()).await?;

        self.log.info(&format!(
            "Image built and available under following tags: {}",
            self.config.tags.join(", ")
        ));

        Ok(image)
    }

    /// Issue the build request and consume the record stream to completion.
    async fn stream_build(&self, primary: &str) -> Result<BuiltImage> {
        debug!("Building image with tags: '{}'", self.config.tags.join("', '"));

        let request = BuildRequest {
            context_path: self.context_path.clone(),
            tag: primary.to_string(),
            pull: self.config.pull,
            remove_intermediate: true,
        };

        let mut stream = match timeout(self.timeout, self.daemon.build(&request)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(err)) => return Err(err.into()),
            Err(_) => return Err(TransportError::TimedOut { after: self.timeout }.into()),
        };

        let mut tracker = LayerTracker::new();
        let mut build_log = String::new();

        loop {
            let record = match timeout(self.timeout, stream.next()).await {
                Ok(record) => record,
                Err(_) => return Err(TransportError::TimedOut { after: self.timeout }.into()),
            };

            let raw = match record {
                None => break,
                Some(Ok(raw)) => raw,
                Some(Err(err)) => return Err(err.into()),
            };

            let event = match classify(&raw) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(err) => return Err(self.diagnose(err, &tracker, &build_log)),
            };

            let text = match event {
                BuildEvent::FatalError(message) => {
                    // Fail fast; records left on the stream are not drained.
                    return Err(self.diagnose(
                        GantryError::DaemonReported { message },
                        &tracker,
                        &build_log,
                    ));
                }
                BuildEvent::Message(text) | BuildEvent::Status(text) => text,
            };

            // Repeated downloading/extracting lines would pollute the log
            if !tracker.observe(&text) {
                continue;
            }

            for part in text.trim().split('\n') {
                self.log.info(&format!("Docker: {part}"));
            }

            build_log.push_str(&text);
            build_log.push(' ');
        }

        let layers = tracker.into_layers();
        let id = layers.last().cloned().ok_or(GantryError::MissingLayerId)?;

        Ok(BuiltImage { id, layers })
    }

    /// Turn a streaming failure into its most actionable form.
    fn diagnose(
        &self,
        cause: GantryError,
        tracker: &LayerTracker,
        build_log: &str,
    ) -> GantryError {
        let suggestion = tracker.second_to_last().cloned();
        if let Some(layer) = &suggestion {
            self.log.error(&format!(
                "You can look inside the failed image by running 'docker run --rm -ti {layer} bash'"
            ));
        }

        if build_log.contains(SUBSCRIPTION_MARKER) && !self.context_path.join("repos").exists() {
            return GantryError::RepositoryConfigMissing { source: Box::new(cause) };
        }

        GantryError::BuildFailed { suggestion, source: Box::new(cause) }
    }
}

const DOCKER_BUILD_DEPENDENCIES: &[ExternalDependency] = &[
    ExternalDependency {
        name: "docker",
        executable: Some("dockerd"),
        library: Some("docker"),
        package: Some("docker"),
    },
    ExternalDependency {
        name: "docker-squash",
        executable: Some("docker-squash"),
        library: Some("docker_squash"),
        package: Some("docker-squash"),
    },
];

impl<D, S> DeclaredDependencies for ImageBuilder<D, S> {
    fn dependencies(&self) -> &'static [ExternalDependency] {
        DOCKER_BUILD_DEPENDENCIES
    }
}
