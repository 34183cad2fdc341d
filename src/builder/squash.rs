//! Post-build layer compaction.
//!
//! Squashing merges every layer above a caller-chosen base into one, to cut
//! the size of the final image. The mechanism itself is external; the engine
//! drives it through [`LayerSquasher`] and re-points the primary tag at
//! whatever image the squash produced.

use crate::builder::output::BuildLog;
use crate::builder::tags::split_tag;
use crate::daemon::ContainerDaemon;
use crate::error::{GantryError, Result};
use crate::types::LayerId;
use async_trait::async_trait;
use thiserror::Error;

/// Failure inside the external squash mechanism.
#[derive(Debug, Error)]
#[error("{reason}")]
pub struct SquashError {
    pub reason: String,
}

/// External layer-compaction mechanism.
#[async_trait]
pub trait LayerSquasher: Send + Sync {
    /// Squash `image` down to `from_layer` (everything below it keeps its
    /// history) and return the id of the squashed image.
    async fn squash(
        &self,
        image: &LayerId,
        from_layer: Option<&LayerId>,
        cleanup: bool,
    ) -> std::result::Result<LayerId, SquashError>;
}

#[async_trait]
impl<T> LayerSquasher for std::sync::Arc<T>
where
    T: LayerSquasher + ?Sized,
{
    async fn squash(
        &self,
        image: &LayerId,
        from_layer: Option<&LayerId>,
        cleanup: bool,
    ) -> std::result::Result<LayerId, SquashError> {
        (**self).squash(image, from_layer, cleanup).await
    }
}

/// Squash the freshly built image and re-apply the primary tag to the result.
pub(crate) async fn compact<D, S>(
    daemon: &D,
    squasher: &S,
    image: &LayerId,
    base: Option<&LayerId>,
    primary_tag: &str,
    log: &dyn BuildLog,
) -> Result<LayerId>
where
    D: ContainerDaemon + ?Sized,
    S: LayerSquasher + ?Sized,
{
    log.info(&format!("Squashing image {image}..."));

    // XXX: asking the daemon to clean up intermediate artifacts after a
    // squash is rejected with a 409 conflict, so cleanup stays disabled and
    // temporary artifacts are left behind. Known limitation.
    let squashed = squasher
        .squash(image, base, false)
        .await
        .map_err(|source| GantryError::SquashFailed { image: image.clone(), source })?;

    // The squash can mint a new image id; the primary tag has to follow it.
    let (repository, tag) = split_tag(primary_tag);
    daemon
        .tag(squashed.as_str(), repository, tag)
        .await
        .map_err(|source| GantryError::TagFailed { tag: primary_tag.to_string(), source })?;

    Ok(squashed)
}
