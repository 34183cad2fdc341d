//! Secondary tag application.

use crate::daemon::ContainerDaemon;
use crate::error::{GantryError, Result};

/// Split a tag spec into repository and optional tag components.
///
/// `myrepo:v2` becomes `("myrepo", Some("v2"))`; a bare `latest` becomes
/// `("latest", None)`.
pub(crate) fn split_tag(spec: &str) -> (&str, Option<&str>) {
    match spec.split_once(':') {
        Some((repository, tag)) => (repository, Some(tag)),
        None => (spec, None),
    }
}

/// Apply every secondary tag to the image known under `primary`, in request
/// order. The first failure aborts the remaining tags; nothing is rolled
/// back.
pub(crate) async fn apply_tags<D>(daemon: &D, primary: &str, secondary: &[String]) -> Result<()>
where
    D: ContainerDaemon + ?Sized,
{
    for spec in secondary {
        let (repository, tag) = split_tag(spec);
        daemon
            .tag(primary, repository, tag)
            .await
            .map_err(|source| GantryError::TagFailed { tag: spec.clone(), source })?;
    }
    Ok(())
}
