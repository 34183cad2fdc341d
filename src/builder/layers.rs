//! Layer tracking across the streamed build output.
//!
//! The daemon never hands the engine a layer list directly; layer ids are
//! fished out of the log lines it streams. Three line shapes matter:
//!
//! - `---> Running in <id>`       a step started in an intermediate container
//! - `Successfully built <id>`    the final image announcement
//! - `---> Using cache`           a cached layer was reused; the daemon emits
//!                                the reused id on the *next* line instead of
//!                                re-announcing a step start
//!
//! Consecutive duplicate lines are skipped entirely: they are neither
//! re-inspected nor re-appended, and the caller uses the same signal to avoid
//! logging them twice.

use crate::types::LayerId;

const STEP_STARTED: &str = "---> Running in ";
const BUILD_FINISHED: &str = "Successfully built ";
const CACHE_HIT: &str = "---> Using cache";

/// Ordered layer-id bookkeeping for a single build invocation.
///
/// State is scoped to one `build()` call; never share a tracker across
/// concurrent builds.
#[derive(Debug, Default)]
pub struct LayerTracker {
    layers: Vec<LayerId>,
    /// Last distinct line observed.
    last: String,
    /// Distinct line before `last`, for cache-hit lookahead.
    prev: String,
}

impl LayerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect one classified line.
    ///
    /// Returns `false` when the line exactly repeats the previous one, in
    /// which case nothing is tracked and the caller should not log it either.
    pub fn observe(&mut self, line: &str) -> bool {
        if line == self.last {
            return false;
        }

        if line.contains(STEP_STARTED) || line.contains(BUILD_FINISHED) {
            self.append_last_token(line);
        } else if self.last.contains(CACHE_HIT) {
            // The cached-layer notice arrives one line ahead of the id it
            // reused, so the id is pulled from the current line.
            self.append_last_token(line);
        }

        self.prev = std::mem::replace(&mut self.last, line.to_string());
        true
    }

    fn append_last_token(&mut self, line: &str) {
        if let Some(id) = line.split_whitespace().last() {
            self.layers.push(LayerId::from(id));
        }
    }

    /// Every layer id observed so far, in arrival order.
    pub fn layers(&self) -> &[LayerId] {
        &self.layers
    }

    /// The most recently observed layer id.
    pub fn final_layer(&self) -> Option<&LayerId> {
        self.layers.last()
    }

    /// The id of the last step that completed before the most recent one.
    ///
    /// `None` when fewer than two layers were tracked; diagnostic suggestions
    /// that reference a previous layer must then be omitted.
    pub fn second_to_last(&self) -> Option<&LayerId> {
        if self.layers.len() < 2 {
            return None;
        }
        self.layers.get(self.layers.len() - 2)
    }

    pub fn into_layers(self) -> Vec<LayerId> {
        self.layers
    }
}
