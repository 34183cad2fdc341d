//! Operator-facing build log sink.
//!
//! This is a pure presentation seam: it has zero influence on build
//! semantics. The driver pushes already-classified, deduplicated lines here
//! and the sink decides where they land. The default forwards to `tracing`;
//! embedders (and tests) inject their own sink at construction instead of
//! relying on process-global logger state.

use tracing::{debug, error, info};

/// Leveled sink for operator-facing build output.
pub trait BuildLog: Send + Sync {
    fn debug(&self, line: &str);
    fn info(&self, line: &str);
    fn error(&self, line: &str);
}

/// Default sink: forwards every line to the `tracing` macros.
#[derive(Debug, Default)]
pub struct TracingLog;

impl BuildLog for TracingLog {
    fn debug(&self, line: &str) {
        debug!("{line}");
    }

    fn info(&self, line: &str) {
        info!("{line}");
    }

    fn error(&self, line: &str) {
        error!("{line}");
    }
}
