//! Core data types shared across the build engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier the daemon assigns to an intermediate or final image layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for LayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct BuiltImage {
    /// Final image id, as announced by the daemon.
    pub id: LayerId,
    /// Every layer id observed during the build, in arrival order.
    /// The last entry is always `id`.
    pub layers: Vec<LayerId>,
}
