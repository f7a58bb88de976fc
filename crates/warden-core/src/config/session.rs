//! Session snapshot configuration.

use serde::{Deserialize, Serialize};

/// Limits applied when building the current-user snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Number of recent sessions included in the snapshot.
    #[serde(default = "default_recent_sessions")]
    pub recent_sessions_limit: u32,
    /// Number of recent activity entries included in the snapshot.
    #[serde(default = "default_recent_activity")]
    pub recent_activity_limit: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            recent_sessions_limit: default_recent_sessions(),
            recent_activity_limit: default_recent_activity(),
        }
    }
}

fn default_recent_sessions() -> u32 {
    5
}

fn default_recent_activity() -> u32 {
    10
}
