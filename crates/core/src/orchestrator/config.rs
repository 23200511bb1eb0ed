//! Orchestrator configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the relay orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Root under which per-job working directories are created.
    /// Each job gets `<temp_root>/<correlationId>`, removed when the
    /// job reaches a terminal state.
    #[serde(default = "default_temp_root")]
    pub temp_root: PathBuf,

    /// Overall deadline for one job (seconds). When exceeded, the
    /// remaining steps are abandoned and cleanup runs immediately.
    #[serde(default = "default_deadline")]
    pub job_deadline_secs: u64,

    /// Maximum jobs running at once (0 = unlimited). Bounds external
    /// process invocations and open uploads.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_jobs: usize,
}

fn default_temp_root() -> PathBuf {
    std::env::temp_dir().join("reelay")
}

fn default_deadline() -> u64 {
    600 // 10 minutes
}

fn default_max_concurrent() -> usize {
    2
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            temp_root: default_temp_root(),
            job_deadline_secs: default_deadline(),
            max_concurrent_jobs: default_max_concurrent(),
        }
    }
}
