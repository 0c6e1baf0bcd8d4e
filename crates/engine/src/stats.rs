use serde::{Deserialize, Serialize};

/// Statistics about one optimization run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CullStats {
    /// Units driven to Finalized
    pub units: usize,

    /// Oracle invocations (baseline checks, trials and re-verifications)
    pub trials: usize,

    /// Directives removed outright
    pub removed: usize,

    /// Directives replaced by their target's own directive list
    pub spliced: usize,

    /// Directives retained after failed trials (or protected by policy)
    pub kept: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,
}

impl CullStats {
    pub fn new() -> Self {
        Self::default()
    }
}
