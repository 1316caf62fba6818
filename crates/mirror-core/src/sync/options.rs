//! Options controlling a sync pass

use mirror_fs::RobustnessConfig;
use serde::{Deserialize, Serialize};

/// What happens to the rest of a pass after a failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// The first failure ends the whole remaining pass.
    #[default]
    AbortPass,
    /// A failure abandons only the directory being reconciled; its parent
    /// moves on to the remaining siblings.
    SkipSubtree,
}

/// Options for a sync pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncOptions {
    /// If true, report changes without modifying the destination.
    pub dry_run: bool,
    pub failure_policy: FailurePolicy,
    /// Maximum directory depth below the roots; `None` means unlimited.
    pub max_depth: Option<usize>,
    #[serde(skip)]
    pub robustness: RobustnessConfig,
}

impl SyncOptions {
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }
}
