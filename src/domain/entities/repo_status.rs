use serde::Serialize;

/// Beyond this many commits behind upstream a repository is flagged red
pub const FAR_BEHIND_THRESHOLD: u32 = 5;

/// Label shown for a detached HEAD with no readable commit
pub const DETACHED_BRANCH: &str = "detached";

/// Snapshot of one repository, taken during a single status run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoStatus {
    pub name: String,
    pub branch: String,
    /// Commits behind upstream. Zero also covers "no upstream" and "unknown".
    pub behind: u32,
    pub has_changes: bool,
    /// As configured, not resolved against the project root
    pub path: String,
}

/// The single condition a repository is summarised by, worst first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoHealth {
    Dirty,
    FarBehind,
    Behind,
    Clean,
}

impl RepoStatus {
    pub fn new(
        name: impl Into<String>,
        branch: impl Into<String>,
        behind: u32,
        has_changes: bool,
        path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            branch: branch.into(),
            behind,
            has_changes,
            path: path.into(),
        }
    }

    /// Uncommitted changes take precedence over any upstream state
    pub fn health(&self) -> RepoHealth {
        if self.has_changes {
            RepoHealth::Dirty
        } else if self.behind > FAR_BEHIND_THRESHOLD {
            RepoHealth::FarBehind
        } else if self.behind > 0 {
            RepoHealth::Behind
        } else {
            RepoHealth::Clean
        }
    }
}
