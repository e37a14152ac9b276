use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::entities::repo_status::{RepoStatus, DETACHED_BRANCH};
use crate::domain::entities::settings::RepositoryConfig;
use crate::domain::value_objects::probe::Probe;
use crate::infrastructure::git::GitCli;
use crate::infrastructure::process::CommandRunner;

/// Produces a [`RepoStatus`] per configured repository.
///
/// The three git probes are independent: a failure in one leaves the others
/// untouched and only its own field falls back to a default.
pub struct GitStatusCollector {
    git: GitCli,
}

impl GitStatusCollector {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            git: GitCli::new(runner),
        }
    }

    /// Resolve a configured path against the project root
    pub fn repository_path(repo: &RepositoryConfig, project_root: &Path) -> PathBuf {
        if repo.path.is_absolute() {
            repo.path.clone()
        } else {
            project_root.join(&repo.path)
        }
    }

    /// `None` when the path is missing or not a git work tree; no command is run then
    pub async fn status_for(&self, repo: &RepositoryConfig, project_root: &Path) -> Option<RepoStatus> {
        let path = Self::repository_path(repo, project_root);
        if !path.exists() {
            tracing::debug!(repo = %repo.name, path = %path.display(), "repository path missing");
            return None;
        }
        if !GitCli::is_repository(&path) {
            tracing::debug!(repo = %repo.name, path = %path.display(), "not a git work tree");
            return None;
        }

        let branch = self.branch_label(&path).await;
        let behind = self.behind_upstream(&path).await;
        let has_changes = self
            .git
            .has_uncommitted_changes(&path)
            .await
            .or_fallback("dirty state", false);

        Some(RepoStatus::new(
            repo.name.clone(),
            branch,
            behind.or_fallback("upstream count", 0),
            has_changes,
            repo.path.to_string_lossy(),
        ))
    }

    /// Branch name, else abbreviated commit for a detached HEAD, else `detached`
    pub async fn branch_label(&self, path: &Path) -> String {
        if let Probe::Value(branch) = self.git.symbolic_branch(path).await {
            return branch;
        }
        self.git
            .short_head(path)
            .await
            .or_fallback("HEAD commit", DETACHED_BRANCH.to_string())
    }

    /// Commits behind upstream. Absent upstream and failed queries both end up
    /// as zero on screen; the distinction is kept here for logging.
    pub async fn behind_upstream(&self, path: &Path) -> Probe<u32> {
        self.git.commits_behind_upstream(path).await
    }
}
