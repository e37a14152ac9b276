use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::value_objects::probe::Probe;
use crate::infrastructure::process::{CommandError, CommandOutput, CommandRunner, CommandSpec};

/// Upper bound for any single git invocation
pub const GIT_TIMEOUT: Duration = Duration::from_secs(5);

const GIT_EXECUTABLE: &str = "git";

/// Read-only git queries, each answered by one `git` subprocess
#[derive(Clone)]
pub struct GitCli {
    runner: Arc<dyn CommandRunner>,
}

impl GitCli {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// A directory counts as a repository when it holds a `.git` entry (file or directory)
    pub fn is_repository(path: &Path) -> bool {
        path.join(".git").exists()
    }

    /// Nearest ancestor of `start` (inclusive) that is a repository
    pub fn find_repository_root(start: &Path) -> Option<&Path> {
        start.ancestors().find(|dir| Self::is_repository(dir))
    }

    fn spec(&self, args: &[&str], working_dir: &Path) -> CommandSpec {
        CommandSpec::new(GIT_EXECUTABLE, GIT_TIMEOUT)
            .args(args.iter().copied())
            .with_working_directory(working_dir)
    }

    async fn execute_git_command(
        &self,
        args: &[&str],
        working_dir: &Path,
    ) -> Result<CommandOutput, CommandError> {
        self.runner.run(&self.spec(args, working_dir)).await
    }

    /// Run a query whose trimmed stdout is the answer
    async fn query_line(&self, args: &[&str], working_dir: &Path) -> Probe<String> {
        match self.execute_git_command(args, working_dir).await {
            Ok(output) if output.success() => {
                let line = output.stdout_trimmed();
                if line.is_empty() {
                    Probe::Absent
                } else {
                    Probe::Value(line.to_string())
                }
            }
            Ok(output) => Probe::degraded(format!(
                "git {} exited with {:?}: {}",
                args.join(" "),
                output.exit_code,
                output.stderr.trim()
            )),
            Err(e) => Probe::degraded(e.to_string()),
        }
    }

    /// URL of the `origin` remote. `Absent` when there is no such remote.
    pub async fn origin_url(&self, repo_dir: &Path) -> Probe<String> {
        match self
            .execute_git_command(&["remote", "get-url", "origin"], repo_dir)
            .await
        {
            Ok(output) if output.success() => {
                let url = output.stdout_trimmed();
                if url.is_empty() {
                    Probe::Absent
                } else {
                    Probe::Value(url.to_string())
                }
            }
            Ok(_) => Probe::Absent,
            Err(e) => Probe::degraded(e.to_string()),
        }
    }

    /// Short name of the checked-out branch. Fails on a detached HEAD.
    pub async fn symbolic_branch(&self, repo_dir: &Path) -> Probe<String> {
        self.query_line(&["symbolic-ref", "--short", "HEAD"], repo_dir)
            .await
    }

    /// Abbreviated hash of HEAD
    pub async fn short_head(&self, repo_dir: &Path) -> Probe<String> {
        self.query_line(&["rev-parse", "--short", "HEAD"], repo_dir)
            .await
    }

    /// Commits reachable from the upstream branch but not from HEAD.
    ///
    /// `Absent` when the branch has no upstream or HEAD is detached.
    pub async fn commits_behind_upstream(&self, repo_dir: &Path) -> Probe<u32> {
        match self
            .execute_git_command(&["rev-list", "--count", "HEAD..@{u}"], repo_dir)
            .await
        {
            Ok(output) if output.success() => match output.stdout_trimmed().parse::<u32>() {
                Ok(count) => Probe::Value(count),
                Err(_) => Probe::degraded(format!(
                    "unexpected rev-list output: {:?}",
                    output.stdout_trimmed()
                )),
            },
            Ok(output) if is_missing_upstream(&output.stderr) => Probe::Absent,
            Ok(output) => Probe::degraded(format!(
                "git rev-list exited with {:?}: {}",
                output.exit_code,
                output.stderr.trim()
            )),
            Err(e) => Probe::degraded(e.to_string()),
        }
    }

    /// Whether `git status --porcelain` reports anything, untracked files included
    pub async fn has_uncommitted_changes(&self, repo_dir: &Path) -> Probe<bool> {
        match self
            .execute_git_command(&["status", "--porcelain"], repo_dir)
            .await
        {
            Ok(output) if output.success() => Probe::Value(!output.stdout_trimmed().is_empty()),
            Ok(output) => Probe::degraded(format!(
                "git status exited with {:?}: {}",
                output.exit_code,
                output.stderr.trim()
            )),
            Err(e) => Probe::degraded(e.to_string()),
        }
    }
}

fn is_missing_upstream(stderr: &str) -> bool {
    let stderr = stderr.to_ascii_lowercase();
    stderr.contains("no upstream") || stderr.contains("does not point to a branch")
}
