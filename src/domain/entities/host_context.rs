use serde::Deserialize;
use std::path::PathBuf;

/// JSON document the host pipes to stdin before each invocation.
///
/// Only the working directory is consumed. Everything else in the
/// document is ignored, and a document that does not parse is treated
/// as if none was sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HostContext {
    #[serde(default)]
    workspace: Option<WorkspaceHint>,

    #[serde(default)]
    cwd: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
struct WorkspaceHint {
    #[serde(default)]
    current_working_directory: Option<String>,

    #[serde(default)]
    current_dir: Option<String>,
}

impl HostContext {
    /// Parse the stdin payload. Blank or malformed input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        match serde_json::from_str(trimmed) {
            Ok(context) => Some(context),
            Err(e) => {
                tracing::debug!("ignoring host context: {}", e);
                None
            }
        }
    }

    /// The directory the host reports as current, if any
    pub fn working_directory(&self) -> Option<PathBuf> {
        let workspace = self.workspace.as_ref();
        workspace
            .and_then(|w| w.current_working_directory.as_deref())
            .or_else(|| workspace.and_then(|w| w.current_dir.as_deref()))
            .or(self.cwd.as_deref())
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
    }
}
