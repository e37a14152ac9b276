use percent_encoding::percent_decode_str;
use regex::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;
use url::Url;

/// Prefix marking an identity derived from a filesystem path
pub const LOCAL_PREFIX: &str = "local-";

const PATH_HASH_LEN: usize = 16;

/// Stable, filesystem-safe key for a project's config file.
///
/// Derived from the normalized `origin` remote when there is one, so every
/// clone of a repository shares a config. Otherwise derived from a hash of
/// the canonical project path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProjectIdentity(String);

impl ProjectIdentity {
    /// Identity for a remote URL, or `None` if nothing usable remains after normalization
    pub fn from_remote_url(url: &str) -> Option<Self> {
        normalize_remote_url(url).map(Self)
    }

    /// Identity for a project without a remote
    pub fn from_path(path: &Path) -> Self {
        let canonical = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf());
        let digest = Sha256::digest(canonical.to_string_lossy().as_bytes());
        let hash = hex::encode(digest);
        Self(format!("{}{}", LOCAL_PREFIX, &hash[..PATH_HASH_LEN]))
    }

    /// Rebuild an identity from a stored config file stem
    pub fn from_stem(stem: impl Into<String>) -> Self {
        Self(stem.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the per-project config file
    pub fn file_name(&self) -> String {
        format!("{}.yaml", self.0)
    }
}

impl fmt::Display for ProjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn invalid_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\-.]").expect("valid identity regex"))
}

fn dash_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-+").expect("valid dash regex"))
}

/// Reduce a git remote URL to `host/path` with the same text for every protocol,
/// then make it safe to use as a file name.
///
/// `https://github.com/User/Repo.git` and `git@github.com:User/Repo.git` both
/// become `github.com-user-repo`.
pub fn normalize_remote_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let host_path = if trimmed.contains("://") {
        match Url::parse(trimmed) {
            Ok(url) => {
                // the parser escapes spaces and other unsafe bytes in the path
                let path = percent_decode_str(url.path()).decode_utf8_lossy();
                match url.host_str() {
                    Some(host) => format!("{}{}", host, path),
                    None => path.into_owned(),
                }
            }
            Err(_) => trimmed.to_string(),
        }
    } else if let Some((user_host, path)) = split_scp_like(trimmed) {
        let host = user_host.rsplit('@').next().unwrap_or(user_host);
        format!("{}/{}", host, path.trim_start_matches('/'))
    } else {
        trimmed.to_string()
    };

    let stripped = host_path.trim_end_matches('/');
    let stripped = stripped.strip_suffix(".git").unwrap_or(stripped);
    let lowered = stripped.to_lowercase();
    let replaced = invalid_chars().replace_all(&lowered, "-");
    let collapsed = dash_runs().replace_all(&replaced, "-");
    let id = collapsed.trim_matches('-');

    (!id.is_empty()).then(|| id.to_string())
}

/// Split `[user@]host:path`, leaving Windows drive paths alone
fn split_scp_like(s: &str) -> Option<(&str, &str)> {
    let (head, tail) = s.split_once(':')?;
    if head.len() <= 1 || head.contains('/') || head.contains('\\') {
        return None;
    }
    Some((head, tail))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_https_and_ssh_agree() {
        let https = normalize_remote_url("https://github.com/User/Repo.git");
        let ssh = normalize_remote_url("git@github.com:User/Repo.git");
        assert_eq!(https.as_deref(), Some("github.com-user-repo"));
        assert_eq!(https, ssh);
    }

    #[test]
    fn test_credentials_and_ports_are_dropped() {
        assert_eq!(
            normalize_remote_url("https://token@gitlab.example.com:8443/team/app/").as_deref(),
            Some("gitlab.example.com-team-app")
        );
        assert_eq!(
            normalize_remote_url("ssh://git@host.example/group/sub/app.git").as_deref(),
            Some("host.example-group-sub-app")
        );
    }

    #[test]
    fn test_unsafe_characters_collapse() {
        assert_eq!(
            normalize_remote_url("git@github.com:org/My Repo!!.git").as_deref(),
            Some("github.com-org-my-repo")
        );
        assert_eq!(
            normalize_remote_url("https://host/My Repo.git").as_deref(),
            Some("host-my-repo")
        );
        assert_eq!(
            normalize_remote_url("https://host/My%20Repo.git").as_deref(),
            Some("host-my-repo")
        );
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(normalize_remote_url(""), None);
        assert_eq!(normalize_remote_url("   "), None);
        assert_eq!(normalize_remote_url("///"), None);
        assert!(ProjectIdentity::from_remote_url("!!!").is_none());
    }

    #[test]
    fn test_windows_drive_is_not_scp() {
        assert_eq!(split_scp_like("C:\\repos\\app"), None);
        assert_eq!(split_scp_like("host:org/app"), Some(("host", "org/app")));
    }

    #[test]
    fn test_path_identity_is_stable() {
        let temp_dir = TempDir::new().unwrap();
        let first = ProjectIdentity::from_path(temp_dir.path());
        let second = ProjectIdentity::from_path(temp_dir.path());

        assert_eq!(first, second);
        assert!(first.as_str().starts_with(LOCAL_PREFIX));
        assert_eq!(first.as_str().len(), LOCAL_PREFIX.len() + PATH_HASH_LEN);
        assert!(first.as_str()[LOCAL_PREFIX.len()..]
            .chars()
            .all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_distinct_paths_differ() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        assert_ne!(
            ProjectIdentity::from_path(a.path()),
            ProjectIdentity::from_path(b.path())
        );
    }

    #[test]
    fn test_file_name() {
        let id = ProjectIdentity::from_remote_url("https://github.com/a/b").unwrap();
        assert_eq!(id.file_name(), "github.com-a-b.yaml");
        assert!(!id.as_str().starts_with(LOCAL_PREFIX));
    }
}
