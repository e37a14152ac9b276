use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::domain::entities::settings::{
    ProjectKind, RepoRole, RepositoryConfig, ServerConfig, ServerTemplate,
};

/// How deep below the project root server patterns are searched
const MAX_SCAN_DEPTH: usize = 4;

/// Directories whose contents are never scanned. The directory itself can still match.
const SKIPPED_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "target",
    ".venv",
    "venv",
    "__pycache__",
    "dist",
    "build",
];

/// Everything `--init` proposes for a project
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionReport {
    pub name: String,
    pub kind: ProjectKind,
    pub repositories: Vec<RepositoryConfig>,
    pub servers: Vec<ServerConfig>,
}

/// Inspects a project directory and suggests a configuration for it
pub struct ProjectDetector {
    root: PathBuf,
}

impl ProjectDetector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn detect(&self, templates: &BTreeMap<String, ServerTemplate>) -> DetectionReport {
        let kind = self.detect_kind();
        DetectionReport {
            name: self.project_name(),
            kind,
            repositories: self.suggest_repositories(kind),
            servers: self.suggest_servers(templates),
        }
    }

    /// Upper-cased name of the project directory
    pub fn project_name(&self) -> String {
        self.root
            .canonicalize()
            .unwrap_or_else(|_| self.root.clone())
            .file_name()
            .map(|name| name.to_string_lossy().to_uppercase())
            .unwrap_or_else(|| "PROJECT".to_string())
    }

    /// Monolith beats multi beats single; anything else is custom
    pub fn detect_kind(&self) -> ProjectKind {
        if self.root.join(".gitmodules").exists() && self.submodule_paths().len() > 2 {
            ProjectKind::Monolith
        } else if self.child_repositories().len() > 1 {
            ProjectKind::Multi
        } else if self.root.join(".git").exists() {
            ProjectKind::Single
        } else {
            ProjectKind::Custom
        }
    }

    /// `path = ...` entries of `.gitmodules`, in file order
    pub fn submodule_paths(&self) -> Vec<String> {
        let content = match fs::read_to_string(self.root.join(".gitmodules")) {
            Ok(content) => content,
            Err(_) => return Vec::new(),
        };
        content
            .lines()
            .filter_map(|line| {
                let (key, value) = line.trim().split_once('=')?;
                (key.trim() == "path").then(|| value.trim().to_string())
            })
            .filter(|path| !path.is_empty())
            .collect()
    }

    /// Direct children that are git work trees, sorted by path
    pub fn child_repositories(&self) -> Vec<PathBuf> {
        let mut children: Vec<PathBuf> = match fs::read_dir(&self.root) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.is_dir() && path.join(".git").exists())
                .collect(),
            Err(_) => Vec::new(),
        };
        children.sort();
        children
    }

    pub fn suggest_repositories(&self, kind: ProjectKind) -> Vec<RepositoryConfig> {
        match kind {
            ProjectKind::Monolith => {
                let mut repos = vec![RepositoryConfig::new("MAIN", ".", RepoRole::Main)];
                for submodule in self.submodule_paths() {
                    let name = Path::new(&submodule)
                        .file_name()
                        .map(|n| n.to_string_lossy().to_uppercase())
                        .unwrap_or_else(|| submodule.to_uppercase());
                    repos.push(RepositoryConfig::new(name, submodule, RepoRole::Submodule));
                }
                repos
            }
            ProjectKind::Multi => self
                .child_repositories()
                .into_iter()
                .filter_map(|child| {
                    let name = child.file_name()?.to_string_lossy().to_uppercase();
                    let relative = pathdiff::diff_paths(&child, &self.root)?;
                    Some(RepositoryConfig::new(name, relative, RepoRole::Repository))
                })
                .collect(),
            ProjectKind::Single => {
                vec![RepositoryConfig::new(self.project_name(), ".", RepoRole::Main)]
            }
            ProjectKind::Custom => Vec::new(),
        }
    }

    /// One server per template whose patterns match something in the project,
    /// in template key order
    pub fn suggest_servers(&self, templates: &BTreeMap<String, ServerTemplate>) -> Vec<ServerConfig> {
        let entries = self.scan_entries();

        templates
            .iter()
            .filter(|(key, template)| {
                let matcher = TemplateMatcher::build(key, &template.patterns);
                entries
                    .iter()
                    .any(|(name, is_dir)| matcher.matches(name, *is_dir))
            })
            .map(|(key, template)| {
                let name = if template.name.is_empty() {
                    key.clone()
                } else {
                    template.name.clone()
                };
                ServerConfig::new(name, template.ports.clone(), template.emoji.clone())
            })
            .collect()
    }

    /// File and directory names under the root, with a directory flag
    fn scan_entries(&self) -> Vec<(String, bool)> {
        let mut entries = Vec::new();
        let mut walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(MAX_SCAN_DEPTH)
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("skipping unreadable entry: {}", e);
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().is_dir();
            if is_dir && SKIPPED_DIRS.contains(&name.as_str()) {
                walker.skip_current_dir();
            }
            entries.push((name, is_dir));
        }

        entries
    }
}

/// Compiled patterns of one template. A trailing `/` restricts a pattern to directories.
struct TemplateMatcher {
    files: GlobSet,
    dirs: GlobSet,
}

impl TemplateMatcher {
    fn build(key: &str, patterns: &[String]) -> Self {
        let mut files = GlobSetBuilder::new();
        let mut dirs = GlobSetBuilder::new();

        for pattern in patterns {
            let (target, glob) = match pattern.strip_suffix('/') {
                Some(dir) => (&mut dirs, dir),
                None => (&mut files, pattern.as_str()),
            };
            match Glob::new(glob) {
                Ok(glob) => {
                    target.add(glob);
                }
                Err(e) => tracing::warn!(template = key, "ignoring bad pattern {:?}: {}", pattern, e),
            }
        }

        Self {
            files: files.build().unwrap_or_else(|_| GlobSet::empty()),
            dirs: dirs.build().unwrap_or_else(|_| GlobSet::empty()),
        }
    }

    fn matches(&self, name: &str, is_dir: bool) -> bool {
        if is_dir {
            self.dirs.is_match(name)
        } else {
            self.files.is_match(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn template(name: &str, ports: Vec<u16>, emoji: &str, patterns: &[&str]) -> ServerTemplate {
        ServerTemplate {
            name: name.to_string(),
            ports,
            emoji: emoji.to_string(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    fn templates() -> BTreeMap<String, ServerTemplate> {
        let mut map = BTreeMap::new();
        map.insert(
            "flask".to_string(),
            template("Flask", vec![5000, 5001], "🌶️", &["app.py", "wsgi.py"]),
        );
        map.insert(
            "node".to_string(),
            template("Node", vec![3000], "🟢", &["node_modules/"]),
        );
        map.insert(
            "database".to_string(),
            template("Database", vec![5432], "🗄️", &["*.sql"]),
        );
        map
    }

    #[test]
    fn test_custom_when_nothing_is_there() {
        let temp = TempDir::new().unwrap();
        let detector = ProjectDetector::new(temp.path());
        assert_eq!(detector.detect_kind(), ProjectKind::Custom);
        assert!(detector.suggest_repositories(ProjectKind::Custom).is_empty());
    }

    #[test]
    fn test_single_repository() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("shop");
        fs::create_dir_all(root.join(".git")).unwrap();

        let detector = ProjectDetector::new(&root);
        assert_eq!(detector.detect_kind(), ProjectKind::Single);
        assert_eq!(
            detector.suggest_repositories(ProjectKind::Single),
            vec![RepositoryConfig::new("SHOP", ".", RepoRole::Main)]
        );
    }

    #[test]
    fn test_multi_repository() {
        let temp = TempDir::new().unwrap();
        for child in ["web", "api"] {
            fs::create_dir_all(temp.path().join(child).join(".git")).unwrap();
        }
        fs::create_dir_all(temp.path().join("docs")).unwrap();

        let detector = ProjectDetector::new(temp.path());
        assert_eq!(detector.detect_kind(), ProjectKind::Multi);
        assert_eq!(
            detector.suggest_repositories(ProjectKind::Multi),
            vec![
                RepositoryConfig::new("API", "api", RepoRole::Repository),
                RepositoryConfig::new("WEB", "web", RepoRole::Repository),
            ]
        );
    }

    #[test]
    fn test_monolith_needs_more_than_two_submodules() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".git")).unwrap();
        let two = "[submodule \"a\"]\n\tpath = libs/a\n[submodule \"b\"]\n\tpath = libs/b\n";
        fs::write(temp.path().join(".gitmodules"), two).unwrap();

        let detector = ProjectDetector::new(temp.path());
        assert_eq!(detector.detect_kind(), ProjectKind::Single);

        let three = format!("{}[submodule \"c\"]\n\tpath = services/c\n", two);
        fs::write(temp.path().join(".gitmodules"), three).unwrap();
        assert_eq!(detector.detect_kind(), ProjectKind::Monolith);

        let repos = detector.suggest_repositories(ProjectKind::Monolith);
        assert_eq!(repos.len(), 4);
        assert_eq!(repos[0], RepositoryConfig::new("MAIN", ".", RepoRole::Main));
        assert_eq!(
            repos[3],
            RepositoryConfig::new("C", "services/c", RepoRole::Submodule)
        );
    }

    #[test]
    fn test_server_suggestions_follow_patterns() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("app.py"), "").unwrap();
        fs::create_dir_all(temp.path().join("node_modules").join("left-pad")).unwrap();
        fs::write(
            temp.path().join("node_modules").join("left-pad").join("schema.sql"),
            "",
        )
        .unwrap();

        let servers = ProjectDetector::new(temp.path()).suggest_servers(&templates());
        let names: Vec<&str> = servers.iter().map(|s| s.name.as_str()).collect();

        // node_modules matches as a directory but its contents are not scanned
        assert_eq!(names, vec!["Flask", "Node"]);
        assert_eq!(servers[0].ports, vec![5000, 5001]);
        assert!(servers.iter().all(|s| s.enabled));
    }

    #[test]
    fn test_nested_glob_match() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("db").join("migrations")).unwrap();
        fs::write(temp.path().join("db").join("migrations").join("001.sql"), "").unwrap();

        let servers = ProjectDetector::new(temp.path()).suggest_servers(&templates());
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].name, "Database");
    }
}
