//! Temporary project and config directory layouts

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A project directory next to an isolated config directory
pub struct ProjectFixture {
    _temp: TempDir,
    pub base: PathBuf,
    pub config_dir: PathBuf,
    pub project_dir: PathBuf,
}

impl ProjectFixture {
    /// `<tmp>/shop` as the project and `<tmp>/config` as the config directory
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let base = temp
            .path()
            .canonicalize()
            .expect("Failed to canonicalize temp dir");
        let config_dir = base.join("config");
        let project_dir = base.join("shop");
        fs::create_dir_all(&project_dir).expect("Failed to create project dir");

        Self {
            _temp: temp,
            base,
            config_dir,
            project_dir,
        }
    }

    /// Mark a directory below the project as a git work tree
    pub fn add_repo(&self, relative: &str) -> PathBuf {
        let path = self.project_dir.join(relative);
        fs::create_dir_all(path.join(".git")).expect("Failed to create .git");
        path
    }

    pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.project_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Write `.cc-status-line.yaml` in the project directory
    pub fn write_local_config(&self, yaml: &str) -> PathBuf {
        self.write_file(".cc-status-line.yaml", yaml)
    }

    pub fn write_global_config(&self, yaml: &str) -> PathBuf {
        write_under(&self.config_dir, "config.yaml", yaml)
    }

    pub fn write_project_config(&self, identity: &str, yaml: &str) -> PathBuf {
        write_under(
            &self.config_dir.join("projects"),
            &format!("{}.yaml", identity),
            yaml,
        )
    }

    /// Stems of the files under `projects/`
    pub fn stored_projects(&self) -> Vec<String> {
        let mut stems: Vec<String> = match fs::read_dir(self.config_dir.join("projects")) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .filter_map(|entry| {
                    let path = entry.path();
                    (path.extension()? == "yaml")
                        .then(|| path.file_stem()?.to_str().map(str::to_string))
                        .flatten()
                })
                .collect(),
            Err(_) => Vec::new(),
        };
        stems.sort();
        stems
    }
}

fn write_under(dir: &Path, name: &str, content: &str) -> PathBuf {
    fs::create_dir_all(dir).expect("Failed to create config dir");
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write config file");
    path
}
