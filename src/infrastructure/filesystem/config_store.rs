use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::common::environment::Environment;
use crate::common::result::{ResultExt, StatusLineResult};
use crate::domain::value_objects::config_tree::ConfigLayer;
use crate::domain::value_objects::project_identity::ProjectIdentity;

pub const APP_DIR_NAME: &str = "cc-status-line";
pub const GLOBAL_CONFIG_FILE: &str = "config.yaml";
pub const PROJECTS_DIR: &str = "projects";
pub const TEMPLATES_DIR: &str = "templates";
pub const LOCAL_CONFIG_FILE: &str = ".cc-status-line.yaml";

/// Layout of the configuration directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDirs {
    root: PathBuf,
}

impl ConfigDirs {
    /// Explicit directory, then `CCSL_CONFIG_DIR`, then the XDG config home,
    /// then `~/.config/cc-status-line`
    pub fn locate(explicit: Option<&Path>, env: &Environment) -> Self {
        let root = if let Some(dir) = explicit {
            env.expand_home(&dir.to_string_lossy())
        } else if let Some(dir) = &env.config_dir {
            env.expand_home(dir)
        } else if let Some(xdg) = &env.xdg_config_home {
            PathBuf::from(xdg).join(APP_DIR_NAME)
        } else {
            env.home_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
                .join(APP_DIR_NAME)
        };
        Self { root }
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the root, `projects/` and `templates/` if missing
    pub fn ensure(&self) -> StatusLineResult<()> {
        for dir in [self.root.clone(), self.projects_dir(), self.templates_dir()] {
            fs::create_dir_all(&dir)
                .with_filesystem_error("Failed to create config directory", Some(dir.clone()))?;
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn global_config_file(&self) -> PathBuf {
        self.root.join(GLOBAL_CONFIG_FILE)
    }

    pub fn projects_dir(&self) -> PathBuf {
        self.root.join(PROJECTS_DIR)
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root.join(TEMPLATES_DIR)
    }

    pub fn project_file(&self, identity: &ProjectIdentity) -> PathBuf {
        self.projects_dir().join(identity.file_name())
    }
}

/// Path of the in-tree override file for a project directory
pub fn local_config_file(project_dir: &Path) -> PathBuf {
    project_dir.join(LOCAL_CONFIG_FILE)
}

/// Reads and writes configuration layers as YAML files
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load one layer. Missing, unreadable or malformed files count as absent.
    pub fn load_layer<P: AsRef<Path>>(&self, path: P) -> Option<ConfigLayer> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config layer not present");
            return None;
        }

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(path = %path.display(), "cannot read config layer: {}", e);
                return None;
            }
        };

        match ConfigLayer::parse(&text) {
            Ok(layer) => {
                tracing::debug!(path = %path.display(), "loaded config layer");
                Some(layer)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring invalid config layer: {}", e);
                None
            }
        }
    }

    /// Write a layer, creating parent directories as needed
    pub fn write_layer<P: AsRef<Path>>(&self, path: P, layer: &ConfigLayer) -> StatusLineResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_filesystem_error("Failed to create directory", Some(parent.to_path_buf()))?;
        }

        let yaml = layer.to_yaml()?;
        fs::write(path, yaml)
            .with_filesystem_error("Failed to write config file", Some(path.to_path_buf()))?;

        tracing::info!(path = %path.display(), "saved config layer");
        Ok(())
    }

    /// Remove a layer file. Returns whether a file was actually removed.
    pub fn remove_layer<P: AsRef<Path>>(&self, path: P) -> StatusLineResult<bool> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)
            .with_filesystem_error("Failed to delete config file", Some(path.to_path_buf()))?;
        Ok(true)
    }

    /// Every `*.yaml` file directly inside `dir`, sorted by file stem.
    /// Files that fail to parse are skipped.
    pub fn list_layers<P: AsRef<Path>>(&self, dir: P) -> Vec<(String, ConfigLayer)> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Vec::new();
        }

        let mut layers: Vec<(String, ConfigLayer)> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("skipping unreadable project entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.path().extension().map(|ext| ext == "yaml").unwrap_or(false))
            .filter_map(|entry| {
                let stem = entry.path().file_stem()?.to_string_lossy().into_owned();
                let layer = self.load_layer(entry.path())?;
                Some((stem, layer))
            })
            .collect();

        layers.sort_by(|a, b| a.0.cmp(&b.0));
        layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn env_with_home(home: &Path) -> Environment {
        Environment {
            home_dir: Some(home.to_path_buf()),
            ..Default::default()
        }
    }

    #[test]
    fn test_locate_precedence() {
        let home = PathBuf::from("/home/dev");

        let mut env = env_with_home(&home);
        assert_eq!(
            ConfigDirs::locate(None, &env).root(),
            Path::new("/home/dev/.config/cc-status-line")
        );

        env.xdg_config_home = Some("/xdg".to_string());
        assert_eq!(
            ConfigDirs::locate(None, &env).root(),
            Path::new("/xdg/cc-status-line")
        );

        env.config_dir = Some("~/custom".to_string());
        assert_eq!(
            ConfigDirs::locate(None, &env).root(),
            Path::new("/home/dev/custom")
        );

        assert_eq!(
            ConfigDirs::locate(Some(Path::new("/explicit")), &env).root(),
            Path::new("/explicit")
        );
    }

    #[test]
    fn test_explicit_directory_expands_home() {
        let env = env_with_home(Path::new("/home/dev"));
        assert_eq!(
            ConfigDirs::locate(Some(Path::new("~/ccsl")), &env).root(),
            Path::new("/home/dev/ccsl")
        );
    }

    #[test]
    fn test_ensure_creates_layout() {
        let temp_dir = TempDir::new().unwrap();
        let dirs = ConfigDirs::at(temp_dir.path().join("cfg"));
        dirs.ensure().unwrap();

        assert!(dirs.projects_dir().is_dir());
        assert!(dirs.templates_dir().is_dir());
        // idempotent
        dirs.ensure().unwrap();
    }

    #[test]
    fn test_load_layer_treats_bad_files_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::new();

        assert!(store.load_layer(temp_dir.path().join("missing.yaml")).is_none());

        let list = temp_dir.path().join("list.yaml");
        fs::write(&list, "- one\n- two\n").unwrap();
        assert!(store.load_layer(&list).is_none());

        let broken = temp_dir.path().join("broken.yaml");
        fs::write(&broken, "name: [unclosed\n").unwrap();
        assert!(store.load_layer(&broken).is_none());

        let good = temp_dir.path().join("good.yaml");
        fs::write(&good, "name: Shop\n").unwrap();
        assert_eq!(store.load_layer(&good).unwrap().get_str("name"), Some("Shop"));
    }

    #[test]
    fn test_write_and_remove_layer() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::new();
        let path = temp_dir.path().join("projects").join("app.yaml");

        let mut layer = ConfigLayer::new();
        layer.set("name", "App");
        store.write_layer(&path, &layer).unwrap();
        assert_eq!(store.load_layer(&path), Some(layer));

        assert!(store.remove_layer(&path).unwrap());
        assert!(!store.remove_layer(&path).unwrap());
    }

    #[test]
    fn test_list_layers_sorted_and_filtered() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::write(dir.join("zeta.yaml"), "name: Z\n").unwrap();
        fs::write(dir.join("alpha.yaml"), "name: A\n").unwrap();
        fs::write(dir.join("notes.txt"), "name: N\n").unwrap();
        fs::write(dir.join("bad.yaml"), "- x\n").unwrap();

        let stems: Vec<String> = ConfigStore::new()
            .list_layers(dir)
            .into_iter()
            .map(|(stem, _)| stem)
            .collect();
        assert_eq!(stems, vec!["alpha".to_string(), "zeta".to_string()]);
    }
}
