use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::common::result::{StatusLineResult, StatusLineResultExt};
use crate::common::templates::get_defaults_template;
use crate::domain::value_objects::config_tree::{ConfigLayer, EffectiveConfig};
use crate::domain::value_objects::probe::Probe;
use crate::domain::value_objects::project_identity::ProjectIdentity;
use crate::infrastructure::filesystem::{local_config_file, ConfigDirs, ConfigStore};
use crate::infrastructure::git::GitCli;
use crate::infrastructure::process::CommandRunner;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The project a run is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    pub directory: PathBuf,
    pub identity: ProjectIdentity,
}

/// A configuration file location and whether it is currently on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSource {
    pub path: PathBuf,
    pub exists: bool,
}

impl LayerSource {
    fn at(path: PathBuf) -> Self {
        let exists = path.is_file();
        Self { path, exists }
    }
}

/// Where each layer for a project lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSources {
    pub identity: ProjectIdentity,
    pub project_directory: PathBuf,
    pub config_dir: PathBuf,
    pub global: LayerSource,
    pub project: LayerSource,
    pub local: LayerSource,
}

/// A stored per-project layer, as returned by [`ConfigResolver::list_projects`]
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectEntry {
    pub identity: ProjectIdentity,
    /// File content with an `id` key added
    pub layer: ConfigLayer,
}

impl ProjectEntry {
    pub fn name(&self) -> &str {
        self.layer.get_str("name").unwrap_or(self.identity.as_str())
    }

    pub fn kind(&self) -> &str {
        self.layer.get_str("type").unwrap_or("unknown")
    }

    pub fn root_path(&self) -> &str {
        self.layer.get_str("root_path").unwrap_or("-")
    }
}

/// Builds the effective configuration from the four layers and manages the layer files.
///
/// Precedence, lowest first: built-in defaults, global `config.yaml`,
/// `projects/<identity>.yaml`, then `.cc-status-line.yaml` in the project
/// directory. A layer that is missing or unparseable is skipped.
pub struct ConfigResolver {
    dirs: ConfigDirs,
    store: ConfigStore,
    git: GitCli,
    cwd: PathBuf,
}

impl ConfigResolver {
    /// Creates the config directory layout if needed. Failure to do so is
    /// logged and otherwise ignored; reads simply find nothing.
    pub fn new(dirs: ConfigDirs, runner: Arc<dyn CommandRunner>, cwd: PathBuf) -> Self {
        if let Err(e) = dirs.ensure() {
            tracing::warn!("config directory unavailable: {}", e);
        }
        Self {
            dirs,
            store: ConfigStore::new(),
            git: GitCli::new(runner),
            cwd,
        }
    }

    /// Explicit directory if given, else the enclosing git work tree, else the cwd
    pub fn project_directory(&self, explicit: Option<&Path>) -> PathBuf {
        match explicit {
            Some(dir) if dir.is_absolute() => dir.to_path_buf(),
            Some(dir) => self.cwd.join(dir),
            None => GitCli::find_repository_root(&self.cwd)
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.cwd.clone()),
        }
    }

    /// Remote-derived identity when `origin` exists, path-derived otherwise
    pub async fn identify(&self, project_dir: &Path) -> ProjectIdentity {
        match self.git.origin_url(project_dir).await {
            Probe::Value(url) => ProjectIdentity::from_remote_url(&url).unwrap_or_else(|| {
                tracing::debug!(url = %url, "remote normalizes to nothing, using path identity");
                ProjectIdentity::from_path(project_dir)
            }),
            Probe::Absent => ProjectIdentity::from_path(project_dir),
            Probe::Degraded(reason) => {
                tracing::debug!("cannot read origin remote: {}", reason);
                ProjectIdentity::from_path(project_dir)
            }
        }
    }

    pub async fn locate_project(&self, explicit: Option<&Path>) -> ProjectContext {
        let directory = self.project_directory(explicit);
        let identity = self.identify(&directory).await;
        tracing::debug!(project = %identity, dir = %directory.display(), "resolved project");
        ProjectContext {
            directory,
            identity,
        }
    }

    /// Locate the project and merge all of its layers
    pub async fn resolve(&self, explicit: Option<&Path>) -> (ProjectContext, EffectiveConfig) {
        let project = self.locate_project(explicit).await;
        let config = self.resolve_for(&project);
        (project, config)
    }

    pub fn resolve_for(&self, project: &ProjectContext) -> EffectiveConfig {
        let mut config = Self::defaults();
        let paths = [
            self.dirs.global_config_file(),
            self.dirs.project_file(&project.identity),
            local_config_file(&project.directory),
        ];
        for path in paths {
            if let Some(layer) = self.store.load_layer(&path) {
                config.merge(layer);
            }
        }
        config
    }

    /// The embedded defaults layer on its own
    pub fn defaults() -> EffectiveConfig {
        ConfigLayer::parse(get_defaults_template())
            .map(|layer| EffectiveConfig::from_layers([layer]))
            .unwrap_or_default_logged()
    }

    /// Defaults merged with the global file only
    pub fn global_config(&self) -> EffectiveConfig {
        let mut config = Self::defaults();
        if let Some(layer) = self.store.load_layer(self.dirs.global_config_file()) {
            config.merge(layer);
        }
        config
    }

    pub fn project_layer(&self, identity: &ProjectIdentity) -> Option<ConfigLayer> {
        self.store.load_layer(self.dirs.project_file(identity))
    }

    pub fn save_global(&self, mut layer: ConfigLayer) -> StatusLineResult<PathBuf> {
        layer.set("updated_at", timestamp_now());
        let path = self.dirs.global_config_file();
        self.store.write_layer(&path, &layer)?;
        Ok(path)
    }

    pub fn save_project(
        &self,
        identity: &ProjectIdentity,
        mut layer: ConfigLayer,
    ) -> StatusLineResult<PathBuf> {
        let now = timestamp_now();
        layer.set_if_missing("created_at", now.clone());
        layer.set("updated_at", now);
        let path = self.dirs.project_file(identity);
        self.store.write_layer(&path, &layer)?;
        Ok(path)
    }

    pub fn save_local(&self, project_dir: &Path, mut layer: ConfigLayer) -> StatusLineResult<PathBuf> {
        layer.set("updated_at", timestamp_now());
        let path = local_config_file(project_dir);
        self.store.write_layer(&path, &layer)?;
        Ok(path)
    }

    /// Every stored project layer, ordered by identity
    pub fn list_projects(&self) -> Vec<ProjectEntry> {
        self.store
            .list_layers(self.dirs.projects_dir())
            .into_iter()
            .map(|(stem, mut layer)| {
                layer.set("id", stem.clone());
                ProjectEntry {
                    identity: ProjectIdentity::from_stem(stem),
                    layer,
                }
            })
            .collect()
    }

    /// Returns whether a project file existed
    pub fn delete_project(&self, identity: &ProjectIdentity) -> StatusLineResult<bool> {
        self.store.remove_layer(self.dirs.project_file(identity))
    }

    pub fn config_sources(&self, project: &ProjectContext) -> ConfigSources {
        ConfigSources {
            identity: project.identity.clone(),
            project_directory: project.directory.clone(),
            config_dir: self.dirs.root().to_path_buf(),
            global: LayerSource::at(self.dirs.global_config_file()),
            project: LayerSource::at(self.dirs.project_file(&project.identity)),
            local: LayerSource::at(local_config_file(&project.directory)),
        }
    }
}

fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}
