use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Keys a consumer does not know about are kept here and written back unchanged
pub type ExtraFields = BTreeMap<String, Value>;

/// Typed view over the merged configuration tree.
///
/// Every section is optional. Absent sections take the documented defaults,
/// and unknown keys survive a load/save cycle through the `extra` maps.
/// Only the sections the status run reads (`root_path`, `output_format`,
/// `repositories`, `servers`) must have the right shape. A mistyped value
/// anywhere else is logged and replaced by its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusLineSettings {
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Project display name
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(
        rename = "type",
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub project_type: Option<ProjectKind>,

    /// Base directory for relative repository paths
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_path: Option<PathBuf>,

    pub output_format: OutputFormat,

    #[serde(deserialize_with = "lenient")]
    pub system_monitoring: SystemMonitoring,

    #[serde(
        deserialize_with = "lenient_templates",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub server_templates: BTreeMap<String, ServerTemplate>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<RepositoryConfig>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<ServerConfig>,

    #[serde(deserialize_with = "lenient")]
    pub logging: LoggingConfig,

    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Read a section the status run does not depend on, falling back to the
/// default when the value has the wrong shape
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_else(|e| {
        tracing::warn!("ignoring malformed setting: {}", e);
        T::default()
    }))
}

/// Templates are only read by `--init`. A malformed entry drops that entry.
fn lenient_templates<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, ServerTemplate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, Value> = lenient(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| match ServerTemplate::deserialize(value) {
            Ok(template) => Some((key, template)),
            Err(e) => {
                tracing::warn!("ignoring server template '{}': {}", key, e);
                None
            }
        })
        .collect())
}

/// Project layout, as recorded by `--init`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    /// One parent repository with several submodules
    Monolith,
    /// A single repository
    Single,
    /// Several independent repositories under one directory
    Multi,
    #[default]
    #[serde(other)]
    Custom,
}

impl ProjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monolith => "monolith",
            Self::Single => "single",
            Self::Multi => "multi",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputFormat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiline: Option<bool>,

    /// Accepted and persisted, but no rendering path reads it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compact: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_changes: Option<bool>,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl OutputFormat {
    pub fn colors(&self) -> bool {
        self.colors.unwrap_or(true)
    }

    pub fn multiline(&self) -> bool {
        self.multiline.unwrap_or(true)
    }

    pub fn show_changes(&self) -> bool {
        self.show_changes.unwrap_or(true)
    }
}

/// Host metric toggles. Stored only; nothing collects these metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemMonitoring {
    pub enabled: bool,
    pub battery: bool,
    pub cpu: bool,
    pub memory: bool,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Detection template used by `--init` to propose server entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerTemplate {
    pub name: String,
    pub ports: Vec<u16>,
    pub emoji: String,
    /// File names whose presence in the project root suggests this server
    pub patterns: Vec<String>,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoRole {
    Main,
    Submodule,
    #[default]
    Repository,
    #[serde(other)]
    Other,
}

/// A repository tracked by the status line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub name: String,

    /// Relative to the project root, or absolute
    pub path: PathBuf,

    #[serde(rename = "type", default)]
    pub role: RepoRole,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl RepositoryConfig {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, role: RepoRole) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            role,
            extra: ExtraFields::new(),
        }
    }
}

/// A development server probed by port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: String,

    /// Candidate ports, probed in order
    pub ports: Vec<u16>,

    #[serde(default = "default_server_emoji")]
    pub emoji: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl ServerConfig {
    pub fn new(name: impl Into<String>, ports: Vec<u16>, emoji: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ports,
            emoji: emoji.into(),
            enabled: true,
            extra: ExtraFields::new(),
        }
    }
}

fn default_server_emoji() -> String {
    "🖥️".to_string()
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,

    #[serde(flatten)]
    pub extra: ExtraFields,
}
