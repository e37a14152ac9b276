use serde_yaml::{Mapping, Value};

use crate::common::error::StatusLineError;
use crate::common::result::StatusLineResult;
use crate::domain::entities::settings::StatusLineSettings;

/// One configuration file after parsing. The top level is always a mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigLayer(Mapping);

impl ConfigLayer {
    pub fn new() -> Self {
        Self(Mapping::new())
    }

    /// Parse YAML text, rejecting anything whose top level is not a mapping
    pub fn parse(text: &str) -> StatusLineResult<Self> {
        match serde_yaml::from_str::<Value>(text)? {
            Value::Mapping(mapping) => Ok(Self(mapping)),
            Value::Null => Err(StatusLineError::config_error("document is empty")),
            other => Err(StatusLineError::config_error(format!(
                "top level must be a mapping, found {}",
                value_kind(&other)
            ))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value of a top-level key
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(Value::String(key.to_string()), value.into());
    }

    pub fn set_if_missing(&mut self, key: &str, value: impl Into<Value>) {
        if !self.0.contains_key(key) {
            self.set(key, value);
        }
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.0
    }

    pub fn into_mapping(self) -> Mapping {
        self.0
    }

    pub fn to_yaml(&self) -> StatusLineResult<String> {
        Ok(serde_yaml::to_string(&self.0)?)
    }
}

impl From<Mapping> for ConfigLayer {
    fn from(mapping: Mapping) -> Self {
        Self(mapping)
    }
}

/// Recursively merge `overlay` into `base`.
///
/// Only mapping-into-mapping recurses. Sequences and scalars in the overlay
/// replace whatever `base` held, so a project's `repositories` list is never
/// concatenated with the global one.
pub fn deep_merge(base: &mut Mapping, overlay: Mapping) {
    for (key, value) in overlay {
        match value {
            Value::Mapping(incoming) => {
                if let Some(Value::Mapping(existing)) = base.get_mut(&key) {
                    deep_merge(existing, incoming);
                } else {
                    base.insert(key, Value::Mapping(incoming));
                }
            }
            other => {
                base.insert(key, other);
            }
        }
    }
}

/// The merged configuration tree seen by the status pipeline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectiveConfig {
    tree: Mapping,
}

impl EffectiveConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge layers in order, later layers winning
    pub fn from_layers<I>(layers: I) -> Self
    where
        I: IntoIterator<Item = ConfigLayer>,
    {
        let mut config = Self::new();
        for layer in layers {
            config.merge(layer);
        }
        config
    }

    pub fn merge(&mut self, layer: ConfigLayer) {
        deep_merge(&mut self.tree, layer.into_mapping());
    }

    /// Look up a dotted path such as `output_format.colors`
    pub fn get(&self, dotted: &str) -> Option<&Value> {
        let mut parts = dotted.split('.');
        let first = parts.next()?;
        let mut current = self.tree.get(first)?;
        for part in parts {
            current = current.as_mapping()?.get(part)?;
        }
        Some(current)
    }

    /// True when `key` holds a non-empty, non-null value
    pub fn has_entries(&self, key: &str) -> bool {
        self.get(key).map(is_truthy).unwrap_or(false)
    }

    /// Whether there is anything for the status line to report on
    pub fn has_status_sources(&self) -> bool {
        self.has_entries("repositories") || self.has_entries("servers")
    }

    /// Convert to the typed view. Fails when `repositories`, `servers`,
    /// `output_format` or `root_path` has the wrong shape.
    pub fn settings(&self) -> StatusLineResult<StatusLineSettings> {
        serde_yaml::from_value(Value::Mapping(self.tree.clone())).map_err(|e| {
            StatusLineError::config_error_with_source("configuration has an invalid shape", e)
        })
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.tree
    }

    pub fn to_yaml(&self) -> StatusLineResult<String> {
        Ok(serde_yaml::to_string(&self.tree)?)
    }

    pub fn to_json_pretty(&self) -> StatusLineResult<String> {
        Ok(serde_json::to_string_pretty(&self.tree)?)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(seq) => !seq.is_empty(),
        Value::Mapping(map) => !map.is_empty(),
        Value::Tagged(tagged) => is_truthy(&tagged.value),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
