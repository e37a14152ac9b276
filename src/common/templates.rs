//! Embedded YAML templates.
//! Built-in defaults are compiled in with `include_str!` so a fresh install needs no files.

/// Get the built-in defaults layer
pub fn get_defaults_template() -> &'static str {
    include_str!("../../templates/defaults.yaml")
}
