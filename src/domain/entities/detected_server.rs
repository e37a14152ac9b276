use serde::Serialize;

/// A configured server found listening on one of its ports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedServer {
    pub name: String,
    pub port: u16,
    pub emoji: String,
}

impl DetectedServer {
    pub fn new(name: impl Into<String>, port: u16, emoji: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            port,
            emoji: emoji.into(),
        }
    }
}
