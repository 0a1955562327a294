//! Crate-level error types.

use std::fmt;

/// Errors produced by the scene-controls crate.
#[derive(Debug)]
pub enum PanelError {
    /// A framework component required for UI wiring is absent.
    MissingComponent(String),
    /// A UI element the controller expects was not found in the document.
    MissingElement(String),
    /// A string-encoded scene attribute could not be parsed.
    AttributeParse {
        /// Attribute name (e.g. `position`).
        attribute: String,
        /// The raw value that failed to parse.
        value: String,
    },
    /// The scene collaborator refused an entity operation.
    Scene(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Serializing the transform export failed.
    Export(serde_json::Error),
    /// Client storage rejected a write.
    Storage(String),
    /// A browser API call failed.
    Platform(String),
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingComponent(name) => {
                write!(f, "required scene component not loaded: {name}")
            }
            Self::MissingElement(id) => {
                write!(f, "UI element not found: {id}")
            }
            Self::AttributeParse { attribute, value } => {
                write!(f, "cannot parse {attribute} attribute from {value:?}")
            }
            Self::Scene(msg) => write!(f, "scene error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Export(e) => write!(f, "export error: {e}"),
            Self::Storage(msg) => write!(f, "storage error: {msg}"),
            Self::Platform(msg) => write!(f, "platform error: {msg}"),
        }
    }
}

impl std::error::Error for PanelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Export(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PanelError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for PanelError {
    fn from(e: serde_json::Error) -> Self {
        Self::Export(e)
    }
}
