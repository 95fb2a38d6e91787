use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by document loading and saving.
///
/// A failed load never replaces previously loaded state, and a failed save
/// leaves the edit session untouched, so every variant is recoverable by
/// picking another file or retrying.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize XML: {0}")]
    Serialize(String),

    #[error("no configuration loaded")]
    NoDocument,
}

impl ConfigError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Short classification used as a dialog title by the GUI.
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigError::FileNotFound(_) => "File Not Found",
            ConfigError::Parse { .. } => "XML Parse Error",
            ConfigError::Io { .. } => "I/O Error",
            ConfigError::Serialize(_) => "Save Error",
            ConfigError::NoDocument => "Error",
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Why a byte stream could not be read as a `serverconfig.xml` document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ParseError(pub String);
