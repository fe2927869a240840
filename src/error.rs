use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImportError>;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("malformed record {line:?}: expected {expected} tab-separated fields, found {found}")]
    MalformedRecord {
        line: String,
        expected: usize,
        found: usize,
    },

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("directory traversal failed")]
    Walk(#[from] walkdir::Error),

    #[error("invalid XML in {}", .path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },

    #[error("invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },

    #[error("request failed")]
    Network(#[from] reqwest::Error),

    #[error("{endpoint} answered with HTTP {status}")]
    Rejected { endpoint: String, status: u16 },

    #[error("invalid settings")]
    Config(#[from] config::ConfigError),
}

impl ImportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ImportError::Io {
            path: path.into(),
            source,
        }
    }
}
