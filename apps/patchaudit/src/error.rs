use crate::diff::ParseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid fuzz factor '{0}': expected a non-negative integer")]
    InvalidFuzz(String),

    #[error("invalid project directory: {0}")]
    InvalidProject(String),

    #[error("{0} does not exist")]
    MissingPatch(String),

    #[error("the patch file could not be parsed, are you sure it's a unified diff?")]
    NotUnifiedDiff,

    #[error("config {path}: {message}")]
    Config { path: String, message: String },

    #[error("invalid override pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("{path} (line {line}): {source}")]
    Parse {
        path: String,
        line: usize,
        #[source]
        source: ParseError,
    },

    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_string_lossy().to_string(),
            source,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::NotUnifiedDiff | Error::Parse { .. } => 1,
            _ => 2,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
