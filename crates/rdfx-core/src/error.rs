use std::path::PathBuf;

use crate::format::RdfFormat;

pub type Result<T> = std::result::Result<T, RdfxError>;

#[derive(Debug, thiserror::Error)]
pub enum RdfxError {
    #[error("cannot guess the RDF format of input file {}", path.display())]
    UnknownFormat { path: PathBuf },

    #[error(
        "files to be merged must have a known RDF suffix (one of {known}), got {}",
        path.display()
    )]
    UnknownSuffix { path: PathBuf, known: String },

    #[error("unknown RDF format token: {0}")]
    InvalidFormatToken(String),

    #[error(
        "refusing to replace {} while cleaning {}",
        output.display(),
        input.display()
    )]
    OutputExists { input: PathBuf, output: PathBuf },

    #[error(
        "{} and {} would both be written to {}",
        first.display(),
        second.display(),
        output.display()
    )]
    OutputCollision {
        first: PathBuf,
        second: PathBuf,
        output: PathBuf,
    },

    #[error("no such file or directory: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("failed to parse {} as {format}: {message}", path.display())]
    Parse {
        path: PathBuf,
        format: RdfFormat,
        message: String,
    },

    #[error("failed to serialize graph as {format}: {message}")]
    Serialize { format: RdfFormat, message: String },

    #[error("invalid namespace binding {prefix}: <{namespace}>: {message}")]
    InvalidBinding {
        prefix: String,
        namespace: String,
        message: String,
    },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RdfxError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
