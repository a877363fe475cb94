use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the exploration engine.
///
/// `MalformedRelation` is recoverable: loaders log the offending line and keep
/// going. The remaining variants abort the current run, because a round that
/// cannot observe a complete build result must not guess.
#[derive(Debug, Error)]
pub(crate) enum EngineError {
    #[error("malformed line {line} in {}: {reason}", path.display())]
    MalformedRelation {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("required file missing: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("build command failed: {0}")]
    BuildFailure(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EngineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::Io {
            path: path.into(),
            source,
        }
    }
}
