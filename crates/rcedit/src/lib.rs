//! Windows resource editing.
//!
//! Resolves a glob of binaries, validates the version-info property set, and
//! writes it into every match with the external `rcedit` tool.

use std::path::PathBuf;

use thiserror::Error;
use toolkit::{ExecError, InputError};

pub mod editor;
pub mod properties;

pub use editor::{resolve_glob, ResourceEditor, DEFAULT_EDITOR};
pub use properties::{ExecutionLevel, ResourceProperties};

#[derive(Debug, Error)]
pub enum RceditError {
    #[error("No properties set")]
    NoProperties,

    #[error("Invalid value for requested-execution-level: {value}")]
    InvalidExecutionLevel { value: String },

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("failed to read glob match: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("failed to resolve {}: {source}", .path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("rcedit failed on {}: {source}", .file.display())]
    Editor {
        file: PathBuf,
        #[source]
        source: ExecError,
    },
}
