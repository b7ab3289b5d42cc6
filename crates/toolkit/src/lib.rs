//! Shared helpers for the CI actions.
//!
//! Reads action inputs, runs external tools, extracts archives, prints
//! diagnostic tables, and implements [`domain::LocalRepository`] over the
//! system `git` binary.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Process spawning and environment access live here.
//! The orchestration layer only sees [`domain::LocalRepository`].

pub mod archive;
pub mod exec;
pub mod git;
pub mod inputs;
pub mod report;

pub use archive::{unzip_all, ArchiveError, Extractor, DEFAULT_ARCHIVER};
pub use exec::{exec, exec_in, ExecError};
pub use git::SystemGit;
pub use inputs::{
    get_boolean_input, get_input, get_json_input, get_required_input, process_vars, ActionInputs,
    InputError, InputSource,
};
pub use report::table;
