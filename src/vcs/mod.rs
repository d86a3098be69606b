//! Version-control operations abstraction layer
//!
//! Every interaction with the two version-control tools goes through a
//! [CommandRunner], which executes a typed [VcsCommand] and returns its
//! standard output. The concrete implementations are:
//!
//! - [process::ProcessRunner]: spawns the real `svn` / `git` binaries in the working copy
//! - [mock::MockRunner]: records commands and answers queries from in-memory state
//!
//! [MirrorRepository] wraps a runner together with the source location and
//! exposes the typed operations the mirroring workflow needs. It is the
//! single handle every step receives, so tests substitute a mock runner
//! without touching the workflow code.
//!
//! ```rust
//! # use svn_mirror::vcs::{MirrorRepository, MockRunner, SourceLocation};
//! let runner = MockRunner::new().with_source_tags(&["RELEASE_1_4_0"]);
//! let repo = MirrorRepository::new(runner, SourceLocation::new("http://svn.example.org", "1.4"));
//! assert_eq!(repo.list_source_tags().unwrap(), vec!["RELEASE_1_4_0".to_string()]);
//! ```

pub mod command;
pub mod mock;
pub mod process;
pub mod repository;

pub use command::{Program, VcsCommand};
pub use mock::MockRunner;
pub use process::ProcessRunner;
pub use repository::{MirrorRepository, SourceLocation};

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Executes external version-control commands.
///
/// A non-zero exit status must be reported as
/// [crate::error::MirrorError::Command]; there are no retries.
pub trait CommandRunner {
    /// Run a command to completion and return its standard output
    fn run(&self, command: &VcsCommand) -> Result<String>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: &VcsCommand) -> Result<String> {
        (**self).run(command)
    }
}

/// Identity used for commits, merges and annotated tags.
///
/// Passed via `-c` flags so mirroring works on machines without a global
/// git identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}
