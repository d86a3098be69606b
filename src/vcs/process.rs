use crate::error::{MirrorError, Result};
use crate::vcs::{CommandRunner, CommitIdentity, Program, VcsCommand};
use std::path::PathBuf;
use std::process::Command;

/// Runs commands as child processes inside the working copy.
///
/// Commands block until they exit; no timeout is applied.
pub struct ProcessRunner {
    workdir: PathBuf,
    identity: Option<CommitIdentity>,
}

impl ProcessRunner {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        ProcessRunner {
            workdir: workdir.into(),
            identity: None,
        }
    }

    /// Use an explicit identity for object-creating git commands
    pub fn with_identity(mut self, identity: Option<CommitIdentity>) -> Self {
        self.identity = identity;
        self
    }

    fn build(&self, command: &VcsCommand) -> Command {
        let program = command.program();
        let mut cmd = Command::new(program.binary());
        cmd.current_dir(&self.workdir);

        if program == Program::Git {
            // Never block on a credential prompt
            cmd.env("GIT_TERMINAL_PROMPT", "0");

            if command.creates_objects() {
                if let Some(identity) = &self.identity {
                    cmd.arg("-c");
                    cmd.arg(format!("user.name={}", identity.name));
                    cmd.arg("-c");
                    cmd.arg(format!("user.email={}", identity.email));
                }
            }
        }

        cmd.args(command.args());
        cmd
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, command: &VcsCommand) -> Result<String> {
        tracing::debug!(command = %command, workdir = %self.workdir.display(), "running");

        let output = self.build(command).output().map_err(|e| {
            MirrorError::command(
                command.to_string(),
                format!("failed to start {}: {}", command.program().binary(), e),
            )
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
            tracing::debug!(command = %command, status = ?output.status.code(), "command failed");
            // git reports merge conflicts on stdout
            let detail = if stderr.is_empty() { stdout } else { stderr };
            return Err(MirrorError::command(command.to_string(), detail));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
