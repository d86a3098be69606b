use crate::domain::{SystemKind, TagSchemes, Version};
use crate::error::{MirrorError, Result};
use crate::vcs::{CommandRunner, MirrorRepository};
use std::fmt;

/// The steps of one mirror transaction, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStep {
    /// Create and switch to a branch named after the source tag
    BranchIsolate,
    /// Switch the source working copy to the tag snapshot
    Replay,
    /// Stage the whole tree and commit it on the isolation branch
    StageAndCommit,
    /// Return to the main line and merge the isolation branch
    Reintegrate,
    /// Delete the isolation branch
    Cleanup,
    /// Annotate the merge with the target tag
    Tag,
}

impl TransactionStep {
    pub const SEQUENCE: [TransactionStep; 6] = [
        TransactionStep::BranchIsolate,
        TransactionStep::Replay,
        TransactionStep::StageAndCommit,
        TransactionStep::Reintegrate,
        TransactionStep::Cleanup,
        TransactionStep::Tag,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TransactionStep::BranchIsolate => "branch-isolate",
            TransactionStep::Replay => "replay",
            TransactionStep::StageAndCommit => "stage-and-commit",
            TransactionStep::Reintegrate => "reintegrate",
            TransactionStep::Cleanup => "cleanup",
            TransactionStep::Tag => "tag",
        }
    }
}

impl fmt::Display for TransactionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mirrors one source release into the target repository.
///
/// The steps share the single working copy, so a transaction must finish
/// before the next one starts. There is no rollback: a failed step leaves
/// the repository as the failing command left it.
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorTransaction {
    pub version: Version,
    pub source_tag: String,
    pub target_tag: String,
    main_branch: String,
}

impl MirrorTransaction {
    pub fn new(version: &Version, schemes: &TagSchemes, main_branch: &str) -> Self {
        MirrorTransaction {
            version: version.clone(),
            source_tag: schemes.format(version, SystemKind::Source),
            target_tag: schemes.format(version, SystemKind::Target),
            main_branch: main_branch.to_string(),
        }
    }

    pub fn commit_message(&self) -> String {
        format!("{} => {} commit", self.source_tag, self.target_tag)
    }

    pub fn merge_message(&self) -> String {
        format!("Merge branch '{}'", self.source_tag)
    }

    pub fn tag_message(&self) -> String {
        format!("version {} tag", self.target_tag)
    }

    /// Run every step in order, stopping at the first failure
    pub fn run<R: CommandRunner>(&self, repo: &MirrorRepository<R>) -> Result<()> {
        for step in TransactionStep::SEQUENCE {
            tracing::debug!(tag = %self.target_tag, %step, "transaction step");
            self.execute_step(repo, step)
                .map_err(|e| MirrorError::transaction(&self.target_tag, step.name(), e))?;
        }
        Ok(())
    }

    fn execute_step<R: CommandRunner>(&self, repo: &MirrorRepository<R>, step: TransactionStep) -> Result<()> {
        match step {
            TransactionStep::BranchIsolate => repo.checkout_new_branch(&self.source_tag),
            TransactionStep::Replay => repo.switch_source_to_tag(&self.source_tag),
            TransactionStep::StageAndCommit => {
                repo.stage_all()?;
                // An unchanged snapshot still gets its own commit
                repo.commit(&self.commit_message(), true)
            }
            TransactionStep::Reintegrate => {
                repo.checkout(&self.main_branch)?;
                repo.merge(&self.source_tag, &self.merge_message())
            }
            TransactionStep::Cleanup => repo.delete_branch(&self.source_tag),
            TransactionStep::Tag => repo.tag_annotated(&self.target_tag, &self.tag_message()),
        }
    }
}
