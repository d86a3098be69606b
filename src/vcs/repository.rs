use crate::error::Result;
use crate::vcs::{CommandRunner, VcsCommand};

/// Where the source repository lives and how it is laid out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub url: String,
    pub trunk_branch: String,
    pub branches_dir: String,
    pub tags_dir: String,
}

impl SourceLocation {
    /// Conventional layout: `<url>/branches/<trunk>` and `<url>/tags/<tag>`
    pub fn new(url: impl Into<String>, trunk_branch: impl Into<String>) -> Self {
        SourceLocation {
            url: url.into(),
            trunk_branch: trunk_branch.into(),
            branches_dir: "branches".to_string(),
            tags_dir: "tags".to_string(),
        }
    }

    fn base(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// The directory holding all tags, with a trailing slash
    pub fn tags_url(&self) -> String {
        format!("{}/{}/", self.base(), self.tags_dir)
    }

    pub fn tag_url(&self, tag: &str) -> String {
        format!("{}/{}/{}", self.base(), self.tags_dir, tag)
    }

    pub fn trunk_url(&self) -> String {
        format!("{}/{}/{}", self.base(), self.branches_dir, self.trunk_branch)
    }
}

/// Handle on the shared working copy backed by both systems.
///
/// Every workflow step receives this handle instead of reaching for ambient
/// process state; the runner decides whether commands really execute.
pub struct MirrorRepository<R> {
    runner: R,
    source: SourceLocation,
}

impl<R: CommandRunner> MirrorRepository<R> {
    pub fn new(runner: R, source: SourceLocation) -> Self {
        MirrorRepository { runner, source }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn source(&self) -> &SourceLocation {
        &self.source
    }

    fn run(&self, command: VcsCommand) -> Result<String> {
        self.runner.run(&command)
    }

    // ---- source system -------------------------------------------------

    /// Raw tag names under the source tags directory, in listing order
    pub fn list_source_tags(&self) -> Result<Vec<String>> {
        let output = self.run(VcsCommand::SvnList {
            url: self.source.tags_url(),
        })?;

        Ok(output
            .lines()
            .map(|line| line.trim().trim_end_matches('/'))
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Create the source working copy from trunk in the current directory
    pub fn checkout_source_trunk(&self) -> Result<()> {
        self.run(VcsCommand::SvnCheckout {
            url: self.source.trunk_url(),
        })?;
        Ok(())
    }

    /// Repoint the working copy at a tag snapshot
    pub fn switch_source_to_tag(&self, tag: &str) -> Result<()> {
        self.run(VcsCommand::SvnSwitch {
            url: self.source.tag_url(tag),
        })?;
        Ok(())
    }

    /// Repoint the working copy at the live trunk
    pub fn switch_source_to_trunk(&self) -> Result<()> {
        self.run(VcsCommand::SvnSwitch {
            url: self.source.trunk_url(),
        })?;
        Ok(())
    }

    // ---- target system -------------------------------------------------

    /// Raw local tag names
    pub fn list_target_tags(&self) -> Result<Vec<String>> {
        let output = self.run(VcsCommand::GitTagList)?;
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    pub fn checkout(&self, branch: &str) -> Result<()> {
        self.run(VcsCommand::GitCheckout {
            branch: branch.to_string(),
            create: false,
        })?;
        Ok(())
    }

    /// Create a branch at HEAD and switch to it
    pub fn checkout_new_branch(&self, branch: &str) -> Result<()> {
        self.run(VcsCommand::GitCheckout {
            branch: branch.to_string(),
            create: true,
        })?;
        Ok(())
    }

    /// Create a branch at HEAD without switching
    pub fn create_branch(&self, branch: &str) -> Result<()> {
        self.run(VcsCommand::GitBranch {
            name: branch.to_string(),
        })?;
        Ok(())
    }

    pub fn delete_branch(&self, branch: &str) -> Result<()> {
        self.run(VcsCommand::GitDeleteBranch {
            name: branch.to_string(),
        })?;
        Ok(())
    }

    pub fn branch_exists(&self, branch: &str) -> Result<bool> {
        let output = self.run(VcsCommand::GitListBranch {
            name: branch.to_string(),
        })?;
        Ok(output
            .lines()
            .any(|line| line.trim_start_matches(['*', '+', ' ']).trim() == branch))
    }

    /// Stage every change in the working tree, deletions included
    pub fn stage_all(&self) -> Result<()> {
        self.run(VcsCommand::GitAddAll)?;
        Ok(())
    }

    /// Whether the index or working tree differs from HEAD
    pub fn has_changes(&self) -> Result<bool> {
        let output = self.run(VcsCommand::GitStatus)?;
        Ok(output.lines().any(|line| !line.trim().is_empty()))
    }

    pub fn commit(&self, message: &str, allow_empty: bool) -> Result<()> {
        self.run(VcsCommand::GitCommit {
            message: message.to_string(),
            allow_empty,
        })?;
        Ok(())
    }

    /// Merge `branch` into the current branch, always creating a merge commit
    pub fn merge(&self, branch: &str, message: &str) -> Result<()> {
        self.run(VcsCommand::GitMerge {
            branch: branch.to_string(),
            message: message.to_string(),
        })?;
        Ok(())
    }

    pub fn tag_annotated(&self, name: &str, message: &str) -> Result<()> {
        self.run(VcsCommand::GitTagAnnotated {
            name: name.to_string(),
            message: message.to_string(),
        })?;
        Ok(())
    }

    pub fn push_branch(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(VcsCommand::GitPush {
            remote: remote.to_string(),
            refspec: branch.to_string(),
            tags: false,
        })?;
        Ok(())
    }

    /// Push `branch` together with every local tag
    pub fn push_tags(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(VcsCommand::GitPush {
            remote: remote.to_string(),
            refspec: branch.to_string(),
            tags: true,
        })?;
        Ok(())
    }
}
