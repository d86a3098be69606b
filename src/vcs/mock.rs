use crate::error::{MirrorError, Result};
use crate::vcs::{CommandRunner, VcsCommand};
use std::cell::{Cell, RefCell};

type FailurePredicate = Box<dyn Fn(&VcsCommand) -> bool>;

/// Mock runner for testing without spawning `svn` or `git`.
///
/// Every command is recorded in order. Listing queries are answered from
/// in-memory state, and branch/tag mutations update that state so a whole
/// sync run can be replayed and inspected.
pub struct MockRunner {
    source_tags: Vec<String>,
    target_tags: RefCell<Vec<String>>,
    branches: RefCell<Vec<String>>,
    dirty: Cell<bool>,
    switched_to: RefCell<Option<String>>,
    log: RefCell<Vec<VcsCommand>>,
    failure: Option<(FailurePredicate, String)>,
}

impl MockRunner {
    /// Create a mock with an empty tag set and a single `master` branch
    pub fn new() -> Self {
        MockRunner {
            source_tags: Vec::new(),
            target_tags: RefCell::new(Vec::new()),
            branches: RefCell::new(vec!["master".to_string()]),
            dirty: Cell::new(false),
            switched_to: RefCell::new(None),
            log: RefCell::new(Vec::new()),
            failure: None,
        }
    }

    /// Tags listed by `svn list` (without the trailing `/`)
    pub fn with_source_tags(mut self, tags: &[&str]) -> Self {
        self.source_tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Tags already present in the target repository
    pub fn with_target_tags(self, tags: &[&str]) -> Self {
        *self.target_tags.borrow_mut() = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Local branches present in the target repository
    pub fn with_branches(self, branches: &[&str]) -> Self {
        *self.branches.borrow_mut() = branches.iter().map(|b| b.to_string()).collect();
        self
    }

    /// Whether the working tree starts with uncommitted changes
    pub fn with_changes(self, dirty: bool) -> Self {
        self.dirty.set(dirty);
        self
    }

    /// Source URL the working copy currently points at.
    /// Switching to the same URL again leaves the tree unchanged.
    pub fn with_working_copy_at(self, url: &str) -> Self {
        *self.switched_to.borrow_mut() = Some(url.to_string());
        self
    }

    /// Make every command matching `predicate` fail with `stderr`
    pub fn fail_on(mut self, predicate: impl Fn(&VcsCommand) -> bool + 'static, stderr: &str) -> Self {
        self.failure = Some((Box::new(predicate), stderr.to_string()));
        self
    }

    /// All commands run so far, in order
    pub fn commands(&self) -> Vec<VcsCommand> {
        self.log.borrow().clone()
    }

    pub fn target_tags(&self) -> Vec<String> {
        self.target_tags.borrow().clone()
    }

    pub fn branches(&self) -> Vec<String> {
        self.branches.borrow().clone()
    }

    fn has_branch(&self, name: &str) -> bool {
        self.branches.borrow().iter().any(|b| b == name)
    }

    fn add_branch(&self, command: &VcsCommand, name: &str) -> Result<()> {
        if self.has_branch(name) {
            return Err(MirrorError::command(
                command.to_string(),
                format!("fatal: a branch named '{}' already exists", name),
            ));
        }
        self.branches.borrow_mut().push(name.to_string());
        Ok(())
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, command: &VcsCommand) -> Result<String> {
        self.log.borrow_mut().push(command.clone());

        if let Some((predicate, stderr)) = &self.failure {
            if predicate(command) {
                return Err(MirrorError::command(command.to_string(), stderr.clone()));
            }
        }

        match command {
            VcsCommand::SvnList { .. } => Ok(self
                .source_tags
                .iter()
                .map(|t| format!("{}/\n", t))
                .collect()),
            VcsCommand::SvnSwitch { url } => {
                let mut current = self.switched_to.borrow_mut();
                if current.as_deref() != Some(url.as_str()) {
                    self.dirty.set(true);
                    *current = Some(url.clone());
                }
                Ok(String::new())
            }
            VcsCommand::SvnCheckout { url } => {
                *self.switched_to.borrow_mut() = Some(url.clone());
                Ok(String::new())
            }
            VcsCommand::GitTagList => Ok(self
                .target_tags
                .borrow()
                .iter()
                .map(|t| format!("{}\n", t))
                .collect()),
            VcsCommand::GitListBranch { name } => {
                if self.has_branch(name) {
                    Ok(format!("  {}\n", name))
                } else {
                    Ok(String::new())
                }
            }
            VcsCommand::GitStatus => {
                if self.dirty.get() {
                    Ok(" M index.php\n".to_string())
                } else {
                    Ok(String::new())
                }
            }
            VcsCommand::GitCheckout { branch, create } => {
                if *create {
                    self.add_branch(command, branch)?;
                } else if !self.has_branch(branch) {
                    return Err(MirrorError::command(
                        command.to_string(),
                        format!("error: pathspec '{}' did not match any file(s) known to git", branch),
                    ));
                }
                Ok(String::new())
            }
            VcsCommand::GitBranch { name } => {
                self.add_branch(command, name)?;
                Ok(String::new())
            }
            VcsCommand::GitDeleteBranch { name } => {
                if !self.has_branch(name) {
                    return Err(MirrorError::command(
                        command.to_string(),
                        format!("error: branch '{}' not found", name),
                    ));
                }
                self.branches.borrow_mut().retain(|b| b != name);
                Ok(String::new())
            }
            VcsCommand::GitCommit { allow_empty, .. } => {
                if !self.dirty.get() && !allow_empty {
                    return Err(MirrorError::command(
                        command.to_string(),
                        "nothing to commit, working tree clean",
                    ));
                }
                self.dirty.set(false);
                Ok(String::new())
            }
            VcsCommand::GitTagAnnotated { name, .. } => {
                if self.target_tags.borrow().iter().any(|t| t == name) {
                    return Err(MirrorError::command(
                        command.to_string(),
                        format!("fatal: tag '{}' already exists", name),
                    ));
                }
                self.target_tags.borrow_mut().push(name.clone());
                Ok(String::new())
            }
            VcsCommand::GitAddAll
            | VcsCommand::GitMerge { .. }
            | VcsCommand::GitPush { .. } => Ok(String::new()),
        }
    }
}
