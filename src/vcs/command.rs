//! Typed external commands.
//!
//! Each variant describes one invocation of `svn` or `git` as data. Runners
//! turn a command into a program plus argument vector; nothing is ever
//! assembled into a shell string.

use std::fmt;

/// One external version-control invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsCommand {
    /// `svn list <url>`: entries directly under a repository path
    SvnList { url: String },

    /// `svn checkout <url> .`: create the source working copy
    SvnCheckout { url: String },

    /// `svn switch <url>`: repoint the working copy at another path
    SvnSwitch { url: String },

    /// `git checkout [-b] <branch>`
    GitCheckout { branch: String, create: bool },

    /// `git branch <name>`: create without switching
    GitBranch { name: String },

    /// `git branch -D <name>`
    GitDeleteBranch { name: String },

    /// `git branch --list <name>`: prints the branch when it exists
    GitListBranch { name: String },

    /// `git add --all .`
    GitAddAll,

    /// `git status --porcelain`
    GitStatus,

    /// `git commit -m <message>`
    GitCommit { message: String, allow_empty: bool },

    /// `git merge --no-ff -m <message> <branch>`
    GitMerge { branch: String, message: String },

    /// `git tag -a <name> -m <message>`
    GitTagAnnotated { name: String, message: String },

    /// `git tag --list`
    GitTagList,

    /// `git push <remote> <refspec> [--tags]`
    GitPush {
        remote: String,
        refspec: String,
        tags: bool,
    },
}

/// The program a command runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Program {
    Svn,
    Git,
}

impl Program {
    pub fn binary(&self) -> &'static str {
        match self {
            Program::Svn => "svn",
            Program::Git => "git",
        }
    }
}

impl VcsCommand {
    pub fn program(&self) -> Program {
        match self {
            VcsCommand::SvnList { .. }
            | VcsCommand::SvnCheckout { .. }
            | VcsCommand::SvnSwitch { .. } => Program::Svn,
            _ => Program::Git,
        }
    }

    /// Whether git needs a committer identity to run this command
    pub fn creates_objects(&self) -> bool {
        matches!(
            self,
            VcsCommand::GitCommit { .. }
                | VcsCommand::GitMerge { .. }
                | VcsCommand::GitTagAnnotated { .. }
        )
    }

    /// Arguments passed after the program name
    pub fn args(&self) -> Vec<String> {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        match self {
            VcsCommand::SvnList { url } => owned(&["list", "--non-interactive", url.as_str()]),
            VcsCommand::SvnCheckout { url } => owned(&["checkout", "--non-interactive", url.as_str(), "."]),
            VcsCommand::SvnSwitch { url } => owned(&["switch", "--non-interactive", url.as_str()]),
            VcsCommand::GitCheckout { branch, create } => {
                if *create {
                    owned(&["checkout", "-b", branch.as_str()])
                } else {
                    owned(&["checkout", branch.as_str()])
                }
            }
            VcsCommand::GitBranch { name } => owned(&["branch", name.as_str()]),
            VcsCommand::GitDeleteBranch { name } => owned(&["branch", "-D", name.as_str()]),
            VcsCommand::GitListBranch { name } => owned(&["branch", "--list", name.as_str()]),
            VcsCommand::GitAddAll => owned(&["add", "--all", "."]),
            VcsCommand::GitStatus => owned(&["status", "--porcelain"]),
            VcsCommand::GitCommit {
                message,
                allow_empty,
            } => {
                let mut args = owned(&["commit", "-m", message.as_str()]);
                if *allow_empty {
                    args.push("--allow-empty".to_string());
                }
                args
            }
            VcsCommand::GitMerge { branch, message } => {
                owned(&["merge", "--no-ff", "-m", message.as_str(), branch.as_str()])
            }
            VcsCommand::GitTagAnnotated { name, message } => owned(&["tag", "-a", name.as_str(), "-m", message.as_str()]),
            VcsCommand::GitTagList => owned(&["tag", "--list"]),
            VcsCommand::GitPush {
                remote,
                refspec,
                tags,
            } => {
                let mut args = owned(&["push", remote.as_str(), refspec.as_str()]);
                if *tags {
                    args.push("--tags".to_string());
                }
                args
            }
        }
    }
}

impl fmt::Display for VcsCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program().binary())?;
        for arg in self.args() {
            if arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}
