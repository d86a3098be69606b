//! First-run setup of the shared working copy.

use crate::error::Result;
use crate::ui;
use crate::vcs::{CommandRunner, CommitIdentity, MirrorRepository};
use git2::{IndexAddOption, Repository, RepositoryInitOptions, Signature};
use std::fs;
use std::path::Path;

pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

/// Ignore rule keeping source-system metadata out of the target repository
pub const SOURCE_METADATA_IGNORE: &str = ".svn\n";

/// What bootstrap had to create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BootstrapOutcome {
    pub created_directory: bool,
    pub created_checkout: bool,
    pub created_repository: bool,
}

/// Whether `workdir` already holds both a source checkout and a target repository
pub fn is_bootstrapped(workdir: &Path) -> bool {
    workdir.join(".svn").is_dir() && workdir.join(".git").is_dir()
}

/// Make sure the working directory, source checkout and target repository exist.
///
/// Directory creation failures surface before any version-control command runs.
pub fn bootstrap<R: CommandRunner>(
    repo: &MirrorRepository<R>,
    workdir: &Path,
    main_branch: &str,
    identity: Option<&CommitIdentity>,
) -> Result<BootstrapOutcome> {
    let mut outcome = BootstrapOutcome::default();

    if !workdir.is_dir() {
        fs::create_dir_all(workdir)?;
        outcome.created_directory = true;
    }

    if !workdir.join(".svn").is_dir() {
        ui::display_status("Creating source checkout");
        repo.checkout_source_trunk()?;
        outcome.created_checkout = true;
    }

    if !workdir.join(".git").is_dir() {
        ui::display_status("Creating target repository");
        init_target_repository(workdir, main_branch, identity)?;
        outcome.created_repository = true;
    }

    tracing::debug!(?outcome, workdir = %workdir.display(), "bootstrap finished");
    Ok(outcome)
}

/// Initialise the target repository with an ignore rule and an initial
/// commit of the current tree on `main_branch`.
///
/// The commit is signed by `identity` when given, otherwise by the git
/// configuration of the machine.
pub fn init_target_repository(
    workdir: &Path,
    main_branch: &str,
    identity: Option<&CommitIdentity>,
) -> Result<Repository> {
    let mut options = RepositoryInitOptions::new();
    options.initial_head(main_branch);
    let git = Repository::init_opts(workdir, &options)?;

    fs::write(workdir.join(".gitignore"), SOURCE_METADATA_IGNORE)?;

    let tree_id = {
        let mut index = git.index()?;
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        index.write()?;
        index.write_tree()?
    };

    {
        let tree = git.find_tree(tree_id)?;
        let signature = match identity {
            Some(id) => Signature::now(&id.name, &id.email)?,
            None => git
                .signature()
                .or_else(|_| Signature::now("svn-mirror", "svn-mirror@localhost"))?,
        };
        git.commit(
            Some("HEAD"),
            &signature,
            &signature,
            INITIAL_COMMIT_MESSAGE,
            &tree,
            &[],
        )?;
    }

    Ok(git)
}
