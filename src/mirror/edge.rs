use crate::error::Result;
use crate::vcs::{CommandRunner, MirrorRepository};

pub const EDGE_COMMIT_MESSAGE: &str = "edge update";

/// What a refresh did to the edge branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOutcome {
    /// The branch did not exist and was created from the main line
    Created,
    /// A commit with the current trunk content was added
    Updated,
    /// Trunk content was already committed
    Unchanged,
}

/// Bring the edge branch up to the live tip of the source trunk.
///
/// Ends with the main line checked out again. The source working copy is
/// left pointing at trunk.
pub fn refresh_edge<R: CommandRunner>(
    repo: &MirrorRepository<R>,
    main_branch: &str,
    edge_branch: &str,
) -> Result<EdgeOutcome> {
    let created = if repo.branch_exists(edge_branch)? {
        false
    } else {
        repo.create_branch(edge_branch)?;
        true
    };

    repo.checkout(edge_branch)?;
    repo.switch_source_to_trunk()?;
    repo.stage_all()?;

    let committed = if repo.has_changes()? {
        repo.commit(EDGE_COMMIT_MESSAGE, false)?;
        true
    } else {
        false
    };

    repo.checkout(main_branch)?;

    tracing::debug!(branch = edge_branch, created, committed, "edge refreshed");

    Ok(match (created, committed) {
        (true, _) => EdgeOutcome::Created,
        (false, true) => EdgeOutcome::Updated,
        (false, false) => EdgeOutcome::Unchanged,
    })
}
