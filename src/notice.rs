use std::fmt;

/// Non-fatal conditions met during a sync run.
/// These are reported to the user but never stop the run.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncNotice {
    /// A missing version was skipped because its qualifier is excluded
    ExcludedVersion { tag: String, marker: String },
    /// The target repository already has every source version
    NothingToMirror,
    /// Trunk has not changed since the edge branch was last refreshed
    EdgeUnchanged { branch: String },
    /// Push was disabled for this run
    PushSkipped { remote: String },
}

impl fmt::Display for SyncNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncNotice::ExcludedVersion { tag, marker } => {
                write!(f, "Skipping {} (qualifier matches '{}')", tag, marker)
            }
            SyncNotice::NothingToMirror => write!(f, "No versions to mirror"),
            SyncNotice::EdgeUnchanged { branch } => {
                write!(f, "Branch '{}' already matches trunk", branch)
            }
            SyncNotice::PushSkipped { remote } => {
                write!(f, "Not pushing to '{}'", remote)
            }
        }
    }
}
