//! Domain logic - pure version rules independent of any version-control tool

pub mod exclusion;
pub mod tag;
pub mod version;
pub mod version_set;

pub use exclusion::{is_excluded, should_mirror};
pub use tag::{SystemKind, TagScheme, TagSchemes};
pub use version::Version;
pub use version_set::{diff, filter_floor};
