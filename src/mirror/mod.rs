//! Repository-mutating workflows: the per-version mirror transaction and
//! the edge branch refresh.

pub mod edge;
pub mod transaction;

pub use edge::{refresh_edge, EdgeOutcome};
pub use transaction::{MirrorTransaction, TransactionStep};
