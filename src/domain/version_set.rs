//! Set operations over discovered versions: floor filtering and the
//! source-minus-target difference.

use crate::domain::Version;
use std::cmp::Ordering;

/// Drop every version positioned below `floor`. The floor itself is kept.
/// Without a floor the input is returned unchanged.
pub fn filter_floor(versions: Vec<Version>, floor: Option<&Version>) -> Vec<Version> {
    match floor {
        Some(floor) => versions
            .into_iter()
            .filter(|v| v.compare_triplet(floor) != Ordering::Less)
            .collect(),
        None => versions,
    }
}

/// Source versions with no exact counterpart in `target`.
///
/// Matching uses full equality including the qualifier, so `1.3.0-RC1` is
/// still missing when only `1.3.0` exists on the target and vice versa.
/// Source order is preserved.
pub fn diff(source: &[Version], target: &[Version]) -> Vec<Version> {
    source
        .iter()
        .filter(|v| !target.contains(v))
        .cloned()
        .collect()
}
