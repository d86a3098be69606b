use crate::domain::Version;

/// True when `qualifier` contains any of `excluded` as a case-sensitive substring
pub fn is_excluded(qualifier: &str, excluded: &[String]) -> bool {
    excluded.iter().any(|marker| qualifier.contains(marker.as_str()))
}

/// The first configured marker found in `qualifier`, if any
pub fn matching_marker<'a>(qualifier: &str, excluded: &'a [String]) -> Option<&'a str> {
    excluded
        .iter()
        .map(String::as_str)
        .find(|marker| qualifier.contains(marker))
}

/// Whether a candidate version should be mirrored.
///
/// Unqualified versions are always mirrored; the exclusion predicate is only
/// consulted for versions that carry a qualifier.
pub fn should_mirror(version: &Version, excluded: &[String]) -> bool {
    match &version.qualifier {
        Some(qualifier) => !is_excluded(qualifier, excluded),
        None => true,
    }
}
