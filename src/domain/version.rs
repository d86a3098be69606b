use crate::error::{MirrorError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A release point: `major.minor.patch` with an optional qualifier such as `RC1`.
///
/// `PartialEq` compares all four fields, qualifier included. That is the
/// identity used when diffing the two tag sets. Positional comparisons
/// (floor filtering) go through [`Version::compare_triplet`] instead, which
/// ignores the qualifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub qualifier: Option<String>,
}

impl Version {
    /// Create an unqualified release version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
            qualifier: None,
        }
    }

    /// Create a version carrying a qualifier. An empty qualifier is kept as
    /// `Some("")` and stays distinct from an absent one.
    pub fn with_qualifier(major: u32, minor: u32, patch: u32, qualifier: impl Into<String>) -> Self {
        Version {
            major,
            minor,
            patch,
            qualifier: Some(qualifier.into()),
        }
    }

    /// Compare `(major, minor, patch)` only. Minor is consulted only when
    /// majors tie, patch only when both majors and minors tie.
    pub fn compare_triplet(&self, other: &Version) -> Ordering {
        self.major
            .cmp(&other.major)
            .then_with(|| self.minor.cmp(&other.minor))
            .then_with(|| self.patch.cmp(&other.patch))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(qualifier) = &self.qualifier {
            write!(f, "-{}", qualifier)?;
        }
        Ok(())
    }
}

/// Parses the human form `1.3.0`, `v1.3.0` or `1.3.0-RC1`. Used for
/// configuration values such as the floor version, not for tag discovery.
impl FromStr for Version {
    type Err = MirrorError;

    fn from_str(s: &str) -> Result<Self> {
        let clean = s.trim().trim_start_matches('v').trim_start_matches('V');
        let (numbers, qualifier) = match clean.split_once('-') {
            Some((numbers, qualifier)) => (numbers, Some(qualifier)),
            None => (clean, None),
        };

        let parts: Vec<&str> = numbers.split('.').collect();
        if parts.len() != 3 {
            return Err(MirrorError::version(format!(
                "Invalid version format: '{}' - expected X.Y.Z",
                s
            )));
        }

        let component = |part: &str, name: &str| {
            part.parse::<u32>()
                .map_err(|_| MirrorError::version(format!("Invalid {} version: {}", name, part)))
        };

        let major = component(parts[0], "major")?;
        let minor = component(parts[1], "minor")?;
        let patch = component(parts[2], "patch")?;

        match qualifier {
            Some("") => Err(MirrorError::version(format!("Empty qualifier in '{}'", s))),
            Some(q) => Ok(Version::with_qualifier(major, minor, patch, q)),
            None => Ok(Version::new(major, minor, patch)),
        }
    }
}
