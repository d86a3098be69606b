use crate::domain::Version;
use crate::error::{MirrorError, Result};
use regex::Regex;

pub const DEFAULT_SOURCE_PATTERN: &str = r"RELEASE_(\d+)_(\d+)_(\d+)(?:_(\w*))?";
pub const DEFAULT_SOURCE_RELEASE: &str = "RELEASE_{major}_{minor}_{patch}";
pub const DEFAULT_SOURCE_QUALIFIED: &str = "RELEASE_{major}_{minor}_{patch}_{qualifier}";

pub const DEFAULT_TARGET_PATTERN: &str = r"v(\d+)\.(\d+)\.(\d+)(?:-(\w*))?";
pub const DEFAULT_TARGET_RELEASE: &str = "v{major}.{minor}.{patch}";
pub const DEFAULT_TARGET_QUALIFIED: &str = "v{major}.{minor}.{patch}-{qualifier}";

/// Which version-control system a tag name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemKind {
    /// The centralized, sequential-revision system tags are mirrored from
    Source,
    /// The distributed repository tags are recreated in
    Target,
}

/// How one system names its release tags: a capture pattern for reading
/// and two templates for writing.
///
/// The pattern must expose four groups (major, minor, patch, optional
/// qualifier). Templates use `{major}`, `{minor}`, `{patch}` and, for the
/// qualified form, `{qualifier}`.
#[derive(Debug, Clone)]
pub struct TagScheme {
    pattern: Regex,
    release: String,
    qualified: String,
}

impl TagScheme {
    pub fn new(pattern: &str, release: impl Into<String>, qualified: impl Into<String>) -> Result<Self> {
        let pattern = Regex::new(pattern)?;
        let release = release.into();
        let qualified = qualified.into();

        // captures_len counts the implicit whole-match group
        if pattern.captures_len() < 5 {
            return Err(MirrorError::config(format!(
                "Tag pattern '{}' must have four capture groups (major, minor, patch, qualifier)",
                pattern.as_str()
            )));
        }

        for template in [&release, &qualified] {
            for placeholder in ["{major}", "{minor}", "{patch}"] {
                if !template.contains(placeholder) {
                    return Err(MirrorError::config(format!(
                        "Tag template '{}' must contain {} placeholder",
                        template, placeholder
                    )));
                }
            }
        }
        if release.contains("{qualifier}") {
            return Err(MirrorError::config(format!(
                "Release tag template '{}' must not contain {{qualifier}} placeholder",
                release
            )));
        }
        if !qualified.contains("{qualifier}") {
            return Err(MirrorError::config(format!(
                "Qualified tag template '{}' must contain {{qualifier}} placeholder",
                qualified
            )));
        }

        Ok(TagScheme {
            pattern,
            release,
            qualified,
        })
    }

    /// Parse a raw tag name. `None` means "not a version tag", which callers skip.
    pub fn parse(&self, tag: &str) -> Option<Version> {
        let caps = self.pattern.captures(tag)?;

        let major = caps.get(1)?.as_str().parse::<u32>().ok()?;
        let minor = caps.get(2)?.as_str().parse::<u32>().ok()?;
        let patch = caps.get(3)?.as_str().parse::<u32>().ok()?;

        // A participating but empty group is kept as an empty qualifier
        Some(match caps.get(4) {
            Some(q) => Version::with_qualifier(major, minor, patch, q.as_str()),
            None => Version::new(major, minor, patch),
        })
    }

    /// Render a version, choosing the qualified template iff a qualifier is present
    pub fn format(&self, version: &Version) -> String {
        let template = match &version.qualifier {
            Some(_) => &self.qualified,
            None => &self.release,
        };

        let rendered = template
            .replace("{major}", &version.major.to_string())
            .replace("{minor}", &version.minor.to_string())
            .replace("{patch}", &version.patch.to_string());

        match &version.qualifier {
            Some(q) => rendered.replace("{qualifier}", q),
            None => rendered,
        }
    }

    /// Lazily parse a tag listing, dropping entries that are not version tags.
    /// Listing order is preserved.
    pub fn versions<'a, I, S>(&'a self, tags: I) -> impl Iterator<Item = Version> + 'a
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: 'a,
        S: AsRef<str> + 'a,
    {
        tags.into_iter().filter_map(move |tag| self.parse(tag.as_ref()))
    }
}

/// The pair of naming schemes for both systems
#[derive(Debug, Clone)]
pub struct TagSchemes {
    pub source: TagScheme,
    pub target: TagScheme,
}

impl TagSchemes {
    pub fn scheme(&self, kind: SystemKind) -> &TagScheme {
        match kind {
            SystemKind::Source => &self.source,
            SystemKind::Target => &self.target,
        }
    }

    pub fn format(&self, version: &Version, kind: SystemKind) -> String {
        self.scheme(kind).format(version)
    }
}

impl Default for TagSchemes {
    fn default() -> Self {
        // The default patterns are constants covered by tests
        TagSchemes {
            source: TagScheme::new(
                DEFAULT_SOURCE_PATTERN,
                DEFAULT_SOURCE_RELEASE,
                DEFAULT_SOURCE_QUALIFIED,
            )
            .expect("default source tag scheme is valid"),
            target: TagScheme::new(
                DEFAULT_TARGET_PATTERN,
                DEFAULT_TARGET_RELEASE,
                DEFAULT_TARGET_QUALIFIED,
            )
            .expect("default target tag scheme is valid"),
        }
    }
}
