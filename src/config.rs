use crate::domain::tag::{
    DEFAULT_SOURCE_PATTERN, DEFAULT_SOURCE_QUALIFIED, DEFAULT_SOURCE_RELEASE,
    DEFAULT_TARGET_PATTERN, DEFAULT_TARGET_QUALIFIED, DEFAULT_TARGET_RELEASE,
};
use crate::domain::{TagScheme, TagSchemes, Version};
use crate::error::{MirrorError, Result};
use crate::vcs::{CommitIdentity, SourceLocation};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the current directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "svn-mirror.toml";

/// Environment variable naming a configuration file
pub const CONFIG_ENV_VAR: &str = "SVN_MIRROR_CONFIG";

/// Represents the complete configuration for svn-mirror.
///
/// Read once at startup and treated as read-only afterwards.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct MirrorConfig {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub target: TargetConfig,

    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub tags: TagsConfig,
}

fn default_source_url() -> String {
    "http://svn.symfony-project.com".to_string()
}

fn default_trunk_branch() -> String {
    "1.4".to_string()
}

fn default_branches_dir() -> String {
    "branches".to_string()
}

fn default_tags_dir() -> String {
    "tags".to_string()
}

/// Location and layout of the source repository
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SourceConfig {
    #[serde(default = "default_source_url")]
    pub url: String,

    /// Development line mirrored into the main branch and the edge branch
    #[serde(default = "default_trunk_branch")]
    pub trunk_branch: String,

    #[serde(default = "default_branches_dir")]
    pub branches_dir: String,

    #[serde(default = "default_tags_dir")]
    pub tags_dir: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            url: default_source_url(),
            trunk_branch: default_trunk_branch(),
            branches_dir: default_branches_dir(),
            tags_dir: default_tags_dir(),
        }
    }
}

fn default_main_branch() -> String {
    "master".to_string()
}

fn default_edge_branch() -> String {
    "edge".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Branch names and remote of the target repository
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TargetConfig {
    #[serde(default = "default_main_branch")]
    pub main_branch: String,

    #[serde(default = "default_edge_branch")]
    pub edge_branch: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default)]
    pub identity: Option<CommitIdentity>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        TargetConfig {
            main_branch: default_main_branch(),
            edge_branch: default_edge_branch(),
            remote: default_remote(),
            identity: None,
        }
    }
}

fn default_floor() -> Option<String> {
    Some("1.3.0".to_string())
}

fn default_exclude() -> Vec<String> {
    vec!["RC".to_string(), "BETA".to_string(), "ALPHA".to_string()]
}

/// Which versions take part in a sync
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SyncConfig {
    /// Versions below this one are ignored. An empty string disables the floor.
    #[serde(default = "default_floor")]
    pub floor: Option<String>,

    /// Qualifier substrings that keep a version from being mirrored
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            floor: default_floor(),
            exclude: default_exclude(),
        }
    }
}

/// Tag naming for one system
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagFormatConfig {
    pub pattern: String,
    pub release: String,
    pub qualified: String,
}

fn default_source_format() -> TagFormatConfig {
    TagFormatConfig {
        pattern: DEFAULT_SOURCE_PATTERN.to_string(),
        release: DEFAULT_SOURCE_RELEASE.to_string(),
        qualified: DEFAULT_SOURCE_QUALIFIED.to_string(),
    }
}

fn default_target_format() -> TagFormatConfig {
    TagFormatConfig {
        pattern: DEFAULT_TARGET_PATTERN.to_string(),
        release: DEFAULT_TARGET_RELEASE.to_string(),
        qualified: DEFAULT_TARGET_QUALIFIED.to_string(),
    }
}

/// Tag naming for both systems
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagsConfig {
    #[serde(default = "default_source_format")]
    pub source: TagFormatConfig,

    #[serde(default = "default_target_format")]
    pub target: TagFormatConfig,
}

impl Default for TagsConfig {
    fn default() -> Self {
        TagsConfig {
            source: default_source_format(),
            target: default_target_format(),
        }
    }
}

impl MirrorConfig {
    /// The parsed floor version, if one is configured
    pub fn floor_version(&self) -> Result<Option<Version>> {
        self.sync
            .floor
            .as_deref()
            .map(str::trim)
            .filter(|floor| !floor.is_empty())
            .map(|floor| floor.parse::<Version>())
            .transpose()
    }

    /// Compile the configured tag patterns
    pub fn tag_schemes(&self) -> Result<TagSchemes> {
        let build = |format: &TagFormatConfig| {
            TagScheme::new(&format.pattern, format.release.clone(), format.qualified.clone())
        };

        Ok(TagSchemes {
            source: build(&self.tags.source)?,
            target: build(&self.tags.target)?,
        })
    }

    pub fn source_location(&self) -> SourceLocation {
        SourceLocation {
            url: self.source.url.clone(),
            trunk_branch: self.source.trunk_branch.clone(),
            branches_dir: self.source.branches_dir.clone(),
            tags_dir: self.source.tags_dir.clone(),
        }
    }

    /// Check everything that can be checked before touching any repository
    pub fn validate(&self) -> Result<()> {
        if self.source.url.trim().is_empty() {
            return Err(MirrorError::config("source.url must not be empty"));
        }
        if self.source.trunk_branch.trim().is_empty() {
            return Err(MirrorError::config("source.trunk_branch must not be empty"));
        }
        if self.target.main_branch.trim().is_empty() || self.target.edge_branch.trim().is_empty() {
            return Err(MirrorError::config("target branch names must not be empty"));
        }
        if self.target.main_branch == self.target.edge_branch {
            return Err(MirrorError::config(format!(
                "main and edge branch must differ (both are '{}')",
                self.target.main_branch
            )));
        }
        if self.target.remote.trim().is_empty() {
            return Err(MirrorError::config("target.remote must not be empty"));
        }
        if self.sync.exclude.iter().any(|marker| marker.is_empty()) {
            // "" is a substring of every qualifier
            return Err(MirrorError::config("sync.exclude must not contain empty markers"));
        }

        self.floor_version()?;
        self.tag_schemes()?;
        Ok(())
    }
}

/// Locate the configuration file to use, if any.
///
/// Order:
/// 1. Custom path provided as parameter
/// 2. Path in the `SVN_MIRROR_CONFIG` environment variable
/// 3. `svn-mirror.toml` in the current directory
/// 4. `svn-mirror.toml` in the user config directory
pub fn find_config_file(config_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(path.to_path_buf());
    }

    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}

/// Loads configuration from file or returns defaults.
///
/// # Returns
/// * `Ok(MirrorConfig)` - Loaded or default configuration
/// * `Err` - If a file was selected but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<MirrorConfig> {
    match find_config_file(config_path) {
        Some(path) => {
            let config_str = fs::read_to_string(&path).map_err(|e| {
                MirrorError::config(format!("Cannot read {}: {}", path.display(), e))
            })?;
            parse_config(&config_str)
        }
        None => Ok(MirrorConfig::default()),
    }
}

/// Parse configuration text
pub fn parse_config(config_str: &str) -> Result<MirrorConfig> {
    let config: MirrorConfig = toml::from_str(config_str)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_deployment() {
        let config = MirrorConfig::default();
        assert_eq!(config.source.url, "http://svn.symfony-project.com");
        assert_eq!(config.source.trunk_branch, "1.4");
        assert_eq!(config.target.main_branch, "master");
        assert_eq!(config.target.edge_branch, "edge");
        assert_eq!(config.floor_version().unwrap(), Some(Version::new(1, 3, 0)));
        assert_eq!(config.sync.exclude, vec!["RC", "BETA", "ALPHA"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, MirrorConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = parse_config(
            r#"
[source]
url = "https://svn.example.org/repo"
"#,
        )
        .unwrap();
        assert_eq!(config.source.url, "https://svn.example.org/repo");
        assert_eq!(config.source.trunk_branch, "1.4");
        assert_eq!(config.source.tags_dir, "tags");
    }

    #[test]
    fn test_floor_can_be_absent() {
        let mut config = MirrorConfig::default();
        config.sync.floor = None;
        assert_eq!(config.floor_version().unwrap(), None);
    }

    #[test]
    fn test_empty_floor_disables_filtering() {
        let config = parse_config("[sync]\nfloor = \"\"\n").unwrap();
        assert_eq!(config.floor_version().unwrap(), None);
    }

    #[test]
    fn test_invalid_floor_is_rejected() {
        let mut config = MirrorConfig::default();
        config.sync.floor = Some("one.three".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_same_main_and_edge_is_rejected() {
        let mut config = MirrorConfig::default();
        config.target.edge_branch = "master".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn test_empty_exclude_marker_is_rejected() {
        let mut config = MirrorConfig::default();
        config.sync.exclude.push(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_pattern_is_rejected() {
        let mut config = MirrorConfig::default();
        config.tags.target.pattern = r"v(\d+)".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_source_location_from_config() {
        let config = MirrorConfig::default();
        let location = config.source_location();
        assert_eq!(
            location.trunk_url(),
            "http://svn.symfony-project.com/branches/1.4"
        );
    }
}
