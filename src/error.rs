use thiserror::Error;

/// Unified error type for svn-mirror operations
#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("External command failed: {command}\n{stderr}")]
    Command { command: String, stderr: String },

    #[error("Mirroring {tag} failed during {step}: {source}")]
    Transaction {
        tag: String,
        step: String,
        #[source]
        source: Box<MirrorError>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid tag pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in svn-mirror
pub type Result<T> = std::result::Result<T, MirrorError>;

impl MirrorError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        MirrorError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        MirrorError::Version(msg.into())
    }

    /// Create a command failure for the given rendered command line
    pub fn command(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        MirrorError::Command {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Wrap an error with the transaction step it interrupted
    pub fn transaction(tag: impl Into<String>, step: impl Into<String>, source: MirrorError) -> Self {
        MirrorError::Transaction {
            tag: tag.into(),
            step: step.into(),
            source: Box::new(source),
        }
    }
}
