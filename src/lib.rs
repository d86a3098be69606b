pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod mirror;
pub mod notice;
pub mod ui;
pub mod vcs;

pub use error::{MirrorError, Result};
