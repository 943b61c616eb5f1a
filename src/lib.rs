pub mod app;
pub mod archive;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod package;
pub mod storage;
pub mod test_utils;

pub use error::{Result, SkillError};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
