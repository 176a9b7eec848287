//! APITest Common Library
//!
//! Environment configuration and the record types shared by the
//! contract test groups.

pub mod config;
pub mod error;
pub mod types;

pub use config::{EndpointFile, Environment, EnvironmentConfig, Properties};
pub use error::{Error, Result};
pub use types::{Comment, Post, PostPatch};

/// APITest version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
