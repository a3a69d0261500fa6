//! # tabwise Config
//!
//! Configuration management: TOML schema with defaults, loading with
//! environment expansion, validation, and the named settings store.

mod error;
mod loader;
mod schema;
mod settings;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use settings::{split_keywords, ConfigSettingsStore};
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
