//! Centralized validation for dirsync
//!
//! This module provides common validation functions and traits for:
//! - Path validation (safety, normalization, relative keys)
//! - Sync root validation (preconditions checked before scanning)

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

pub mod config;
pub mod path;

pub use config::*;
pub use path::*;

/// Generic validation error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
	/// Invalid configuration
	ConfigError(String),
	/// Invalid path
	PathError(String),
	/// Source root does not exist or is not a directory
	SourceMissing(PathBuf),
}

impl fmt::Display for ValidationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ValidationError::ConfigError(msg) => write!(f, "Config validation error: {}", msg),
			ValidationError::PathError(msg) => write!(f, "Path validation error: {}", msg),
			ValidationError::SourceMissing(path) => {
				write!(f, "Source directory does not exist: {}", path.display())
			}
		}
	}
}

impl Error for ValidationError {}

/// Trait for validatable types
pub trait Validator {
	/// Validate this type
	/// Returns Ok(()) if valid, Err(ValidationError) if invalid
	fn validate(&self) -> Result<(), ValidationError>;
}
