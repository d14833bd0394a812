//! Error types for dirsync operations

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::validation::ValidationError;

/// Main error type for sync operations
#[derive(Debug)]
pub enum SyncError {
	/// Source directory does not exist (or is not a directory)
	SourceMissing { path: PathBuf },

	/// Invalid configuration
	InvalidConfig { message: String },

	/// A configured root path failed validation
	InvalidPath(ValidationError),

	/// Filter rule string could not be compiled
	Filter(FilterError),

	/// A scan root exists but could not be walked
	ScanFailed { root: PathBuf, source: io::Error },

	/// Content hash could not be computed
	HashFailed { path: PathBuf, source: io::Error },

	/// Post-copy size check failed
	SizeMismatch { path: PathBuf, expected: u64, actual: u64 },

	/// Post-copy hash check failed
	HashMismatch { path: PathBuf, expected: String, actual: String },

	/// I/O error
	Io(io::Error),
}

impl fmt::Display for SyncError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SyncError::SourceMissing { path } => {
				write!(f, "Source directory does not exist: {}", path.display())
			}
			SyncError::InvalidConfig { message } => {
				write!(f, "Invalid configuration: {}", message)
			}
			SyncError::InvalidPath(e) => write!(f, "{}", e),
			SyncError::Filter(e) => write!(f, "{}", e),
			SyncError::ScanFailed { root, source } => {
				write!(f, "Failed to scan {}: {}", root.display(), source)
			}
			SyncError::HashFailed { path, source } => {
				write!(f, "Failed to hash {}: {}", path.display(), source)
			}
			SyncError::SizeMismatch { path, expected, actual } => {
				write!(
					f,
					"Size mismatch after copy of {}: expected {} bytes, got {}",
					path.display(),
					expected,
					actual
				)
			}
			SyncError::HashMismatch { path, expected, actual } => {
				write!(
					f,
					"Hash mismatch after copy of {}: expected {}, got {}",
					path.display(),
					expected,
					actual
				)
			}
			SyncError::Io(e) => write!(f, "I/O error: {}", e),
		}
	}
}

impl Error for SyncError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			SyncError::ScanFailed { source, .. } | SyncError::HashFailed { source, .. } => {
				Some(source)
			}
			SyncError::Io(e) => Some(e),
			SyncError::Filter(e) => Some(e),
			SyncError::InvalidPath(e) => Some(e),
			_ => None,
		}
	}
}

impl From<io::Error> for SyncError {
	fn from(e: io::Error) -> Self {
		SyncError::Io(e)
	}
}

impl From<FilterError> for SyncError {
	fn from(e: FilterError) -> Self {
		SyncError::Filter(e)
	}
}

impl From<ValidationError> for SyncError {
	fn from(e: ValidationError) -> Self {
		match e {
			ValidationError::SourceMissing(path) => SyncError::SourceMissing { path },
			ValidationError::ConfigError(message) => SyncError::InvalidConfig { message },
			other => SyncError::InvalidPath(other),
		}
	}
}

/// Filter rule errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
	/// A glob pattern the matcher cannot compile
	InvalidPattern { pattern: String, message: String },
}

impl fmt::Display for FilterError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FilterError::InvalidPattern { pattern, message } => {
				write!(f, "Invalid filter pattern '{}': {}", pattern, message)
			}
		}
	}
}

impl Error for FilterError {}

/// Profile store errors
#[derive(Debug)]
pub enum ProfileError {
	/// Failed to read the profile file
	LoadFailed { path: PathBuf, source: io::Error },

	/// Failed to write the profile file
	SaveFailed { path: PathBuf, source: Box<dyn Error + Send + Sync> },

	/// Profile file exists but is not a valid document
	Corrupted { path: PathBuf, message: String },

	/// No profile with this name
	NotFound { name: String },

	/// Refusing to delete the only remaining profile
	LastProfile { name: String },
}

impl fmt::Display for ProfileError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ProfileError::LoadFailed { path, source } => {
				write!(f, "Failed to load profiles from {}: {}", path.display(), source)
			}
			ProfileError::SaveFailed { path, source } => {
				write!(f, "Failed to save profiles to {}: {}", path.display(), source)
			}
			ProfileError::Corrupted { path, message } => {
				write!(f, "Profile file {} is corrupted: {}", path.display(), message)
			}
			ProfileError::NotFound { name } => write!(f, "Profile not found: {}", name),
			ProfileError::LastProfile { name } => {
				write!(f, "Cannot delete '{}': at least one profile must remain", name)
			}
		}
	}
}

impl Error for ProfileError {}


// vim: ts=4
