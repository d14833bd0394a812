//! Sync root validation
//!
//! These checks run before any scanning starts. A missing source is the one
//! user-facing precondition failure; a missing target is fine (it is created
//! on the first copy).

use std::path::Path;

use super::path::{is_subdirectory, normalize_path, validate_root_path};
use super::ValidationError;

/// Validate a source/target pair
///
/// - both paths pass `validate_root_path`
/// - the source exists and is a directory
/// - the target, if it exists, is a directory
/// - the roots are neither the same directory nor nested in each other
pub fn validate_roots(source: &Path, target: &Path) -> Result<(), ValidationError> {
	validate_root_path(source)?;
	validate_root_path(target)?;

	if !source.is_dir() {
		return Err(ValidationError::SourceMissing(source.to_path_buf()));
	}

	if target.exists() && !target.is_dir() {
		return Err(ValidationError::ConfigError(format!(
			"Target exists but is not a directory: {}",
			target.display()
		)));
	}

	let source_norm = normalize_path(source);
	let target_norm = normalize_path(target);
	if source_norm == target_norm {
		return Err(ValidationError::ConfigError(format!(
			"Source and target are the same directory: {}",
			source_norm.display()
		)));
	}
	if is_subdirectory(&target_norm, &source_norm) || is_subdirectory(&source_norm, &target_norm) {
		return Err(ValidationError::ConfigError(format!(
			"Source and target must not be nested: {} / {}",
			source_norm.display(),
			target_norm.display()
		)));
	}

	Ok(())
}
