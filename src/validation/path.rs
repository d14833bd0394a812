//! Path validation and normalization functions

use std::path::{Component, Path, PathBuf};

use super::ValidationError;

#[cfg(windows)]
const MAX_PATH_LEN: usize = 260;

#[cfg(windows)]
const ILLEGAL_NAME_CHARS: [char; 7] = ['<', '>', ':', '"', '|', '?', '*'];

/// Check if a path is safe (no parent directory references)
///
/// Ensures relative keys cannot escape a sync root using ".." references.
pub fn is_path_safe(path: &Path) -> bool {
	!path.components().any(|c| matches!(c, Component::ParentDir))
}

/// Validate a user-supplied root path
///
/// Rejects empty paths and paths containing NUL. On Windows, also rejects
/// over-long paths and base names with characters the filesystem refuses.
pub fn validate_root_path(path: &Path) -> Result<(), ValidationError> {
	let s = path.to_string_lossy();
	if s.trim().is_empty() {
		return Err(ValidationError::PathError("Path must not be empty".to_string()));
	}
	if s.contains('\0') {
		return Err(ValidationError::PathError(format!("Path contains NUL byte: {:?}", path)));
	}

	#[cfg(windows)]
	{
		if s.chars().count() > MAX_PATH_LEN {
			return Err(ValidationError::PathError(format!(
				"Path longer than {} characters: {:?}",
				MAX_PATH_LEN, path
			)));
		}
		if let Some(name) = path.file_name().map(|n| n.to_string_lossy()) {
			if let Some(c) = name.chars().find(|c| ILLEGAL_NAME_CHARS.contains(c)) {
				return Err(ValidationError::PathError(format!(
					"Path contains illegal character '{}': {:?}",
					c, path
				)));
			}
		}
	}

	Ok(())
}

/// Make `path` absolute and fold `.` and `..` components lexically
///
/// The filesystem is not consulted, so this works for paths that do not
/// exist yet (a target root that was never populated).
pub fn normalize_path(path: &Path) -> PathBuf {
	let absolute = if path.is_absolute() {
		path.to_path_buf()
	} else {
		match std::env::current_dir() {
			Ok(cwd) => cwd.join(path),
			Err(_) => path.to_path_buf(),
		}
	};

	let mut out = PathBuf::new();
	for component in absolute.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => {
				out.pop();
			}
			other => out.push(other.as_os_str()),
		}
	}
	out
}

/// True if `child` equals `parent` or lies somewhere below it
pub fn is_subdirectory(child: &Path, parent: &Path) -> bool {
	normalize_path(child).starts_with(normalize_path(parent))
}

/// Relative key of `path` under `root`, with `/` separators
///
/// Returns `None` if `path` is not below `root`, or if any component is
/// not valid UTF-8.
pub fn relative_key(root: &Path, path: &Path) -> Option<String> {
	let rel = path.strip_prefix(root).ok()?;
	if !is_path_safe(rel) {
		return None;
	}

	let mut parts = Vec::new();
	for component in rel.components() {
		match component {
			Component::Normal(name) => parts.push(name.to_str()?),
			Component::CurDir => {}
			_ => return None,
		}
	}
	if parts.is_empty() {
		return None;
	}
	Some(parts.join("/"))
}

/// Join a `/`-separated relative key onto `root` using native separators
pub fn join_key(root: &Path, key: &str) -> PathBuf {
	key.split('/')
		.filter(|part| !part.is_empty())
		.fold(root.to_path_buf(), |acc, part| acc.join(part))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_is_path_safe_normal() {
		assert!(is_path_safe(Path::new("file.txt")));
		assert!(is_path_safe(Path::new("dir/file.txt")));
		assert!(is_path_safe(Path::new("a/b/c/file.txt")));
	}

	#[test]
	fn test_is_path_safe_with_parent() {
		assert!(!is_path_safe(Path::new("../file.txt")));
		assert!(!is_path_safe(Path::new("dir/../file.txt")));
	}

	#[test]
	fn test_validate_root_path_empty() {
		let result = validate_root_path(Path::new(""));
		assert!(result.is_err());
		assert!(result.unwrap_err().to_string().contains("must not be empty"));
	}

	#[test]
	fn test_validate_root_path_ok() {
		assert!(validate_root_path(Path::new("/home/user/sync")).is_ok());
		assert!(validate_root_path(Path::new("relative/dir")).is_ok());
	}

	#[test]
	fn test_normalize_path_folds_components() {
		let normalized = normalize_path(Path::new("/home/user/./sync/../data"));
		assert_eq!(normalized, PathBuf::from("/home/user/data"));
	}

	#[test]
	fn test_normalize_relative_is_absolute() {
		assert!(normalize_path(Path::new("some/dir")).is_absolute());
	}

	#[test]
	fn test_is_subdirectory() {
		assert!(is_subdirectory(Path::new("/data/a/b"), Path::new("/data/a")));
		assert!(is_subdirectory(Path::new("/data/a"), Path::new("/data/a")));
		assert!(is_subdirectory(Path::new("/data/a/../a/b"), Path::new("/data/a")));
		assert!(!is_subdirectory(Path::new("/data/ab"), Path::new("/data/a")));
		assert!(!is_subdirectory(Path::new("/data"), Path::new("/data/a")));
	}

	#[test]
	fn test_relative_key_uses_forward_slashes() {
		let root = Path::new("/sync/root");
		let path = root.join("dir").join("sub").join("file.txt");
		assert_eq!(relative_key(root, &path), Some("dir/sub/file.txt".to_string()));
	}

	#[test]
	fn test_relative_key_outside_root() {
		assert_eq!(relative_key(Path::new("/sync/root"), Path::new("/other/file")), None);
		assert_eq!(relative_key(Path::new("/sync/root"), Path::new("/sync/root")), None);
	}

	#[test]
	fn test_join_key_roundtrip() {
		let root = Path::new("/sync/root");
		let joined = join_key(root, "dir/file.txt");
		assert_eq!(joined, root.join("dir").join("file.txt"));
		assert_eq!(relative_key(root, &joined), Some("dir/file.txt".to_string()));
	}
}
