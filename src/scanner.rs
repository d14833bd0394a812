//! Directory scanning
//!
//! Walks a root recursively and records size and mtime of every file that
//! passes the filter, keyed by its `/`-separated path relative to the root.
//! Content hashes are not computed here; `FileRecord::content_hash` does it
//! on first use.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::SyncError;
use crate::filter::FilterRuleSet;
use crate::hashing::{hash_file, ContentHash};
use crate::logging::*;
use crate::util::system_time_to_secs;
use crate::validation::relative_key;

/// One scanned file
#[derive(Debug, Clone)]
pub struct FileRecord {
	/// Path relative to the scan root, `/`-separated
	pub rel_path: String,

	/// Absolute (root-joined) path on disk
	pub abs_path: PathBuf,

	/// Size in bytes
	pub size: u64,

	/// Modification time in seconds since the epoch
	pub mtime: f64,

	hash: OnceLock<ContentHash>,
}

impl FileRecord {
	pub fn new(
		rel_path: impl Into<String>,
		abs_path: impl Into<PathBuf>,
		size: u64,
		mtime: f64,
	) -> Self {
		FileRecord {
			rel_path: rel_path.into(),
			abs_path: abs_path.into(),
			size,
			mtime,
			hash: OnceLock::new(),
		}
	}

	/// Content hash, computed from disk on first call and cached afterwards
	pub fn content_hash(&self) -> io::Result<ContentHash> {
		if let Some(hash) = self.hash.get() {
			return Ok(*hash);
		}
		let hash = hash_file(&self.abs_path)?;
		let _ = self.hash.set(hash);
		Ok(hash)
	}

	/// The hash if it has already been computed
	pub fn cached_hash(&self) -> Option<ContentHash> {
		self.hash.get().copied()
	}
}

/// Files found under one root, keyed by relative path
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
	root: PathBuf,
	files: BTreeMap<String, FileRecord>,
}

impl ScanResult {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		ScanResult { root: root.into(), files: BTreeMap::new() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn insert(&mut self, record: FileRecord) {
		self.files.insert(record.rel_path.clone(), record);
	}

	pub fn get(&self, rel_path: &str) -> Option<&FileRecord> {
		self.files.get(rel_path)
	}

	pub fn contains(&self, rel_path: &str) -> bool {
		self.files.contains_key(rel_path)
	}

	pub fn len(&self) -> usize {
		self.files.len()
	}

	pub fn is_empty(&self) -> bool {
		self.files.is_empty()
	}

	/// Records in relative-path order
	pub fn iter(&self) -> impl Iterator<Item = (&String, &FileRecord)> {
		self.files.iter()
	}

	pub fn total_size(&self) -> u64 {
		self.files.values().map(|f| f.size).sum()
	}
}

#[derive(Debug, Default)]
struct ScanStats {
	dirs: usize,
	excluded: usize,
	skipped: usize,
}

/// Scan `root`, keeping the files `rules` lets through
///
/// A missing root is an empty result, not an error. A root that exists but
/// is not a listable directory is `ScanFailed`. Problems below the root
/// (unreadable subdirectories, dangling symlinks, failed stats) skip the
/// affected entry with a warning.
pub fn scan(root: &Path, rules: &FilterRuleSet) -> Result<ScanResult, SyncError> {
	let mut result = ScanResult::new(root);

	match fs::metadata(root) {
		Err(e) if e.kind() == io::ErrorKind::NotFound => {
			debug!("Scan root {} does not exist, treating as empty", root.display());
			return Ok(result);
		}
		Err(e) => return Err(SyncError::ScanFailed { root: root.to_path_buf(), source: e }),
		Ok(meta) if !meta.is_dir() => {
			return Err(SyncError::ScanFailed {
				root: root.to_path_buf(),
				source: io::Error::new(io::ErrorKind::Other, "not a directory"),
			});
		}
		Ok(_) => {}
	}

	let top = fs::read_dir(root)
		.map_err(|e| SyncError::ScanFailed { root: root.to_path_buf(), source: e })?;

	let mut stats = ScanStats::default();
	let mut pending = vec![top];

	while let Some(entries) = pending.pop() {
		stats.dirs += 1;
		for entry_result in entries {
			let entry = match entry_result {
				Ok(e) => e,
				Err(e) => {
					warn!("Error reading directory entry under {}: {}", root.display(), e);
					stats.skipped += 1;
					continue;
				}
			};

			let path = entry.path();
			let file_type = match entry.file_type() {
				Ok(t) => t,
				Err(e) => {
					warn!("Cannot stat {}: {}", path.display(), e);
					stats.skipped += 1;
					continue;
				}
			};

			if file_type.is_dir() {
				match fs::read_dir(&path) {
					Ok(sub) => pending.push(sub),
					Err(e) => {
						warn!("Cannot read directory {}: {}", path.display(), e);
						stats.skipped += 1;
					}
				}
				continue;
			}

			// Follow symlinks to files; never descend into linked directories
			let meta = match fs::metadata(&path) {
				Ok(m) => m,
				Err(e) => {
					warn!("Cannot stat {}: {}", path.display(), e);
					stats.skipped += 1;
					continue;
				}
			};
			if !meta.is_file() {
				debug!("Skipping non-regular entry {}", path.display());
				stats.skipped += 1;
				continue;
			}

			let key = match relative_key(root, &path) {
				Some(k) => k,
				None => {
					warn!("Skipping {}: path is not valid UTF-8", path.display());
					stats.skipped += 1;
					continue;
				}
			};

			if !rules.matches(&key) {
				stats.excluded += 1;
				continue;
			}

			let mtime = match meta.modified() {
				Ok(t) => system_time_to_secs(t),
				Err(e) => {
					warn!("Cannot read modification time of {}: {}", path.display(), e);
					stats.skipped += 1;
					continue;
				}
			};

			result.insert(FileRecord::new(key, path, meta.len(), mtime));
		}
	}

	info!(
		"Scanned {}: {} files, {} directories, {} excluded, {} skipped",
		root.display(),
		result.len(),
		stats.dirs,
		stats.excluded,
		stats.skipped
	);

	Ok(result)
}

/// File count and total size of a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryInfo {
	pub total_files: usize,
	pub total_size: u64,
}

/// Totals for every file under `root`, ignoring filters
///
/// Returns `None` if the root does not exist or cannot be listed.
pub fn directory_info(root: &Path) -> Option<DirectoryInfo> {
	if !root.exists() {
		return None;
	}
	match scan(root, &FilterRuleSet::allow_all()) {
		Ok(result) => {
			Some(DirectoryInfo { total_files: result.len(), total_size: result.total_size() })
		}
		Err(e) => {
			warn!("{}", e);
			None
		}
	}
}


// vim: ts=4
