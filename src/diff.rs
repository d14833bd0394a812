//! Diff engine
//!
//! Compares two scans and produces the copy/update actions that reconcile
//! them. `needs_update` decides by mtime first (one-second tolerance), then
//! size, and only then content hash, so hashing happens only for files whose
//! metadata cannot tell them apart.
//!
//! In two-way mode the reverse pass is evaluated independently of the
//! forward pass. When two copies differ only in content and their mtimes are
//! within tolerance, both passes fire and the same path gets one action in
//! each direction. `diff` reports that as-is; `resolve_conflicts` can reduce
//! it according to a `ConflictPolicy`.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use crate::config::{ConflictPolicy, SyncMode};
use crate::error::SyncError;
use crate::logging::*;
use crate::scanner::{FileRecord, ScanResult};
use crate::util::{compare_mtimes, differs_in_size};
use crate::validation::join_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionKind {
	/// Destination does not exist yet
	Copy,
	/// Destination exists and is overwritten
	Update,
}

impl fmt::Display for ActionKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ActionKind::Copy => write!(f, "COPY"),
			ActionKind::Update => write!(f, "UPDATE"),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
	SourceToTarget,
	TargetToSource,
}

impl Direction {
	pub fn arrow(&self) -> &'static str {
		match self {
			Direction::SourceToTarget => "→",
			Direction::TargetToSource => "←",
		}
	}
}

impl fmt::Display for Direction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Direction::SourceToTarget => write!(f, "source → target"),
			Direction::TargetToSource => write!(f, "target → source"),
		}
	}
}

/// One file transfer to perform
///
/// `source` is the file read from and `destination` the file written,
/// regardless of direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncAction {
	pub kind: ActionKind,
	pub direction: Direction,
	pub rel_path: String,
	pub source: PathBuf,
	pub destination: PathBuf,
}

impl fmt::Display for SyncAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {} {}", self.kind, self.direction.arrow(), self.rel_path)
	}
}

/// Should `a` overwrite `b`?
///
/// Hashes are computed (and cached on the records) only when the mtimes are
/// within tolerance and the sizes agree.
pub fn needs_update(a: &FileRecord, b: &FileRecord) -> Result<bool, SyncError> {
	match compare_mtimes(a.mtime, b.mtime) {
		Ordering::Greater => return Ok(true),
		Ordering::Less => return Ok(false),
		Ordering::Equal => {}
	}

	if differs_in_size(a.size, b.size) {
		return Ok(true);
	}

	let hash_a = a
		.content_hash()
		.map_err(|e| SyncError::HashFailed { path: a.abs_path.clone(), source: e })?;
	let hash_b = b
		.content_hash()
		.map_err(|e| SyncError::HashFailed { path: b.abs_path.clone(), source: e })?;

	Ok(hash_a != hash_b)
}

fn action_between(
	kind: ActionKind,
	direction: Direction,
	rel_path: &str,
	from: &FileRecord,
	to_root: &ScanResult,
	to: Option<&FileRecord>,
) -> SyncAction {
	let destination = match to {
		Some(record) => record.abs_path.clone(),
		None => join_key(to_root.root(), rel_path),
	};
	SyncAction {
		kind,
		direction,
		rel_path: rel_path.to_string(),
		source: from.abs_path.clone(),
		destination,
	}
}

/// Compute the actions that bring `target` (and in two-way mode `source`)
/// up to date
///
/// Output order is the source pass followed by the target pass, each in
/// relative-path order.
pub fn diff(
	source: &ScanResult,
	target: &ScanResult,
	mode: SyncMode,
) -> Result<Vec<SyncAction>, SyncError> {
	let mut actions = Vec::new();

	for (rel_path, src) in source.iter() {
		match target.get(rel_path) {
			None => actions.push(action_between(
				ActionKind::Copy,
				Direction::SourceToTarget,
				rel_path,
				src,
				target,
				None,
			)),
			Some(dst) => {
				if needs_update(src, dst)? {
					actions.push(action_between(
						ActionKind::Update,
						Direction::SourceToTarget,
						rel_path,
						src,
						target,
						Some(dst),
					));
				}
			}
		}
	}

	if mode == SyncMode::TwoWay {
		for (rel_path, dst) in target.iter() {
			match source.get(rel_path) {
				None => actions.push(action_between(
					ActionKind::Copy,
					Direction::TargetToSource,
					rel_path,
					dst,
					source,
					None,
				)),
				Some(src) => {
					if needs_update(dst, src)? {
						actions.push(action_between(
							ActionKind::Update,
							Direction::TargetToSource,
							rel_path,
							dst,
							source,
							Some(src),
						));
					}
				}
			}
		}
	}

	debug!("Diff ({}) produced {} actions", mode, actions.len());
	Ok(actions)
}

/// Relative paths that carry actions in both directions
pub fn find_conflicts(actions: &[SyncAction]) -> BTreeSet<String> {
	let forward: BTreeSet<&str> = actions
		.iter()
		.filter(|a| a.direction == Direction::SourceToTarget)
		.map(|a| a.rel_path.as_str())
		.collect();

	actions
		.iter()
		.filter(|a| {
			a.direction == Direction::TargetToSource && forward.contains(a.rel_path.as_str())
		})
		.map(|a| a.rel_path.clone())
		.collect()
}

/// Reduce opposite-direction action pairs according to `policy`
///
/// Actions for non-conflicting paths are kept in their original order.
pub fn resolve_conflicts(actions: Vec<SyncAction>, policy: ConflictPolicy) -> Vec<SyncAction> {
	if policy == ConflictPolicy::KeepBoth {
		return actions;
	}

	let conflicts = find_conflicts(&actions);
	if conflicts.is_empty() {
		return actions;
	}

	for path in &conflicts {
		warn!("Conflicting changes for {}, resolving with {}", path, policy);
	}

	actions
		.into_iter()
		.filter(|a| {
			if !conflicts.contains(&a.rel_path) {
				return true;
			}
			match policy {
				ConflictPolicy::KeepBoth => true,
				ConflictPolicy::PreferSource => a.direction == Direction::SourceToTarget,
				ConflictPolicy::PreferTarget => a.direction == Direction::TargetToSource,
				ConflictPolicy::Skip => false,
			}
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;
	use std::path::Path;
	use tempfile::TempDir;

	fn record(root: &Path, rel: &str, content: &[u8], mtime: f64) -> FileRecord {
		let path = root.join(rel);
		fs::write(&path, content).unwrap();
		FileRecord::new(rel, path, content.len() as u64, mtime)
	}

	fn pair() -> (TempDir, TempDir) {
		(TempDir::new().unwrap(), TempDir::new().unwrap())
	}

	#[test]
	fn test_needs_update_mtime_decides() {
		let (a, b) = pair();
		let newer = record(a.path(), "f", b"same", 1000.0);
		let older = record(b.path(), "f", b"same", 998.5);
		assert!(needs_update(&newer, &older).unwrap());
		assert!(!needs_update(&older, &newer).unwrap());
		assert!(newer.cached_hash().is_none());
	}

	#[test]
	fn test_needs_update_size_within_tolerance() {
		let (a, b) = pair();
		let x = record(a.path(), "f", b"longer", 1000.0);
		let y = record(b.path(), "f", b"short", 1000.5);
		assert!(needs_update(&x, &y).unwrap());
		assert!(needs_update(&y, &x).unwrap());
		assert!(x.cached_hash().is_none());
	}

	#[test]
	fn test_needs_update_hash_fallback() {
		let (a, b) = pair();
		let x = record(a.path(), "f", b"aaaa", 1000.0);
		let y = record(b.path(), "f", b"aaaa", 1000.9);
		assert!(!needs_update(&x, &y).unwrap());
		assert!(x.cached_hash().is_some());

		let z = record(b.path(), "g", b"bbbb", 1000.0);
		assert!(needs_update(&x, &z).unwrap());
	}

	#[test]
	fn test_needs_update_hash_failure() {
		let (a, b) = pair();
		let x = record(a.path(), "f", b"aaaa", 1000.0);
		let ghost = FileRecord::new("f", b.path().join("gone"), 4, 1000.0);
		let err = needs_update(&x, &ghost).unwrap_err();
		assert!(matches!(err, SyncError::HashFailed { .. }));
	}

	#[test]
	fn test_diff_one_way() {
		let (a, b) = pair();
		let mut src = ScanResult::new(a.path());
		let mut dst = ScanResult::new(b.path());
		src.insert(record(a.path(), "new.txt", b"n", 1000.0));
		src.insert(record(a.path(), "changed.txt", b"v2", 2000.0));
		dst.insert(record(b.path(), "changed.txt", b"v1", 1000.0));
		dst.insert(record(b.path(), "only-target.txt", b"t", 1000.0));

		let actions = diff(&src, &dst, SyncMode::OneWay).unwrap();
		assert_eq!(actions.len(), 2);

		let copy = actions.iter().find(|a| a.rel_path == "new.txt").unwrap();
		assert_eq!(copy.kind, ActionKind::Copy);
		assert_eq!(copy.direction, Direction::SourceToTarget);
		assert_eq!(copy.destination, b.path().join("new.txt"));

		let update = actions.iter().find(|a| a.rel_path == "changed.txt").unwrap();
		assert_eq!(update.kind, ActionKind::Update);
		assert_eq!(update.source, a.path().join("changed.txt"));
	}

	#[test]
	fn test_diff_two_way_newer_wins_once() {
		let (a, b) = pair();
		let mut src = ScanResult::new(a.path());
		let mut dst = ScanResult::new(b.path());
		src.insert(record(a.path(), "doc.txt", b"new", 5000.0));
		dst.insert(record(b.path(), "doc.txt", b"old", 1000.0));
		dst.insert(record(b.path(), "back.txt", b"b", 1000.0));

		let actions = diff(&src, &dst, SyncMode::TwoWay).unwrap();
		let keys: BTreeSet<(String, Direction)> =
			actions.iter().map(|a| (a.rel_path.clone(), a.direction)).collect();
		let expected: BTreeSet<(String, Direction)> = vec![
			("doc.txt".to_string(), Direction::SourceToTarget),
			("back.txt".to_string(), Direction::TargetToSource),
		]
		.into_iter()
		.collect();
		assert_eq!(keys, expected);
	}

	#[test]
	fn test_identical_files_produce_nothing() {
		let (a, b) = pair();
		let mut src = ScanResult::new(a.path());
		let mut dst = ScanResult::new(b.path());
		src.insert(record(a.path(), "same", b"identical", 1000.2));
		dst.insert(record(b.path(), "same", b"identical", 1000.0));

		assert!(diff(&src, &dst, SyncMode::OneWay).unwrap().is_empty());
		assert!(diff(&src, &dst, SyncMode::TwoWay).unwrap().is_empty());
	}

	#[test]
	fn test_two_way_hash_only_difference_yields_both_directions() {
		let (a, b) = pair();
		let mut src = ScanResult::new(a.path());
		let mut dst = ScanResult::new(b.path());
		src.insert(record(a.path(), "clash", b"left", 1000.0));
		dst.insert(record(b.path(), "clash", b"rght", 1000.4));

		let actions = diff(&src, &dst, SyncMode::TwoWay).unwrap();
		assert_eq!(actions.len(), 2);
		assert!(actions.iter().all(|a| a.rel_path == "clash" && a.kind == ActionKind::Update));
		assert!(actions.iter().any(|a| a.direction == Direction::SourceToTarget));
		assert!(actions.iter().any(|a| a.direction == Direction::TargetToSource));

		let conflicts = find_conflicts(&actions);
		assert_eq!(conflicts.into_iter().collect::<Vec<_>>(), vec!["clash".to_string()]);
	}

	fn conflicting_actions() -> Vec<SyncAction> {
		let make = |rel: &str, direction| SyncAction {
			kind: ActionKind::Update,
			direction,
			rel_path: rel.to_string(),
			source: PathBuf::from("/s").join(rel),
			destination: PathBuf::from("/t").join(rel),
		};
		vec![
			make("a", Direction::SourceToTarget),
			make("clash", Direction::SourceToTarget),
			make("clash", Direction::TargetToSource),
			make("z", Direction::TargetToSource),
		]
	}

	#[test]
	fn test_resolve_conflicts_policies() {
		let keep = resolve_conflicts(conflicting_actions(), ConflictPolicy::KeepBoth);
		assert_eq!(keep.len(), 4);

		let prefer_source = resolve_conflicts(conflicting_actions(), ConflictPolicy::PreferSource);
		assert_eq!(prefer_source.len(), 3);
		let clash: Vec<_> = prefer_source.iter().filter(|a| a.rel_path == "clash").collect();
		assert_eq!(clash.len(), 1);
		assert_eq!(clash[0].direction, Direction::SourceToTarget);

		let prefer_target = resolve_conflicts(conflicting_actions(), ConflictPolicy::PreferTarget);
		let clash: Vec<_> = prefer_target.iter().filter(|a| a.rel_path == "clash").collect();
		assert_eq!(clash.len(), 1);
		assert_eq!(clash[0].direction, Direction::TargetToSource);

		let skipped = resolve_conflicts(conflicting_actions(), ConflictPolicy::Skip);
		let paths: Vec<&str> = skipped.iter().map(|a| a.rel_path.as_str()).collect();
		assert_eq!(paths, vec!["a", "z"]);
	}

	#[test]
	fn test_action_display() {
		let action = &conflicting_actions()[2];
		assert_eq!(action.to_string(), "UPDATE ← clash");
	}
}

// vim: ts=4
