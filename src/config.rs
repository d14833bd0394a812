//! Sync configuration
//!
//! `SyncProfile` is the persisted part of a configuration (what the profile
//! store reads and writes). `SyncConfig` adds the per-invocation pieces: the
//! conflict policy and the progress/log sinks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::callbacks::{LogSink, NoLog, NoProgress, ProgressSink};
use crate::validation::{validate_roots, ValidationError, Validator};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Attempts per action before it is recorded as failed
pub const MAX_ATTEMPTS: u32 = 5;

/// Pause between attempts
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Read size for streamed hashing
pub const HASH_CHUNK_SIZE: usize = 8192;

// ============================================================================
// MODES AND POLICIES
// ============================================================================

/// Direction(s) in which differences are propagated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SyncMode {
	/// Source to target only
	#[default]
	#[serde(rename = "one-way", alias = "oneway", alias = "单向同步")]
	OneWay,

	/// Both directions, each file evaluated independently per direction
	#[serde(rename = "two-way", alias = "twoway", alias = "bidirectional", alias = "双向同步")]
	TwoWay,
}

impl FromStr for SyncMode {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"one-way" | "oneway" | "单向同步" => Ok(Self::OneWay),
			"two-way" | "twoway" | "bidirectional" | "双向同步" => Ok(Self::TwoWay),
			_ => Err(format!("Unknown sync mode: {}. Valid options: one-way, two-way", s)),
		}
	}
}

impl fmt::Display for SyncMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::OneWay => write!(f, "one-way"),
			Self::TwoWay => write!(f, "two-way"),
		}
	}
}

/// What to do when two-way diffing yields opposite actions for one path
///
/// This only happens when both copies differ in content but their mtimes
/// are within the one-second tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
	/// Keep both actions; whichever runs last determines the final content
	#[default]
	KeepBoth,

	/// Keep the source-to-target action
	PreferSource,

	/// Keep the target-to-source action
	PreferTarget,

	/// Drop both actions and leave the path alone
	Skip,
}

impl FromStr for ConflictPolicy {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"keep-both" | "both" => Ok(Self::KeepBoth),
			"prefer-source" | "source" => Ok(Self::PreferSource),
			"prefer-target" | "target" => Ok(Self::PreferTarget),
			"skip" => Ok(Self::Skip),
			_ => Err(format!(
				"Unknown conflict policy: {}. Valid options: keep-both, prefer-source, prefer-target, skip",
				s
			)),
		}
	}
}

impl fmt::Display for ConflictPolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::KeepBoth => write!(f, "keep-both"),
			Self::PreferSource => write!(f, "prefer-source"),
			Self::PreferTarget => write!(f, "prefer-target"),
			Self::Skip => write!(f, "skip"),
		}
	}
}

// ============================================================================
// PERSISTED PROFILE
// ============================================================================

/// The stored part of a sync configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SyncProfile {
	pub source_path: PathBuf,
	pub target_path: PathBuf,
	pub sync_mode: SyncMode,
	pub filter_rules: String,
}

impl Validator for SyncProfile {
	fn validate(&self) -> Result<(), ValidationError> {
		validate_roots(&self.source_path, &self.target_path)
	}
}

// ============================================================================
// PER-INVOCATION CONFIG
// ============================================================================

/// Everything one `sync` or `preview` call needs
pub struct SyncConfig {
	pub source_path: PathBuf,
	pub target_path: PathBuf,
	pub sync_mode: SyncMode,
	pub filter_rules: String,
	pub conflict_policy: ConflictPolicy,
	pub progress: Box<dyn ProgressSink>,
	pub log: Box<dyn LogSink>,
}

impl SyncConfig {
	/// One-way, unfiltered config with silent sinks
	pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
		SyncConfig {
			source_path: source.into(),
			target_path: target.into(),
			sync_mode: SyncMode::default(),
			filter_rules: String::new(),
			conflict_policy: ConflictPolicy::default(),
			progress: Box::new(NoProgress),
			log: Box::new(NoLog),
		}
	}

	pub fn from_profile(profile: &SyncProfile) -> Self {
		Self::new(profile.source_path.clone(), profile.target_path.clone())
			.mode(profile.sync_mode)
			.filter_rules(profile.filter_rules.clone())
	}

	pub fn mode(mut self, mode: SyncMode) -> Self {
		self.sync_mode = mode;
		self
	}

	pub fn filter_rules(mut self, rules: impl Into<String>) -> Self {
		self.filter_rules = rules.into();
		self
	}

	pub fn conflict_policy(mut self, policy: ConflictPolicy) -> Self {
		self.conflict_policy = policy;
		self
	}

	pub fn on_progress<P: ProgressSink + 'static>(mut self, sink: P) -> Self {
		self.progress = Box::new(sink);
		self
	}

	pub fn on_log<L: LogSink + 'static>(mut self, sink: L) -> Self {
		self.log = Box::new(sink);
		self
	}

	pub fn source(&self) -> &Path {
		&self.source_path
	}

	pub fn target(&self) -> &Path {
		&self.target_path
	}

	/// The persistable subset of this config
	pub fn profile(&self) -> SyncProfile {
		SyncProfile {
			source_path: self.source_path.clone(),
			target_path: self.target_path.clone(),
			sync_mode: self.sync_mode,
			filter_rules: self.filter_rules.clone(),
		}
	}
}

impl fmt::Debug for SyncConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SyncConfig")
			.field("source_path", &self.source_path)
			.field("target_path", &self.target_path)
			.field("sync_mode", &self.sync_mode)
			.field("filter_rules", &self.filter_rules)
			.field("conflict_policy", &self.conflict_policy)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_sync_mode_parsing() {
		assert_eq!("one-way".parse::<SyncMode>(), Ok(SyncMode::OneWay));
		assert_eq!("Two-Way".parse::<SyncMode>(), Ok(SyncMode::TwoWay));
		assert_eq!("双向同步".parse::<SyncMode>(), Ok(SyncMode::TwoWay));
		assert!("sideways".parse::<SyncMode>().is_err());
	}

	#[test]
	fn test_sync_mode_serde_labels() {
		assert_eq!(serde_json::to_string(&SyncMode::TwoWay).unwrap(), "\"two-way\"");
		let legacy: SyncMode = serde_json::from_str("\"单向同步\"").unwrap();
		assert_eq!(legacy, SyncMode::OneWay);
	}

	#[test]
	fn test_conflict_policy_parsing() {
		assert_eq!("prefer-source".parse::<ConflictPolicy>(), Ok(ConflictPolicy::PreferSource));
		assert_eq!("skip".parse::<ConflictPolicy>(), Ok(ConflictPolicy::Skip));
		assert_eq!(ConflictPolicy::default(), ConflictPolicy::KeepBoth);
	}

	#[test]
	fn test_profile_missing_fields_default() {
		let profile: SyncProfile = serde_json::from_str(r#"{"source_path": "/a"}"#).unwrap();
		assert_eq!(profile.source_path, PathBuf::from("/a"));
		assert_eq!(profile.sync_mode, SyncMode::OneWay);
		assert!(profile.filter_rules.is_empty());
	}

	#[test]
	fn test_config_builder_and_profile() {
		let config = SyncConfig::new("/src", "/dst")
			.mode(SyncMode::TwoWay)
			.filter_rules("*.txt")
			.conflict_policy(ConflictPolicy::Skip);
		let profile = config.profile();
		assert_eq!(profile.sync_mode, SyncMode::TwoWay);
		assert_eq!(profile.filter_rules, "*.txt");

		let back = SyncConfig::from_profile(&profile);
		assert_eq!(back.source(), Path::new("/src"));
		assert_eq!(back.conflict_policy, ConflictPolicy::KeepBoth);
	}
}

// vim: ts=4
