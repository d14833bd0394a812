//! Action executor
//!
//! Applies sync actions one at a time: create the destination directory,
//! copy, carry over timestamps, then verify size and content hash. Any
//! failing step (including a verification mismatch) is retried, up to
//! `MAX_ATTEMPTS` attempts per action. An action that exhausts its attempts
//! is recorded as failed and the batch moves on.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use filetime::FileTime;

use crate::callbacks::{LogSink, ProgressSink};
use crate::cancel::CancelFlag;
use crate::config::{MAX_ATTEMPTS, RETRY_DELAY};
use crate::diff::SyncAction;
use crate::error::SyncError;
use crate::hashing::{hash_file, ContentHash};
use crate::logging::*;

/// Filesystem operations used by the executor
///
/// Every method defaults to the real filesystem. Tests override single
/// methods to inject failures.
pub trait FileOps: Send + Sync {
	fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
		fs::create_dir_all(dir)
	}

	fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
		fs::copy(from, to)
	}

	/// Copy access and modification times from `from` onto `to`
	fn preserve_times(&self, from: &Path, to: &Path) -> io::Result<()> {
		let meta = fs::metadata(from)?;
		let atime = FileTime::from_last_access_time(&meta);
		let mtime = FileTime::from_last_modification_time(&meta);
		filetime::set_file_times(to, atime, mtime)
	}

	fn file_len(&self, path: &Path) -> io::Result<u64> {
		Ok(fs::metadata(path)?.len())
	}

	fn hash(&self, path: &Path) -> io::Result<ContentHash> {
		hash_file(path)
	}
}

/// The real local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileOps for LocalFs {}

/// Result of running a batch of actions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncOutcome {
	/// Actions in the batch
	pub total: usize,
	/// Actions that were started (less than `total` after a stop)
	pub attempted: usize,
	pub succeeded: usize,
	/// Relative paths of actions that exhausted their attempts
	pub failures: Vec<String>,
	pub cancelled: bool,
	pub summary: String,
}

impl SyncOutcome {
	/// Outcome for a run where the two trees already agree
	pub fn nothing_to_do() -> Self {
		SyncOutcome {
			summary: "Sync complete: no files need updating".to_string(),
			..Default::default()
		}
	}

	pub fn is_success(&self) -> bool {
		!self.cancelled && self.failures.is_empty()
	}

	fn describe(&self) -> String {
		let mut summary = if self.cancelled {
			format!(
				"Sync stopped: {}/{} files processed successfully, {} not started",
				self.succeeded,
				self.total,
				self.total - self.attempted
			)
		} else {
			format!("Sync complete: {}/{} files processed successfully", self.succeeded, self.total)
		};
		if !self.failures.is_empty() {
			summary.push_str(&format!("; failed: {}", self.failures.join(", ")));
		}
		summary
	}
}

/// Sequential executor with bounded retries
pub struct Executor {
	ops: Arc<dyn FileOps>,
	retry_delay: Duration,
}

impl Default for Executor {
	fn default() -> Self {
		Self::new()
	}
}

impl Executor {
	pub fn new() -> Self {
		Self::with_ops(Arc::new(LocalFs))
	}

	pub fn with_ops(ops: Arc<dyn FileOps>) -> Self {
		Executor { ops, retry_delay: RETRY_DELAY }
	}

	/// Override the pause between attempts
	pub fn with_retry_delay(mut self, delay: Duration) -> Self {
		self.retry_delay = delay;
		self
	}

	fn attempt(&self, action: &SyncAction) -> Result<(), SyncError> {
		if let Some(parent) = action.destination.parent() {
			self.ops.create_dir_all(parent)?;
		}

		self.ops.copy(&action.source, &action.destination)?;

		if let Err(e) = self.ops.preserve_times(&action.source, &action.destination) {
			warn!("Could not preserve timestamps on {}: {}", action.destination.display(), e);
		}

		let expected = self.ops.file_len(&action.source)?;
		let actual = self.ops.file_len(&action.destination)?;
		if expected != actual {
			return Err(SyncError::SizeMismatch {
				path: action.destination.clone(),
				expected,
				actual,
			});
		}

		let source_hash = self
			.ops
			.hash(&action.source)
			.map_err(|e| SyncError::HashFailed { path: action.source.clone(), source: e })?;
		let dest_hash = self
			.ops
			.hash(&action.destination)
			.map_err(|e| SyncError::HashFailed { path: action.destination.clone(), source: e })?;
		if source_hash != dest_hash {
			return Err(SyncError::HashMismatch {
				path: action.destination.clone(),
				expected: source_hash.to_hex(),
				actual: dest_hash.to_hex(),
			});
		}

		Ok(())
	}

	/// Apply one action, retrying on failure
	///
	/// Returns whether the action eventually succeeded. Every retry and the
	/// final result are reported to `log`.
	pub fn execute(&self, action: &SyncAction, log: &dyn LogSink) -> bool {
		for attempt in 1..=MAX_ATTEMPTS {
			match self.attempt(action) {
				Ok(()) => {
					log.on_log(&action.to_string());
					return true;
				}
				Err(e) if attempt < MAX_ATTEMPTS => {
					warn!("Attempt {} for {} failed: {}", attempt, action.rel_path, e);
					log.on_log(&format!(
						"Retry {}/{}: {} - {}",
						attempt, MAX_ATTEMPTS, action.rel_path, e
					));
					if !self.retry_delay.is_zero() {
						thread::sleep(self.retry_delay);
					}
				}
				Err(e) => {
					error!("Giving up on {} after {} attempts: {}", action.rel_path, MAX_ATTEMPTS, e);
					log.on_log(&format!("Failed: {} - {}", action.rel_path, e));
				}
			}
		}
		false
	}

	/// Run `actions` in order until done or `cancel` is set
	///
	/// The flag is checked before each action. Progress is pushed after every
	/// action, failed ones included.
	pub fn run(
		&self,
		actions: &[SyncAction],
		progress: &dyn ProgressSink,
		log: &dyn LogSink,
		cancel: &CancelFlag,
	) -> SyncOutcome {
		let total = actions.len();
		let mut outcome = SyncOutcome { total, ..Default::default() };

		for action in actions {
			if cancel.is_cancelled() {
				info!("Stop requested, {} actions left", total - outcome.attempted);
				log.on_log("Sync stopped");
				outcome.cancelled = true;
				break;
			}

			outcome.attempted += 1;
			if self.execute(action, log) {
				outcome.succeeded += 1;
			} else {
				outcome.failures.push(action.rel_path.clone());
			}

			progress.on_progress(outcome.attempted as f64 / total as f64 * 100.0);
		}

		outcome.summary = outcome.describe();
		log.on_log(&outcome.summary);
		outcome
	}
}


// vim: ts=4
