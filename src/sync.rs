//! Sync orchestration
//!
//! `Synchronizer` ties the pipeline together: validate the roots, parse the
//! filter, scan both trees, diff, apply the conflict policy, then either
//! execute (`sync`) or report (`preview`).
//!
//! ```rust,ignore
//! use dirsync::{SyncConfig, SyncMode, Synchronizer};
//!
//! let sync = Synchronizer::new();
//! let stop = sync.cancel_handle();
//! let config = SyncConfig::new("./photos", "/mnt/backup/photos")
//!     .mode(SyncMode::TwoWay)
//!     .filter_rules("*.jpg;*.png;!*.tmp")
//!     .on_log(|line: &str| println!("{}", line));
//! let outcome = sync.sync(&config)?;
//! println!("{}", outcome.summary);
//! ```

use crate::cancel::CancelFlag;
use crate::config::SyncConfig;
use crate::diff::{diff, resolve_conflicts, ActionKind, Direction, SyncAction};
use crate::error::SyncError;
use crate::executor::{Executor, SyncOutcome};
use crate::filter::FilterRuleSet;
use crate::logging::*;
use crate::scanner::scan;
use crate::validation::Validator;

/// Aggregate counts for a preview
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreviewStats {
	pub total: usize,
	pub copy: usize,
	pub update: usize,
	pub source_to_target: usize,
	pub target_to_source: usize,
}

impl PreviewStats {
	pub fn from_actions(actions: &[SyncAction]) -> Self {
		let mut stats = PreviewStats { total: actions.len(), ..Default::default() };
		for action in actions {
			match action.kind {
				ActionKind::Copy => stats.copy += 1,
				ActionKind::Update => stats.update += 1,
			}
			match action.direction {
				Direction::SourceToTarget => stats.source_to_target += 1,
				Direction::TargetToSource => stats.target_to_source += 1,
			}
		}
		stats
	}
}

/// What a sync would do, without doing it
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
	pub actions: Vec<SyncAction>,
	pub stats: PreviewStats,
}

/// Runs syncs and previews; owns the stop flag
pub struct Synchronizer {
	cancel: CancelFlag,
	executor: Executor,
}

impl Default for Synchronizer {
	fn default() -> Self {
		Self::new()
	}
}

impl Synchronizer {
	pub fn new() -> Self {
		Self::with_executor(Executor::new())
	}

	pub fn with_executor(executor: Executor) -> Self {
		Synchronizer { cancel: CancelFlag::new(), executor }
	}

	/// Handle that can stop a running `sync` from another thread
	pub fn cancel_handle(&self) -> CancelFlag {
		self.cancel.clone()
	}

	/// Request a stop; takes effect before the next action
	pub fn stop(&self) {
		self.cancel.cancel();
	}

	fn plan(&self, config: &SyncConfig) -> Result<Vec<SyncAction>, SyncError> {
		config.profile().validate()?;
		let rules = FilterRuleSet::parse(&config.filter_rules)?;

		config.log.on_log("Scanning files...");
		let source = scan(config.source(), &rules)?;
		let target = scan(config.target(), &rules)?;
		config.log.on_log(&format!("Source files: {}", source.len()));
		config.log.on_log(&format!("Target files: {}", target.len()));

		let actions = diff(&source, &target, config.sync_mode)?;
		Ok(resolve_conflicts(actions, config.conflict_policy))
	}

	/// Scan, diff and execute
	///
	/// Structural failures (bad roots, bad filter, scan or hash failures)
	/// abort with an error. Per-file failures are reported in the outcome.
	pub fn sync(&self, config: &SyncConfig) -> Result<SyncOutcome, SyncError> {
		self.cancel.reset();
		self.run(config)
	}

	/// Like `sync`, but a stop requested before the call is honoured
	///
	/// For callers that arm the stop handle themselves, e.g. from a signal
	/// handler installed before the run starts.
	pub fn run(&self, config: &SyncConfig) -> Result<SyncOutcome, SyncError> {
		info!(
			"Starting {} sync: {} -> {}",
			config.sync_mode,
			config.source().display(),
			config.target().display()
		);

		let actions = match self.plan(config) {
			Ok(actions) => actions,
			Err(e) => {
				error!("Sync failed: {}", e);
				config.log.on_log(&format!("Error during sync: {}", e));
				return Err(e);
			}
		};

		if actions.is_empty() {
			config.log.on_log("No files need syncing");
			return Ok(SyncOutcome::nothing_to_do());
		}

		config.log.on_log(&format!("Files to sync: {}", actions.len()));
		Ok(self.executor.run(&actions, &*config.progress, &*config.log, &self.cancel))
	}

	/// Scan and diff only; the filesystem is not touched
	pub fn preview(&self, config: &SyncConfig) -> Result<Preview, SyncError> {
		let actions = self.plan(config)?;
		let stats = PreviewStats::from_actions(&actions);
		debug!("Preview: {:?}", stats);
		Ok(Preview { actions, stats })
	}
}

/// One-shot sync with a fresh `Synchronizer`
pub fn sync(config: &SyncConfig) -> Result<SyncOutcome, SyncError> {
	Synchronizer::new().sync(config)
}

/// One-shot preview with a fresh `Synchronizer`
pub fn preview(config: &SyncConfig) -> Result<Preview, SyncError> {
	Synchronizer::new().preview(config)
}


// vim: ts=4
