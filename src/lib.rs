//! # dirsync - Two-Directory File Synchronizer
//!
//! dirsync reconciles a source and a target directory tree, one-way or in
//! both directions. Files are compared by modification time (one-second
//! tolerance), then size, then content hash; differing files are copied
//! whole, verified, and retried on failure.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dirsync::{sync, SyncConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let outcome = sync(&SyncConfig::new("./docs", "/mnt/backup/docs"))?;
//!     println!("{}", outcome.summary);
//!     Ok(())
//! }
//! ```
//!
//! ## Previewing a Two-Way Sync
//!
//! ```rust,ignore
//! use dirsync::{preview, ConflictPolicy, SyncConfig, SyncMode};
//!
//! let config = SyncConfig::new("./laptop", "./desktop")
//!     .mode(SyncMode::TwoWay)
//!     .filter_rules("*.md;!drafts*")
//!     .conflict_policy(ConflictPolicy::PreferSource);
//! let plan = preview(&config)?;
//! for action in &plan.actions {
//!     println!("{}", action);
//! }
//! ```

pub mod callbacks;
pub mod cancel;
pub mod config;
pub mod diff;
pub mod error;
pub mod executor;
pub mod filter;
pub mod hashing;
pub mod logging;
pub mod profiles;
pub mod progress;
pub mod scanner;
pub mod sync;
pub mod util;
pub mod validation;

// Re-export commonly used types and functions
pub use callbacks::{LogSink, ProgressSink};
pub use cancel::CancelFlag;
pub use config::{ConflictPolicy, SyncConfig, SyncMode, SyncProfile};
pub use diff::{ActionKind, Direction, SyncAction};
pub use error::{FilterError, ProfileError, SyncError};
pub use executor::{Executor, FileOps, SyncOutcome};
pub use filter::FilterRuleSet;
pub use profiles::ProfileStore;
pub use scanner::{directory_info, scan, DirectoryInfo, FileRecord, ScanResult};
pub use sync::{preview, sync, Preview, PreviewStats, Synchronizer};

// vim: ts=4
