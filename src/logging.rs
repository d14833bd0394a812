//! Logging prelude module for convenient access to tracing macros.
//!
//! Library code only emits events; installing a subscriber is left to the
//! binary (or to whatever host embeds the library).
//!
//! # Usage
//!
//! ```ignore
//! use crate::logging::*;
//!
//! info!("Scanned {} files", count);
//! warn!("Skipping unreadable entry");
//! ```

pub use tracing::{debug, error, info, warn};

/// Initialize the tracing subscriber with environment filter support.
///
/// By default, logs at INFO level and above are displayed. Control the log level
/// with the `RUST_LOG` environment variable:
///
/// ```bash
/// RUST_LOG=debug dirsync sync ./a ./b
/// RUST_LOG=dirsync::executor=trace dirsync sync ./a ./b
/// ```
pub fn init_tracing() {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
		)
		.with_target(false)
		.with_writer(std::io::stderr)
		.init();
}
