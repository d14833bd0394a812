//! Terminal progress bar for CLI syncs

pub mod constants;

use std::io::Write;
use std::sync::Mutex;
use std::time::Instant;

use crate::callbacks::ProgressSink;

/// Progress display constants
pub use constants::*;

/// Format the bar line for `percent` (clamped to 0-100)
pub fn render_bar(percent: f64) -> String {
	let ratio = (percent / 100.0).clamp(0.0, 1.0);
	let filled = (ratio * PROGRESS_BAR_WIDTH as f64) as usize;
	format!(
		"[{}{}] {:5.1}%",
		"=".repeat(filled),
		" ".repeat(PROGRESS_BAR_WIDTH - filled),
		ratio * 100.0
	)
}

/// Draws a throttled progress bar on stderr
///
/// Redraws at most every `UPDATE_THROTTLE_MS`, except that reaching 100%
/// always draws and ends the line.
pub struct CliProgress {
	last_update: Mutex<Option<Instant>>,
}

impl CliProgress {
	pub fn new() -> Self {
		Self { last_update: Mutex::new(None) }
	}
}

impl Default for CliProgress {
	fn default() -> Self {
		Self::new()
	}
}

impl ProgressSink for CliProgress {
	fn on_progress(&self, percent: f64) {
		let done = percent >= 100.0;
		{
			let mut last = self.last_update.lock().unwrap_or_else(|e| e.into_inner());
			if let Some(at) = *last {
				if !done && at.elapsed().as_millis() < UPDATE_THROTTLE_MS {
					return;
				}
			}
			*last = Some(Instant::now());
		}

		let mut stderr = std::io::stderr();
		let _ = write!(stderr, "\r  Syncing: {}", render_bar(percent));
		if done {
			let _ = writeln!(stderr);
		}
		let _ = stderr.flush();
	}
}


// vim: ts=4
