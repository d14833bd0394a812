//! Callback traits for progress reporting and log-line emission
//!
//! These are the only channel through which a sync talks to its caller.
//! Sinks are invoked on the thread running the sync; a host with a UI
//! thread is responsible for marshalling the values over.

use crate::logging::*;

/// Receives the completion percentage (0.0 - 100.0) after each action
pub trait ProgressSink: Send + Sync {
	fn on_progress(&self, percent: f64);
}

/// Receives human-readable log lines
pub trait LogSink: Send + Sync {
	fn on_log(&self, line: &str);
}

impl<T: Fn(f64) + Send + Sync> ProgressSink for T {
	fn on_progress(&self, percent: f64) {
		self(percent);
	}
}

impl<T: Fn(&str) + Send + Sync> LogSink for T {
	fn on_log(&self, line: &str) {
		self(line);
	}
}

/// Default progress sink that does nothing
pub struct NoProgress;

impl ProgressSink for NoProgress {
	fn on_progress(&self, _percent: f64) {}
}

/// Default log sink that does nothing
pub struct NoLog;

impl LogSink for NoLog {
	fn on_log(&self, _line: &str) {}
}

/// Log sink that forwards every line to `tracing` at INFO level
pub struct TracingLog;

impl LogSink for TracingLog {
	fn on_log(&self, line: &str) {
		info!("{}", line);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::{Arc, Mutex};

	#[test]
	fn test_closure_sinks() {
		let lines = Arc::new(Mutex::new(Vec::new()));
		let captured = lines.clone();
		let log = move |line: &str| captured.lock().unwrap().push(line.to_string());
		log.on_log("first");
		log.on_log("second");
		assert_eq!(*lines.lock().unwrap(), vec!["first", "second"]);

		let last = Arc::new(Mutex::new(0.0));
		let captured = last.clone();
		let progress = move |p: f64| *captured.lock().unwrap() = p;
		progress.on_progress(42.5);
		assert_eq!(*last.lock().unwrap(), 42.5);
	}

	#[test]
	fn test_boxed_sinks() {
		let sinks: Vec<Box<dyn LogSink>> = vec![Box::new(NoLog), Box::new(TracingLog)];
		for sink in &sinks {
			sink.on_log("ignored");
		}
		let progress: Box<dyn ProgressSink> = Box::new(NoProgress);
		progress.on_progress(100.0);
	}
}
