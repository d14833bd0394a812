//! Size and modification-time helpers

use std::cmp::Ordering;
use std::time::{SystemTime, UNIX_EPOCH};

/// Modification times closer than this are treated as equal
pub const MTIME_TOLERANCE_SECS: f64 = 1.0;

/// Compare two mtimes (seconds since epoch) with the one-second tolerance
///
/// Returns `Equal` when the difference is within tolerance, otherwise the
/// ordering of `a` relative to `b`.
pub fn compare_mtimes(a: f64, b: f64) -> Ordering {
	if (a - b).abs() > MTIME_TOLERANCE_SECS {
		if a > b {
			Ordering::Greater
		} else {
			Ordering::Less
		}
	} else {
		Ordering::Equal
	}
}

pub fn differs_in_size(a: u64, b: u64) -> bool {
	a != b
}

/// Convert a `SystemTime` to fractional seconds since the epoch
///
/// Times before the epoch come out negative.
pub fn system_time_to_secs(t: SystemTime) -> f64 {
	match t.duration_since(UNIX_EPOCH) {
		Ok(d) => d.as_secs_f64(),
		Err(e) => -e.duration().as_secs_f64(),
	}
}

/// Human readable byte count ("0 B", "1.50 KB", ...)
pub fn format_file_size(size: u64) -> String {
	const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

	if size == 0 {
		return "0 B".to_string();
	}

	let mut value = size as f64;
	let mut unit = 0;
	while value >= 1024.0 && unit < UNITS.len() - 1 {
		value /= 1024.0;
		unit += 1;
	}
	format!("{:.2} {}", value, UNITS[unit])
}
