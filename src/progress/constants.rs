//! Progress display constants

/// Width of the progress bar display
pub const PROGRESS_BAR_WIDTH: usize = 30;

/// Minimum interval between redraws
pub const UPDATE_THROTTLE_MS: u128 = 100;
