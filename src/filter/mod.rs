//! Include/exclude filtering
//!
//! A rule string is a `;`-separated list of glob patterns. Tokens starting
//! with `!` are exclusions, everything else is an inclusion:
//!
//! ```text
//! *.txt;*.doc          only txt and doc files
//! !*.tmp;!*.log        everything except tmp and log files
//! *.txt;!draft*.txt    txt files, but not drafts
//! ```
//!
//! Exclusions are checked first. With no inclusions every path that
//! survives the exclusions passes.

mod patterns;

pub use patterns::PatternMatcher;

use crate::error::FilterError;

/// Split a rule string into `(includes, excludes)`
///
/// Tokens are trimmed and empty tokens dropped; a bare `!` is ignored.
pub fn parse_rules(rules: &str) -> (Vec<String>, Vec<String>) {
	let mut includes = Vec::new();
	let mut excludes = Vec::new();

	for token in rules.split(';').map(str::trim).filter(|t| !t.is_empty()) {
		match token.strip_prefix('!') {
			Some(rest) if rest.is_empty() => {}
			Some(rest) => excludes.push(rest.to_string()),
			None => includes.push(token.to_string()),
		}
	}

	(includes, excludes)
}

/// Compiled include and exclude patterns
#[derive(Debug, Clone)]
pub struct FilterRuleSet {
	includes: PatternMatcher,
	excludes: PatternMatcher,
}

impl FilterRuleSet {
	/// Build a rule set from already separated pattern lists
	pub fn new(includes: &[String], excludes: &[String]) -> Result<Self, FilterError> {
		Ok(Self {
			includes: PatternMatcher::new(includes)?,
			excludes: PatternMatcher::new(excludes)?,
		})
	}

	/// Parse and compile a `;`-separated rule string
	pub fn parse(rules: &str) -> Result<Self, FilterError> {
		let (includes, excludes) = parse_rules(rules);
		Self::new(&includes, &excludes)
	}

	/// A rule set that lets everything through
	pub fn allow_all() -> Self {
		Self::default()
	}

	pub fn includes(&self) -> &[String] {
		self.includes.patterns()
	}

	pub fn excludes(&self) -> &[String] {
		self.excludes.patterns()
	}

	/// Decide whether `rel_path` (`/`-separated, relative to a scan root) is synced
	pub fn matches(&self, rel_path: &str) -> bool {
		if self.excludes.matches(rel_path) {
			return false;
		}
		if self.includes.is_empty() {
			return true;
		}
		self.includes.matches(rel_path)
	}
}

impl Default for FilterRuleSet {
	fn default() -> Self {
		Self { includes: PatternMatcher::empty(), excludes: PatternMatcher::empty() }
	}
}
