//! Shell-style glob matching against relative paths and base names

use crate::error::FilterError;
use crate::logging::*;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// A compiled set of glob patterns
///
/// `*` matches any run of characters (including `/`), `?` a single
/// character and `[seq]`/`[!seq]` one character from (or not from) a set.
/// Everything else is literal: braces do not alternate and a `[` without
/// its closing `]` matches itself. A path matches if any pattern matches
/// either the full relative path or its base name.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
	patterns: Vec<String>,
	set: GlobSet,
}

impl PatternMatcher {
	/// Compile `patterns` into a matcher
	pub fn new(patterns: &[String]) -> Result<Self, FilterError> {
		let mut builder = GlobSetBuilder::new();

		for pattern in patterns {
			let Some(translated) = translate(pattern) else {
				debug!("Pattern '{}' can never match, ignoring", pattern);
				continue;
			};
			let glob = GlobBuilder::new(&translated)
				.literal_separator(false)
				.backslash_escape(false)
				.case_insensitive(cfg!(windows))
				.build()
				.map_err(|e| FilterError::InvalidPattern {
					pattern: pattern.clone(),
					message: e.kind().to_string(),
				})?;
			builder.add(glob);
		}

		let set = builder.build().map_err(|e| FilterError::InvalidPattern {
			pattern: patterns.join(";"),
			message: e.to_string(),
		})?;

		Ok(Self { patterns: patterns.to_vec(), set })
	}

	/// A matcher with no patterns; matches nothing
	pub fn empty() -> Self {
		Self { patterns: Vec::new(), set: GlobSet::empty() }
	}

	pub fn is_empty(&self) -> bool {
		self.patterns.is_empty()
	}

	pub fn patterns(&self) -> &[String] {
		&self.patterns
	}

	/// Check `rel_path` (`/`-separated) against every pattern
	pub fn matches(&self, rel_path: &str) -> bool {
		if self.set.is_match(rel_path) {
			return true;
		}
		match rel_path.rsplit('/').next() {
			Some(base) if base != rel_path => self.set.is_match(base),
			_ => false,
		}
	}
}

/// Rewrite a shell pattern into globset syntax
///
/// Returns `None` when a character class is empty, since such a pattern
/// cannot match anything.
fn translate(pattern: &str) -> Option<String> {
	let chars: Vec<char> = pattern.chars().collect();
	let mut out = String::with_capacity(pattern.len() + 8);
	let mut i = 0;

	while i < chars.len() {
		let c = chars[i];
		i += 1;
		match c {
			'{' | '}' | ',' => {
				out.push('[');
				out.push(c);
				out.push(']');
			}
			'[' => match class_end(&chars, i) {
				Some(end) => {
					out.push_str(&translate_class(&chars[i..end])?);
					i = end + 1;
				}
				None => out.push_str("[[]"),
			},
			_ => out.push(c),
		}
	}

	Some(out)
}

/// Index of the `]` closing a class whose body starts at `start`
///
/// A `]` directly after `[` or `[!` is part of the set.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
	let mut j = start;
	if chars.get(j) == Some(&'!') {
		j += 1;
	}
	if chars.get(j) == Some(&']') {
		j += 1;
	}
	chars[j..].iter().position(|&c| c == ']').map(|p| j + p)
}

fn translate_class(body: &[char]) -> Option<String> {
	let (negated, body) = match body.split_first() {
		Some(('!', rest)) => (true, rest),
		_ => (false, body),
	};

	// Reversed ranges select nothing and are dropped
	let mut singles = Vec::new();
	let mut ranges = Vec::new();
	let mut k = 0;
	while k < body.len() {
		if k + 2 < body.len() && body[k + 1] == '-' {
			if body[k] <= body[k + 2] {
				ranges.push((body[k], body[k + 2]));
			}
			k += 3;
		} else {
			singles.push(body[k]);
			k += 1;
		}
	}

	if singles.is_empty() && ranges.is_empty() {
		return if negated { Some("?".to_string()) } else { None };
	}
	if !negated && ranges.is_empty() && singles.iter().all(|&c| c == '^') {
		return Some("^".to_string());
	}

	// globset wants `]` first, `-` last and no leading `^`
	let mut out = String::from("[");
	if negated {
		out.push('!');
	}
	if singles.contains(&']') {
		out.push(']');
	}
	for &(lo, hi) in &ranges {
		out.push(lo);
		out.push('-');
		out.push(hi);
	}
	for &c in singles.iter().filter(|&&c| c != ']' && c != '-' && c != '^') {
		out.push(c);
	}
	if singles.contains(&'^') {
		out.push('^');
	}
	if singles.contains(&'-') {
		out.push('-');
	}
	out.push(']');
	Some(out)
}
