//! Input normalization and the dispatch gate.

use std::fmt;
use std::sync::Arc;

use crate::config::SearchConfig;

/// Final user-supplied transform applied after trimming and case-folding.
pub type InputProcessor = Arc<dyn Fn(String) -> String + Send + Sync>;

/// Why a dispatch was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
	/// Normalized query is shorter than `min_chars`.
	TooShort,
	/// Normalized query equals the last dispatched query.
	Duplicate,
}

/// Decision of the dispatch gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
	Dispatch,
	Skip(SkipReason),
}

/// Normalization and gating rules derived from a [`SearchConfig`].
#[derive(Clone)]
pub struct QueryPolicy {
	trim: bool,
	lowercase: bool,
	min_chars: usize,
	processor: Option<InputProcessor>,
}

impl fmt::Debug for QueryPolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("QueryPolicy")
			.field("trim", &self.trim)
			.field("lowercase", &self.lowercase)
			.field("min_chars", &self.min_chars)
			.field("processor", &self.processor.is_some())
			.finish()
	}
}

impl QueryPolicy {
	pub fn new(config: &SearchConfig, processor: Option<InputProcessor>) -> Self {
		Self {
			trim: config.trim_input,
			lowercase: config.lowercase_input,
			min_chars: config.min_chars,
			processor,
		}
	}

	/// Applies trim, then lowercase, then the input processor, each only when enabled.
	pub fn normalize(&self, raw: &str) -> String {
		let mut value = if self.trim { raw.trim() } else { raw }.to_owned();
		if self.lowercase {
			value = value.to_lowercase();
		}
		match &self.processor {
			Some(processor) => processor(value),
			None => value,
		}
	}

	/// Length is counted in `char`s, not bytes.
	pub fn meets_min_chars(&self, normalized: &str) -> bool {
		normalized.chars().count() >= self.min_chars
	}

	/// Shared gate for debounced and manual dispatches.
	pub fn gate(&self, normalized: &str, previous: &str) -> Gate {
		if !self.meets_min_chars(normalized) {
			Gate::Skip(SkipReason::TooShort)
		} else if normalized == previous {
			Gate::Skip(SkipReason::Duplicate)
		} else {
			Gate::Dispatch
		}
	}
}
