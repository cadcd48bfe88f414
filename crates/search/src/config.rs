//! Orchestrator configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Default delay between the last input change and dispatch.
pub const DEFAULT_DEBOUNCE_DELAY_MS: u64 = 500;

/// Default minimum normalized query length.
pub const DEFAULT_MIN_CHARS: usize = 3;

/// Data options for a search orchestrator.
///
/// Function-valued options (input processor, callbacks) live on
/// [`SearchOrchestratorBuilder`](crate::SearchOrchestratorBuilder).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
	/// Quiet period after the last `set_query` before a dispatch is eligible.
	pub debounce_delay_ms: u64,
	/// Minimum normalized length, in characters, for a query to be dispatched.
	pub min_chars: usize,
	/// Strip leading and trailing whitespace before gating.
	pub trim_input: bool,
	/// Case-fold before gating.
	pub lowercase_input: bool,
	/// Cancel the in-flight request when it is superseded.
	pub enable_cancellation: bool,
}

impl Default for SearchConfig {
	fn default() -> Self {
		Self {
			debounce_delay_ms: DEFAULT_DEBOUNCE_DELAY_MS,
			min_chars: DEFAULT_MIN_CHARS,
			trim_input: true,
			lowercase_input: true,
			enable_cancellation: true,
		}
	}
}

impl SearchConfig {
	/// Parses a configuration from TOML text. Missing keys take defaults.
	pub fn from_toml_str(text: &str) -> Result<Self> {
		Ok(toml::from_str(text)?)
	}

	/// Reads and parses a TOML configuration file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&text)
	}

	pub fn debounce_delay(&self) -> Duration {
		Duration::from_millis(self.debounce_delay_ms)
	}

	pub fn with_debounce_delay_ms(mut self, ms: u64) -> Self {
		self.debounce_delay_ms = ms;
		self
	}

	pub fn with_min_chars(mut self, min_chars: usize) -> Self {
		self.min_chars = min_chars;
		self
	}

	pub fn with_trim_input(mut self, trim: bool) -> Self {
		self.trim_input = trim;
		self
	}

	pub fn with_lowercase_input(mut self, lowercase: bool) -> Self {
		self.lowercase_input = lowercase;
		self
	}

	pub fn with_cancellation(mut self, enabled: bool) -> Self {
		self.enable_cancellation = enabled;
		self
	}
}
