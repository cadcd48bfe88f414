//! Error types for orchestrator construction and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building a [`SearchOrchestrator`](crate::SearchOrchestrator).
#[derive(Debug, Error)]
pub enum BuildError {
	/// The builder was finished without an executor.
	#[error("search orchestrator requires an executor")]
	MissingExecutor,
}

/// Errors raised while loading a [`SearchConfig`](crate::SearchConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The configuration text is not valid TOML or has unknown/mistyped keys.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
