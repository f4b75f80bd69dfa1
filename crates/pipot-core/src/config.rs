//! Renderer configuration.
//!
//! Values can be set programmatically through the `with_*` builder methods or
//! loaded from TOML. Missing keys fall back to their defaults.
//!
//! ```toml
//! yield_threshold_micros = 500
//! event_prefix = "on"
//! flush_pass_limit = 100
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default remaining idle time below which the work loop suspends: 1 ms
const DEFAULT_YIELD_THRESHOLD_MICROS: u64 = 1_000;
/// Default attribute prefix of event listeners
const DEFAULT_EVENT_PREFIX: &str = "on";
/// Default bound on `flush` passes
const DEFAULT_FLUSH_PASS_LIMIT: usize = 1_000;

/// Errors raised while loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// The TOML document could not be parsed.
	#[error("failed to parse renderer config: {0}")]
	Parse(#[from] toml::de::Error),

	/// The configuration file could not be read.
	#[error("failed to read renderer config: {0}")]
	Io(#[from] std::io::Error),

	/// A value is out of range.
	#[error("invalid renderer config `{field}`: {reason}")]
	Invalid {
		/// Offending key
		field: &'static str,
		/// Why it was rejected
		reason: &'static str,
	},
}

/// Tuning knobs of a [`Renderer`](crate::Renderer).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use pipot_core::RendererConfig;
///
/// let config = RendererConfig::default()
///     .with_yield_threshold(Duration::from_micros(250))
///     .with_flush_pass_limit(64);
/// assert_eq!(config.yield_threshold(), Duration::from_micros(250));
/// assert_eq!(config.event_prefix(), "on");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
	yield_threshold_micros: u64,
	event_prefix: String,
	flush_pass_limit: usize,
}

impl Default for RendererConfig {
	fn default() -> Self {
		Self {
			yield_threshold_micros: DEFAULT_YIELD_THRESHOLD_MICROS,
			event_prefix: DEFAULT_EVENT_PREFIX.to_string(),
			flush_pass_limit: DEFAULT_FLUSH_PASS_LIMIT,
		}
	}
}

impl RendererConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(source)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads, parses and validates a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let source = std::fs::read_to_string(path)?;
		Self::from_toml_str(&source)
	}

	/// Serializes this configuration as TOML.
	pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
		toml::to_string(self)
	}

	/// Checks that every value is usable.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.event_prefix.is_empty() {
			return Err(ConfigError::Invalid {
				field: "event_prefix",
				reason: "must not be empty",
			});
		}
		if self.flush_pass_limit == 0 {
			return Err(ConfigError::Invalid {
				field: "flush_pass_limit",
				reason: "must be at least 1",
			});
		}
		Ok(())
	}

	// Builder methods

	/// Set the remaining idle time below which the work loop suspends.
	pub fn with_yield_threshold(mut self, threshold: Duration) -> Self {
		self.yield_threshold_micros = u64::try_from(threshold.as_micros()).unwrap_or(u64::MAX);
		self
	}

	/// Set the attribute prefix routed to listeners.
	pub fn with_event_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.event_prefix = prefix.into();
		self
	}

	/// Set the maximum number of passes `flush` may run.
	pub fn with_flush_pass_limit(mut self, limit: usize) -> Self {
		self.flush_pass_limit = limit;
		self
	}

	// Getters

	/// Get the yield threshold.
	pub fn yield_threshold(&self) -> Duration {
		Duration::from_micros(self.yield_threshold_micros)
	}

	/// Get the event prefix.
	pub fn event_prefix(&self) -> &str {
		&self.event_prefix
	}

	/// Get the flush pass limit.
	pub fn flush_pass_limit(&self) -> usize {
		self.flush_pass_limit
	}
}
