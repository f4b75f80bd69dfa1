//! Error types for the render pipeline.
//!
//! Every error raised while a generation is being built aborts that
//! generation: the working tree is discarded and the host tree keeps showing
//! the last committed generation.

use crate::host::HostError;

/// Result type for render operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors surfaced by the render entry points and the work loop.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
	/// The host could not realize an element kind.
	#[error("malformed element `{kind}`: {reason}")]
	MalformedElement {
		/// The element kind the host rejected
		kind: String,
		/// Host-provided reason
		reason: String,
	},

	/// A component called its hooks in a different order or number than in
	/// the previous generation.
	#[error("hook order violation in component `{component}` at slot {index}: {mismatch}")]
	HookOrderViolation {
		/// Name of the offending component
		component: &'static str,
		/// Slot index at which the mismatch was detected
		index: usize,
		/// What did not match
		mismatch: HookMismatch,
	},

	/// `flush` kept finding new work after the configured number of passes.
	#[error("render did not settle after {limit} passes")]
	FlushLimitExceeded {
		/// Configured pass limit
		limit: usize,
	},
}

impl RenderError {
	/// Returns true if this error was caused by a hook-order violation.
	pub fn is_hook_order_violation(&self) -> bool {
		matches!(self, Self::HookOrderViolation { .. })
	}
}

impl From<HostError> for RenderError {
	fn from(error: HostError) -> Self {
		match error {
			HostError::UnsupportedKind { kind, reason } => Self::MalformedElement { kind, reason },
		}
	}
}

/// Detail of a hook-order violation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HookMismatch {
	/// The slot at this index was registered by a different hook kind.
	#[error("expected `{expected}` hook, found `{found}` hook")]
	Kind {
		/// Hook kind requested in this generation
		expected: &'static str,
		/// Hook kind recorded in the previous generation
		found: &'static str,
	},

	/// A state slot changed its value type.
	#[error("state slot changed its value type")]
	StateType,

	/// More hooks were called than in the previous generation.
	#[error("called more hooks than the {previous} registered by the previous render")]
	Extra {
		/// Slot count of the previous generation
		previous: usize,
	},

	/// Fewer hooks were called than in the previous generation.
	#[error("{called} hooks called, previous render called {previous}")]
	Missing {
		/// Slot count of this generation
		called: usize,
		/// Slot count of the previous generation
		previous: usize,
	},
}
