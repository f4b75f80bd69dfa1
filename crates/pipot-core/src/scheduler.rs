//! Cooperative scheduling primitives.
//!
//! The renderer performs one unit of work per fiber and consults a
//! [`Deadline`] before each unit. The host calls
//! [`Renderer::work_loop`](crate::Renderer::work_loop) once per idle turn and
//! requests another turn whenever the loop suspends.

use std::fmt;
use std::time::{Duration, Instant};

use crate::commit::CommitReport;

/// Remaining idle time of the current scheduling turn.
pub trait Deadline {
	/// Time left before the renderer should hand control back to the host.
	fn time_remaining(&self) -> Duration;
}

/// A deadline that never runs out.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl Deadline for Unbounded {
	fn time_remaining(&self) -> Duration {
		Duration::MAX
	}
}

/// A wall-clock time slice starting when it is created.
#[derive(Debug, Clone, Copy)]
pub struct TimeSlice {
	end: Instant,
}

impl TimeSlice {
	/// Creates a slice of `budget` starting now.
	pub fn new(budget: Duration) -> Self {
		let now = Instant::now();
		Self {
			end: now.checked_add(budget).unwrap_or(now),
		}
	}
}

impl Deadline for TimeSlice {
	fn time_remaining(&self) -> Duration {
		self.end.saturating_duration_since(Instant::now())
	}
}

/// Scheduler state machine.
///
/// `Idle -> Active -> (Suspended -> Active)* -> Drained -> Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchedulerState {
	/// No working root.
	#[default]
	Idle,
	/// A working root exists and units are being, or are ready to be, processed.
	Active,
	/// The last turn ran out of budget; the cursor is kept for the next turn.
	Suspended,
	/// No unit left; the working tree is being committed.
	Drained,
}

impl fmt::Display for SchedulerState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Idle => "idle",
			Self::Active => "active",
			Self::Suspended => "suspended",
			Self::Drained => "drained",
		};
		f.write_str(name)
	}
}

/// Outcome of one scheduling turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkStatus {
	/// There was nothing to do.
	Idle,
	/// The budget ran out; call `work_loop` again on the next idle turn.
	Suspended {
		/// Units of work performed during this turn.
		performed: usize,
	},
	/// The working tree was committed.
	Committed(CommitReport),
}

impl WorkStatus {
	/// Returns true if the host should request another turn.
	pub fn needs_another_turn(&self) -> bool {
		matches!(self, Self::Suspended { .. })
	}
}
