//! Deterministic deadlines for exercising suspension and resumption.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

use pipot_core::Deadline;

/// Budget reported while a scripted unit is still allowed.
const GENEROUS: Duration = Duration::from_secs(1);

/// A deadline replaying a scripted sequence of budgets, one per check.
///
/// The renderer checks the deadline once before every unit of work, so
/// [`ScriptedDeadline::units`] allows exactly that many units in a turn.
/// Once the script is exhausted the deadline reports no time left.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use pipot_core::Deadline;
/// use pipot_testkit::ScriptedDeadline;
///
/// let deadline = ScriptedDeadline::units(2);
/// assert!(deadline.time_remaining() > Duration::ZERO);
/// assert!(deadline.time_remaining() > Duration::ZERO);
/// assert_eq!(deadline.time_remaining(), Duration::ZERO);
/// assert_eq!(deadline.checks(), 3);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedDeadline {
	budgets: RefCell<VecDeque<Duration>>,
	checks: Cell<usize>,
}

impl ScriptedDeadline {
	/// Creates a deadline reporting `budgets` in order.
	pub fn new(budgets: impl IntoIterator<Item = Duration>) -> Self {
		Self {
			budgets: RefCell::new(budgets.into_iter().collect()),
			checks: Cell::new(0),
		}
	}

	/// Creates a deadline allowing exactly `count` units of work.
	pub fn units(count: usize) -> Self {
		Self::new(std::iter::repeat_n(GENEROUS, count))
	}

	/// Number of times the deadline was consulted.
	pub fn checks(&self) -> usize {
		self.checks.get()
	}
}

impl Deadline for ScriptedDeadline {
	fn time_remaining(&self) -> Duration {
		self.checks.set(self.checks.get() + 1);
		self.budgets.borrow_mut().pop_front().unwrap_or(Duration::ZERO)
	}
}

/// A deadline always reporting the same budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDeadline(pub Duration);

impl Deadline for FixedDeadline {
	fn time_remaining(&self) -> Duration {
		self.0
	}
}
