//! # Pipot
//!
//! A minimal incremental UI-tree renderer.
//!
//! Pipot turns declarative [`Element`] trees into a host tree and keeps it up
//! to date: every render pass is reconciled fiber by fiber against the last
//! committed one, the resulting insertions, updates and deletions are applied
//! in a single commit, and components keep state across passes through
//! [`Hooks`]. Work is split into units so the host can interleave rendering
//! with its own work, resuming where it left off on the next idle turn.
//!
//! ## Crates
//!
//! - `pipot-core`: the engine, re-exported here
//! - `pipot-testkit` (feature `testkit`): an in-memory recording host and
//!   deterministic deadlines, re-exported as [`testkit`]
//!
//! ## Quick Start
//!
//! ```ignore
//! use pipot::prelude::*;
//!
//! fn counter(_props: &Props, hooks: &mut Hooks<'_>) -> RenderResult<Element> {
//!     let (count, set_count) = hooks.use_state(0_i64)?;
//!     Ok(Element::host("button")
//!         .listener("onClick", move |_| set_count.update(|n| n + 1))
//!         .child(count))
//! }
//!
//! let mut renderer = Renderer::new(host, RendererConfig::default())?;
//! renderer.render(Element::component(counter), container);
//! while let WorkStatus::Suspended { .. } = renderer.work_loop(&TimeSlice::new(budget))? {
//!     // wait for the next idle turn
//! }
//! ```

pub use pipot_core::*;

#[cfg(feature = "testkit")]
pub use pipot_testkit as testkit;

/// Commonly used items.
pub mod prelude {
	pub use pipot_core::{
		Attributes, Callback, Child, CommitReport, Deadline, Element, ElementKind, Event, Hooks, Host,
		HostError, Props, RenderError, RenderResult, Renderer, RendererConfig, SchedulerState,
		SetState, TimeSlice, Unbounded, Value, WorkStatus, create_element, deps,
	};
}
