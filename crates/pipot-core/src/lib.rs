//! Pipot Core - incremental fiber reconciliation engine
//!
//! Pipot maintains a host tree from declarative element descriptions,
//! re-rendering only what changed across state updates and yielding to the
//! host when a scheduling turn runs out of idle time.
//!
//! ## Architecture
//!
//! - [`element`]: immutable element descriptions produced on every render
//! - [`fiber`]: the arena-backed, double-buffered working tree
//! - `reconciler`: positional child diffing into effect tags
//! - [`scheduler`]: deadlines, scheduler states and work-loop outcomes
//! - [`commit`]: the single pass applying deletions, placements and updates
//! - [`hooks`]: per-component state and deferred effects
//! - [`renderer`]: the scheduler context tying it all together
//! - [`host`]: the capability set a host tree implements
//!
//! ## Example
//!
//! ```ignore
//! use pipot_core::{Element, Hooks, Props, RenderResult, Renderer, RendererConfig};
//!
//! fn app(_props: &Props, hooks: &mut Hooks<'_>) -> RenderResult<Element> {
//!     let (count, set_count) = hooks.use_state(0_i64)?;
//!     Ok(Element::host("button")
//!         .listener("onClick", move |_| set_count.update(|n| n + 1))
//!         .child(count))
//! }
//!
//! let mut renderer = Renderer::new(host, RendererConfig::default())?;
//! renderer.render(Element::component(app), container);
//! renderer.flush()?;
//! ```

pub mod callback;
pub mod commit;
pub mod component;
pub mod config;
pub mod element;
pub mod error;
pub mod fiber;
pub mod hooks;
pub mod host;
mod reconciler;
pub mod renderer;
pub mod scheduler;

pub use callback::{Callback, Event, Listener};
pub use commit::{CommitReport, PropPatch, diff_props};
pub use component::{ComponentRef, RenderPtr};
pub use config::{ConfigError, RendererConfig};
pub use element::{
	Attributes, CHILDREN_ATTRIBUTE, Child, Element, ElementKind, Props, TEXT_ATTRIBUTE, Value,
	create_element,
};
pub use error::{HookMismatch, RenderError, RenderResult};
pub use fiber::{EffectTag, Fiber, FiberId, FiberKind, FiberTree};
pub use hooks::{Hooks, SetState};
pub use host::{Host, HostError};
pub use renderer::Renderer;
pub use scheduler::{Deadline, SchedulerState, TimeSlice, Unbounded, WorkStatus};
