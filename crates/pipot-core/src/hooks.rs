//! Effect/state registry: `use_state` and `use_effect`.
//!
//! A component receives a [`Hooks`] context by `&mut` for the duration of
//! its render call. Every hook call takes the next slot index; the slot at the
//! same index of the previous generation carries state forward. The slot
//! index is the only correlation key, so a component must call its hooks in
//! the same order and number on every render. Any deviation is reported as
//! [`RenderError::HookOrderViolation`] and aborts the generation.
//!
//! # Example
//!
//! ```
//! use pipot_core::{deps, Element, Hooks, Props, RenderResult};
//!
//! fn counter(_props: &Props, hooks: &mut Hooks<'_>) -> RenderResult<Element> {
//!     let (count, set_count) = hooks.use_state(0_i64)?;
//!     hooks.use_effect(deps![count], move || {
//!         // runs after every commit in which `count` changed
//!     })?;
//!     Ok(Element::host("button")
//!         .listener("onClick", move |_| set_count.update(|n| n + 1))
//!         .child(count))
//! }
//! # let _ = counter;
//! ```

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::element::Value;
use crate::error::{HookMismatch, RenderError, RenderResult};

const STATE: &str = "state";
const EFFECT: &str = "effect";

/// Deferred effect callback, run once after the commit that queued it.
pub(crate) type EffectFn = Rc<dyn Fn()>;

type Action<T> = Rc<dyn Fn(&T) -> T>;

/// Flag raised by state setters to request a new render pass.
#[derive(Debug, Default)]
pub(crate) struct UpdateSignal {
	requested: Cell<bool>,
}

impl UpdateSignal {
	pub(crate) fn request(&self) {
		self.requested.set(true);
	}

	/// Clears the flag, returning whether it was set.
	pub(crate) fn take(&self) -> bool {
		self.requested.replace(false)
	}

	pub(crate) fn is_requested(&self) -> bool {
		self.requested.get()
	}
}

/// A state slot of one generation.
///
/// Setters append actions to `pending`; the next generation replays them over
/// `value`. Replaying leaves `pending` untouched so an abandoned generation
/// can be rebuilt from the same slot.
struct StateCell<T> {
	value: T,
	pending: RefCell<Vec<Action<T>>>,
}

impl<T: Clone> StateCell<T> {
	fn new(value: T) -> Self {
		Self {
			value,
			pending: RefCell::new(Vec::new()),
		}
	}

	fn replay(&self) -> T {
		let actions: Vec<Action<T>> = self.pending.borrow().clone();
		actions
			.iter()
			.fold(self.value.clone(), |value, action| action(&value))
	}
}

/// Dependencies recorded by an effect slot.
pub(crate) struct EffectSlot {
	deps: Vec<Value>,
}

/// One hook slot of a component fiber.
pub(crate) enum HookSlot {
	State(Rc<dyn Any>),
	Effect(EffectSlot),
}

impl HookSlot {
	fn kind(&self) -> &'static str {
		match self {
			Self::State(_) => STATE,
			Self::Effect(_) => EFFECT,
		}
	}
}

impl fmt::Debug for HookSlot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::State(_) => f.write_str("State(..)"),
			Self::Effect(slot) => f.debug_tuple("Effect").field(&slot.deps).finish(),
		}
	}
}

/// Queues an update for a state slot.
///
/// Setting state never mutates the value seen by the current render. The
/// action is recorded and a new render pass is requested; the next
/// generation replays all recorded actions in order.
pub struct SetState<T> {
	cell: Rc<StateCell<T>>,
	signal: Rc<UpdateSignal>,
}

impl<T: 'static> SetState<T> {
	/// Queues an action computing the next value from the previous one.
	pub fn update<F>(&self, action: F)
	where
		F: Fn(&T) -> T + 'static,
	{
		self.cell.pending.borrow_mut().push(Rc::new(action));
		self.signal.request();
	}

	/// Queues a replacement value.
	pub fn set(&self, value: T)
	where
		T: Clone,
	{
		self.update(move |_| value.clone());
	}
}

impl<T> Clone for SetState<T> {
	fn clone(&self) -> Self {
		Self {
			cell: Rc::clone(&self.cell),
			signal: Rc::clone(&self.signal),
		}
	}
}

impl<T> fmt::Debug for SetState<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SetState")
			.field("pending", &self.cell.pending.borrow().len())
			.finish()
	}
}

/// Per-component processing context.
pub struct Hooks<'a> {
	component: &'static str,
	previous: Option<&'a [HookSlot]>,
	slots: Vec<HookSlot>,
	effects: Vec<EffectFn>,
	signal: &'a Rc<UpdateSignal>,
	violation: Option<RenderError>,
}

impl<'a> Hooks<'a> {
	/// `previous` is `None` when the component is mounted for the first time.
	pub(crate) fn new(
		component: &'static str,
		previous: Option<&'a [HookSlot]>,
		signal: &'a Rc<UpdateSignal>,
	) -> Self {
		Self {
			component,
			previous,
			slots: Vec::new(),
			effects: Vec::new(),
			signal,
			violation: None,
		}
	}

	/// Returns the name of the component being rendered.
	pub fn component(&self) -> &'static str {
		self.component
	}

	/// Reads a state slot, creating it with `initial` on first mount.
	///
	/// Returns the value for this generation, with every queued action of the
	/// previous generation applied, and a setter for the next one.
	pub fn use_state<T>(&mut self, initial: T) -> RenderResult<(T, SetState<T>)>
	where
		T: Clone + 'static,
	{
		let value = match self.previous_slot()? {
			None => initial,
			Some(HookSlot::State(any)) => match Rc::clone(any).downcast::<StateCell<T>>() {
				Ok(cell) => cell.replay(),
				Err(_) => return Err(self.violation(HookMismatch::StateType)),
			},
			Some(slot) => return Err(self.kind_mismatch(STATE, slot)),
		};

		let cell = Rc::new(StateCell::new(value.clone()));
		self.slots.push(HookSlot::State(cell.clone()));
		Ok((
			value,
			SetState {
				cell,
				signal: Rc::clone(self.signal),
			},
		))
	}

	/// Registers a deferred effect.
	///
	/// The callback is queued to run after commit when `deps` differ
	/// pairwise from the previous generation's, or on first mount.
	pub fn use_effect<F>(&mut self, deps: Vec<Value>, callback: F) -> RenderResult<()>
	where
		F: Fn() + 'static,
	{
		let changed = match self.previous_slot()? {
			None => true,
			Some(HookSlot::Effect(previous)) => previous.deps != deps,
			Some(slot) => return Err(self.kind_mismatch(EFFECT, slot)),
		};

		if changed {
			self.effects.push(Rc::new(callback));
		}
		self.slots.push(HookSlot::Effect(EffectSlot { deps }));
		Ok(())
	}

	/// Returns the previous slot at the next index.
	fn previous_slot(&mut self) -> RenderResult<Option<&'a HookSlot>> {
		if let Some(violation) = &self.violation {
			return Err(violation.clone());
		}
		let Some(previous) = self.previous else {
			return Ok(None);
		};
		let index = self.slots.len();
		let Some(slot) = previous.get(index) else {
			return Err(self.violation(HookMismatch::Extra {
				previous: previous.len(),
			}));
		};
		Ok(Some(slot))
	}

	fn kind_mismatch(&mut self, expected: &'static str, found: &HookSlot) -> RenderError {
		self.violation(HookMismatch::Kind {
			expected,
			found: found.kind(),
		})
	}

	fn violation(&mut self, mismatch: HookMismatch) -> RenderError {
		let error = RenderError::HookOrderViolation {
			component: self.component,
			index: self.slots.len(),
			mismatch,
		};
		self.violation = Some(error.clone());
		error
	}

	/// Ends the render call, returning the new slots and the queued effects.
	///
	/// Fails if any hook call failed, even when the component swallowed the
	/// error, or if fewer hooks were called than in the previous generation.
	pub(crate) fn finish(mut self) -> RenderResult<(Vec<HookSlot>, Vec<EffectFn>)> {
		if let Some(violation) = self.violation.take() {
			return Err(violation);
		}
		if let Some(previous) = self.previous
			&& self.slots.len() < previous.len()
		{
			return Err(self.violation(HookMismatch::Missing {
				called: self.slots.len(),
				previous: previous.len(),
			}));
		}
		Ok((self.slots, self.effects))
	}
}

impl fmt::Debug for Hooks<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Hooks")
			.field("component", &self.component)
			.field("slots", &self.slots.len())
			.finish()
	}
}
