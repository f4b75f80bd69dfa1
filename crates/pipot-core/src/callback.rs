//! Callback types and host events.
//!
//! This module provides the cloneable callback wrapper used for event
//! listeners. Listener identity is the identity of the wrapped closure: two
//! clones of the same [`Callback`] compare equal, two callbacks built from
//! separate closures never do. The commit engine relies on this to decide
//! whether a listener has to be swapped on the host node.
//!
//! ## Example
//!
//! ```
//! use pipot_core::{Callback, Event};
//!
//! let on_click = Callback::new(|event: Event| {
//!     assert_eq!(event.name(), "click");
//! });
//!
//! let same = on_click.clone();
//! assert_eq!(on_click, same);
//! on_click.call(Event::new("click"));
//! ```

use std::fmt;
use std::rc::Rc;

/// An event delivered by the host to a listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
	name: String,
}

impl Event {
	/// Creates an event with the given (already lower-cased) name.
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into() }
	}

	/// Returns the event name, e.g. `click`.
	pub fn name(&self) -> &str {
		&self.name
	}
}

/// A cloneable callback wrapper.
///
/// `Callback` wraps a closure in an `Rc`, so clones are cheap and share
/// identity. The renderer is single-threaded, so no `Send` bound is required
/// and closures may capture state setters.
///
/// ## Type Parameters
///
/// - `Args`: The argument type the callback receives (defaults to [`Event`])
/// - `Ret`: The return type of the callback (defaults to `()`)
pub struct Callback<Args = Event, Ret = ()> {
	inner: Rc<dyn Fn(Args) -> Ret + 'static>,
}

/// Listener attached to a host node.
pub type Listener = Callback<Event>;

impl<Args, Ret> Callback<Args, Ret> {
	/// Creates a new Callback from a function or closure.
	///
	/// # Arguments
	///
	/// * `f` - The function or closure to wrap
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(Args) -> Ret + 'static,
	{
		Self { inner: Rc::new(f) }
	}

	/// Calls the callback with the given arguments.
	pub fn call(&self, args: Args) -> Ret {
		(self.inner)(args)
	}

	/// Returns true if both callbacks wrap the same closure allocation.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}
}

impl<Args, Ret> Clone for Callback<Args, Ret> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<Args, Ret> PartialEq for Callback<Args, Ret> {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other)
	}
}

impl<Args, Ret> fmt::Debug for Callback<Args, Ret> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Callback")
			.field("inner", &"<closure>")
			.finish()
	}
}
