//! Component references.
//!
//! A component is a render function `Fn(&Props, &mut Hooks) -> RenderResult<R>`
//! where `R` is anything convertible into a [`Child`]: a single element, a
//! scalar rendered as text, or a list of siblings.
//!
//! Two references are the same component kind only if they render through
//! the same function:
//!
//! - a named `fn` item or a closure capturing nothing is identified by its
//!   type, which is unique to that function;
//! - a plain `fn` pointer is identified by its address;
//! - anything else (capturing closures, boxed functions) is identified by the
//!   allocation made when the reference was created, so clones of one
//!   [`ComponentRef`] or [`Element`] match while separately built instances
//!   never do.

use std::any::{Any, TypeId};
use std::fmt;
use std::rc::Rc;

use crate::element::{Child, Element, Props};
use crate::error::RenderResult;
use crate::hooks::Hooks;

type RenderFn = dyn Fn(&Props, &mut Hooks<'_>) -> RenderResult<Vec<Element>>;

/// Plain function pointer form of a component returning one element.
pub type RenderPtr = fn(&Props, &mut Hooks<'_>) -> RenderResult<Element>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Identity {
	Type(TypeId),
	Address(usize),
	Instance(*const ()),
}

/// A reference to a component render function.
#[derive(Clone)]
pub struct ComponentRef {
	identity: Identity,
	name: &'static str,
	render: Rc<RenderFn>,
}

impl ComponentRef {
	/// Wraps a render function.
	///
	/// The component name used in diagnostics is the last path segment of
	/// the function's type name, or `fn` for function pointers.
	pub fn new<F, R>(render: F) -> Self
	where
		F: Fn(&Props, &mut Hooks<'_>) -> RenderResult<R> + 'static,
		R: Into<Child>,
	{
		let pointer = (&render as &dyn Any).downcast_ref::<RenderPtr>().copied();
		let zero_sized = std::mem::size_of::<F>() == 0;
		let render: Rc<RenderFn> = Rc::new(move |props: &Props, hooks: &mut Hooks<'_>| {
			let mut elements = Vec::new();
			render(props, hooks)?.into().flatten_into(&mut elements);
			Ok(elements)
		});

		let (identity, name) = match pointer {
			Some(pointer) => (Identity::Address(pointer as usize), "fn"),
			None if zero_sized => (Identity::Type(TypeId::of::<F>()), short_name::<F>()),
			None => (
				Identity::Instance(Rc::as_ptr(&render) as *const ()),
				short_name::<F>(),
			),
		};
		Self {
			identity,
			name,
			render,
		}
	}

	/// Overrides the diagnostic name, useful for closures.
	pub fn named(mut self, name: &'static str) -> Self {
		self.name = name;
		self
	}

	/// Returns the diagnostic name of the component.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Returns true if both references render through the same function.
	pub fn same_kind(&self, other: &Self) -> bool {
		self.identity == other.identity
	}

	pub(crate) fn render(&self, props: &Props, hooks: &mut Hooks<'_>) -> RenderResult<Vec<Element>> {
		(self.render)(props, hooks)
	}
}

/// Last path segment of a type name, generics and signatures stripped.
fn short_name<F>() -> &'static str {
	let full = std::any::type_name::<F>();
	let head = full.split(['<', '(']).next().unwrap_or(full);
	head.rsplit("::").next().unwrap_or(head)
}

impl PartialEq for ComponentRef {
	fn eq(&self, other: &Self) -> bool {
		self.same_kind(other)
	}
}

impl fmt::Debug for ComponentRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ComponentRef")
			.field("name", &self.name)
			.finish()
	}
}
