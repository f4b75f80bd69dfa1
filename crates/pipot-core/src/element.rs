//! Element model.
//!
//! An [`Element`] is the immutable description of one node of the desired
//! tree: a kind, a set of attributes, and ordered child descriptions. A fresh
//! tree of elements is produced on every render pass. Elements are cheap to
//! clone and are shared by whichever fiber currently references them.
//!
//! ## Example
//!
//! ```
//! use pipot_core::{Element, ElementKind, Value};
//!
//! let list = Element::host("ul")
//!     .attr("id", "groceries")
//!     .children(["Milk", "Sugar"].map(|item| Element::host("li").child(item)));
//!
//! assert_eq!(list.kind(), &ElementKind::host("ul"));
//! assert_eq!(list.props().get("id"), Some(&Value::from("groceries")));
//! assert_eq!(list.props().children().len(), 2);
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::callback::{Callback, Event, Listener};
use crate::component::ComponentRef;
use crate::error::RenderResult;
use crate::hooks::Hooks;

/// Attribute holding the content of a text element.
pub const TEXT_ATTRIBUTE: &str = "text";

/// Reserved attribute name that is never forwarded to the host.
pub const CHILDREN_ATTRIBUTE: &str = "children";

/// Attribute map of an element, ordered by name.
pub type Attributes = BTreeMap<String, Value>;

/// An attribute or hook-dependency value.
///
/// Scalars compare by value; listeners compare by identity.
#[derive(Debug, Clone)]
pub enum Value {
	/// A string value.
	Str(String),
	/// An integer value.
	Int(i64),
	/// A floating point value.
	Float(f64),
	/// A boolean value.
	Bool(bool),
	/// An event listener.
	Listener(Listener),
}

impl Value {
	/// Returns the listener if this value is one.
	pub fn as_listener(&self) -> Option<&Listener> {
		match self {
			Self::Listener(listener) => Some(listener),
			_ => None,
		}
	}

	/// Returns the string slice if this value is a string.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Str(s) => Some(s),
			_ => None,
		}
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Str(a), Self::Str(b)) => a == b,
			(Self::Int(a), Self::Int(b)) => a == b,
			(Self::Float(a), Self::Float(b)) => a == b,
			(Self::Bool(a), Self::Bool(b)) => a == b,
			(Self::Listener(a), Self::Listener(b)) => a.ptr_eq(b),
			_ => false,
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Str(s) => f.write_str(s),
			Self::Int(n) => write!(f, "{}", n),
			Self::Float(n) => write!(f, "{}", n),
			Self::Bool(b) => write!(f, "{}", b),
			Self::Listener(_) => f.write_str("<listener>"),
		}
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::Str(value.to_string())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::Str(value)
	}
}

impl From<&String> for Value {
	fn from(value: &String) -> Self {
		Self::Str(value.clone())
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Self::Int(i64::from(value))
	}
}

impl From<u32> for Value {
	fn from(value: u32) -> Self {
		Self::Int(i64::from(value))
	}
}

impl From<usize> for Value {
	fn from(value: usize) -> Self {
		// Saturates on 128-bit targets only.
		Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<Listener> for Value {
	fn from(value: Listener) -> Self {
		Self::Listener(value)
	}
}

/// The kind of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
	/// A host node type tag such as `div`.
	Host(Cow<'static, str>),
	/// A text node.
	Text,
	/// A component render function.
	Component(ComponentRef),
}

impl ElementKind {
	/// Creates a host kind from a tag.
	pub fn host(tag: impl Into<Cow<'static, str>>) -> Self {
		Self::Host(tag.into())
	}

	/// Creates a component kind from a render function.
	pub fn component<F, R>(render: F) -> Self
	where
		F: Fn(&Props, &mut Hooks<'_>) -> RenderResult<R> + 'static,
		R: Into<Child>,
	{
		Self::Component(ComponentRef::new(render))
	}

	/// Returns a short label for diagnostics.
	pub fn label(&self) -> &str {
		match self {
			Self::Host(tag) => tag,
			Self::Text => "#text",
			Self::Component(component) => component.name(),
		}
	}
}

impl From<&'static str> for ElementKind {
	fn from(tag: &'static str) -> Self {
		Self::Host(Cow::Borrowed(tag))
	}
}

impl From<String> for ElementKind {
	fn from(tag: String) -> Self {
		Self::Host(Cow::Owned(tag))
	}
}

impl From<ComponentRef> for ElementKind {
	fn from(component: ComponentRef) -> Self {
		Self::Component(component)
	}
}

/// Attributes and children of an element, as seen by a component.
#[derive(Debug, Clone, Default)]
pub struct Props {
	attributes: Attributes,
	children: Vec<Element>,
}

impl Props {
	/// Creates props from attributes and children.
	pub fn new(attributes: Attributes, children: Vec<Element>) -> Self {
		Self {
			attributes,
			children,
		}
	}

	/// Returns an attribute value.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.attributes.get(name)
	}

	/// Returns an attribute rendered as text, if present.
	pub fn text(&self, name: &str) -> Option<String> {
		self.attributes.get(name).map(ToString::to_string)
	}

	/// Returns all attributes.
	pub fn attributes(&self) -> &Attributes {
		&self.attributes
	}

	/// Returns the ordered children.
	pub fn children(&self) -> &[Element] {
		&self.children
	}
}

/// Immutable description of a desired tree node.
#[derive(Debug, Clone)]
pub struct Element {
	kind: ElementKind,
	props: Rc<Props>,
}

impl Element {
	/// Creates an element from a kind and its props.
	pub fn new(kind: impl Into<ElementKind>, props: Props) -> Self {
		Self {
			kind: kind.into(),
			props: Rc::new(props),
		}
	}

	/// Creates an empty host element.
	pub fn host(tag: impl Into<Cow<'static, str>>) -> Self {
		Self::new(ElementKind::Host(tag.into()), Props::default())
	}

	/// Creates a text element holding the stringified value.
	pub fn text(value: impl Into<Value>) -> Self {
		let text = Value::Str(value.into().to_string());
		let mut attributes = Attributes::new();
		attributes.insert(TEXT_ATTRIBUTE.to_string(), text);
		Self::new(ElementKind::Text, Props::new(attributes, Vec::new()))
	}

	/// Creates an element for a component render function.
	pub fn component<F, R>(render: F) -> Self
	where
		F: Fn(&Props, &mut Hooks<'_>) -> RenderResult<R> + 'static,
		R: Into<Child>,
	{
		Self::new(ElementKind::component(render), Props::default())
	}

	/// Sets an attribute.
	pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		Rc::make_mut(&mut self.props)
			.attributes
			.insert(name.into(), value.into());
		self
	}

	/// Sets a listener attribute such as `onClick`.
	pub fn listener<F>(self, name: impl Into<String>, f: F) -> Self
	where
		F: Fn(Event) + 'static,
	{
		self.attr(name, Value::Listener(Callback::new(f)))
	}

	/// Appends a child, flattening nested lists and wrapping scalars as text.
	pub fn child(mut self, child: impl Into<Child>) -> Self {
		child
			.into()
			.flatten_into(&mut Rc::make_mut(&mut self.props).children);
		self
	}

	/// Appends several children.
	pub fn children<I>(self, children: I) -> Self
	where
		I: IntoIterator,
		I::Item: Into<Child>,
	{
		children
			.into_iter()
			.fold(self, |element, child| element.child(child))
	}

	/// Returns the kind of this element.
	pub fn kind(&self) -> &ElementKind {
		&self.kind
	}

	/// Returns the attributes and children of this element.
	pub fn props(&self) -> &Props {
		&self.props
	}

	pub(crate) fn shared_props(&self) -> Rc<Props> {
		Rc::clone(&self.props)
	}
}

/// A child input for element construction.
#[derive(Debug, Clone)]
pub enum Child {
	/// An element description.
	Element(Element),
	/// A scalar that becomes a text element.
	Value(Value),
	/// A list of children, flattened in order.
	List(Vec<Child>),
}

impl Child {
	pub(crate) fn flatten_into(self, out: &mut Vec<Element>) {
		match self {
			Self::Element(element) => out.push(element),
			Self::Value(value) => out.push(Element::text(value)),
			Self::List(children) => {
				for child in children {
					child.flatten_into(out);
				}
			}
		}
	}
}

impl From<Element> for Child {
	fn from(element: Element) -> Self {
		Self::Element(element)
	}
}

impl From<Vec<Element>> for Child {
	fn from(elements: Vec<Element>) -> Self {
		Self::List(elements.into_iter().map(Child::Element).collect())
	}
}

impl From<Vec<Child>> for Child {
	fn from(children: Vec<Child>) -> Self {
		Self::List(children)
	}
}

macro_rules! impl_child_from_scalar {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for Child {
				fn from(value: $ty) -> Self {
					Self::Value(Value::from(value))
				}
			}
		)*
	};
}

impl_child_from_scalar!(&str, String, &String, i64, i32, u32, usize, f64, bool);

/// Builds an element from a kind, attributes, and child inputs.
///
/// Child inputs that are not elements are wrapped as text elements holding
/// their stringified value; nested lists are flattened in order. No other
/// validation happens here: a kind the host cannot realize is only
/// discovered during reconciliation.
pub fn create_element<I>(kind: impl Into<ElementKind>, attributes: Attributes, children: I) -> Element
where
	I: IntoIterator,
	I::Item: Into<Child>,
{
	let mut flattened = Vec::new();
	for child in children {
		child.into().flatten_into(&mut flattened);
	}
	Element::new(kind, Props::new(attributes, flattened))
}

/// Builds a hook dependency list.
///
/// ```
/// use pipot_core::{deps, Value};
///
/// let empty: Vec<Value> = deps![];
/// assert!(empty.is_empty());
/// assert_eq!(deps![1, "a"], vec![Value::Int(1), Value::from("a")]);
/// ```
#[macro_export]
macro_rules! deps {
	() => {
		::std::vec::Vec::<$crate::Value>::new()
	};
	($($dep:expr),+ $(,)?) => {
		::std::vec![$($crate::Value::from($dep)),+]
	};
}
