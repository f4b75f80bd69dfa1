//! Arena-backed fiber tree.
//!
//! Fibers live in a [`SlotMap`] keyed by [`FiberId`]. The arena owns every
//! fiber of both generations; `parent`, `child`, `sibling` and `alternate`
//! are plain ids into it. Each fiber records the render generation that
//! created it, so a whole generation can be swept in one pass once it is
//! either promoted or abandoned.

use std::borrow::Cow;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};

use crate::component::ComponentRef;
use crate::element::{ElementKind, Props};
use crate::hooks::HookSlot;

new_key_type! {
	/// Identifier of a fiber in its arena.
	pub struct FiberId;
}

/// Pending host effect of a fiber, consumed during commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EffectTag {
	/// Nothing to apply.
	#[default]
	None,
	/// A new host node has to be attached.
	Placement,
	/// The host node is reused and its attributes are patched.
	Update,
	/// The fiber's host nodes have to be detached.
	Deletion,
}

/// Kind of a fiber: the element kinds plus the tree root.
#[derive(Debug, Clone, PartialEq)]
pub enum FiberKind {
	/// Root of a generation; its node is the host container.
	Root,
	/// Host node with a tag.
	Host(Cow<'static, str>),
	/// Text node.
	Text,
	/// Component render function.
	Component(ComponentRef),
}

impl FiberKind {
	/// Returns true if an element of `kind` can reuse a fiber of this kind.
	pub fn matches(&self, kind: &ElementKind) -> bool {
		match (self, kind) {
			(Self::Host(a), ElementKind::Host(b)) => a == b,
			(Self::Text, ElementKind::Text) => true,
			(Self::Component(a), ElementKind::Component(b)) => a.same_kind(b),
			_ => false,
		}
	}
}

impl From<&ElementKind> for FiberKind {
	fn from(kind: &ElementKind) -> Self {
		match kind {
			ElementKind::Host(tag) => Self::Host(tag.clone()),
			ElementKind::Text => Self::Text,
			ElementKind::Component(component) => Self::Component(component.clone()),
		}
	}
}

/// One tree position within one render generation.
#[derive(Debug)]
pub struct Fiber<N> {
	pub(crate) kind: FiberKind,
	pub(crate) props: Rc<Props>,
	pub(crate) node: Option<N>,
	pub(crate) parent: Option<FiberId>,
	pub(crate) child: Option<FiberId>,
	pub(crate) sibling: Option<FiberId>,
	pub(crate) alternate: Option<FiberId>,
	pub(crate) effect_tag: EffectTag,
	pub(crate) hooks: Vec<HookSlot>,
	pub(crate) generation: u64,
}

impl<N> Fiber<N> {
	pub(crate) fn new(kind: FiberKind, props: Rc<Props>, generation: u64) -> Self {
		Self {
			kind,
			props,
			node: None,
			parent: None,
			child: None,
			sibling: None,
			alternate: None,
			effect_tag: EffectTag::None,
			hooks: Vec::new(),
			generation,
		}
	}

	/// Returns the kind of this fiber.
	pub fn kind(&self) -> &FiberKind {
		&self.kind
	}

	/// Returns the props this fiber was built from.
	pub fn props(&self) -> &Props {
		&self.props
	}

	/// Returns the host node owned by this fiber.
	pub fn node(&self) -> Option<&N> {
		self.node.as_ref()
	}

	/// Returns the pending effect tag.
	pub fn effect_tag(&self) -> EffectTag {
		self.effect_tag
	}

	/// Returns the fiber at the same position in the previous generation.
	pub fn alternate(&self) -> Option<FiberId> {
		self.alternate
	}

	/// Returns the number of hook slots registered by the last render.
	pub fn hook_count(&self) -> usize {
		self.hooks.len()
	}
}

/// Arena holding the fibers of the current and working generations.
#[derive(Debug)]
pub struct FiberTree<N> {
	fibers: SlotMap<FiberId, Fiber<N>>,
}

impl<N> Default for FiberTree<N> {
	fn default() -> Self {
		Self {
			fibers: SlotMap::with_key(),
		}
	}
}

impl<N> FiberTree<N> {
	/// Creates an empty arena.
	pub fn new() -> Self {
		Self::default()
	}

	pub(crate) fn insert(&mut self, fiber: Fiber<N>) -> FiberId {
		self.fibers.insert(fiber)
	}

	/// Returns a fiber by id.
	pub fn get(&self, id: FiberId) -> Option<&Fiber<N>> {
		self.fibers.get(id)
	}

	pub(crate) fn get_mut(&mut self, id: FiberId) -> Option<&mut Fiber<N>> {
		self.fibers.get_mut(id)
	}

	/// Number of live fibers across both generations.
	pub fn len(&self) -> usize {
		self.fibers.len()
	}

	/// Returns true if the arena holds no fibers.
	pub fn is_empty(&self) -> bool {
		self.fibers.is_empty()
	}

	/// Returns the child chain of a fiber in sibling order.
	pub fn children(&self, id: FiberId) -> Vec<FiberId> {
		let mut out = Vec::new();
		let mut cursor = self.get(id).and_then(|fiber| fiber.child);
		while let Some(child) = cursor {
			out.push(child);
			cursor = self.get(child).and_then(|fiber| fiber.sibling);
		}
		out
	}

	/// Returns the next fiber after `id` in depth-first pre-order, never
	/// leaving the subtree rooted at `root`.
	pub fn next_in_preorder(&self, id: FiberId, root: FiberId) -> Option<FiberId> {
		let fiber = self.get(id)?;
		if let Some(child) = fiber.child {
			return Some(child);
		}
		let mut cursor = id;
		loop {
			if cursor == root {
				return None;
			}
			let fiber = self.get(cursor)?;
			if let Some(sibling) = fiber.sibling {
				return Some(sibling);
			}
			cursor = fiber.parent?;
		}
	}

	/// Returns all fibers of the subtree rooted at `root` in pre-order.
	pub fn preorder(&self, root: FiberId) -> Vec<FiberId> {
		let mut out = Vec::new();
		let mut cursor = Some(root);
		while let Some(id) = cursor {
			out.push(id);
			cursor = self.next_in_preorder(id, root);
		}
		out
	}

	/// Drops every fiber not created by `generation`.
	pub(crate) fn retain_generation(&mut self, generation: u64) {
		self.fibers.retain(|_, fiber| fiber.generation == generation);
	}

	/// Drops every fiber created by `generation`.
	pub(crate) fn discard_generation(&mut self, generation: u64) {
		self.fibers.retain(|_, fiber| fiber.generation != generation);
	}
}

impl<N: Clone> FiberTree<N> {
	/// Returns the host node of the nearest ancestor that owns one.
	pub fn host_parent(&self, id: FiberId) -> Option<N> {
		let mut cursor = self.get(id)?.parent;
		while let Some(ancestor) = cursor {
			let fiber = self.get(ancestor)?;
			if let Some(node) = &fiber.node {
				return Some(node.clone());
			}
			cursor = fiber.parent;
		}
		None
	}

	/// Returns the nodes created by `generation` for fibers still awaiting
	/// placement.
	pub(crate) fn placed_nodes(&self, generation: u64) -> Vec<N> {
		self.fibers
			.values()
			.filter(|fiber| fiber.generation == generation && fiber.effect_tag == EffectTag::Placement)
			.filter_map(|fiber| fiber.node.clone())
			.collect()
	}

	/// Returns the topmost host nodes in the subtree of `id`.
	///
	/// A fiber with a host node yields just that node; a component fiber
	/// yields the host roots of its children.
	pub fn host_roots(&self, id: FiberId) -> Vec<N> {
		let Some(fiber) = self.get(id) else {
			return Vec::new();
		};
		if let Some(node) = &fiber.node {
			return vec![node.clone()];
		}
		self.children(id)
			.into_iter()
			.flat_map(|child| self.host_roots(child))
			.collect()
	}
}
