//! In-memory host tree recording every mutation.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Write as _};

use pipot_core::{Event, Host, HostError, Listener, TEXT_ATTRIBUTE, Value};

/// Handle to a node of a [`RecordingHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// One host mutation, in the order the renderer issued it.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
	/// `create_node`
	CreateNode { node: NodeId, tag: String },
	/// `create_text_node`
	CreateTextNode { node: NodeId },
	/// `set_attribute`
	SetAttribute { node: NodeId, name: String, value: Value },
	/// `clear_attribute`
	ClearAttribute { node: NodeId, name: String },
	/// `add_listener`
	AddListener { node: NodeId, event: String },
	/// `remove_listener`
	RemoveListener { node: NodeId, event: String },
	/// `append_child`
	AppendChild { parent: NodeId, child: NodeId },
	/// `remove_child`
	RemoveChild { parent: NodeId, child: NodeId },
	/// `release_node`
	ReleaseNode { node: NodeId },
}

impl Mutation {
	/// Returns true for attribute and listener mutations.
	pub fn is_attribute_mutation(&self) -> bool {
		matches!(
			self,
			Self::SetAttribute { .. }
				| Self::ClearAttribute { .. }
				| Self::AddListener { .. }
				| Self::RemoveListener { .. }
		)
	}

	/// Returns true for mutations that attach or detach nodes.
	pub fn is_tree_mutation(&self) -> bool {
		matches!(self, Self::AppendChild { .. } | Self::RemoveChild { .. })
	}
}

#[derive(Debug)]
struct HostNode {
	/// `None` for text nodes.
	tag: Option<String>,
	released: bool,
	attributes: BTreeMap<String, Value>,
	listeners: Vec<(String, Listener)>,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

impl HostNode {
	fn new(tag: Option<String>) -> Self {
		Self {
			tag,
			released: false,
			attributes: BTreeMap::new(),
			listeners: Vec::new(),
			parent: None,
			children: Vec::new(),
		}
	}
}

/// Host implementation backed by an in-memory tree.
///
/// Every mutation the renderer issues is applied to the tree and appended to
/// an ordered trace. Tags registered with [`RecordingHost::reject_kind`] make
/// `create_node` fail.
///
/// # Example
///
/// ```
/// use pipot_core::{Element, Renderer, RendererConfig};
/// use pipot_testkit::RecordingHost;
///
/// let mut host = RecordingHost::new();
/// let container = host.create_container();
/// let mut renderer = Renderer::new(host, RendererConfig::default()).unwrap();
///
/// renderer.render(Element::host("p").attr("class", "lead").child("hi"), container);
/// renderer.flush().unwrap();
///
/// assert_eq!(renderer.host().inner_markup(container), r#"<p class="lead">hi</p>"#);
/// ```
#[derive(Debug, Default)]
pub struct RecordingHost {
	nodes: Vec<HostNode>,
	trace: Vec<Mutation>,
	rejected: BTreeSet<String>,
}

impl RecordingHost {
	/// Creates an empty host.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a detached container node to render into. Not traced.
	pub fn create_container(&mut self) -> NodeId {
		self.push(Some("root".to_string()))
	}

	/// Makes `create_node` fail for `tag`.
	pub fn reject_kind(&mut self, tag: impl Into<String>) {
		self.rejected.insert(tag.into());
	}

	/// Returns the mutation trace.
	pub fn trace(&self) -> &[Mutation] {
		&self.trace
	}

	/// Returns and clears the mutation trace.
	pub fn take_trace(&mut self) -> Vec<Mutation> {
		std::mem::take(&mut self.trace)
	}

	/// Clears the mutation trace.
	pub fn clear_trace(&mut self) {
		self.trace.clear();
	}

	/// Number of attribute and listener mutations in the trace.
	pub fn attribute_mutations(&self) -> usize {
		self.trace
			.iter()
			.filter(|mutation| mutation.is_attribute_mutation())
			.count()
	}

	/// Number of nodes ever created, containers included.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Returns true if the renderer released `node` without attaching it.
	pub fn is_released(&self, node: NodeId) -> bool {
		self.node(node).is_some_and(|n| n.released)
	}

	/// Number of released nodes.
	pub fn released_count(&self) -> usize {
		self.nodes.iter().filter(|n| n.released).count()
	}

	/// Returns the tag of an element node, `None` for text nodes.
	pub fn tag(&self, node: NodeId) -> Option<&str> {
		self.node(node).and_then(|n| n.tag.as_deref())
	}

	/// Returns the attached children of a node.
	pub fn children(&self, node: NodeId) -> Vec<NodeId> {
		self.node(node)
			.map(|n| n.children.clone())
			.unwrap_or_default()
	}

	/// Returns the parent of an attached node.
	pub fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.node(node).and_then(|n| n.parent)
	}

	/// Returns an attribute value.
	pub fn attribute(&self, node: NodeId, name: &str) -> Option<&Value> {
		self.node(node).and_then(|n| n.attributes.get(name))
	}

	/// Number of listeners bound for `event`.
	pub fn listener_count(&self, node: NodeId, event: &str) -> usize {
		self.node(node)
			.map(|n| n.listeners.iter().filter(|(name, _)| name == event).count())
			.unwrap_or(0)
	}

	/// Concatenated text of all attached text nodes below `node`.
	pub fn text_content(&self, node: NodeId) -> String {
		let Some(n) = self.node(node) else {
			return String::new();
		};
		if n.tag.is_none() {
			return n
				.attributes
				.get(TEXT_ATTRIBUTE)
				.map(ToString::to_string)
				.unwrap_or_default();
		}
		n.children
			.iter()
			.map(|&child| self.text_content(child))
			.collect()
	}

	/// Serializes `node` and its attached subtree. Listeners are omitted.
	pub fn markup(&self, node: NodeId) -> String {
		let mut out = String::new();
		self.write_markup(node, &mut out);
		out
	}

	/// Serializes the attached children of `node`.
	pub fn inner_markup(&self, node: NodeId) -> String {
		let mut out = String::new();
		for child in self.children(node) {
			self.write_markup(child, &mut out);
		}
		out
	}

	fn write_markup(&self, node: NodeId, out: &mut String) {
		let Some(n) = self.node(node) else {
			return;
		};
		let Some(tag) = &n.tag else {
			if let Some(text) = n.attributes.get(TEXT_ATTRIBUTE) {
				let _ = write!(out, "{}", text);
			}
			return;
		};
		out.push('<');
		out.push_str(tag);
		for (name, value) in &n.attributes {
			let _ = write!(out, " {}=\"{}\"", name, value);
		}
		out.push('>');
		for &child in &n.children {
			self.write_markup(child, out);
		}
		let _ = write!(out, "</{}>", tag);
	}

	/// Returns the attached descendants of `root` with `tag`, in pre-order.
	pub fn find_by_tag(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
		let mut found = Vec::new();
		self.collect_by_tag(root, tag, &mut found);
		found
	}

	/// Returns the first attached descendant of `root` with `tag`.
	pub fn find_first(&self, root: NodeId, tag: &str) -> Option<NodeId> {
		self.find_by_tag(root, tag).into_iter().next()
	}

	fn collect_by_tag(&self, node: NodeId, tag: &str, found: &mut Vec<NodeId>) {
		for child in self.children(node) {
			if self.tag(child) == Some(tag) {
				found.push(child);
			}
			self.collect_by_tag(child, tag, found);
		}
	}

	/// Invokes every listener bound for `event` on `node`.
	///
	/// Returns how many listeners ran.
	pub fn dispatch(&self, node: NodeId, event: &str) -> usize {
		let listeners: Vec<Listener> = self
			.node(node)
			.map(|n| {
				n.listeners
					.iter()
					.filter(|(name, _)| name == event)
					.map(|(_, listener)| listener.clone())
					.collect()
			})
			.unwrap_or_default();
		for listener in &listeners {
			listener.call(Event::new(event));
		}
		listeners.len()
	}

	fn push(&mut self, tag: Option<String>) -> NodeId {
		self.nodes.push(HostNode::new(tag));
		NodeId(self.nodes.len() - 1)
	}

	fn node(&self, id: NodeId) -> Option<&HostNode> {
		self.nodes.get(id.0)
	}

	fn node_mut(&mut self, id: NodeId) -> Option<&mut HostNode> {
		self.nodes.get_mut(id.0)
	}

	fn detach(&mut self, child: NodeId) {
		let Some(parent) = self.node(child).and_then(|n| n.parent) else {
			return;
		};
		if let Some(p) = self.node_mut(parent) {
			p.children.retain(|&c| c != child);
		}
		if let Some(c) = self.node_mut(child) {
			c.parent = None;
		}
	}
}

impl Host for RecordingHost {
	type Node = NodeId;

	fn create_node(&mut self, tag: &str) -> Result<NodeId, HostError> {
		if self.rejected.contains(tag) {
			return Err(HostError::unsupported(tag, "rejected by host"));
		}
		let node = self.push(Some(tag.to_string()));
		self.trace.push(Mutation::CreateNode {
			node,
			tag: tag.to_string(),
		});
		Ok(node)
	}

	fn create_text_node(&mut self) -> Result<NodeId, HostError> {
		let node = self.push(None);
		self.trace.push(Mutation::CreateTextNode { node });
		Ok(node)
	}

	fn set_attribute(&mut self, node: &NodeId, name: &str, value: &Value) {
		if let Some(n) = self.node_mut(*node) {
			n.attributes.insert(name.to_string(), value.clone());
		}
		self.trace.push(Mutation::SetAttribute {
			node: *node,
			name: name.to_string(),
			value: value.clone(),
		});
	}

	fn clear_attribute(&mut self, node: &NodeId, name: &str) {
		if let Some(n) = self.node_mut(*node) {
			n.attributes.remove(name);
		}
		self.trace.push(Mutation::ClearAttribute {
			node: *node,
			name: name.to_string(),
		});
	}

	fn add_listener(&mut self, node: &NodeId, event: &str, listener: &Listener) {
		if let Some(n) = self.node_mut(*node) {
			n.listeners.push((event.to_string(), listener.clone()));
		}
		self.trace.push(Mutation::AddListener {
			node: *node,
			event: event.to_string(),
		});
	}

	fn remove_listener(&mut self, node: &NodeId, event: &str, listener: &Listener) {
		if let Some(n) = self.node_mut(*node) {
			n.listeners
				.retain(|(name, bound)| !(name == event && bound.ptr_eq(listener)));
		}
		self.trace.push(Mutation::RemoveListener {
			node: *node,
			event: event.to_string(),
		});
	}

	fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
		self.detach(*child);
		if let Some(p) = self.node_mut(*parent) {
			p.children.push(*child);
		}
		if let Some(c) = self.node_mut(*child) {
			c.parent = Some(*parent);
		}
		self.trace.push(Mutation::AppendChild {
			parent: *parent,
			child: *child,
		});
	}

	fn remove_child(&mut self, parent: &NodeId, child: &NodeId) {
		if self.parent(*child) == Some(*parent) {
			self.detach(*child);
		}
		self.trace.push(Mutation::RemoveChild {
			parent: *parent,
			child: *child,
		});
	}

	fn release_node(&mut self, node: &NodeId) {
		if let Some(n) = self.node_mut(*node) {
			n.released = true;
		}
		self.trace.push(Mutation::ReleaseNode { node: *node });
	}
}
