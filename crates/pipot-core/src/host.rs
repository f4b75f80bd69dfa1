//! Host-tree capability set.
//!
//! The renderer never owns the host tree. It drives an implementation of
//! [`Host`] that creates nodes during the render phase and mutates the tree
//! only during commit.

use std::fmt;

use crate::callback::Listener;
use crate::element::Value;

/// Errors reported by a host implementation.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
	/// The host cannot realize a node of this kind.
	#[error("unsupported node kind `{kind}`: {reason}")]
	UnsupportedKind {
		/// Requested kind
		kind: String,
		/// Why the host rejected it
		reason: String,
	},
}

impl HostError {
	/// Creates an [`HostError::UnsupportedKind`].
	pub fn unsupported(kind: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::UnsupportedKind {
			kind: kind.into(),
			reason: reason.into(),
		}
	}
}

/// Mutation primitives of a host environment.
///
/// `Node` is a cheap handle to a host node; the renderer clones it freely and
/// stores one per host-bearing fiber.
pub trait Host {
	/// Handle to a host node.
	type Node: Clone + fmt::Debug;

	/// Creates a detached node for a host tag.
	///
	/// Nodes are created while a generation is built and attached only when
	/// it commits. If the generation is abandoned first, every node it created
	/// is handed back through [`Host::release_node`] and never referenced
	/// again.
	fn create_node(&mut self, tag: &str) -> Result<Self::Node, HostError>;

	/// Creates a detached text node.
	fn create_text_node(&mut self) -> Result<Self::Node, HostError>;

	/// Sets or replaces a plain attribute.
	fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &Value);

	/// Removes a plain attribute.
	fn clear_attribute(&mut self, node: &Self::Node, name: &str);

	/// Binds a listener for an event name such as `click`.
	fn add_listener(&mut self, node: &Self::Node, event: &str, listener: &Listener);

	/// Unbinds a listener previously passed to [`Host::add_listener`].
	fn remove_listener(&mut self, node: &Self::Node, event: &str, listener: &Listener);

	/// Appends `child` at the end of `parent`'s children.
	fn append_child(&mut self, parent: &Self::Node, child: &Self::Node);

	/// Detaches `child` from `parent`.
	fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node);

	/// Disposes of a node that was created but never attached.
	///
	/// The default implementation does nothing, leaving the detached node to
	/// the host's own reclamation.
	fn release_node(&mut self, _node: &Self::Node) {}
}

/// Returns true if an attribute name is routed to listeners.
pub fn is_event(name: &str, prefix: &str) -> bool {
	name.len() > prefix.len() && name.starts_with(prefix)
}

/// Derives the host event name from a listener attribute name.
///
/// # Example
///
/// ```
/// use pipot_core::host::event_name;
///
/// assert_eq!(event_name("onClick", "on"), Some("click".to_string()));
/// assert_eq!(event_name("title", "on"), None);
/// ```
pub fn event_name(name: &str, prefix: &str) -> Option<String> {
	if !is_event(name, prefix) {
		return None;
	}
	Some(name[prefix.len()..].to_lowercase())
}
