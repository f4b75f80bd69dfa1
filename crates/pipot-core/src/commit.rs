//! Commit engine.
//!
//! All host-tree mutation happens here, in one uninterrupted pass: first
//! every queued deletion, then a pre-order walk of the working tree applying
//! placements and attribute/listener deltas. Promotion of the working tree and
//! the deferred effect queue are driven by the renderer right after.

use tracing::warn;

use crate::callback::Listener;
use crate::element::{Attributes, CHILDREN_ATTRIBUTE, Value};
use crate::fiber::{EffectTag, FiberId, FiberTree};
use crate::host::{Host, event_name, is_event};

/// Counts of what one commit did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitReport {
	/// Host nodes detached.
	pub deletions: usize,
	/// Host nodes attached.
	pub placements: usize,
	/// Host-bearing fibers updated in place.
	pub updates: usize,
	/// Attribute and listener patches applied, including those decorating
	/// newly placed nodes.
	pub patches: usize,
	/// Deferred effect callbacks run.
	pub effects: usize,
}

impl CommitReport {
	/// Returns true if the commit touched the host tree.
	pub fn mutated_host(&self) -> bool {
		self.deletions + self.placements + self.patches > 0
	}
}

/// A single attribute or listener change on one host node.
#[derive(Debug, Clone, PartialEq)]
pub enum PropPatch {
	/// Unbind a listener that is gone or replaced.
	RemoveListener {
		/// Host event name
		event: String,
		/// Listener previously bound
		listener: Listener,
	},
	/// Remove an attribute absent from the new set.
	ClearAttribute {
		/// Attribute name
		name: String,
	},
	/// Set an attribute that is new or changed.
	SetAttribute {
		/// Attribute name
		name: String,
		/// New value
		value: Value,
	},
	/// Bind a listener that is new or replaced.
	AddListener {
		/// Host event name
		event: String,
		/// Listener to bind
		listener: Listener,
	},
}

/// Computes the minimal delta between two attribute sets.
///
/// Patches come in four ordered groups: stale or replaced listeners are
/// removed, attributes missing from `next` are cleared, new or changed
/// attributes are set, then new or replaced listeners are added. Entries
/// equal on both sides produce nothing. The reserved `children` attribute is
/// never patched.
///
/// # Example
///
/// ```
/// use pipot_core::{Attributes, PropPatch, Value, diff_props};
///
/// let prev: Attributes = [("a".into(), Value::from(1)), ("b".into(), Value::from(2))].into();
/// let next: Attributes = [("a".into(), Value::from(1)), ("c".into(), Value::from(3))].into();
///
/// assert_eq!(
///     diff_props(&prev, &next, "on"),
///     vec![
///         PropPatch::ClearAttribute { name: "b".into() },
///         PropPatch::SetAttribute { name: "c".into(), value: Value::from(3) },
///     ]
/// );
/// ```
pub fn diff_props(prev: &Attributes, next: &Attributes, prefix: &str) -> Vec<PropPatch> {
	let mut patches = Vec::new();
	let is_plain = |name: &str| name != CHILDREN_ATTRIBUTE && !is_event(name, prefix);

	for (name, old) in prev {
		let (Some(event), Some(listener)) = (event_name(name, prefix), old.as_listener()) else {
			continue;
		};
		if next.get(name) != Some(old) {
			patches.push(PropPatch::RemoveListener {
				event,
				listener: listener.clone(),
			});
		}
	}

	for name in prev.keys() {
		if is_plain(name) && !next.contains_key(name) {
			patches.push(PropPatch::ClearAttribute { name: name.clone() });
		}
	}

	for (name, value) in next {
		if is_plain(name) && prev.get(name) != Some(value) {
			patches.push(PropPatch::SetAttribute {
				name: name.clone(),
				value: value.clone(),
			});
		}
	}

	for (name, value) in next {
		let Some(event) = event_name(name, prefix) else {
			continue;
		};
		let Some(listener) = value.as_listener() else {
			warn!(attribute = %name, value = %value, "listener attribute without a listener value, ignored");
			continue;
		};
		if prev.get(name) != Some(value) {
			patches.push(PropPatch::AddListener {
				event,
				listener: listener.clone(),
			});
		}
	}

	patches
}

/// Applies patches to one host node.
pub(crate) fn apply_patches<H: Host>(host: &mut H, node: &H::Node, patches: &[PropPatch]) {
	for patch in patches {
		match patch {
			PropPatch::RemoveListener { event, listener } => host.remove_listener(node, event, listener),
			PropPatch::ClearAttribute { name } => host.clear_attribute(node, name),
			PropPatch::SetAttribute { name, value } => host.set_attribute(node, name, value),
			PropPatch::AddListener { event, listener } => host.add_listener(node, event, listener),
		}
	}
}

/// Applies the deletions, then the placements and updates of the working tree
/// rooted at `root`.
///
/// Deleted fibers still belong to the previous generation, so their host
/// parent is looked up through the old tree's links.
pub(crate) fn commit_mutations<H: Host>(
	host: &mut H,
	tree: &FiberTree<H::Node>,
	root: FiberId,
	deletions: &[FiberId],
	prefix: &str,
) -> CommitReport {
	let mut report = CommitReport::default();

	for &deleted in deletions {
		let Some(parent) = tree.host_parent(deleted) else {
			continue;
		};
		for node in tree.host_roots(deleted) {
			host.remove_child(&parent, &node);
			report.deletions += 1;
		}
	}

	let empty = Attributes::new();
	for id in tree.preorder(root) {
		let Some(fiber) = tree.get(id) else {
			continue;
		};
		let Some(node) = fiber.node() else {
			continue;
		};
		match fiber.effect_tag() {
			EffectTag::Placement => {
				let patches = diff_props(&empty, fiber.props().attributes(), prefix);
				apply_patches(host, node, &patches);
				report.patches += patches.len();
				if let Some(parent) = tree.host_parent(id) {
					host.append_child(&parent, node);
					report.placements += 1;
				}
			}
			EffectTag::Update => {
				let Some(previous) = fiber.alternate().and_then(|alternate| tree.get(alternate)) else {
					continue;
				};
				let patches = diff_props(previous.props().attributes(), fiber.props().attributes(), prefix);
				apply_patches(host, node, &patches);
				report.patches += patches.len();
				report.updates += 1;
			}
			EffectTag::None | EffectTag::Deletion => {}
		}
	}

	report
}
