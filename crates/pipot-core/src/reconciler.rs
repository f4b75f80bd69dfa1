//! Child reconciliation.
//!
//! Matching is positional: the n-th new element is compared with the n-th
//! fiber of the previous child chain, never by key. Reordering a list without
//! stable identity therefore produces delete/insert pairs (or in-place updates
//! with different content) rather than moves.

use tracing::trace;

use crate::element::Element;
use crate::fiber::{EffectTag, Fiber, FiberId, FiberKind, FiberTree};

/// Builds the child chain of `parent` from `elements`.
///
/// The previous chain is the child chain of `parent`'s alternate. Fibers of
/// the same kind at the same position are reused as UPDATE (keeping their host
/// node); new elements of a different kind become PLACEMENT; previous fibers
/// with no same-kind counterpart are tagged DELETION and pushed to
/// `deletions`.
pub(crate) fn reconcile_children<N: Clone>(
	tree: &mut FiberTree<N>,
	parent: FiberId,
	elements: &[Element],
	deletions: &mut Vec<FiberId>,
) {
	let Some(parent_fiber) = tree.get(parent) else {
		return;
	};
	let generation = parent_fiber.generation;
	let mut old = parent_fiber
		.alternate
		.and_then(|alternate| tree.get(alternate))
		.and_then(|alternate| alternate.child);

	let mut previous_sibling: Option<FiberId> = None;
	let mut index = 0;
	while index < elements.len() || old.is_some() {
		let element = elements.get(index);
		let old_fiber = old.and_then(|id| tree.get(id).map(|fiber| (id, fiber)));
		let same_kind = match (element, &old_fiber) {
			(Some(element), Some((_, fiber))) => fiber.kind.matches(element.kind()),
			_ => false,
		};

		let new_fiber = match (element, &old_fiber) {
			(Some(element), Some((old_id, fiber))) if same_kind => {
				let mut next = Fiber::new(FiberKind::from(element.kind()), element.shared_props(), generation);
				next.node = fiber.node.clone();
				next.alternate = Some(*old_id);
				next.effect_tag = EffectTag::Update;
				Some(next)
			}
			(Some(element), _) => {
				let mut next = Fiber::new(FiberKind::from(element.kind()), element.shared_props(), generation);
				next.effect_tag = EffectTag::Placement;
				Some(next)
			}
			(None, _) => None,
		};

		let old_sibling = old_fiber.as_ref().and_then(|(_, fiber)| fiber.sibling);
		if !same_kind && let Some((old_id, _)) = old_fiber {
			if let Some(fiber) = tree.get_mut(old_id) {
				fiber.effect_tag = EffectTag::Deletion;
			}
			deletions.push(old_id);
		}
		old = old_sibling;

		if let Some(mut fiber) = new_fiber {
			fiber.parent = Some(parent);
			trace!(index, kind = ?fiber.effect_tag, "reconciled child");
			let id = tree.insert(fiber);
			let link = match previous_sibling {
				None => tree.get_mut(parent).map(|fiber| &mut fiber.child),
				Some(sibling) => tree.get_mut(sibling).map(|fiber| &mut fiber.sibling),
			};
			if let Some(link) = link {
				*link = Some(id);
			}
			previous_sibling = Some(id);
		}
		index += 1;
	}
}
