//! The renderer: one explicit scheduler context per host tree.
//!
//! A [`Renderer`] owns the fiber arena, the current and working roots, the
//! unit-of-work cursor, the deletion list and the deferred effect queue. The
//! host drives it turn by turn through [`Renderer::work_loop`], or all at
//! once through [`Renderer::flush`].
//!
//! ## Example
//!
//! ```ignore
//! let mut renderer = Renderer::new(host, RendererConfig::default())?;
//! renderer.render(app_element, container);
//! loop {
//!     match renderer.work_loop(&TimeSlice::new(idle_budget))? {
//!         WorkStatus::Suspended { .. } => request_idle_callback(),
//!         _ => break,
//!     }
//! }
//! ```

use std::fmt;
use std::mem;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::commit::{CommitReport, commit_mutations};
use crate::config::{ConfigError, RendererConfig};
use crate::element::{Attributes, Element, Props};
use crate::error::{RenderError, RenderResult};
use crate::fiber::{EffectTag, Fiber, FiberId, FiberKind, FiberTree};
use crate::hooks::{EffectFn, Hooks, UpdateSignal};
use crate::host::Host;
use crate::reconciler::reconcile_children;
use crate::scheduler::{Deadline, SchedulerState, Unbounded, WorkStatus};

/// Incremental renderer bound to one host.
pub struct Renderer<H: Host> {
	host: H,
	config: RendererConfig,
	tree: FiberTree<H::Node>,
	current_root: Option<FiberId>,
	working_root: Option<FiberId>,
	next_unit: Option<FiberId>,
	deletions: Vec<FiberId>,
	pending_effects: Vec<EffectFn>,
	signal: Rc<UpdateSignal>,
	generation: u64,
	state: SchedulerState,
}

impl<H: Host> Renderer<H> {
	/// Creates an idle renderer after validating `config`.
	pub fn new(host: H, config: RendererConfig) -> Result<Self, ConfigError> {
		config.validate()?;
		Ok(Self::with_config_unchecked(host, config))
	}

	/// Creates an idle renderer with the default configuration.
	pub fn with_default_config(host: H) -> Self {
		Self::with_config_unchecked(host, RendererConfig::default())
	}

	fn with_config_unchecked(host: H, config: RendererConfig) -> Self {
		Self {
			host,
			config,
			tree: FiberTree::new(),
			current_root: None,
			working_root: None,
			next_unit: None,
			deletions: Vec::new(),
			pending_effects: Vec::new(),
			signal: Rc::new(UpdateSignal::default()),
			generation: 0,
			state: SchedulerState::Idle,
		}
	}

	/// Requests rendering `element` into `container`.
	///
	/// Seeds a new working root whose alternate is the current root. Any
	/// partially built working tree is abandoned. No work is performed until
	/// the next [`work_loop`](Self::work_loop) or [`flush`](Self::flush).
	pub fn render(&mut self, element: Element, container: H::Node) {
		if self.working_root.is_some() {
			self.abandon("superseded by render");
		}
		let props = Rc::new(Props::new(Attributes::new(), vec![element]));
		self.seed(props, container, self.current_root);
	}

	/// Runs one scheduling turn.
	///
	/// Performs units of work until the deadline's remaining time drops below
	/// the configured threshold, or until the working tree is complete, in
	/// which case it is committed. Pending state updates restart the working
	/// tree from the current root before the next unit.
	pub fn work_loop(&mut self, deadline: &dyn Deadline) -> RenderResult<WorkStatus> {
		let threshold = self.config.yield_threshold();
		let limit = self.config.flush_pass_limit();
		let mut performed = 0;
		let mut restarts = 0;

		loop {
			if self.signal.take() {
				restarts += 1;
				if restarts > limit {
					self.abandon("update loop");
					return Err(RenderError::FlushLimitExceeded { limit });
				}
				self.restart_from_current();
			}

			let Some(unit) = self.next_unit else {
				break;
			};
			if deadline.time_remaining() < threshold {
				self.state = SchedulerState::Suspended;
				trace!(performed, generation = self.generation, "work loop suspended");
				return Ok(WorkStatus::Suspended { performed });
			}

			self.state = SchedulerState::Active;
			match self.perform_unit_of_work(unit) {
				Ok(next) => self.next_unit = next,
				Err(error) => {
					warn!(generation = self.generation, %error, "render generation failed");
					self.abandon("render error");
					return Err(error);
				}
			}
			performed += 1;
		}

		if self.working_root.is_none() {
			self.state = SchedulerState::Idle;
			return Ok(WorkStatus::Idle);
		}
		self.state = SchedulerState::Drained;
		let report = self.commit_root();
		self.state = SchedulerState::Idle;
		Ok(WorkStatus::Committed(report))
	}

	/// Drives turns without a deadline until no work and no update remain.
	///
	/// Returns the report of every commit, in order. Fails with
	/// [`RenderError::FlushLimitExceeded`] if work keeps appearing after the
	/// configured number of passes.
	pub fn flush(&mut self) -> RenderResult<Vec<CommitReport>> {
		let limit = self.config.flush_pass_limit();
		let mut reports = Vec::new();
		for _ in 0..limit {
			match self.work_loop(&Unbounded)? {
				WorkStatus::Idle => return Ok(reports),
				WorkStatus::Suspended { .. } => {}
				WorkStatus::Committed(report) => reports.push(report),
			}
		}
		if self.has_pending_work() {
			self.abandon("flush limit");
			self.signal.take();
			return Err(RenderError::FlushLimitExceeded { limit });
		}
		Ok(reports)
	}

	/// Returns true if a working tree or a state update is waiting.
	pub fn has_pending_work(&self) -> bool {
		self.working_root.is_some() || self.signal.is_requested()
	}

	/// Returns the scheduler state.
	pub fn scheduler_state(&self) -> SchedulerState {
		self.state
	}

	/// Returns the host.
	pub fn host(&self) -> &H {
		&self.host
	}

	/// Returns the host mutably.
	pub fn host_mut(&mut self) -> &mut H {
		&mut self.host
	}

	/// Returns the configuration.
	pub fn config(&self) -> &RendererConfig {
		&self.config
	}

	/// Returns the fiber arena.
	pub fn fibers(&self) -> &FiberTree<H::Node> {
		&self.tree
	}

	/// Returns the root of the last committed generation.
	pub fn current_root(&self) -> Option<FiberId> {
		self.current_root
	}

	/// Consumes the renderer, returning the host.
	pub fn into_host(self) -> H {
		self.host
	}

	fn seed(&mut self, props: Rc<Props>, container: H::Node, alternate: Option<FiberId>) {
		self.generation += 1;
		let mut root = Fiber::new(FiberKind::Root, props, self.generation);
		root.node = Some(container);
		root.alternate = alternate;
		let root = self.tree.insert(root);
		self.working_root = Some(root);
		self.next_unit = Some(root);
		self.state = SchedulerState::Active;
		debug!(generation = self.generation, update = alternate.is_some(), "seeded working root");
	}

	/// Replaces the working tree with a fresh one derived from the latest
	/// requested root, keeping the current root as its alternate.
	fn restart_from_current(&mut self) {
		let seed = self
			.working_root
			.or(self.current_root)
			.and_then(|id| self.tree.get(id))
			.and_then(|root| root.node.clone().map(|container| (Rc::clone(&root.props), container)));
		if self.working_root.is_some() {
			self.abandon("state update");
		}
		let Some((props, container)) = seed else {
			trace!("state update with nothing rendered, ignored");
			return;
		};
		if self.current_root.is_none() {
			warn!("state update before the first commit, restarting the first render");
		}
		self.seed(props, container, self.current_root);
	}

	/// Discards the working generation.
	fn abandon(&mut self, reason: &str) {
		if self.working_root.take().is_some() {
			let orphans = self.tree.placed_nodes(self.generation);
			for node in &orphans {
				self.host.release_node(node);
			}
			debug!(
				generation = self.generation,
				reason,
				released = orphans.len(),
				"abandoned working tree"
			);
			self.tree.discard_generation(self.generation);
		}
		self.next_unit = None;
		for id in self.deletions.drain(..) {
			if let Some(fiber) = self.tree.get_mut(id) {
				fiber.effect_tag = EffectTag::None;
			}
		}
		self.pending_effects.clear();
		self.state = SchedulerState::Idle;
	}

	/// Processes one fiber and returns the next unit in pre-order.
	fn perform_unit_of_work(&mut self, id: FiberId) -> RenderResult<Option<FiberId>> {
		let Some(fiber) = self.tree.get(id) else {
			return Ok(None);
		};
		let kind = fiber.kind.clone();
		let props = Rc::clone(&fiber.props);
		let has_node = fiber.node.is_some();
		let alternate = fiber.alternate;
		trace!(kind = ?kind, generation = self.generation, "unit of work");

		match kind {
			FiberKind::Root => {
				self.reconcile(id, props.children());
			}
			FiberKind::Host(tag) => {
				if !has_node {
					let node = self.host.create_node(&tag)?;
					self.attach_node(id, node);
				}
				self.reconcile(id, props.children());
			}
			FiberKind::Text => {
				if !has_node {
					let node = self.host.create_text_node()?;
					self.attach_node(id, node);
				}
				self.reconcile(id, &[]);
			}
			FiberKind::Component(component) => {
				let previous = alternate
					.and_then(|alternate| self.tree.get(alternate))
					.map(|fiber| fiber.hooks.as_slice());
				let mut hooks = Hooks::new(component.name(), previous, &self.signal);
				let rendered = component.render(&props, &mut hooks);
				let (slots, effects) = hooks.finish()?;
				let elements = rendered?;
				if let Some(fiber) = self.tree.get_mut(id) {
					fiber.hooks = slots;
				}
				self.pending_effects.extend(effects);
				self.reconcile(id, &elements);
			}
		}

		let root = self.working_root.unwrap_or(id);
		Ok(self.tree.next_in_preorder(id, root))
	}

	fn attach_node(&mut self, id: FiberId, node: H::Node) {
		if let Some(fiber) = self.tree.get_mut(id) {
			fiber.node = Some(node);
		}
	}

	fn reconcile(&mut self, id: FiberId, elements: &[Element]) {
		reconcile_children(&mut self.tree, id, elements, &mut self.deletions);
	}

	/// Applies the working tree to the host, promotes it, then runs effects.
	fn commit_root(&mut self) -> CommitReport {
		let Some(root) = self.working_root.take() else {
			return CommitReport::default();
		};
		let deletions = mem::take(&mut self.deletions);
		let mut report = commit_mutations(
			&mut self.host,
			&self.tree,
			root,
			&deletions,
			self.config.event_prefix(),
		);

		self.tree.retain_generation(self.generation);
		for id in self.tree.preorder(root) {
			if let Some(fiber) = self.tree.get_mut(id) {
				fiber.alternate = None;
				fiber.effect_tag = EffectTag::None;
			}
		}
		self.current_root = Some(root);
		self.next_unit = None;

		for effect in mem::take(&mut self.pending_effects) {
			effect();
			report.effects += 1;
		}

		debug!(
			generation = self.generation,
			deletions = report.deletions,
			placements = report.placements,
			updates = report.updates,
			patches = report.patches,
			effects = report.effects,
			"committed generation"
		);
		report
	}
}

impl<H: Host + fmt::Debug> fmt::Debug for Renderer<H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Renderer")
			.field("host", &self.host)
			.field("state", &self.state)
			.field("generation", &self.generation)
			.field("fibers", &self.tree.len())
			.finish()
	}
}
