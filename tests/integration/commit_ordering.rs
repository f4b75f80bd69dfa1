//! Ordering guarantees of the commit phase.

use std::cell::RefCell;
use std::rc::Rc;

use pipot::prelude::*;
use pipot::testkit::{Mounted, Mutation, NodeId, RecordingHost, ScriptedDeadline, mounted};
use pipot::{Listener, deps};
use rstest::rstest;

type Log = Rc<RefCell<Vec<String>>>;

/// Recording host that also writes tree mutations into a shared log, so
/// effects can be ordered against them.
struct LoggingHost {
	inner: RecordingHost,
	log: Log,
}

impl Host for LoggingHost {
	type Node = NodeId;

	fn create_node(&mut self, tag: &str) -> Result<NodeId, HostError> {
		self.inner.create_node(tag)
	}

	fn create_text_node(&mut self) -> Result<NodeId, HostError> {
		self.inner.create_text_node()
	}

	fn set_attribute(&mut self, node: &NodeId, name: &str, value: &Value) {
		self.log.borrow_mut().push(format!("set {name}"));
		self.inner.set_attribute(node, name, value);
	}

	fn clear_attribute(&mut self, node: &NodeId, name: &str) {
		self.inner.clear_attribute(node, name);
	}

	fn add_listener(&mut self, node: &NodeId, event: &str, listener: &Listener) {
		self.inner.add_listener(node, event, listener);
	}

	fn remove_listener(&mut self, node: &NodeId, event: &str, listener: &Listener) {
		self.inner.remove_listener(node, event, listener);
	}

	fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
		self.log.borrow_mut().push("append".to_string());
		self.inner.append_child(parent, child);
	}

	fn remove_child(&mut self, parent: &NodeId, child: &NodeId) {
		self.log.borrow_mut().push("remove".to_string());
		self.inner.remove_child(parent, child);
	}
}

fn position(trace: &[Mutation], predicate: impl Fn(&Mutation) -> bool) -> usize {
	trace.iter().position(predicate).unwrap()
}

#[rstest]
fn test_deletion_precedes_placement_under_same_parent(mut mounted: Mounted) {
	let container = mounted.container;
	mounted
		.renderer
		.render(Element::host("ul").child(Element::host("li").child("old")), container);
	mounted.renderer.flush().unwrap();
	let ul = mounted.host().find_first(container, "ul").unwrap();
	let old = mounted.host().find_first(container, "li").unwrap();
	mounted.host_mut().clear_trace();

	mounted
		.renderer
		.render(Element::host("ul").child(Element::host("p").child("new")), container);
	mounted.renderer.flush().unwrap();
	let new = mounted.host().find_first(container, "p").unwrap();

	let trace = mounted.host().trace();
	let removed = position(trace, |m| *m == Mutation::RemoveChild { parent: ul, child: old });
	let placed = position(trace, |m| *m == Mutation::AppendChild { parent: ul, child: new });
	assert!(removed < placed);
	assert_eq!(mounted.markup(), "<ul><p>new</p></ul>");
}

#[rstest]
fn test_all_deletions_before_any_placement(mut mounted: Mounted) {
	let container = mounted.container;
	let before = Element::host("div")
		.child(Element::host("section").child(Element::host("a")))
		.child(Element::host("aside"));
	let after = Element::host("div")
		.child(Element::host("section").child(Element::host("b")))
		.child(Element::host("nav"));
	mounted.renderer.render(before, container);
	mounted.renderer.flush().unwrap();
	mounted.host_mut().clear_trace();

	mounted.renderer.render(after, container);
	let reports = mounted.renderer.flush().unwrap();

	let kinds: Vec<_> = mounted
		.host()
		.trace()
		.iter()
		.filter(|m| m.is_tree_mutation())
		.map(|m| matches!(m, Mutation::RemoveChild { .. }))
		.collect();
	assert_eq!(kinds, vec![true, true, false, false]);
	assert_eq!(reports[0].deletions, 2);
	assert_eq!(reports[0].placements, 2);
}

#[rstest]
fn test_placement_is_appended_at_end_of_parent(mut mounted: Mounted) {
	let container = mounted.container;
	let row = |middle: &'static str| {
		Element::host("tr")
			.child(Element::host("td"))
			.child(Element::host(middle))
			.child(Element::host("td"))
	};
	mounted.renderer.render(row("th"), container);
	mounted.renderer.flush().unwrap();

	mounted.renderer.render(row("output"), container);
	mounted.renderer.flush().unwrap();

	// Positional matching keeps both cells and appends the replacement.
	assert_eq!(mounted.markup(), "<tr><td></td><td></td><output></output></tr>");
}

#[rstest]
fn test_render_phase_never_touches_the_tree(mut mounted: Mounted) {
	let container = mounted.container;
	mounted.renderer.render(
		Element::host("ul")
			.attr("id", "list")
			.child(Element::host("li").child("a"))
			.child(Element::host("li").child("b")),
		container,
	);

	let status = mounted.renderer.work_loop(&ScriptedDeadline::units(4)).unwrap();

	assert_eq!(status, WorkStatus::Suspended { performed: 4 });
	assert!(
		mounted
			.host()
			.trace()
			.iter()
			.all(|m| matches!(m, Mutation::CreateNode { .. } | Mutation::CreateTextNode { .. }))
	);
	assert!(mounted.host().children(container).is_empty());

	mounted.renderer.flush().unwrap();
	assert_eq!(mounted.markup(), r#"<ul id="list"><li>a</li><li>b</li></ul>"#);
}

fn logged_effect(name: &'static str, log: Log) -> impl Fn(&Props, &mut Hooks<'_>) -> RenderResult<Element> {
	move |props: &Props, hooks: &mut Hooks<'_>| -> RenderResult<Element> {
		let log = Rc::clone(&log);
		hooks.use_effect(deps![], move || log.borrow_mut().push(format!("effect {name}")))?;
		Ok(Element::host("div").children(props.children().to_vec()))
	}
}

#[rstest]
fn test_effects_run_after_host_tree_is_complete_in_visit_order() {
	let log: Log = Rc::default();
	let mut inner = RecordingHost::new();
	let container = inner.create_container();
	let host = LoggingHost {
		inner,
		log: Rc::clone(&log),
	};
	let mut renderer = Renderer::new(host, RendererConfig::default()).unwrap();

	let child = Element::component(logged_effect("child", Rc::clone(&log)));
	let parent = Element::component(logged_effect("parent", Rc::clone(&log))).child(child);
	renderer.render(parent, container);
	let reports = renderer.flush().unwrap();

	assert_eq!(
		*log.borrow(),
		vec!["append", "append", "effect parent", "effect child"]
	);
	assert_eq!(reports[0].effects, 2);
}
