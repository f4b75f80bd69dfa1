//! End-to-end scenario: a counter, a toggle and a static list inside a
//! container component.

use std::cell::Cell;
use std::rc::Rc;

use pipot::{TEXT_ATTRIBUTE, deps};
use pipot::prelude::*;
use pipot::testkit::{Mounted, Mutation, NodeId, mounted};
use rstest::rstest;

const GROCERIES: [&str; 3] = ["Milk", "Sugar", "Sour"];

fn container(props: &Props, _hooks: &mut Hooks<'_>) -> RenderResult<Element> {
	Ok(Element::host("div")
		.attr("id", "container")
		.child(Element::host("h1").child("I'm inside container"))
		.children(props.children().to_vec()))
}

fn grocery_app(greetings: Rc<Cell<usize>>) -> impl Fn(&Props, &mut Hooks<'_>) -> RenderResult<Element> {
	move |props: &Props, hooks: &mut Hooks<'_>| -> RenderResult<Element> {
		let name = props.text("name").unwrap_or_default();
		let (counter, set_counter) = hooks.use_state(0_i64)?;
		let (shown, set_shown) = hooks.use_state(true)?;
		let greetings = Rc::clone(&greetings);
		hooks.use_effect(deps![], move || greetings.set(greetings.get() + 1))?;

		let panel = Element::host("div")
			.child(Element::host("h1").child(format!("hello! {name}")))
			.child(
				Element::host("button")
					.listener("onClick", move |_| set_counter.update(|n| n + 1))
					.child("+"),
			)
			.child(Element::host("h2").child(counter))
			.child(
				Element::host("ul").children(GROCERIES.iter().map(|item| Element::host("li").child(*item))),
			);
		Ok(Element::component(container)
			.child(panel)
			.child(
				Element::host("button")
					.listener("onClick", move |_| set_shown.update(|shown| !shown))
					.child(if shown { "hide" } else { "show" }),
			)
			.child(Element::host("h2").child(if shown { "Please, don't hide me!" } else { "Show me!" })))
	}
}

struct Scenario {
	mounted: Mounted,
	greetings: Rc<Cell<usize>>,
	app: Element,
}

impl Scenario {
	fn start(mut mounted: Mounted, name: &str) -> Self {
		let greetings = Rc::new(Cell::new(0));
		let app = Element::component(grocery_app(Rc::clone(&greetings))).attr("name", name);
		let container = mounted.container;
		mounted.renderer.render(app.clone(), container);
		mounted.renderer.flush().unwrap();
		Self {
			mounted,
			greetings,
			app,
		}
	}

	fn buttons(&self) -> Vec<NodeId> {
		self.mounted.host().find_by_tag(self.mounted.container, "button")
	}

	fn click(&self, index: usize) {
		let button = self.buttons()[index];
		assert_eq!(self.mounted.host().dispatch(button, "click"), 1);
	}

	fn settle(&mut self) -> Vec<CommitReport> {
		self.mounted.renderer.flush().unwrap()
	}

	fn headings(&self) -> Vec<String> {
		let host = self.mounted.host();
		host.find_by_tag(self.mounted.container, "h2")
			.into_iter()
			.map(|node| host.text_content(node))
			.collect()
	}
}

#[rstest]
fn test_initial_render(mounted: Mounted) {
	let scenario = Scenario::start(mounted, "Person");

	assert_eq!(
		scenario.mounted.markup(),
		concat!(
			r#"<div id="container"><h1>I'm inside container</h1>"#,
			"<div><h1>hello! Person</h1><button>+</button><h2>0</h2>",
			"<ul><li>Milk</li><li>Sugar</li><li>Sour</li></ul></div>",
			"<button>hide</button><h2>Please, don't hide me!</h2></div>",
		)
	);
	assert_eq!(scenario.greetings.get(), 1);
}

#[rstest]
fn test_counter_updates_in_place(mounted: Mounted) {
	let mut scenario = Scenario::start(mounted, "Person");
	let container = scenario.mounted.container;
	let nodes = scenario.mounted.host().node_count();
	let items = scenario.mounted.host().find_by_tag(container, "li");

	for _ in 0..3 {
		scenario.click(0);
		assert_eq!(scenario.settle().len(), 1);
	}

	assert_eq!(scenario.headings(), vec!["3", "Please, don't hide me!"]);
	assert_eq!(scenario.mounted.host().node_count(), nodes);
	assert_eq!(scenario.mounted.host().find_by_tag(container, "li"), items);
	assert_eq!(scenario.greetings.get(), 1);
}

#[rstest]
fn test_toggle_patches_text_only(mounted: Mounted) {
	let mut scenario = Scenario::start(mounted, "Person");
	let h2_nodes = scenario.mounted.host().find_by_tag(scenario.mounted.container, "h2");
	scenario.mounted.host_mut().clear_trace();

	scenario.click(1);
	scenario.settle();

	assert_eq!(scenario.headings(), vec!["0", "Show me!"]);
	assert_eq!(
		scenario.mounted.host().find_by_tag(scenario.mounted.container, "h2"),
		h2_nodes
	);
	let trace = scenario.mounted.host().trace();
	assert!(trace.iter().all(Mutation::is_attribute_mutation));
	let texts: Vec<String> = trace
		.iter()
		.filter_map(|mutation| match mutation {
			Mutation::SetAttribute { name, value, .. } if name == TEXT_ATTRIBUTE => Some(value.to_string()),
			_ => None,
		})
		.collect();
	assert_eq!(texts, vec!["show", "Show me!"]);

	scenario.click(1);
	scenario.settle();
	assert_eq!(scenario.headings(), vec!["0", "Please, don't hide me!"]);
}

#[rstest]
fn test_clicks_before_flush_commit_together(mounted: Mounted) {
	let mut scenario = Scenario::start(mounted, "Person");

	scenario.click(0);
	scenario.click(1);
	scenario.click(0);
	let reports = scenario.settle();

	assert_eq!(reports.len(), 1);
	assert_eq!(reports[0].deletions + reports[0].placements, 0);
	assert_eq!(scenario.headings(), vec!["2", "Show me!"]);
}

#[rstest]
fn test_new_name_keeps_state(mounted: Mounted) {
	let mut scenario = Scenario::start(mounted, "Person");
	scenario.click(0);
	scenario.settle();

	let container = scenario.mounted.container;
	let renamed = scenario.app.clone().attr("name", "Ada");
	scenario.mounted.renderer.render(renamed, container);
	scenario.settle();

	let host = scenario.mounted.host();
	let title = host.find_by_tag(container, "h1")[1];
	assert_eq!(host.text_content(title), "hello! Ada");
	assert_eq!(scenario.headings()[0], "1");
	assert_eq!(scenario.greetings.get(), 1);
}
