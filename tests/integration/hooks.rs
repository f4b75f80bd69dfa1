//! State and effect hooks across generations.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pipot::prelude::*;
use pipot::testkit::{Mounted, mounted};
use pipot::{HookMismatch, deps};
use rstest::rstest;

fn mount(app: &mut Mounted, element: Element) {
	let container = app.container;
	app.renderer.render(element, container);
	app.renderer.flush().unwrap();
}

fn click(app: &Mounted, tag: &str) {
	let node = app.host().find_first(app.container, tag).unwrap();
	assert_eq!(app.host().dispatch(node, "click"), 1);
}

fn two_slots(_props: &Props, hooks: &mut Hooks<'_>) -> RenderResult<Element> {
	let (count, set_count) = hooks.use_state(0_i64)?;
	let (flag, _set_flag) = hooks.use_state(true)?;
	Ok(Element::host("button")
		.listener("onClick", move |_| set_count.update(|n| n + 1))
		.child(format!("{count} {flag}")))
}

#[rstest]
fn test_state_slots_are_independent(mut mounted: Mounted) {
	mount(&mut mounted, Element::component(two_slots));
	assert_eq!(mounted.markup(), "<button>0 true</button>");

	click(&mounted, "button");
	assert!(mounted.renderer.has_pending_work());
	let reports = mounted.renderer.flush().unwrap();

	assert_eq!(reports.len(), 1);
	assert_eq!(mounted.markup(), "<button>1 true</button>");
}

#[rstest]
fn test_queued_actions_replay_in_order(mut mounted: Mounted) {
	let setter: Rc<RefCell<Option<SetState<i64>>>> = Rc::new(RefCell::new(None));
	let app = {
		let setter = Rc::clone(&setter);
		move |_: &Props, hooks: &mut Hooks<'_>| -> RenderResult<Element> {
			let (value, set_value) = hooks.use_state(1_i64)?;
			*setter.borrow_mut() = Some(set_value);
			Ok(Element::host("output").child(value))
		}
	};
	mount(&mut mounted, Element::component(app));

	let set_value = setter.borrow().clone().unwrap();
	set_value.update(|n| n + 2);
	set_value.update(|n| n * 10);
	set_value.set(7);
	set_value.update(|n| n - 1);
	mounted.renderer.flush().unwrap();

	assert_eq!(mounted.markup(), "<output>6</output>");
}

#[rstest]
fn test_state_survives_parent_rerender(mut mounted: Mounted) {
	let app = |props: &Props, _hooks: &mut Hooks<'_>| -> RenderResult<Element> {
		let title = props.text("title").unwrap_or_default();
		Ok(Element::host("div")
			.child(Element::host("h1").child(title))
			.child(Element::component(two_slots)))
	};
	mount(&mut mounted, Element::component(app).attr("title", "a"));
	click(&mounted, "button");
	mounted.renderer.flush().unwrap();

	mount(&mut mounted, Element::component(app).attr("title", "b"));

	assert_eq!(mounted.markup(), "<div><h1>b</h1><button>1 true</button></div>");
}

#[rstest]
fn test_state_resets_on_remount(mut mounted: Mounted) {
	mount(&mut mounted, Element::component(two_slots));
	click(&mounted, "button");
	mounted.renderer.flush().unwrap();
	assert_eq!(mounted.markup(), "<button>1 true</button>");

	mount(&mut mounted, Element::host("p"));
	mount(&mut mounted, Element::component(two_slots));

	assert_eq!(mounted.markup(), "<button>0 true</button>");
}

#[rstest]
fn test_effect_with_empty_deps_fires_once(mut mounted: Mounted) {
	let runs = Rc::new(Cell::new(0));
	let app = {
		let runs = Rc::clone(&runs);
		move |_: &Props, hooks: &mut Hooks<'_>| -> RenderResult<Element> {
			let (count, set_count) = hooks.use_state(0_i64)?;
			let runs = Rc::clone(&runs);
			hooks.use_effect(deps![], move || runs.set(runs.get() + 1))?;
			Ok(Element::host("button")
				.listener("onClick", move |_| set_count.update(|n| n + 1))
				.child(count))
		}
	};
	mount(&mut mounted, Element::component(app));
	assert_eq!(runs.get(), 1);

	for _ in 0..3 {
		click(&mounted, "button");
		mounted.renderer.flush().unwrap();
	}

	assert_eq!(mounted.markup(), "<button>3</button>");
	assert_eq!(runs.get(), 1);
}

#[rstest]
fn test_effect_fires_when_deps_change(mut mounted: Mounted) {
	let seen = Rc::new(RefCell::new(Vec::new()));
	let app = {
		let seen = Rc::clone(&seen);
		move |_: &Props, hooks: &mut Hooks<'_>| -> RenderResult<Element> {
			let (count, set_count) = hooks.use_state(0_i64)?;
			let (other, set_other) = hooks.use_state(0_i64)?;
			let seen = Rc::clone(&seen);
			hooks.use_effect(deps![count], move || seen.borrow_mut().push(count))?;
			Ok(Element::host("div")
				.child(Element::host("button").listener("onClick", move |_| set_count.update(|n| n + 1)))
				.child(Element::host("a").listener("onClick", move |_| set_other.update(|n| n + 1)))
				.child(other))
		}
	};
	mount(&mut mounted, Element::component(app));

	click(&mounted, "a");
	mounted.renderer.flush().unwrap();
	click(&mounted, "button");
	let reports = mounted.renderer.flush().unwrap();

	assert_eq!(*seen.borrow(), vec![0, 1]);
	assert_eq!(reports[0].effects, 1);
}

#[rstest]
fn test_effect_setting_state_triggers_another_pass(mut mounted: Mounted) {
	let app = |_: &Props, hooks: &mut Hooks<'_>| -> RenderResult<Element> {
		let (loaded, set_loaded) = hooks.use_state(false)?;
		hooks.use_effect(deps![], move || set_loaded.set(true))?;
		Ok(Element::host("p").child(if loaded { "ready" } else { "loading" }))
	};
	let container = mounted.container;
	mounted.renderer.render(Element::component(app), container);

	let reports = mounted.renderer.flush().unwrap();

	assert_eq!(reports.len(), 2);
	assert_eq!(mounted.markup(), "<p>ready</p>");
	assert!(!mounted.renderer.has_pending_work());
}

#[rstest]
fn test_conditional_hook_is_order_violation(mut mounted: Mounted) {
	let app = |props: &Props, hooks: &mut Hooks<'_>| -> RenderResult<Element> {
		if props.get("extra").is_some() {
			hooks.use_effect(deps![], || {})?;
		}
		let (count, _) = hooks.use_state(0_i64)?;
		Ok(Element::host("span").child(count))
	};
	mount(&mut mounted, Element::component(app));
	let container = mounted.container;

	mounted
		.renderer
		.render(Element::component(app).attr("extra", true), container);
	let error = mounted.renderer.flush().unwrap_err();

	match error {
		RenderError::HookOrderViolation { index, mismatch, .. } => {
			assert_eq!(index, 0);
			assert_eq!(
				mismatch,
				HookMismatch::Kind {
					expected: "effect",
					found: "state",
				}
			);
		}
		other => panic!("expected hook order violation, got {other:?}"),
	}
	assert_eq!(mounted.markup(), "<span>0</span>");
	assert_eq!(mounted.renderer.scheduler_state(), SchedulerState::Idle);
}

#[rstest]
fn test_dropped_hook_is_order_violation(mut mounted: Mounted) {
	fn shrinking(props: &Props, hooks: &mut Hooks<'_>) -> RenderResult<Element> {
		hooks.use_state(0_i64)?;
		if props.get("short").is_none() {
			hooks.use_state(0_i64)?;
		}
		Ok(Element::host("i"))
	}
	mount(&mut mounted, Element::component(shrinking));
	let container = mounted.container;

	mounted
		.renderer
		.render(Element::component(shrinking).attr("short", true), container);
	let error = mounted.renderer.flush().unwrap_err();

	assert_eq!(
		error,
		RenderError::HookOrderViolation {
			component: "shrinking",
			index: 1,
			mismatch: HookMismatch::Missing {
				called: 1,
				previous: 2,
			},
		}
	);
	assert_eq!(mounted.markup(), "<i></i>");
}

#[rstest]
fn test_different_component_starts_with_fresh_hooks(mut mounted: Mounted) {
	mount(&mut mounted, Element::component(two_slots));
	let container = mounted.container;
	let swapped = |_: &Props, hooks: &mut Hooks<'_>| -> RenderResult<Element> {
		let (flag, _) = hooks.use_state(false)?;
		Ok(Element::host("button").child(flag))
	};

	mounted.renderer.render(Element::component(swapped), container);
	mounted.renderer.flush().unwrap();

	assert_eq!(mounted.markup(), "<button>false</button>");
}
