//! End-to-end exploration: grow a graph from its start node through the
//! directional affordances and check the engine keeps up.

#![allow(unused_crate_dependencies)]

use std::cell::RefCell;
use std::rc::Rc;

use graph_explorer::DemoGraphStore;
use graph_explorer::components::force_graph::{
	ApproxTextMeasure, ClickTarget, GraphConfig, GraphEvents, GraphSimulation, NodeClickEvent,
	Point,
};

fn engine_with_recorder() -> (GraphSimulation, Rc<RefCell<Vec<NodeClickEvent>>>) {
	let events = GraphEvents::new();
	let clicks = Rc::new(RefCell::new(Vec::new()));
	let sink = clicks.clone();
	let _ = events.subscribe_to_node_clicks(move |e| sink.borrow_mut().push(e.clone()));
	(
		GraphSimulation::new(800.0, 600.0, events, GraphConfig::default()),
		clicks,
	)
}

#[test]
fn expanding_start_node_adds_three_linked_nodes() {
	let measure = ApproxTextMeasure::default();
	let mut store = DemoGraphStore::new(Point::new(400.0, 200.0));
	let (mut engine, clicks) = engine_with_recorder();
	engine.update(&store.graph_data(), 0.0, &measure);

	// Hover the start node, then click its Right affordance.
	let start = engine.node_renderer().visual("1").unwrap().position;
	let screen = engine.viewport().transform().apply(start);
	engine.pointer_move(screen);
	let right = screen + Point::new(20.0, 0.0);
	engine.pointer_move(right);
	engine.pointer_down(right);
	engine.pointer_up();
	engine.click(right, 100.0);
	engine.frame(450.0);

	let event = clicks.borrow_mut().pop().expect("right affordance click");
	assert_eq!(event.click_target, ClickTarget::Right);
	assert!(!event.is_double_click);
	assert!(engine.pinned_ids().is_empty());

	let before = engine.simulation().node("1").unwrap().position();
	store.insert_related_nodes(&event.node.id, Some(event.position), Point::new(50.0, 0.0));
	engine.update(&store.graph_data(), 500.0, &measure);

	assert_eq!(engine.node_renderer().len(), 4);
	assert_eq!(engine.link_renderer().len(), 3);
	assert_eq!(engine.simulation().resolved_link_count(), 3);
	for link in engine.link_renderer().visuals() {
		assert_eq!(link.link.source, "1");
		assert!(link.geometry.length.is_finite());
	}

	// Retained node kept its kinematic state across the update.
	let kept = engine.simulation().node("1").unwrap().position();
	assert_eq!(kept, before);

	let mut now = 500.0;
	for _ in 0..400 {
		now += 16.0;
		engine.frame(now);
	}
	for node in engine.simulation().nodes() {
		assert!(node.position().is_finite());
	}
	assert_eq!(engine.simulation().alpha_target(), 0.0);
}

#[test]
fn clearing_unpinned_keeps_dragged_nodes() {
	let measure = ApproxTextMeasure::default();
	let mut store = DemoGraphStore::new(Point::new(400.0, 200.0));
	store.insert_related_nodes("1", None, Point::new(0.0, 50.0));
	let (mut engine, _) = engine_with_recorder();
	engine.update(&store.graph_data(), 0.0, &measure);

	// Related nodes overlap; the last one added is on top.
	let at = engine.node_renderer().visual("4").unwrap().position;
	let screen = engine.viewport().transform().apply(at);
	engine.pointer_down(screen);
	engine.pointer_move(screen + Point::new(0.0, 40.0));
	engine.pointer_up();
	assert_eq!(engine.pinned_ids(), vec!["4"]);

	store.clear(true, &engine.pinned_ids());
	engine.update(&store.graph_data(), 100.0, &measure);

	assert_eq!(engine.node_renderer().len(), 1);
	assert!(engine.link_renderer().is_empty());
	assert!(engine.simulation().pin("4").unwrap().is_pinned());
}
