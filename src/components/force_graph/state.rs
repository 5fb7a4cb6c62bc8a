//! Graph engine state: simulation, renderers and viewport behind one surface.
//!
//! Created once when the component mounts, then driven by two kinds of calls:
//! [`GraphSimulation::update`] when the graph data changes, and
//! [`GraphSimulation::frame`] once per animation frame. Pointer input arrives
//! in screen coordinates and is routed to zoom buttons, nodes, links or the
//! background, in that order.

use log::{debug, info};

use super::config::GraphConfig;
use super::events::GraphEvents;
use super::geometry::Point;
use super::interaction::{Click, ClickDisambiguator, Hit};
use super::links::{LinkRenderer, TextMeasure};
use super::nodes::NodeRenderer;
use super::simulation::Simulation;
use super::types::GraphData;
use super::viewport::{Viewport, ZoomButton};

/// What the current pointer press started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Press {
	Button(ZoomButton),
	Node,
	Pan,
}

/// Core graph state combining physics, rendering state and interaction.
pub struct GraphSimulation {
	config: GraphConfig,
	events: GraphEvents,
	simulation: Simulation,
	nodes: NodeRenderer,
	links: LinkRenderer,
	viewport: Viewport,
	clicks: ClickDisambiguator,
	press: Option<Press>,
	/// Set when a pan moved, so the click ending it is ignored.
	suppress_click: bool,
	/// When the post-update energy boost ends.
	reheat_until: Option<f64>,
}

impl GraphSimulation {
	pub fn new(width: f64, height: f64, events: GraphEvents, config: GraphConfig) -> Self {
		let center = Point::new(width * 0.5, height * 0.5);
		Self {
			simulation: Simulation::new(config.forces.clone(), center),
			nodes: NodeRenderer::new(config.node.clone(), config.interaction.drag_alpha_target),
			links: LinkRenderer::new(config.link.clone(), config.node.radius),
			viewport: Viewport::new(config.zoom.clone(), width, height),
			clicks: ClickDisambiguator::new(config.interaction.double_click_ms),
			press: None,
			suppress_click: false,
			reheat_until: None,
			events,
			config,
		}
	}

	/// Feeds new graph data to the engine and re-heats the layout.
	pub fn update(&mut self, data: &GraphData, now_ms: f64, measure: &dyn TextMeasure) {
		let link_diff = self.links.update(&data.links, measure);
		let node_diff = self.nodes.update(&data.nodes, &mut self.simulation);
		self.simulation.set_links(&data.links);

		for id in &node_diff.removed {
			self.clicks.forget_node(id);
		}
		for id in &link_diff.removed {
			self.clicks.forget_link(id);
		}

		self.simulation
			.set_alpha_target(self.config.interaction.update_alpha_target);
		self.simulation.restart();
		self.reheat_until = Some(now_ms + self.config.interaction.update_cooldown_ms);
		self.sync_renderers();

		info!(
			"graph: update with {} nodes, {} links ({} resolved)",
			data.nodes.len(),
			data.links.len(),
			self.simulation.resolved_link_count()
		);
	}

	/// Advances one animation frame. Returns whether the scene changed.
	pub fn frame(&mut self, now_ms: f64) -> bool {
		let mut changed = false;
		if let Some(click) = self.clicks.poll(now_ms) {
			self.dispatch(click);
			changed = true;
		}
		if self.reheat_until.is_some_and(|until| now_ms >= until) {
			self.reheat_until = None;
			if !self.nodes.holds_energy() {
				self.simulation.set_alpha_target(0.0);
			}
		}
		changed |= self.viewport.advance(now_ms);
		if self.simulation.step() {
			self.sync_renderers();
			changed = true;
		}
		changed
	}

	fn sync_renderers(&mut self) {
		self.nodes.tick(&self.simulation);
		self.links.tick(&self.simulation);
	}

	/// Changes the surface size; the layout re-centres on the new middle.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.viewport.resize(width, height);
		self.simulation.set_center(Point::new(width * 0.5, height * 0.5));
		self.simulation.restart();
	}

	pub fn pointer_down(&mut self, at: Point) {
		self.suppress_click = false;
		if let Some(button) = self.viewport.button_at(at) {
			self.press = Some(Press::Button(button));
			return;
		}
		let world = self.viewport.to_world(at);
		if let Some(hit) = self.nodes.hit_test(world) {
			self.nodes.pointer_down(&mut self.simulation, &hit, world);
			self.sync_renderers();
			self.press = Some(Press::Node);
			return;
		}
		self.viewport.pan_start(at);
		self.press = Some(Press::Pan);
	}

	pub fn pointer_move(&mut self, at: Point) {
		match self.press {
			Some(Press::Node) => {
				let world = self.viewport.to_world(at);
				self.nodes.pointer_move(&mut self.simulation, world);
				self.sync_renderers();
			}
			Some(Press::Pan) => self.viewport.pan_move(at),
			Some(Press::Button(_)) => {}
			None => {
				let world = self.viewport.to_world(at);
				let hovered = self.nodes.hover_target(world).map(String::from);
				self.nodes.hover(hovered.as_deref());
			}
		}
	}

	pub fn pointer_up(&mut self) {
		match self.press.take() {
			Some(Press::Node) => {
				self.nodes.pointer_up(&mut self.simulation);
				self.sync_renderers();
			}
			Some(Press::Pan) => self.suppress_click = self.viewport.pan_end(),
			Some(Press::Button(_)) | None => {}
		}
	}

	/// Pointer left the surface: ends any gesture and clears hover.
	pub fn pointer_leave(&mut self) {
		self.pointer_up();
		self.nodes.hover(None);
	}

	/// A completed click at screen point `at`.
	pub fn click(&mut self, at: Point, now_ms: f64) {
		if std::mem::take(&mut self.suppress_click) {
			return;
		}
		if let Some(button) = self.viewport.button_at(at) {
			self.viewport.press(button, now_ms);
			return;
		}
		let world = self.viewport.to_world(at);
		let hit = if let Some(hit) = self.nodes.hit_test(world) {
			if !self.nodes.accept_click(&hit.id) {
				debug!("graph: click on {} ended a drag", hit.id);
				return;
			}
			Hit::Node(hit)
		} else if let Some(id) = self.links.hit_test(world) {
			Hit::Link(id.to_string())
		} else {
			return;
		};
		for click in self.clicks.click(hit, now_ms) {
			self.dispatch(click);
		}
	}

	fn dispatch(&mut self, click: Click) {
		match click {
			Click::Single(Hit::Node(hit)) => {
				self.nodes.click(&mut self.simulation, &self.events, &hit);
				self.sync_renderers();
			}
			Click::Double(Hit::Node(hit)) => {
				self.nodes.double_click(&self.simulation, &self.events, &hit);
			}
			Click::Single(Hit::Link(id)) => self.links.click(&self.events, &id, false),
			Click::Double(Hit::Link(id)) => self.links.click(&self.events, &id, true),
		}
	}

	pub fn wheel(&mut self, at: Point, delta_y: f64, delta_mode: u32) {
		self.viewport.wheel(at, delta_y, delta_mode);
	}

	/// Ids of the nodes currently pinned.
	pub fn pinned_ids(&self) -> Vec<String> {
		self.simulation.pinned_ids()
	}

	pub fn events(&self) -> &GraphEvents {
		&self.events
	}

	pub fn config(&self) -> &GraphConfig {
		&self.config
	}

	pub fn node_renderer(&self) -> &NodeRenderer {
		&self.nodes
	}

	pub fn link_renderer(&self) -> &LinkRenderer {
		&self.links
	}

	pub fn viewport(&self) -> &Viewport {
		&self.viewport
	}

	pub fn simulation(&self) -> &Simulation {
		&self.simulation
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::collections::BTreeSet;
	use std::rc::Rc;

	use super::*;
	use crate::components::force_graph::links::ApproxTextMeasure;
	use crate::components::force_graph::types::{
		ClickTarget, GraphLink, GraphNode, LinkClickEvent, NodeClickEvent, Pin,
	};

	const ALL: [ClickTarget; 5] = [
		ClickTarget::Center,
		ClickTarget::Up,
		ClickTarget::Down,
		ClickTarget::Left,
		ClickTarget::Right,
	];

	fn node(id: &str, at: (f64, f64)) -> GraphNode {
		GraphNode {
			id: id.into(),
			icon: 0xf0c0,
			label: format!("Node {id}"),
			details: String::new(),
			supported_click_targets: ALL.into_iter().collect::<BTreeSet<_>>(),
			css_classes: vec![],
			position: Some(Point::new(at.0, at.1)),
		}
	}

	fn link(id: &str, source: &str, target: &str) -> GraphLink {
		GraphLink {
			id: id.into(),
			source: source.into(),
			target: target.into(),
			label: Some(format!("Link {id}")),
			details: None,
			css_classes: vec![],
		}
	}

	fn two_nodes() -> GraphData {
		GraphData {
			nodes: vec![node("a", (200.0, 300.0)), node("b", (600.0, 300.0))],
			links: vec![link("1", "a", "b")],
		}
	}

	struct Recorder {
		nodes: Rc<RefCell<Vec<NodeClickEvent>>>,
		links: Rc<RefCell<Vec<LinkClickEvent>>>,
	}

	fn engine() -> (GraphSimulation, Recorder) {
		let events = GraphEvents::new();
		let nodes = Rc::new(RefCell::new(Vec::new()));
		let links = Rc::new(RefCell::new(Vec::new()));
		let (n, l) = (nodes.clone(), links.clone());
		let _ = events.subscribe_to_node_clicks(move |e| n.borrow_mut().push(e.clone()));
		let _ = events.subscribe_to_link_clicks(move |e| l.borrow_mut().push(e.clone()));
		let mut engine = GraphSimulation::new(800.0, 600.0, events, GraphConfig::default());
		engine.update(&two_nodes(), 0.0, &ApproxTextMeasure::default());
		(engine, Recorder { nodes, links })
	}

	fn node_screen(engine: &GraphSimulation, id: &str) -> Point {
		let world = engine.node_renderer().visual(id).unwrap().position;
		engine.viewport().transform().apply(world)
	}

	#[test]
	fn update_reconciles_and_resolves_links() {
		let (engine, _) = engine();
		assert_eq!(engine.node_renderer().len(), 2);
		assert_eq!(engine.link_renderer().len(), 1);
		assert_eq!(engine.simulation().resolved_link_count(), 1);
		let geometry = &engine.link_renderer().visual("1").unwrap().geometry;
		assert!((geometry.length - 400.0).abs() < 1e-9);
	}

	#[test]
	fn reheat_ends_after_cooldown() {
		let (mut engine, _) = engine();
		assert_eq!(engine.simulation().alpha_target(), 0.2);
		engine.frame(499.0);
		assert_eq!(engine.simulation().alpha_target(), 0.2);
		engine.frame(500.0);
		assert_eq!(engine.simulation().alpha_target(), 0.0);
	}

	#[test]
	fn affordance_press_across_cooldown_still_cools() {
		let (mut engine, _) = engine();
		let centre = node_screen(&engine, "a");
		let up = centre + Point::new(0.0, -20.0);
		engine.pointer_move(centre);
		engine.pointer_move(up);
		engine.pointer_down(up);
		engine.frame(450.0);
		engine.frame(520.0);
		assert_eq!(engine.simulation().alpha_target(), 0.0);
		engine.pointer_up();

		let mut now = 520.0;
		for _ in 0..2000 {
			now += 16.0;
			engine.frame(now);
		}
		assert!(!engine.simulation().is_running());
	}

	#[test]
	fn outline_drag_across_cooldown_cools_on_release() {
		let (mut engine, _) = engine();
		let at = node_screen(&engine, "a");
		engine.pointer_down(at);
		engine.frame(520.0);
		assert_eq!(engine.simulation().alpha_target(), 0.3);
		engine.pointer_up();
		assert_eq!(engine.simulation().alpha_target(), 0.0);
	}

	#[test]
	fn frames_cool_the_layout_until_it_stops() {
		let (mut engine, _) = engine();
		let mut now = 0.0;
		for _ in 0..2000 {
			now += 16.0;
			engine.frame(now);
		}
		assert!(!engine.simulation().is_running());
		assert!(!engine.frame(now + 16.0));
	}

	#[test]
	fn single_click_fires_after_window() {
		let (mut engine, rec) = engine();
		let at = node_screen(&engine, "a");
		engine.pointer_down(at);
		engine.pointer_up();
		engine.click(at, 1000.0);
		assert!(rec.nodes.borrow().is_empty());

		engine.frame(1301.0);
		let events = rec.nodes.borrow();
		assert_eq!(events.len(), 1);
		assert_eq!(events[0].node.id, "a");
		assert_eq!(events[0].click_target, ClickTarget::Center);
		assert!(!events[0].is_double_click);
	}

	#[test]
	fn double_click_fires_once_and_keeps_pin() {
		let (mut engine, rec) = engine();
		let at = node_screen(&engine, "b");
		for t in [1000.0, 1200.0] {
			engine.pointer_down(at);
			engine.pointer_up();
			engine.click(at, t);
		}
		engine.frame(2000.0);

		let events = rec.nodes.borrow();
		assert_eq!(events.len(), 1);
		assert!(events[0].is_double_click);
		assert_eq!(engine.pinned_ids(), vec!["b"]);
	}

	#[test]
	fn drag_pins_and_suppresses_click() {
		let (mut engine, rec) = engine();
		let at = node_screen(&engine, "a");
		engine.pointer_down(at);
		engine.pointer_move(Point::new(250.0, 100.0));
		assert_eq!(engine.simulation().alpha_target(), 0.3);
		engine.pointer_up();
		engine.click(Point::new(250.0, 100.0), 1000.0);
		engine.frame(2000.0);

		assert!(rec.nodes.borrow().is_empty());
		assert_eq!(
			engine.simulation().pin("a"),
			Some(Pin::Pinned { x: 250.0, y: 100.0 })
		);
		assert_eq!(engine.simulation().alpha_target(), 0.0);
	}

	#[test]
	fn plain_click_releases_pin() {
		let (mut engine, _) = engine();
		let at = node_screen(&engine, "a");
		engine.pointer_down(at);
		engine.pointer_up();
		assert_eq!(engine.pinned_ids(), vec!["a"]);
		engine.click(at, 1000.0);
		engine.frame(1400.0);
		assert!(engine.pinned_ids().is_empty());
	}

	#[test]
	fn hover_then_affordance_click_publishes_direction() {
		let (mut engine, rec) = engine();
		let centre = node_screen(&engine, "a");
		engine.pointer_move(centre);
		assert_eq!(engine.node_renderer().hovered(), Some("a"));

		let up = centre + Point::new(0.0, -20.0);
		engine.pointer_move(up);
		engine.pointer_down(up);
		engine.pointer_up();
		engine.click(up, 1000.0);
		engine.frame(1400.0);

		let events = rec.nodes.borrow();
		assert_eq!(events.len(), 1);
		assert_eq!(events[0].click_target, ClickTarget::Up);
		assert!(engine.pinned_ids().is_empty());

		drop(events);
		engine.pointer_leave();
		assert_eq!(engine.node_renderer().hovered(), None);
	}

	#[test]
	fn link_click_publishes_link_event() {
		let (mut engine, rec) = engine();
		let mid = Point::new(400.0, 300.0);
		engine.pointer_down(mid);
		engine.pointer_up();
		engine.click(mid, 1000.0);
		engine.frame(1400.0);

		let events = rec.links.borrow();
		assert_eq!(events.len(), 1);
		assert_eq!(events[0].link.id, "1");
	}

	#[test]
	fn pending_click_on_removed_node_is_dropped() {
		let (mut engine, rec) = engine();
		let at = node_screen(&engine, "a");
		engine.pointer_down(at);
		engine.pointer_up();
		engine.click(at, 1000.0);
		engine.update(
			&GraphData {
				nodes: vec![node("b", (600.0, 300.0))],
				links: vec![],
			},
			1100.0,
			&ApproxTextMeasure::default(),
		);
		engine.frame(1500.0);
		assert!(rec.nodes.borrow().is_empty());
	}

	#[test]
	fn zoom_button_animates_about_centre() {
		let (mut engine, _) = engine();
		let button = engine.viewport().button_rect(ZoomButton::In).center();
		engine.pointer_down(button);
		engine.pointer_up();
		engine.click(button, 1000.0);
		assert!(engine.frame(1100.0));
		engine.frame(1300.0);
		assert!((engine.viewport().transform().k - 1.5).abs() < 1e-9);
	}

	#[test]
	fn moved_pan_swallows_click() {
		let (mut engine, rec) = engine();
		engine.wheel(Point::new(400.0, 300.0), -500.0, 0);
		let before = engine.viewport().transform();
		let start = Point::new(400.0, 500.0);
		engine.pointer_down(start);
		engine.pointer_move(Point::new(380.0, 480.0));
		engine.pointer_up();
		assert_ne!(engine.viewport().transform(), before);

		engine.click(Point::new(380.0, 480.0), 1000.0);
		engine.frame(1400.0);
		assert!(rec.links.borrow().is_empty());
		assert!(rec.nodes.borrow().is_empty());
	}
}
