//! Node visuals, hover affordances and drag/pin interaction.
//!
//! A [`NodeRenderer`] keeps one [`NodeVisual`] per node id. Visual layers,
//! bottom to top: ring, directional affordances (while hovered), outline
//! circle, icon glyph, label lines, affordance icons.
//!
//! Interaction follows a small state machine per node: `Free` nodes move with
//! the simulation; pressing the outline pins the node under the pointer and
//! drags it; releasing leaves it `Pinned` where it was dropped; a plain click
//! releases the pin again.

use log::debug;

use super::config::NodeConfig;
use super::events::GraphEvents;
use super::geometry::{Arc, Point, describe_arc};
use super::join::{JoinDiff, Keyed, join};
use super::simulation::{NodeResolver, Simulation};
use super::types::{ClickTarget, GraphNode, Pin};

/// Splits `text` into lines of at most `max_width` characters.
///
/// Lines break at the last hyphen inside the window, dropping the hyphen.
/// Without one the text is cut hard at `max_width`.
pub fn wrap_and_truncate(text: &str, max_width: usize) -> Vec<String> {
	let mut rest: Vec<char> = text.chars().collect();
	let mut lines = Vec::new();
	if max_width == 0 {
		return vec![text.to_string()];
	}

	while rest.len() > max_width {
		let hyphen = (0..max_width).rev().find(|&i| rest[i] == '-');
		let (line, next): (String, Vec<char>) = match hyphen {
			Some(i) => (rest[..i].iter().collect(), rest[i + 1..].to_vec()),
			None => (rest[..max_width].iter().collect(), rest[max_width..].to_vec()),
		};
		lines.push(line);
		rest = next;
	}

	lines.push(rest.into_iter().collect());
	lines
}

/// Character drawn for an icon-font codepoint.
pub fn glyph(code: u32) -> char {
	char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// One displayed label line, positioned relative to the node centre.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelLine {
	pub text: String,
	pub y: f64,
}

/// A hover-revealed directional action around a node.
#[derive(Clone, Debug, PartialEq)]
pub struct Affordance {
	pub target: ClickTarget,
	/// Wedge relative to the node centre.
	pub arc: Arc,
	pub icon: char,
	/// Icon anchor relative to the node centre.
	pub icon_position: Point,
	/// Drawn with the `disabled` style; still clickable.
	pub disabled: bool,
	pub title: &'static str,
}

impl Affordance {
	fn new(node: &GraphNode, target: ClickTarget, config: &NodeConfig) -> Self {
		let (angle, offset, icon, title) = match target {
			ClickTarget::Up => (0.0, Point::new(0.0, -1.0), 0xf0d8, "Expand Up"),
			ClickTarget::Right => (90.0, Point::new(1.0, 0.0), 0xf0da, "Expand Right"),
			ClickTarget::Down => (180.0, Point::new(0.0, 1.0), 0xf0d7, "Expand Down"),
			ClickTarget::Left => (270.0, Point::new(-1.0, 0.0), 0xf0d9, "Expand Left"),
			ClickTarget::Center => (0.0, Point::ORIGIN, 0, ""),
		};
		// Arc centre sits half a pixel out along the bisector.
		let arc = describe_arc(
			offset * 0.5,
			config.ring_radius,
			angle - config.affordance_half_angle,
			angle + config.affordance_half_angle,
		);
		Self {
			target,
			arc,
			icon: glyph(icon),
			icon_position: offset * config.affordance_icon_distance + Point::new(0.0, 4.4),
			disabled: !node.supports(target),
			title,
		}
	}

	pub fn class_name(&self) -> &'static str {
		if self.disabled { "action disabled" } else { "action" }
	}
}

/// Everything drawn for one node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeVisual {
	/// Entity bound at the last reconciliation.
	pub node: GraphNode,
	/// `node` followed by the node's style tags.
	pub classes: Vec<String>,
	/// Outline carries the `fixed` marker.
	pub fixed: bool,
	pub glyph: char,
	/// Every wrapped label line, including those not displayed.
	pub wrapped_label: Vec<String>,
	pub label_lines: Vec<LabelLine>,
	/// Tooltip of the outline circle.
	pub title: String,
	/// Node centre, refreshed every tick.
	pub position: Point,
	/// Present only while the node is hovered.
	pub affordances: Vec<Affordance>,
}

impl Keyed for NodeVisual {
	fn key(&self) -> &str {
		&self.node.id
	}
}

impl NodeVisual {
	fn new(node: &GraphNode, pin: Pin, config: &NodeConfig) -> Self {
		let wrapped_label = wrap_and_truncate(&node.label, config.label_max_width);
		let ys: &[f64] = if wrapped_label.len() > 1 { &[4.0, 11.0] } else { &[7.0] };
		let label_lines = wrapped_label
			.iter()
			.take(config.label_max_lines)
			.zip(ys)
			.filter(|(text, _)| !text.is_empty())
			.map(|(text, &y)| LabelLine {
				text: text.clone(),
				y,
			})
			.collect();
		Self {
			classes: node_classes(node),
			fixed: pin.is_pinned(),
			glyph: glyph(node.icon),
			wrapped_label,
			label_lines,
			title: node.details.clone(),
			position: Point::new(f64::NAN, f64::NAN),
			affordances: Vec::new(),
			node: node.clone(),
		}
	}

	pub fn is_hovered(&self) -> bool {
		!self.affordances.is_empty()
	}
}

fn node_classes(node: &GraphNode) -> Vec<String> {
	std::iter::once("node".to_string())
		.chain(node.css_classes.iter().cloned())
		.collect()
}

/// Where on a node the pointer is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeHit {
	pub id: String,
	/// `Center` for the outline, otherwise the affordance direction.
	pub target: ClickTarget,
}

#[derive(Clone, Debug)]
struct DragGesture {
	id: String,
	raised_energy: bool,
	moved: bool,
}

/// Keeps node visuals in sync with data and simulation, and turns pointer
/// input on nodes into pins and click events.
pub struct NodeRenderer {
	config: NodeConfig,
	drag_alpha_target: f64,
	visuals: Vec<NodeVisual>,
	hovered: Option<String>,
	gesture: Option<DragGesture>,
	active_gestures: usize,
	suppressed_click: Option<String>,
}

impl NodeRenderer {
	pub fn new(config: NodeConfig, drag_alpha_target: f64) -> Self {
		Self {
			config,
			drag_alpha_target,
			visuals: Vec::new(),
			hovered: None,
			gesture: None,
			active_gestures: 0,
			suppressed_click: None,
		}
	}

	/// Replaces the simulation's nodes and reconciles visuals against them.
	pub fn update(&mut self, nodes: &[GraphNode], sim: &mut Simulation) -> JoinDiff {
		sim.set_nodes(nodes);
		let config = &self.config;
		let diff = join(
			&mut self.visuals,
			nodes,
			|node| NodeVisual::new(node, sim.pin(&node.id).unwrap_or_default(), config),
			|visual, node| {
				visual.classes = node_classes(node);
				visual.node = node.clone();
			},
		);

		if let Some(id) = &self.hovered {
			if diff.removed.contains(id) {
				self.hovered = None;
			}
		}
		if let Some(gesture) = &self.gesture {
			if diff.removed.contains(&gesture.id) {
				self.gesture = None;
				self.active_gestures = self.active_gestures.saturating_sub(1);
			}
		}
		debug!(
			"graph: nodes +{} ={} -{}",
			diff.added.len(),
			diff.retained.len(),
			diff.removed.len()
		);
		diff
	}

	/// Moves every visual to its node's current position.
	pub fn tick(&mut self, sim: &Simulation) {
		for visual in &mut self.visuals {
			if let Some(node) = sim.node(&visual.node.id) {
				visual.position = node.position();
				visual.fixed = node.pin.is_pinned();
			}
		}
	}

	pub fn visuals(&self) -> &[NodeVisual] {
		&self.visuals
	}

	pub fn visual(&self, id: &str) -> Option<&NodeVisual> {
		self.visuals.iter().find(|v| v.node.id == id)
	}

	pub fn len(&self) -> usize {
		self.visuals.len()
	}

	pub fn is_empty(&self) -> bool {
		self.visuals.is_empty()
	}

	pub fn hovered(&self) -> Option<&str> {
		self.hovered.as_deref()
	}

	/// Whether a gesture in progress raised the energy target and will
	/// restore it when it ends.
	pub fn holds_energy(&self) -> bool {
		self.gesture.as_ref().is_some_and(|g| g.raised_energy)
	}

	/// Topmost node part under `at` (world coordinates).
	pub fn hit_test(&self, at: Point) -> Option<NodeHit> {
		let reach = self.config.ring_radius + self.config.affordance_reach;
		self.visuals.iter().rev().find_map(|visual| {
			let local = at - visual.position;
			let d = local.length();
			if d <= self.config.radius {
				return Some(NodeHit {
					id: visual.node.id.clone(),
					target: ClickTarget::Center,
				});
			}
			if d > reach {
				return None;
			}
			visual
				.affordances
				.iter()
				.find(|a| Arc { radius: reach, ..a.arc.clone() }.wedge_contains(local))
				.map(|a| NodeHit {
					id: visual.node.id.clone(),
					target: a.target,
				})
		})
	}

	/// Id of the node whose hover area contains `at`.
	pub fn hover_target(&self, at: Point) -> Option<&str> {
		self.visuals
			.iter()
			.rev()
			.find(|visual| {
				let reach = if visual.is_hovered() {
					self.config.ring_radius + self.config.affordance_reach
				} else {
					self.config.ring_radius
				};
				visual.position.distance(at) <= reach
			})
			.map(|visual| visual.node.id.as_str())
	}

	/// Reveals affordances on `id` and hides them on the previously hovered
	/// node.
	pub fn hover(&mut self, id: Option<&str>) {
		if self.hovered.as_deref() == id {
			return;
		}
		if let Some(previous) = self.hovered.take() {
			if let Some(visual) = self.visuals.iter_mut().find(|v| v.node.id == previous) {
				visual.affordances.clear();
			}
		}
		let Some(id) = id else {
			return;
		};
		let config = &self.config;
		if let Some(visual) = self.visuals.iter_mut().find(|v| v.node.id == id) {
			visual.affordances = ClickTarget::DIRECTIONS
				.iter()
				.map(|&target| Affordance::new(&visual.node, target, config))
				.collect();
			self.hovered = Some(id.to_string());
		}
	}

	/// Starts a pointer gesture on a node. Pressing the outline pins the node
	/// at `at` and heats the simulation for the drag.
	pub fn pointer_down(&mut self, sim: &mut Simulation, hit: &NodeHit, at: Point) {
		self.suppressed_click = None;
		let mut gesture = DragGesture {
			id: hit.id.clone(),
			raised_energy: false,
			moved: false,
		};
		if hit.target == ClickTarget::Center {
			if self.active_gestures == 0 {
				sim.set_alpha_target(self.drag_alpha_target);
				sim.restart();
				gesture.raised_energy = true;
			}
			sim.set_pin(&hit.id, Pin::Pinned { x: at.x, y: at.y });
			sim.place(&hit.id, at);
			if let Some(visual) = self.visuals.iter_mut().find(|v| v.node.id == hit.id) {
				visual.fixed = true;
			}
		}
		self.active_gestures += 1;
		self.gesture = Some(gesture);
	}

	/// Drags the pinned node to `at`. Free nodes are left alone.
	pub fn pointer_move(&mut self, sim: &mut Simulation, at: Point) {
		let Some(gesture) = &mut self.gesture else {
			return;
		};
		gesture.moved = true;
		if sim.pin(&gesture.id).is_some_and(|p| p.is_pinned()) {
			sim.set_pin(&gesture.id, Pin::Pinned { x: at.x, y: at.y });
			sim.place(&gesture.id, at);
		}
	}

	/// Ends the gesture, committing a pinned node at its current position.
	pub fn pointer_up(&mut self, sim: &mut Simulation) {
		let Some(gesture) = self.gesture.take() else {
			return;
		};
		self.active_gestures = self.active_gestures.saturating_sub(1);
		if gesture.raised_energy && self.active_gestures == 0 {
			sim.set_alpha_target(0.0);
		}
		if let Some(node) = sim.node(&gesture.id) {
			if node.pin.is_pinned() {
				let (x, y) = (node.x, node.y);
				sim.set_pin(&gesture.id, Pin::Pinned { x, y });
				debug!("graph: pinned node {} at ({x:.1}, {y:.1})", gesture.id);
			}
		}
		if gesture.moved {
			self.suppressed_click = Some(gesture.id);
		}
	}

	/// Whether a click on `id` counts, i.e. it does not end a drag.
	pub fn accept_click(&mut self, id: &str) -> bool {
		if self.suppressed_click.as_deref() == Some(id) {
			self.suppressed_click = None;
			return false;
		}
		true
	}

	/// Handles a single click. A click on the outline releases the pin.
	pub fn click(&mut self, sim: &mut Simulation, events: &GraphEvents, hit: &NodeHit) {
		if hit.target == ClickTarget::Center {
			sim.set_pin(&hit.id, Pin::Free);
			if let Some(visual) = self.visuals.iter_mut().find(|v| v.node.id == hit.id) {
				visual.fixed = false;
			}
		}
		self.publish(sim, events, hit, false);
	}

	/// Handles a double click; the pin state is left untouched.
	pub fn double_click(&self, sim: &Simulation, events: &GraphEvents, hit: &NodeHit) {
		self.publish(sim, events, hit, true);
	}

	fn publish(&self, sim: &Simulation, events: &GraphEvents, hit: &NodeHit, double: bool) {
		let Some(visual) = self.visual(&hit.id) else {
			return;
		};
		let position = sim.position(&hit.id).unwrap_or(visual.position);
		events.publish_node_click(&visual.node, position, hit.target, double);
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use super::*;
	use crate::components::force_graph::config::GraphConfig;
	use crate::components::force_graph::types::NodeClickEvent;

	fn node(id: &str, label: &str, targets: &[ClickTarget]) -> GraphNode {
		GraphNode {
			id: id.into(),
			icon: 0xf0f3,
			label: label.into(),
			details: format!("This is node {id}."),
			supported_click_targets: targets.iter().copied().collect(),
			css_classes: vec!["fill-info".into()],
			position: Some(Point::new(100.0, 100.0)),
		}
	}

	fn setup(nodes: &[GraphNode]) -> (NodeRenderer, Simulation) {
		let config = GraphConfig::default();
		let mut sim = Simulation::new(config.forces.clone(), Point::new(100.0, 100.0));
		let mut renderer = NodeRenderer::new(config.node.clone(), 0.3);
		renderer.update(nodes, &mut sim);
		renderer.tick(&sim);
		(renderer, sim)
	}

	fn recorder(events: &GraphEvents) -> Rc<RefCell<Vec<NodeClickEvent>>> {
		let seen = Rc::new(RefCell::new(Vec::new()));
		let sink = seen.clone();
		let _ = events.subscribe_to_node_clicks(move |e| sink.borrow_mut().push(e.clone()));
		seen
	}

	fn center(id: &str) -> NodeHit {
		NodeHit {
			id: id.into(),
			target: ClickTarget::Center,
		}
	}

	#[test]
	fn wraps_short_text_to_one_line() {
		assert_eq!(wrap_and_truncate("Short", 11), vec!["Short"]);
		assert_eq!(wrap_and_truncate("Exactly 11c", 11), vec!["Exactly 11c"]);
	}

	#[test]
	fn wraps_at_hyphens_then_hard_cuts() {
		assert_eq!(
			wrap_and_truncate("Relationship-Between-Entities", 11),
			vec!["Relationshi", "p-Between", "Entities"]
		);
		assert_eq!(
			wrap_and_truncate("Data-Model-Store", 11),
			vec!["Data-Model", "Store"]
		);
		assert_eq!(
			wrap_and_truncate("Supercalifragilistic", 11),
			vec!["Supercalifr", "agilistic"]
		);
	}

	#[test]
	fn whitespace_is_not_a_break() {
		assert_eq!(
			wrap_and_truncate("Customer order history", 11),
			vec!["Customer or", "der history"]
		);
		assert_eq!(wrap_and_truncate("Node - 12345678", 11), vec!["Node ", " 12345678"]);
	}

	#[test]
	fn glyph_does_not_validate_codes() {
		assert_eq!(glyph(0xf0f3), '\u{f0f3}');
		assert_eq!(glyph(0xd800), char::REPLACEMENT_CHARACTER);
	}

	#[test]
	fn label_shows_at_most_two_lines() {
		let (renderer, _) = setup(&[
			node("1", "Relationship-Between-Entities", &[]),
			node("2", "Node 2", &[]),
		]);
		let long = renderer.visual("1").unwrap();
		assert_eq!(long.wrapped_label.len(), 3);
		assert_eq!(
			long.label_lines,
			vec![
				LabelLine { text: "Relationshi".into(), y: 4.0 },
				LabelLine { text: "p-Between".into(), y: 11.0 },
			]
		);
		let short = renderer.visual("2").unwrap();
		assert_eq!(short.label_lines, vec![LabelLine { text: "Node 2".into(), y: 7.0 }]);
	}

	#[test]
	fn update_refreshes_classes_only() {
		let (mut renderer, mut sim) = setup(&[node("1", "Node 1", &[])]);
		let mut changed = node("1", "Renamed", &[ClickTarget::Up]);
		changed.css_classes = vec!["fill-danger".into()];

		let diff = renderer.update(&[changed], &mut sim);
		assert_eq!(diff.retained, vec!["1"]);
		let visual = renderer.visual("1").unwrap();
		assert_eq!(visual.classes, vec!["node", "fill-danger"]);
		assert_eq!(visual.label_lines[0].text, "Node 1");
		assert!(visual.node.supports(ClickTarget::Up));
	}

	#[test]
	fn drag_pins_node_where_dropped() {
		let (mut renderer, mut sim) = setup(&[node("1", "Node 1", &[ClickTarget::Center])]);
		let events = GraphEvents::new();
		let seen = recorder(&events);
		sim.set_alpha_target(0.0);

		renderer.pointer_down(&mut sim, &center("1"), Point::new(101.0, 99.0));
		assert_eq!(sim.alpha_target(), 0.3);
		assert!(renderer.visual("1").unwrap().fixed);
		renderer.pointer_move(&mut sim, Point::new(150.0, 120.0));
		sim.tick();
		renderer.pointer_move(&mut sim, Point::new(160.0, 130.0));
		renderer.pointer_up(&mut sim);

		assert_eq!(sim.alpha_target(), 0.0);
		assert_eq!(sim.pin("1"), Some(Pin::Pinned { x: 160.0, y: 130.0 }));
		for _ in 0..20 {
			sim.tick();
		}
		assert_eq!(sim.node("1").unwrap().position(), Point::new(160.0, 130.0));

		// The click that ends a drag is swallowed.
		assert!(!renderer.accept_click("1"));
		assert!(seen.borrow().is_empty());
		assert!(renderer.accept_click("1"));
	}

	#[test]
	fn plain_click_releases_pin_and_publishes_center() {
		let (mut renderer, mut sim) = setup(&[node("1", "Node 1", &[ClickTarget::Center])]);
		let events = GraphEvents::new();
		let seen = recorder(&events);

		renderer.pointer_down(&mut sim, &center("1"), Point::new(0.0, 0.0));
		renderer.pointer_up(&mut sim);
		assert_eq!(sim.pin("1"), Some(Pin::Pinned { x: 0.0, y: 0.0 }));
		assert!(renderer.accept_click("1"));
		renderer.click(&mut sim, &events, &center("1"));

		assert_eq!(sim.pin("1"), Some(Pin::Free));
		assert!(!renderer.visual("1").unwrap().fixed);
		let seen = seen.borrow();
		assert_eq!(seen.len(), 1);
		assert_eq!(seen[0].click_target, ClickTarget::Center);
		assert!(!seen[0].is_double_click);
	}

	#[test]
	fn double_click_keeps_pin() {
		let (mut renderer, mut sim) = setup(&[node("1", "Node 1", &[ClickTarget::Center])]);
		let events = GraphEvents::new();
		let seen = recorder(&events);
		sim.set_pin("1", Pin::Pinned { x: 5.0, y: 5.0 });

		renderer.double_click(&sim, &events, &center("1"));
		assert!(sim.pin("1").unwrap().is_pinned());
		assert_eq!(seen.borrow().len(), 1);
		assert!(seen.borrow()[0].is_double_click);
	}

	#[test]
	fn moving_a_free_node_by_its_affordance_is_a_no_op() {
		let (mut renderer, mut sim) = setup(&[node("1", "Node 1", &[])]);
		let before = sim.node("1").unwrap().position();
		let hit = NodeHit {
			id: "1".into(),
			target: ClickTarget::Up,
		};
		renderer.pointer_down(&mut sim, &hit, before);
		renderer.pointer_move(&mut sim, Point::new(400.0, 400.0));
		renderer.pointer_up(&mut sim);
		assert_eq!(sim.pin("1"), Some(Pin::Free));
		assert_eq!(sim.node("1").unwrap().position(), before);
	}

	#[test]
	fn hover_reveals_four_affordances_with_disabled_state() {
		let (mut renderer, _) = setup(&[node("1", "Node 1", &[ClickTarget::Up, ClickTarget::Left])]);
		renderer.hover(Some("1"));
		let visual = renderer.visual("1").unwrap();
		assert_eq!(visual.affordances.len(), 4);
		let disabled: Vec<ClickTarget> = visual
			.affordances
			.iter()
			.filter(|a| a.disabled)
			.map(|a| a.target)
			.collect();
		assert_eq!(disabled, vec![ClickTarget::Down, ClickTarget::Right]);
		assert_eq!(visual.affordances[0].class_name(), "action");
		assert_eq!(visual.affordances[1].class_name(), "action disabled");

		renderer.hover(None);
		assert!(renderer.visual("1").unwrap().affordances.is_empty());
		assert_eq!(renderer.hovered(), None);
	}

	#[test]
	fn hit_test_prefers_outline_then_affordances() {
		let (mut renderer, _) = setup(&[node("1", "Node 1", &[])]);
		let c = renderer.visual("1").unwrap().position;

		assert_eq!(renderer.hit_test(c + Point::new(0.0, -10.0)), Some(center("1")));
		// Affordances only exist while hovered.
		assert_eq!(renderer.hit_test(c + Point::new(0.0, -20.0)), None);

		renderer.hover(Some("1"));
		let up = renderer.hit_test(c + Point::new(0.0, -20.0)).unwrap();
		assert_eq!(up.target, ClickTarget::Up);
		let left = renderer.hit_test(c + Point::new(-20.0, 1.0)).unwrap();
		assert_eq!(left.target, ClickTarget::Left);
		assert_eq!(renderer.hit_test(c + Point::new(0.0, 40.0)), None);
	}

	#[test]
	fn disabled_affordance_click_publishes_nothing() {
		let (mut renderer, mut sim) = setup(&[node("1", "Node 1", &[ClickTarget::Up])]);
		let events = GraphEvents::new();
		let seen = recorder(&events);
		renderer.hover(Some("1"));

		let down = NodeHit {
			id: "1".into(),
			target: ClickTarget::Down,
		};
		renderer.click(&mut sim, &events, &down);
		renderer.double_click(&sim, &events, &down);
		assert!(seen.borrow().is_empty());

		let up = NodeHit {
			id: "1".into(),
			target: ClickTarget::Up,
		};
		renderer.click(&mut sim, &events, &up);
		assert_eq!(seen.borrow().len(), 1);
		assert_eq!(seen.borrow()[0].click_target, ClickTarget::Up);
	}

	#[test]
	fn removing_hovered_node_clears_hover() {
		let (mut renderer, mut sim) = setup(&[node("1", "Node 1", &[]), node("2", "Node 2", &[])]);
		renderer.hover(Some("1"));
		let diff = renderer.update(&[node("2", "Node 2", &[])], &mut sim);
		assert_eq!(diff.removed, vec!["1"]);
		assert_eq!(renderer.hovered(), None);
		assert_eq!(renderer.len(), 1);
	}
}
