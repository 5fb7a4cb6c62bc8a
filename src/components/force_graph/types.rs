//! Graph data structures exchanged with the force graph engine.

use std::collections::BTreeSet;

use serde::Deserialize;

use super::geometry::Point;
use super::join::Keyed;

/// Part of a node a click was aimed at.
///
/// `Center` is the node body itself; the four directions are the affordances
/// revealed while hovering a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickTarget {
	Center,
	Up,
	Down,
	Left,
	Right,
}

impl ClickTarget {
	/// The four directional targets in the order their affordances are added.
	pub const DIRECTIONS: [ClickTarget; 4] = [
		ClickTarget::Up,
		ClickTarget::Down,
		ClickTarget::Right,
		ClickTarget::Left,
	];
}

/// A node in the graph.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphNode {
	/// Unique, stable identifier. Re-supplying an id updates the node in place.
	pub id: String,
	/// Codepoint of the node glyph in the icon font.
	pub icon: u32,
	pub label: String,
	/// Tooltip text.
	#[serde(default)]
	pub details: String,
	/// Click targets this node accepts. Events for other targets are dropped.
	#[serde(default)]
	pub supported_click_targets: BTreeSet<ClickTarget>,
	/// Style tags resolved through the [`Theme`](super::theme::Theme).
	#[serde(default)]
	pub css_classes: Vec<String>,
	/// Initial placement, only read the first time this id is seen.
	#[serde(default)]
	pub position: Option<Point>,
}

impl GraphNode {
	pub fn supports(&self, target: ClickTarget) -> bool {
		self.supported_click_targets.contains(&target)
	}
}

impl Keyed for GraphNode {
	fn key(&self) -> &str {
		&self.id
	}
}

/// A directed link between two nodes, referencing its endpoints by id.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphLink {
	pub id: String,
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	#[serde(default)]
	pub label: Option<String>,
	#[serde(default)]
	pub details: Option<String>,
	#[serde(default)]
	pub css_classes: Vec<String>,
}

impl Keyed for GraphLink {
	fn key(&self) -> &str {
		&self.id
	}
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

/// Fixed-position state of a node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Pin {
	/// Moved by the simulation.
	#[default]
	Free,
	/// Held at the given position until released.
	Pinned { x: f64, y: f64 },
}

impl Pin {
	pub fn is_pinned(&self) -> bool {
		matches!(self, Pin::Pinned { .. })
	}
}

/// Published when a node (or one of its affordances) is clicked.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeClickEvent {
	pub node: GraphNode,
	/// Position of the node at the time of the click.
	pub position: Point,
	pub click_target: ClickTarget,
	pub is_double_click: bool,
}

/// Published when a link is clicked.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkClickEvent {
	pub link: GraphLink,
	pub is_double_click: bool,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn deserializes_seed_graph() {
		let json = r#"{
			"nodes": [
				{ "id": "a", "icon": 61683, "label": "Node A", "supported_click_targets": ["up", "down"] },
				{ "id": "b", "icon": 61459, "label": "Node B", "css_classes": ["fill-info"], "position": { "x": 10.0, "y": 20.0 } }
			],
			"links": [
				{ "id": "1", "source": "a", "target": "b", "label": "Link 1" }
			]
		}"#;
		let data: GraphData = serde_json::from_str(json).unwrap();

		assert_eq!(data.nodes.len(), 2);
		assert!(data.nodes[0].supports(ClickTarget::Up));
		assert!(!data.nodes[0].supports(ClickTarget::Center));
		assert_eq!(data.nodes[1].position, Some(Point::new(10.0, 20.0)));
		assert_eq!(data.links[0].label.as_deref(), Some("Link 1"));
		assert!(data.links[0].css_classes.is_empty());
	}

	#[test]
	fn pin_default_is_free() {
		assert_eq!(Pin::default(), Pin::Free);
		assert!(Pin::Pinned { x: 0.0, y: 0.0 }.is_pinned());
	}
}
