//! Demo graph store: owns node and link lifecycle for the explorer page.
//!
//! Ids come from two counters, so every node and link is numbered in creation
//! order. Style tags and icons cycle with the counter.

use std::collections::HashSet;

use log::debug;

use crate::components::force_graph::{ClickTarget, GraphData, GraphLink, GraphNode, Point};

const NODE_ICONS: [u32; 15] = [
	0xf0f3, 0xf013, 0xf15c, 0xf0e0, 0xf015, 0xf279, 0xf1e6, 0xf12e, 0xf3ed, 0xf5bf, 0xf0f2, 0xf0ce,
	0xf02b, 0xf7d9, 0xf007,
];
const NODE_CLASSES: [&str; 4] = ["fill-info", "fill-success", "fill-warning", "fill-danger"];
const LINK_CLASSES: [&str; 4] = ["info", "success", "warning", "danger"];

/// Number of nodes added by one expansion.
pub const RELATED_NODES: u32 = 3;
/// Extra offset between consecutive related nodes, on both axes.
const RELATED_SPREAD: f64 = 10.0;

fn demo_node(n: u32, position: Point) -> GraphNode {
	GraphNode {
		id: n.to_string(),
		icon: NODE_ICONS[n as usize % NODE_ICONS.len()],
		label: format!("Node {n}"),
		details: format!("This is node {n}."),
		supported_click_targets: ClickTarget::DIRECTIONS.into_iter().collect(),
		css_classes: vec![NODE_CLASSES[n as usize % NODE_CLASSES.len()].to_string()],
		position: Some(position),
	}
}

fn demo_link(n: u32, source: &str, target: &str) -> GraphLink {
	GraphLink {
		id: n.to_string(),
		source: source.to_string(),
		target: target.to_string(),
		label: Some(format!("Link {n}")),
		details: Some(format!("This is link {n}.")),
		css_classes: vec![LINK_CLASSES[n as usize % LINK_CLASSES.len()].to_string()],
	}
}

/// One past the highest numeric id, or 1.
fn next_counter<'a>(ids: impl Iterator<Item = &'a str>) -> u32 {
	ids.filter_map(|id| id.parse::<u32>().ok())
		.max()
		.map_or(1, |n| n + 1)
}

/// In-memory node/link store with demo data generation.
#[derive(Clone, Debug)]
pub struct DemoGraphStore {
	node_counter: u32,
	link_counter: u32,
	nodes: Vec<GraphNode>,
	links: Vec<GraphLink>,
	/// Where start nodes, and related nodes of unplaced anchors, go.
	default_position: Point,
}

impl DemoGraphStore {
	/// Creates a store holding a single start node.
	pub fn new(default_position: Point) -> Self {
		let mut store = Self {
			node_counter: 1,
			link_counter: 1,
			nodes: Vec::new(),
			links: Vec::new(),
			default_position,
		};
		store.clear(false, &[]);
		store
	}

	/// Creates a store from seed data. Counters continue after the highest
	/// numeric id found, and broken seed links are dropped.
	pub fn from_seed(seed: GraphData, default_position: Point) -> Self {
		let mut store = Self {
			node_counter: next_counter(seed.nodes.iter().map(|n| n.id.as_str())),
			link_counter: next_counter(seed.links.iter().map(|l| l.id.as_str())),
			nodes: seed.nodes,
			links: seed.links,
			default_position,
		};
		store.remove_broken_links();
		if store.nodes.is_empty() {
			store.insert_start_node();
		}
		store
	}

	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	pub fn links(&self) -> &[GraphLink] {
		&self.links
	}

	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Snapshot for the graph component.
	pub fn graph_data(&self) -> GraphData {
		GraphData {
			nodes: self.nodes.clone(),
			links: self.links.clone(),
		}
	}

	/// Adds a node at the default position.
	pub fn insert_start_node(&mut self) -> String {
		let node = demo_node(self.node_counter, self.default_position);
		self.node_counter += 1;
		let id = node.id.clone();
		self.nodes.push(node);
		id
	}

	/// Adds three nodes linked from `anchor`, placed at `offset` from the
	/// anchor's `position` and spread diagonally. Unknown anchors are ignored.
	pub fn insert_related_nodes(&mut self, anchor: &str, position: Option<Point>, offset: Point) {
		if self.node(anchor).is_none() {
			debug!("store: no anchor node {anchor}");
			return;
		}
		let base = position.unwrap_or(self.default_position);
		for i in 0..RELATED_NODES {
			let spread = i as f64 * RELATED_SPREAD;
			let node = demo_node(
				self.node_counter,
				base + offset + Point::new(spread, spread),
			);
			self.node_counter += 1;
			self.links.push(demo_link(self.link_counter, anchor, &node.id));
			self.link_counter += 1;
			self.nodes.push(node);
		}
		debug!("store: expanded node {anchor}, now {} nodes", self.nodes.len());
	}

	/// Removes a node and every link touching it.
	pub fn remove_node(&mut self, id: &str) {
		self.nodes.retain(|n| n.id != id);
		self.remove_broken_links();
	}

	/// Removes every node, or only nodes not in `pinned` when `keep_pinned`
	/// is set. An emptied store is re-seeded with a start node.
	pub fn clear(&mut self, keep_pinned: bool, pinned: &[String]) {
		if keep_pinned {
			let pinned: HashSet<&str> = pinned.iter().map(String::as_str).collect();
			self.nodes.retain(|n| pinned.contains(n.id.as_str()));
			self.remove_broken_links();
		} else {
			self.nodes.clear();
			self.links.clear();
		}
		if self.nodes.is_empty() {
			self.insert_start_node();
		}
	}

	fn remove_broken_links(&mut self) {
		let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
		let before = self.links.len();
		self.links
			.retain(|l| ids.contains(l.source.as_str()) && ids.contains(l.target.as_str()));
		if self.links.len() != before {
			debug!("store: pruned {} broken links", before - self.links.len());
		}
	}
}
