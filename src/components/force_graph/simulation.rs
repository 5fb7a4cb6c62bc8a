//! Force-directed physics simulation.
//!
//! Velocity-Verlet style integration with a cooling `alpha` parameter, in the
//! manner of d3-force: every tick alpha moves toward `alpha_target`, each
//! force adds alpha-scaled velocity, velocities decay and positions advance.
//! Once alpha falls below `alpha_min` the simulation stops until restarted.
//!
//! Forces, in application order:
//! 1. `charge`: pairwise many-body repulsion
//! 2. `center`: shifts the layout's centroid toward the surface centre
//! 3. `link`: springs between linked nodes, biased by node degree
//! 4. `collide`: keeps node circles from overlapping

use std::collections::HashMap;
use std::f64::consts::PI;

use log::debug;

use super::config::ForceConfig;
use super::geometry::Point;
use super::types::{GraphLink, GraphNode, Pin};

/// Radius of the first ring of the initial phyllotaxis placement.
const INITIAL_RADIUS: f64 = 10.0;

/// Looks up the live position of a node by id.
pub trait NodeResolver {
	fn position(&self, id: &str) -> Option<Point>;
}

/// Kinematic state of one node.
#[derive(Clone, Debug, PartialEq)]
pub struct SimNode {
	pub id: String,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub pin: Pin,
}

impl SimNode {
	pub fn position(&self) -> Point {
		Point::new(self.x, self.y)
	}
}

#[derive(Clone, Debug)]
struct SimLink {
	source_id: String,
	target_id: String,
	/// Resolved endpoint indices; `None` while either endpoint is missing.
	ends: Option<(usize, usize)>,
	bias: f64,
}

/// Deterministic jiggle source, so coincident nodes separate reproducibly.
#[derive(Clone, Debug)]
struct Lcg(u64);

impl Lcg {
	fn next(&mut self) -> f64 {
		self.0 = (1_664_525 * self.0 + 1_013_904_223) % 4_294_967_296;
		self.0 as f64 / 4_294_967_296.0
	}

	fn jiggle(&mut self) -> f64 {
		(self.next() - 0.5) * 1e-6
	}
}

/// Owns node kinematics and the force model.
pub struct Simulation {
	nodes: Vec<SimNode>,
	index: HashMap<String, usize>,
	links: Vec<SimLink>,
	forces: ForceConfig,
	center: Point,
	alpha: f64,
	alpha_target: f64,
	alpha_decay: f64,
	running: bool,
	random: Lcg,
}

impl Simulation {
	pub fn new(forces: ForceConfig, center: Point) -> Self {
		Self {
			alpha_decay: forces.alpha_decay(),
			forces,
			center,
			nodes: Vec::new(),
			index: HashMap::new(),
			links: Vec::new(),
			alpha: 1.0,
			alpha_target: 0.0,
			running: true,
			random: Lcg(1),
		}
	}

	/// Replaces the node list.
	///
	/// Ids seen before keep their position, velocity and pin. New ids start at
	/// their placement hint, or on a phyllotaxis spiral around the centre.
	pub fn set_nodes(&mut self, nodes: &[GraphNode]) {
		let mut previous: HashMap<String, SimNode> = self
			.nodes
			.drain(..)
			.map(|n| (n.id.clone(), n))
			.collect();
		self.index.clear();

		for (i, node) in nodes.iter().enumerate() {
			let sim_node = previous.remove(&node.id).unwrap_or_else(|| {
				let p = node.position.unwrap_or_else(|| self.initial_position(i));
				SimNode {
					id: node.id.clone(),
					x: p.x,
					y: p.y,
					vx: 0.0,
					vy: 0.0,
					pin: Pin::Free,
				}
			});
			self.index.insert(node.id.clone(), i);
			self.nodes.push(sim_node);
		}
		self.resolve_links();
	}

	/// Replaces the spring force's link list.
	pub fn set_links(&mut self, links: &[GraphLink]) {
		self.links = links
			.iter()
			.map(|l| SimLink {
				source_id: l.source.clone(),
				target_id: l.target.clone(),
				ends: None,
				bias: 0.5,
			})
			.collect();
		self.resolve_links();
	}

	fn resolve_links(&mut self) {
		let mut degree = vec![0usize; self.nodes.len()];
		for link in &mut self.links {
			link.ends = match (self.index.get(&link.source_id), self.index.get(&link.target_id)) {
				(Some(&s), Some(&t)) => Some((s, t)),
				_ => {
					debug!(
						"graph: link {} -> {} has an unresolved endpoint",
						link.source_id, link.target_id
					);
					None
				}
			};
			if let Some((s, t)) = link.ends {
				degree[s] += 1;
				degree[t] += 1;
			}
		}
		for link in &mut self.links {
			if let Some((s, t)) = link.ends {
				link.bias = degree[s] as f64 / (degree[s] + degree[t]) as f64;
			}
		}
	}

	fn initial_position(&self, i: usize) -> Point {
		let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
		let angle = i as f64 * PI * (3.0 - 5.0_f64.sqrt());
		Point::new(
			self.center.x + radius * angle.cos(),
			self.center.y + radius * angle.sin(),
		)
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	/// Resumes ticking without touching alpha.
	pub fn restart(&mut self) {
		self.running = true;
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn set_center(&mut self, center: Point) {
		self.center = center;
	}

	/// Advances one scheduling step if running. Returns whether a tick ran.
	pub fn step(&mut self) -> bool {
		if !self.running {
			return false;
		}
		self.tick();
		if self.alpha < self.forces.alpha_min {
			self.running = false;
		}
		true
	}

	/// Runs a single tick regardless of the running state.
	pub fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

		self.apply_charge();
		self.apply_center();
		for _ in 0..self.forces.link_iterations {
			self.apply_links();
		}
		for _ in 0..self.forces.collide_iterations {
			self.apply_collide();
		}

		let keep = 1.0 - self.forces.velocity_decay;
		for node in &mut self.nodes {
			match node.pin {
				Pin::Free => {
					node.vx *= keep;
					node.vy *= keep;
					node.x += node.vx;
					node.y += node.vy;
				}
				Pin::Pinned { x, y } => {
					node.x = x;
					node.y = y;
					node.vx = 0.0;
					node.vy = 0.0;
				}
			}
		}
	}

	fn apply_charge(&mut self) {
		let strength = self.forces.charge_strength * self.alpha;
		let min2 = self.forces.charge_distance_min2;
		for i in 0..self.nodes.len() {
			let (xi, yi) = (self.nodes[i].x, self.nodes[i].y);
			let (mut dvx, mut dvy) = (0.0, 0.0);
			for j in 0..self.nodes.len() {
				if i == j {
					continue;
				}
				let (mut x, mut y) = (self.nodes[j].x - xi, self.nodes[j].y - yi);
				let mut l = x * x + y * y;
				if x == 0.0 {
					x = self.random.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = self.random.jiggle();
					l += y * y;
				}
				if l < min2 {
					l = (min2 * l).sqrt();
				}
				dvx += x * strength / l;
				dvy += y * strength / l;
			}
			self.nodes[i].vx += dvx;
			self.nodes[i].vy += dvy;
		}
	}

	fn apply_center(&mut self) {
		if self.nodes.is_empty() {
			return;
		}
		let n = self.nodes.len() as f64;
		let (sx, sy) = self
			.nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let strength = self.forces.center_strength;
		let (dx, dy) = (
			(sx / n - self.center.x) * strength,
			(sy / n - self.center.y) * strength,
		);
		for node in &mut self.nodes {
			node.x -= dx;
			node.y -= dy;
		}
	}

	fn apply_links(&mut self) {
		let (distance, strength) = (self.forces.link_distance, self.forces.link_strength);
		for k in 0..self.links.len() {
			let Some((s, t)) = self.links[k].ends else {
				continue;
			};
			let bias = self.links[k].bias;
			let (source, target) = (&self.nodes[s], &self.nodes[t]);
			let mut x = target.x + target.vx - source.x - source.vx;
			let mut y = target.y + target.vy - source.y - source.vy;
			if x == 0.0 {
				x = self.random.jiggle();
			}
			if y == 0.0 {
				y = self.random.jiggle();
			}
			let mut l = (x * x + y * y).sqrt();
			l = (l - distance) / l * self.alpha * strength;
			x *= l;
			y *= l;
			self.nodes[t].vx -= x * bias;
			self.nodes[t].vy -= y * bias;
			self.nodes[s].vx += x * (1.0 - bias);
			self.nodes[s].vy += y * (1.0 - bias);
		}
	}

	fn apply_collide(&mut self) {
		let radius = self.forces.collide_radius;
		let strength = self.forces.collide_strength;
		let r = radius + radius;
		// Equal radii split every correction evenly.
		let share = radius * radius / (radius * radius + radius * radius);
		for i in 0..self.nodes.len() {
			let xi = self.nodes[i].x + self.nodes[i].vx;
			let yi = self.nodes[i].y + self.nodes[i].vy;
			for j in (i + 1)..self.nodes.len() {
				let other = &self.nodes[j];
				let mut x = xi - (other.x + other.vx);
				let mut y = yi - (other.y + other.vy);
				let mut l = x * x + y * y;
				if l >= r * r {
					continue;
				}
				if x == 0.0 {
					x = self.random.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = self.random.jiggle();
					l += y * y;
				}
				let d = l.sqrt();
				let push = (r - d) / d * strength;
				x *= push;
				y *= push;
				self.nodes[i].vx += x * share;
				self.nodes[i].vy += y * share;
				self.nodes[j].vx -= x * (1.0 - share);
				self.nodes[j].vy -= y * (1.0 - share);
			}
		}
	}

	pub fn node(&self, id: &str) -> Option<&SimNode> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Number of links whose endpoints both resolve.
	pub fn resolved_link_count(&self) -> usize {
		self.links.iter().filter(|l| l.ends.is_some()).count()
	}

	pub fn pin(&self, id: &str) -> Option<Pin> {
		self.node(id).map(|n| n.pin)
	}

	/// Sets the pin state of a node. Unknown ids are ignored.
	pub fn set_pin(&mut self, id: &str, pin: Pin) {
		if let Some(&i) = self.index.get(id) {
			self.nodes[i].pin = pin;
		}
	}

	/// Moves a node immediately, dropping its velocity.
	pub fn place(&mut self, id: &str, at: Point) {
		if let Some(&i) = self.index.get(id) {
			let node = &mut self.nodes[i];
			node.x = at.x;
			node.y = at.y;
			node.vx = 0.0;
			node.vy = 0.0;
		}
	}

	/// Ids of all pinned nodes, in node order.
	pub fn pinned_ids(&self) -> Vec<String> {
		self.nodes
			.iter()
			.filter(|n| n.pin.is_pinned())
			.map(|n| n.id.clone())
			.collect()
	}
}

impl NodeResolver for Simulation {
	fn position(&self, id: &str) -> Option<Point> {
		self.node(id).map(SimNode::position)
	}
}
