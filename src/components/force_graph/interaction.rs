//! Separating single clicks from double clicks.
//!
//! A click is held for the double-click window. A second click on the same
//! target inside the window turns both into one double click; anything else
//! releases the held click as a single click. Every interaction therefore
//! produces exactly one event.

use super::nodes::NodeHit;

/// Clickable thing under the pointer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hit {
	Node(NodeHit),
	/// Link id.
	Link(String),
}

/// A resolved click.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Click {
	Single(Hit),
	Double(Hit),
}

#[derive(Clone, Debug)]
struct PendingClick {
	hit: Hit,
	at_ms: f64,
}

#[derive(Clone, Debug)]
pub struct ClickDisambiguator {
	window_ms: f64,
	pending: Option<PendingClick>,
}

impl ClickDisambiguator {
	pub fn new(window_ms: f64) -> Self {
		Self {
			window_ms,
			pending: None,
		}
	}

	/// Registers a click on `hit` at `now_ms` and returns the clicks it
	/// resolves, oldest first.
	pub fn click(&mut self, hit: Hit, now_ms: f64) -> Vec<Click> {
		match self.pending.take() {
			Some(held) if held.hit == hit && now_ms - held.at_ms <= self.window_ms => {
				vec![Click::Double(hit)]
			}
			held => {
				self.pending = Some(PendingClick { hit, at_ms: now_ms });
				held.map(|h| Click::Single(h.hit)).into_iter().collect()
			}
		}
	}

	/// Releases the held click once its window has passed.
	pub fn poll(&mut self, now_ms: f64) -> Option<Click> {
		let expired = self
			.pending
			.as_ref()
			.is_some_and(|held| now_ms - held.at_ms > self.window_ms);
		if expired { self.flush() } else { None }
	}

	/// Releases the held click immediately.
	pub fn flush(&mut self) -> Option<Click> {
		self.pending.take().map(|held| Click::Single(held.hit))
	}

	/// Drops a held click on node `id`, used when the node goes away.
	pub fn forget_node(&mut self, id: &str) {
		if matches!(&self.pending, Some(PendingClick { hit: Hit::Node(n), .. }) if n.id == id) {
			self.pending = None;
		}
	}

	/// Drops a held click on link `id`.
	pub fn forget_link(&mut self, id: &str) {
		if matches!(&self.pending, Some(PendingClick { hit: Hit::Link(l), .. }) if l == id) {
			self.pending = None;
		}
	}

	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}
}
