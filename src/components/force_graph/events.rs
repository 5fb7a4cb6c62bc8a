//! Typed click event channel between the renderers and their consumers.
//!
//! A [`GraphEvents`] instance belongs to one engine. Handlers run
//! synchronously inside `publish`, so they must not call back into the
//! engine that is publishing; defer such work (e.g. through a reactive
//! signal) instead.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::debug;

use super::geometry::Point;
use super::types::{ClickTarget, GraphLink, GraphNode, LinkClickEvent, NodeClickEvent};

type Handler<E> = Rc<dyn Fn(&E)>;

struct Registry<E> {
	next_id: u64,
	handlers: Vec<(u64, Handler<E>)>,
}

/// Publish/subscribe list for a single event type.
pub struct Channel<E> {
	registry: Rc<RefCell<Registry<E>>>,
}

impl<E> Clone for Channel<E> {
	fn clone(&self) -> Self {
		Self {
			registry: self.registry.clone(),
		}
	}
}

impl<E> Default for Channel<E> {
	fn default() -> Self {
		Self {
			registry: Rc::new(RefCell::new(Registry {
				next_id: 0,
				handlers: Vec::new(),
			})),
		}
	}
}

impl<E: 'static> Channel<E> {
	/// Registers `handler`; it stays attached until the returned
	/// subscription is disposed.
	pub fn subscribe(&self, handler: impl Fn(&E) + 'static) -> Subscription {
		let id = {
			let mut registry = self.registry.borrow_mut();
			let id = registry.next_id;
			registry.next_id += 1;
			registry.handlers.push((id, Rc::new(handler)));
			id
		};
		let weak: Weak<RefCell<Registry<E>>> = Rc::downgrade(&self.registry);
		Subscription {
			detach: Some(Box::new(move || {
				if let Some(registry) = weak.upgrade() {
					registry.borrow_mut().handlers.retain(|(hid, _)| *hid != id);
				}
			})),
		}
	}

	/// Delivers `event` to every handler attached when publishing starts.
	pub fn publish(&self, event: &E) {
		let handlers: Vec<Handler<E>> = self
			.registry
			.borrow()
			.handlers
			.iter()
			.map(|(_, h)| h.clone())
			.collect();
		for handler in handlers {
			handler(event);
		}
	}

	pub fn subscriber_count(&self) -> usize {
		self.registry.borrow().handlers.len()
	}
}

/// Detaches a handler when disposed.
#[must_use = "dropping a Subscription keeps the handler attached; call dispose() to detach it"]
pub struct Subscription {
	detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
	pub fn dispose(mut self) {
		if let Some(detach) = self.detach.take() {
			detach();
		}
	}
}

/// Node and link click channels of one graph engine.
#[derive(Clone, Default)]
pub struct GraphEvents {
	nodes: Channel<NodeClickEvent>,
	links: Channel<LinkClickEvent>,
}

impl GraphEvents {
	pub fn new() -> Self {
		Self::default()
	}

	/// Publishes a node click, unless the node does not support `target`.
	///
	/// Returns whether an event was published.
	pub fn publish_node_click(
		&self,
		node: &GraphNode,
		position: Point,
		target: ClickTarget,
		is_double_click: bool,
	) -> bool {
		if !node.supports(target) {
			debug!("graph: dropped {:?} click on node {}", target, node.id);
			return false;
		}
		self.nodes.publish(&NodeClickEvent {
			node: node.clone(),
			position,
			click_target: target,
			is_double_click,
		});
		true
	}

	pub fn publish_link_click(&self, link: &GraphLink, is_double_click: bool) {
		self.links.publish(&LinkClickEvent {
			link: link.clone(),
			is_double_click,
		});
	}

	pub fn subscribe_to_node_clicks(
		&self,
		handler: impl Fn(&NodeClickEvent) + 'static,
	) -> Subscription {
		self.nodes.subscribe(handler)
	}

	pub fn subscribe_to_link_clicks(
		&self,
		handler: impl Fn(&LinkClickEvent) + 'static,
	) -> Subscription {
		self.links.subscribe(handler)
	}
}
