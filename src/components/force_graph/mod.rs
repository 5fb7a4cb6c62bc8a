//! Force-directed graph exploration component.
//!
//! Renders an interactive node-link graph on an HTML canvas with:
//! - Physics-based node positioning via a d3-style force simulation
//! - Node dragging and pinning, with click and double-click events
//! - Directional affordances revealed on hover, for growing the graph
//! - Arrow-tipped, labeled links
//! - Pan, wheel zoom and animated zoom buttons
//!
//! Everything except [`component`] and [`render`] is plain Rust with no
//! browser dependency, driven by explicit timestamps.
//!
//! # Example
//!
//! ```ignore
//! use graph_explorer::{ForceGraphCanvas, GraphData, GraphEvents};
//!
//! let events = GraphEvents::new();
//! let _subscription = events.subscribe_to_node_clicks(|e| log::info!("{}", e.node.id));
//! let data = RwSignal::new(GraphData::default());
//!
//! view! { <ForceGraphCanvas data=data events=events fullscreen=true /> }
//! ```

mod component;
pub mod config;
pub mod events;
pub mod geometry;
pub mod interaction;
pub mod join;
pub mod links;
pub mod nodes;
mod render;
pub mod simulation;
pub mod state;
pub mod theme;
pub mod types;
pub mod viewport;

pub use component::{ForceGraphCanvas, GraphHandle};
pub use config::GraphConfig;
pub use events::{GraphEvents, Subscription};
pub use geometry::Point;
pub use links::{ApproxTextMeasure, TextMeasure};
pub use state::GraphSimulation;
pub use theme::Theme;
pub use types::{
	ClickTarget, GraphData, GraphLink, GraphNode, LinkClickEvent, NodeClickEvent, Pin,
};
