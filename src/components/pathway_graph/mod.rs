//! Thyroid-to-reproductive pathway graph.
//!
//! The engine is split into pure layers with one mutable piece:
//! - [`types`] and [`validate`]: the graph model and load-time integrity check
//! - [`layout`] and [`geometry`]: deterministic node positions and edge curves
//! - [`traversal`]: breadth-first reachability and path search
//! - [`encoding`]: color, width, radius, opacity and font size from state
//! - [`state`]: the highlight state machine driven by UI events
//! - [`frame`] and the canvas renderer: plain draw records and their drawing
//!
//! # Example
//!
//! ```ignore
//! use thyroid_pathways::{Graph, GraphData, PathMode, PathwayGraphCanvas, Severity};
//!
//! let (graph, problems) = Graph::from_data(data);
//! view! {
//!     <PathwayGraphCanvas
//!         graph=Signal::stored(graph)
//!         severity=Signal::stored(Severity::Subclinical)
//!         path_mode=Signal::stored(PathMode::Downstream)
//!     />
//! }
//! ```

pub mod animation;
mod component;
pub mod config;
pub mod describe;
pub mod encoding;
pub mod frame;
pub mod geometry;
pub mod layout;
mod render;
pub mod scenario;
pub mod state;
pub mod theme;
pub mod tour;
pub mod traversal;
pub mod types;
pub mod validate;

pub use component::PathwayGraphCanvas;
pub use config::VisualConfig;
pub use state::{HighlightState, PathMode};
pub use types::{Category, Edge, EdgeType, GraphData, Node, NodeRef, Severity, Strength};
pub use validate::{Graph, ValidationError};
