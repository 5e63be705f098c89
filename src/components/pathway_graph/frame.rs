//! Derived visuals for one render.
//!
//! [`build_frame`] turns the graph, layout and highlight state into plain
//! draw records. It owns no state of its own, so building the same inputs
//! twice yields equal frames and the renderer never needs to diff.

use super::animation::reveal_duration;
use super::describe::node_aria_label;
use super::encoding::EncodingConfig;
use super::geometry::{CurveStyle, EdgePath, curve_path};
use super::layout::{Layout, Point, Viewport};
use super::state::HighlightState;
use super::theme::Color;
use super::types::{Category, EdgeId, Severity};
use super::validate::Graph;

/// Extra pointer tolerance around a node, in pixels.
pub const HIT_SLOP: f64 = 20.0;

/// Everything a frame is derived from.
#[derive(Clone, Copy, Debug)]
pub struct Scene<'a> {
	/// Validated graph.
	pub graph: &'a Graph,
	/// Node positions for the current viewport.
	pub layout: &'a Layout,
	/// Canvas dimensions.
	pub viewport: Viewport,
	/// Edge curve style for the current viewport.
	pub curve: CurveStyle,
	/// Selected thyroid dysfunction level.
	pub severity: Severity,
	/// Current highlight state.
	pub state: &'a HighlightState,
	/// Encoding constants.
	pub encoding: &'a EncodingConfig,
}

/// A node ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeVisual {
	/// Node id.
	pub id: String,
	/// Display label.
	pub label: String,
	/// Category of the node.
	pub category: Category,
	/// Center on the canvas.
	pub position: Point,
	/// Circle radius in pixels.
	pub radius: f64,
	/// Base fill color.
	pub fill: Color,
	/// Opacity (0.0 to 1.0).
	pub opacity: f64,
	/// Label font size in pixels.
	pub font_size: f64,
	/// Whether the node is selected.
	pub selected: bool,
	/// Severity marker on thyroid nodes when thyroid function is impaired.
	pub badge: Option<Color>,
	/// Accessible description, also used as the hover title.
	pub aria_label: String,
}

impl NodeVisual {
	/// Whether `p` falls inside the node's hit area.
	pub fn hit(&self, p: Point) -> bool {
		self.position.distance(p) <= self.radius + HIT_SLOP
	}
}

/// An edge ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeVisual {
	/// Edge id.
	pub id: EdgeId,
	/// Curve from source to target center.
	pub path: EdgePath,
	/// Stroke color.
	pub color: Color,
	/// Stroke width in pixels.
	pub width: f64,
	/// Opacity (0.0 to 1.0).
	pub opacity: f64,
	/// Approximate path length in pixels.
	pub length: f64,
	/// Radius of the target node; the arrowhead stops at its rim.
	pub arrow_inset: f64,
	/// Entrance reveal duration; longer edges draw in more slowly.
	pub reveal_ms: f64,
}

/// Plain draw records for one render.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
	/// Canvas width.
	pub width: f64,
	/// Canvas height.
	pub height: f64,
	/// Nodes in draw order.
	pub nodes: Vec<NodeVisual>,
	/// Edges in draw order.
	pub edges: Vec<EdgeVisual>,
}

impl Frame {
	/// Topmost node under `p`. Later nodes draw on top, so search from the end
	/// and prefer the closest centre among overlapping hit areas.
	pub fn node_at(&self, p: Point) -> Option<&NodeVisual> {
		self.nodes.iter().rev().filter(|n| n.hit(p)).min_by(|a, b| {
			a.position
				.distance(p)
				.total_cmp(&b.position.distance(p))
		})
	}

	/// Node `step` places away from `current` in draw order, wrapping at both
	/// ends. With no current node (or one not in the frame) a forward step
	/// lands on the first node and a backward step on the last.
	pub fn next_node(&self, current: Option<&str>, step: isize) -> Option<&NodeVisual> {
		let len = self.nodes.len() as isize;
		if len == 0 {
			return None;
		}
		let index = match current.and_then(|id| self.nodes.iter().position(|n| n.id == id)) {
			Some(i) => (i as isize + step).rem_euclid(len),
			None if step < 0 => len - 1,
			None => 0,
		};
		self.nodes.get(index as usize)
	}
}

/// Derive draw records for every laid-out node and edge.
pub fn build_frame(scene: &Scene<'_>) -> Frame {
	let Scene {
		graph,
		layout,
		viewport,
		curve,
		severity,
		state,
		encoding,
	} = *scene;
	let focus = state.focus();
	let compact = viewport.compact;

	let edges = graph
		.edges_with_ids()
		.filter_map(|(id, edge)| {
			let source = *layout.get(edge.source_id())?;
			let target = *layout.get(edge.target_id())?;
			let path = curve_path(source, target, curve);
			let arrow_inset = graph.node(edge.target_id()).map_or(0.0, |node| {
				let selected = state.selected_node.as_deref() == Some(node.id.as_str());
				encoding.node_radius(node, severity, selected, compact)
			});
			Some(EdgeVisual {
				id,
				length: path.length(),
				path,
				color: encoding.edge_color(edge.kind),
				width: encoding.edge_width(edge.strength, Some(severity), compact),
				opacity: encoding.edge_opacity(edge, id, &focus),
				arrow_inset,
				reveal_ms: reveal_duration(source, target),
			})
		})
		.collect();

	let nodes = graph
		.nodes()
		.iter()
		.filter_map(|node| {
			let position = *layout.get(&node.id)?;
			let selected = state.selected_node.as_deref() == Some(node.id.as_str());
			let badge = (node.category == Category::Thyroid && severity != Severity::Normal)
				.then(|| encoding.severity_color(severity));
			Some(NodeVisual {
				id: node.id.clone(),
				label: node.display_label().to_string(),
				category: node.category,
				position,
				radius: encoding.node_radius(node, severity, selected, compact),
				fill: encoding.node_color(node.category, severity),
				opacity: encoding.node_opacity(node, &focus),
				font_size: encoding.label_font_size(node, selected, compact),
				selected,
				badge,
				aria_label: node_aria_label(node, graph.edges()),
			})
		})
		.collect();

	Frame {
		width: viewport.width,
		height: viewport.height,
		nodes,
		edges,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::pathway_graph::layout::{LayoutPolicy, compute_layout};
	use crate::components::pathway_graph::types::{Edge, EdgeType, GraphData, Node, Strength};

	fn graph() -> Graph {
		Graph::from_data(GraphData {
			nodes: vec![
				Node::new("tsh", "TSH", Category::Thyroid),
				Node::new("progesterone", "Progesterone", Category::Intermediate),
				Node::new("conception", "Conception", Category::Reproductive),
			],
			links: vec![
				Edge::new("tsh", "progesterone", EdgeType::Inhibitory, Strength::Strong),
				Edge::new("progesterone", "conception", EdgeType::Stimulatory, Strength::Moderate),
			],
			..GraphData::default()
		})
		.0
	}

	fn frame(graph: &Graph, state: &HighlightState, severity: Severity) -> Frame {
		let viewport = Viewport::new(800.0, 600.0, false);
		let layout = compute_layout(graph.nodes(), viewport, &LayoutPolicy::columns());
		let encoding = EncodingConfig::default();
		build_frame(&Scene {
			graph,
			layout: &layout,
			viewport,
			curve: CurveStyle::Curved,
			severity,
			state,
			encoding: &encoding,
		})
	}

	#[test]
	fn rebuilding_same_state_is_idempotent() {
		let graph = graph();
		let mut state = HighlightState::default();
		state.toggle_select("progesterone", graph.edges());
		assert_eq!(
			frame(&graph, &state, Severity::Overt),
			frame(&graph, &state, Severity::Overt)
		);
	}

	#[test]
	fn severity_changes_size_not_opacity() {
		let graph = graph();
		let state = HighlightState::default();
		let normal = frame(&graph, &state, Severity::Normal);
		let overt = frame(&graph, &state, Severity::Overt);

		assert_eq!(normal.nodes[0].radius, 10.0);
		assert_eq!(overt.nodes[0].radius, 20.0);
		assert_eq!(normal.nodes[0].badge, None);
		assert!(overt.nodes[0].badge.is_some());
		assert!(overt.edges[0].width > normal.edges[0].width);
		assert_eq!(overt.edges[0].opacity, normal.edges[0].opacity);
	}

	#[test]
	fn focus_dims_unrelated_edges() {
		let graph = graph();
		let mut state = HighlightState::default();
		state.toggle_select("conception", graph.edges());
		let f = frame(&graph, &state, Severity::Normal);

		assert!(f.edges[1].opacity > f.edges[0].opacity);
		assert!(f.nodes[2].selected);
		assert_eq!(f.nodes[0].opacity, 0.5);
	}

	#[test]
	fn hit_testing() {
		let graph = graph();
		let f = frame(&graph, &HighlightState::default(), Severity::Normal);
		let tsh = f.nodes[0].position;
		assert_eq!(f.node_at(tsh).map(|n| n.id.as_str()), Some("tsh"));
		assert_eq!(
			f.node_at(Point::new(tsh.x + 25.0, tsh.y)).map(|n| n.id.as_str()),
			Some("tsh")
		);
		assert!(f.node_at(Point::new(0.0, 0.0)).is_none());
	}

	#[test]
	fn keyboard_cursor_wraps_in_draw_order() {
		let graph = graph();
		let f = frame(&graph, &HighlightState::default(), Severity::Normal);
		let id = |n: Option<&NodeVisual>| n.map(|n| n.id.clone());

		assert_eq!(id(f.next_node(None, 1)).as_deref(), Some("tsh"));
		assert_eq!(id(f.next_node(None, -1)).as_deref(), Some("conception"));
		assert_eq!(id(f.next_node(Some("tsh"), 1)).as_deref(), Some("progesterone"));
		assert_eq!(id(f.next_node(Some("conception"), 1)).as_deref(), Some("tsh"));
		assert_eq!(id(f.next_node(Some("tsh"), -1)).as_deref(), Some("conception"));
		assert_eq!(id(f.next_node(Some("gone"), 1)).as_deref(), Some("tsh"));
		assert!(Frame::default().next_node(None, 1).is_none());
	}

	#[test]
	fn longer_edges_reveal_more_slowly() {
		let graph = graph();
		let state = HighlightState::default();
		let encoding = EncodingConfig::default();
		let build = |viewport: Viewport| {
			let layout = compute_layout(graph.nodes(), viewport, &LayoutPolicy::columns());
			build_frame(&Scene {
				graph: &graph,
				layout: &layout,
				viewport,
				curve: CurveStyle::Curved,
				severity: Severity::Normal,
				state: &state,
				encoding: &encoding,
			})
		};
		let narrow = build(Viewport::new(800.0, 600.0, false));
		let wide = build(Viewport::new(1600.0, 600.0, false));

		// Columns sit at quarter widths, so each edge spans 200px vs 400px.
		assert_eq!(narrow.edges[0].reveal_ms, 1500.0 + 2.0 * 200.0);
		assert_eq!(wide.edges[0].reveal_ms, 1500.0 + 2.0 * 400.0);
		assert!(wide.edges[0].reveal_ms > narrow.edges[0].reveal_ms);
	}
}
