//! Visual encoding: pure mappings from graph entities and focus state to
//! presentation values.
//!
//! Each channel carries one fact. Color is the edge type (or node category),
//! width and radius are strength and severity, and opacity is relevance to the
//! current focus. Every function is total; `Unknown` enum values get neutral
//! fallbacks.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::theme::{Color, Palette};
use super::traversal::edge_in_path;
use super::types::{Category, Edge, EdgeId, EdgeType, Node, Severity, Strength};

/// One value per severity tier.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct SeverityScale {
	/// Value at normal thyroid function.
	pub normal: f64,
	/// Value at subclinical dysfunction.
	pub subclinical: f64,
	/// Value at overt dysfunction.
	pub overt: f64,
}

impl SeverityScale {
	/// Value for `severity`.
	pub fn get(&self, severity: Severity) -> f64 {
		match severity {
			Severity::Normal => self.normal,
			Severity::Subclinical => self.subclinical,
			Severity::Overt => self.overt,
		}
	}
}

/// Tunable constants behind the encoding functions.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EncodingConfig {
	/// Semantic colors.
	pub palette: Palette,

	/// Base edge width for strong links.
	pub strong_width: f64,
	/// Base edge width for moderate links.
	pub moderate_width: f64,
	/// Also used for edges of unknown strength.
	pub weak_width: f64,
	/// Edge width multiplier by severity.
	pub severity_width: SeverityScale,
	/// Edge width multiplier on compact viewports.
	pub compact_width_scale: f64,

	/// Node radius for intermediate and unknown nodes.
	pub base_radius: f64,
	/// Thyroid node radius by severity.
	pub thyroid_radius: SeverityScale,
	/// Reproductive node radius.
	pub reproductive_radius: f64,
	/// Radius multiplier for the selected node.
	pub selected_radius_scale: f64,
	/// Radius multiplier on compact viewports.
	pub compact_radius_scale: f64,

	/// Edge opacity when nothing is focused.
	pub idle_edge_opacity: f64,
	/// Opacity of relevant edges while something is focused.
	pub active_edge_opacity: f64,
	/// Off-path edges while a path or highlight set is shown.
	pub dimmed_edge_opacity: f64,
	/// Edges not touching the hovered node.
	pub hover_dimmed_edge_opacity: f64,
	/// Must stay above zero so dimmed nodes remain discoverable.
	pub dimmed_node_opacity: f64,

	/// Label font size in pixels.
	pub base_font_size: f64,
	/// Extra font size for the selected label.
	pub selected_font_bump: f64,
	/// Extra font size for the selected label on compact viewports.
	pub compact_selected_font_bump: f64,
	/// Extra font size on compact viewports, except reproductive labels.
	pub compact_font_bump: f64,
}

impl Default for EncodingConfig {
	fn default() -> Self {
		Self {
			palette: Palette::default(),
			strong_width: 3.0,
			moderate_width: 2.0,
			weak_width: 1.0,
			severity_width: SeverityScale {
				normal: 1.0,
				subclinical: 1.5,
				overt: 2.5,
			},
			compact_width_scale: 0.8,
			base_radius: 10.0,
			thyroid_radius: SeverityScale {
				normal: 10.0,
				subclinical: 15.0,
				overt: 20.0,
			},
			reproductive_radius: 12.0,
			selected_radius_scale: 1.25,
			compact_radius_scale: 1.4,
			idle_edge_opacity: 0.4,
			active_edge_opacity: 0.8,
			dimmed_edge_opacity: 0.1,
			hover_dimmed_edge_opacity: 0.15,
			dimmed_node_opacity: 0.5,
			base_font_size: 12.0,
			selected_font_bump: 1.0,
			compact_selected_font_bump: 2.0,
			compact_font_bump: 1.0,
		}
	}
}

/// Borrowed snapshot of what the user is currently looking at.
///
/// Precedence when several are set: path, then highlight set, then hover.
#[derive(Clone, Copy, Debug, Default)]
pub struct Focus<'a> {
	/// Scripted node sequence from a tour step.
	pub path: Option<&'a [String]>,
	/// Nodes lit by the focused node; `None` while unfocused.
	pub highlighted_nodes: Option<&'a HashSet<String>>,
	/// Edges lit by the focused node; `None` while unfocused.
	pub highlighted_links: Option<&'a HashSet<EdgeId>>,
	/// Node under the pointer or keyboard cursor.
	pub hovered: Option<&'a str>,
	/// Selected node.
	pub selected: Option<&'a str>,
}

impl Focus<'_> {
	/// Whether anything narrows attention; when false everything draws at rest.
	pub fn is_active(&self) -> bool {
		self.active_path().is_some() || self.highlighted_links.is_some() || self.hovered.is_some()
	}

	fn active_path(&self) -> Option<&[String]> {
		self.path.filter(|p| !p.is_empty())
	}
}

impl EncodingConfig {
	/// Edge color by effect type.
	pub fn edge_color(&self, kind: EdgeType) -> Color {
		match kind {
			EdgeType::Inhibitory => self.palette.inhibitory,
			EdgeType::Stimulatory => self.palette.stimulatory,
			EdgeType::Regulatory => self.palette.regulatory,
			EdgeType::Unknown => self.palette.neutral_edge,
		}
	}

	/// Green, yellow or red by severity.
	pub fn severity_color(&self, severity: Severity) -> Color {
		match severity {
			Severity::Normal => self.palette.severity_normal,
			Severity::Subclinical => self.palette.severity_subclinical,
			Severity::Overt => self.palette.severity_overt,
		}
	}

	/// Thyroid markers take the severity color; other categories are fixed.
	pub fn node_color(&self, category: Category, severity: Severity) -> Color {
		match category {
			Category::Thyroid => self.severity_color(severity),
			Category::Intermediate => self.palette.intermediate,
			Category::Reproductive => self.palette.reproductive,
			Category::Unknown => self.palette.neutral_node,
		}
	}

	/// Stroke width: strength base, times severity, times the compact factor.
	pub fn edge_width(&self, strength: Strength, severity: Option<Severity>, compact: bool) -> f64 {
		let base = match strength {
			Strength::Strong => self.strong_width,
			Strength::Moderate => self.moderate_width,
			Strength::Weak | Strength::Unknown => self.weak_width,
		};
		let severity = severity.map_or(1.0, |s| self.severity_width.get(s));
		let compact = if compact { self.compact_width_scale } else { 1.0 };
		base * severity * compact
	}

	/// Node radius: category base, then selection and compact multipliers.
	pub fn node_radius(&self, node: &Node, severity: Severity, selected: bool, compact: bool) -> f64 {
		let base = match node.category {
			Category::Thyroid => self.thyroid_radius.get(severity),
			Category::Reproductive => self.reproductive_radius,
			Category::Intermediate | Category::Unknown => self.base_radius,
		};
		let selected = if selected { self.selected_radius_scale } else { 1.0 };
		let compact = if compact { self.compact_radius_scale } else { 1.0 };
		base * selected * compact
	}

	/// Edge opacity: full when relevant to `focus`, dimmed otherwise.
	pub fn edge_opacity(&self, edge: &Edge, id: EdgeId, focus: &Focus<'_>) -> f64 {
		if let Some(path) = focus.active_path() {
			return if edge_in_path(edge, path) {
				self.active_edge_opacity
			} else {
				self.dimmed_edge_opacity
			};
		}
		if let Some(links) = focus.highlighted_links {
			return if links.contains(&id) {
				self.active_edge_opacity
			} else {
				self.dimmed_edge_opacity
			};
		}
		match focus.hovered {
			Some(hovered) if edge.touches(hovered) => self.active_edge_opacity,
			Some(_) => self.hover_dimmed_edge_opacity,
			None => self.idle_edge_opacity,
		}
	}

	/// Node opacity: 1 unless something else is focused.
	pub fn node_opacity(&self, node: &Node, focus: &Focus<'_>) -> f64 {
		if !focus.is_active() {
			return 1.0;
		}
		let id = node.id.as_str();
		let relevant = focus.hovered == Some(id)
			|| focus.selected == Some(id)
			|| match focus.active_path() {
				Some(path) => path.iter().any(|p| p == id),
				None => focus.highlighted_nodes.is_some_and(|nodes| nodes.contains(id)),
			};
		if relevant { 1.0 } else { self.dimmed_node_opacity }
	}

	/// Label font size in pixels.
	pub fn label_font_size(&self, node: &Node, selected: bool, compact: bool) -> f64 {
		let mut size = self.base_font_size;
		if selected {
			size += if compact {
				self.compact_selected_font_bump
			} else {
				self.selected_font_bump
			};
		}
		if compact && node.category != Category::Reproductive {
			size += self.compact_font_bump;
		}
		size
	}
}
