//! Deterministic node placement.
//!
//! Two policies share one entry point, [`compute_layout`]:
//!
//! - [`LayoutPolicy::Columns`]: thyroid, intermediate and reproductive nodes in
//!   three columns at 1/4, 1/2 and 3/4 of the width, spread evenly between the
//!   top and bottom padding.
//! - [`LayoutPolicy::Vertical`]: every node on one vertical axis, category
//!   groups stacked in order with a fixed step between nodes and a larger gap
//!   between groups. Used on narrow screens.
//!
//! Both are pure functions of their inputs; node order within a group is input
//! order, so re-renders place every node at the same spot.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::{Category, Node};

/// Screen-space coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Point {
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
}

impl Point {
	/// Create a point.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance to `other`.
	pub fn distance(self, other: Point) -> f64 {
		let (dx, dy) = (other.x - self.x, other.y - self.y);
		(dx * dx + dy * dy).sqrt()
	}

	/// Linear interpolation toward `other`.
	pub fn lerp(self, other: Point, t: f64) -> Point {
		Point::new(
			self.x + (other.x - self.x) * t,
			self.y + (other.y - self.y) * t,
		)
	}
}

/// Node id to position.
pub type Layout = HashMap<String, Point>;

/// Canvas size and viewport class supplied by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Canvas width in pixels.
	pub width: f64,
	/// Canvas height in pixels.
	pub height: f64,
	/// Narrow (phone) viewport: vertical layout, thinner edges, bigger targets.
	pub compact: bool,
}

impl Viewport {
	/// Viewports narrower than this are compact.
	pub const COMPACT_BELOW: f64 = 768.0;
	/// Viewports narrower than this (and not compact) are tablet-sized.
	pub const TABLET_BELOW: f64 = 1024.0;

	/// Create a viewport.
	pub fn new(width: f64, height: f64, compact: bool) -> Self {
		Self {
			width,
			height,
			compact,
		}
	}

	/// Derive canvas dimensions from the browser window size.
	pub fn from_window(window_width: f64, window_height: f64) -> Self {
		if window_width < Self::COMPACT_BELOW {
			Self::new((window_width - 40.0).max(0.0), 1200.0, true)
		} else if window_width < Self::TABLET_BELOW {
			Self::new(window_width - 80.0, 800.0, false)
		} else {
			Self::new(
				(window_width - 100.0).min(1400.0),
				(window_height - 200.0).clamp(0.0, 900.0),
				false,
			)
		}
	}
}

/// Placement strategy. Selected by configuration.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum LayoutPolicy {
	/// Three category columns.
	Columns {
		/// Space kept free above the first and below the last node.
		padding: f64,
	},
	/// Single axis, categories stacked top to bottom.
	Vertical {
		/// Space above the first node.
		margin_top: f64,
		/// Space below the last node.
		margin_bottom: f64,
		/// Distance between consecutive nodes of one category.
		step: f64,
		/// Distance between the last node of one category and the first of the next.
		category_gap: f64,
	},
}

impl LayoutPolicy {
	/// Default column layout.
	pub fn columns() -> Self {
		LayoutPolicy::Columns { padding: 80.0 }
	}

	/// Default single-axis layout.
	pub fn vertical() -> Self {
		LayoutPolicy::Vertical {
			margin_top: 60.0,
			margin_bottom: 60.0,
			step: 70.0,
			category_gap: 120.0,
		}
	}
}

impl Default for LayoutPolicy {
	fn default() -> Self {
		Self::columns()
	}
}

/// Split nodes into the three layout groups, keeping input order.
fn groups(nodes: &[Node]) -> [Vec<&Node>; 3] {
	let mut groups: [Vec<&Node>; 3] = Default::default();
	for node in nodes {
		groups[node.category.group()].push(node);
	}
	groups
}

/// Compute a position for every node.
///
/// The result has exactly one entry per distinct node id. Empty input gives an
/// empty layout.
pub fn compute_layout(nodes: &[Node], viewport: Viewport, policy: &LayoutPolicy) -> Layout {
	let mut layout = Layout::with_capacity(nodes.len());
	match *policy {
		LayoutPolicy::Columns { padding } => {
			let column_width = viewport.width / 4.0;
			let usable = (viewport.height - 2.0 * padding).max(0.0);
			for (column, group) in groups(nodes).iter().enumerate() {
				let x = column_width * (column + 1) as f64;
				let spacing = usable / (group.len() + 1) as f64;
				for (i, node) in group.iter().enumerate() {
					layout.insert(
						node.id.clone(),
						Point::new(x, padding + (i + 1) as f64 * spacing),
					);
				}
			}
		}
		LayoutPolicy::Vertical {
			margin_top,
			step,
			category_gap,
			..
		} => {
			let x = viewport.width / 2.0;
			let mut y = margin_top;
			let mut placed_any = false;
			for group in groups(nodes).iter().filter(|g| !g.is_empty()) {
				if placed_any {
					y += category_gap;
				}
				for (i, node) in group.iter().enumerate() {
					if i > 0 {
						y += step;
					}
					layout.insert(node.id.clone(), Point::new(x, y));
				}
				placed_any = true;
			}
		}
	}
	layout
}

/// Total canvas height the vertical policy needs for `nodes`.
///
/// `margin_top + Σ (count − 1)·step + gaps + margin_bottom`, where gaps are
/// only counted between non-empty categories. Zero for no nodes. The columns
/// policy fits whatever height it is given and returns `None`.
pub fn vertical_height(nodes: &[Node], policy: &LayoutPolicy) -> Option<f64> {
	let LayoutPolicy::Vertical {
		margin_top,
		margin_bottom,
		step,
		category_gap,
	} = *policy
	else {
		return None;
	};

	let counts: Vec<usize> = groups(nodes)
		.iter()
		.map(Vec::len)
		.filter(|&n| n > 0)
		.collect();
	if counts.is_empty() {
		return Some(0.0);
	}

	let steps: f64 = counts.iter().map(|&n| (n - 1) as f64 * step).sum();
	let gaps = (counts.len() - 1) as f64 * category_gap;
	Some(margin_top + steps + gaps + margin_bottom)
}

/// Count nodes per category in layout order. Handy for legends.
pub fn category_counts(nodes: &[Node]) -> [(Category, usize); 3] {
	let groups = groups(nodes);
	[
		(Category::ORDER[0], groups[0].len()),
		(Category::ORDER[1], groups[1].len()),
		(Category::ORDER[2], groups[2].len()),
	]
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> Vec<Node> {
		vec![
			Node::new("tsh", "TSH", Category::Thyroid),
			Node::new("free_t3", "Free T3", Category::Thyroid),
			Node::new("progesterone", "Progesterone", Category::Intermediate),
			Node::new("luteal", "Luteal phase", Category::Intermediate),
			Node::new("cycle", "Cycle", Category::Intermediate),
			Node::new("conception", "Conception", Category::Reproductive),
		]
	}

	fn viewport() -> Viewport {
		Viewport::new(1200.0, 800.0, false)
	}

	#[test]
	fn layout_is_deterministic() {
		for policy in [LayoutPolicy::columns(), LayoutPolicy::vertical()] {
			let a = compute_layout(&sample(), viewport(), &policy);
			let b = compute_layout(&sample(), viewport(), &policy);
			assert_eq!(a, b);
		}
	}

	#[test]
	fn layout_covers_every_node_once() {
		let nodes = sample();
		for policy in [LayoutPolicy::columns(), LayoutPolicy::vertical()] {
			let layout = compute_layout(&nodes, viewport(), &policy);
			assert_eq!(layout.len(), nodes.len());
			for node in &nodes {
				assert!(layout.contains_key(&node.id), "missing {}", node.id);
			}
		}
	}

	#[test]
	fn columns_use_quarter_widths_and_even_spacing() {
		let layout = compute_layout(&sample(), viewport(), &LayoutPolicy::columns());
		assert_eq!(layout["tsh"].x, 300.0);
		assert_eq!(layout["progesterone"].x, 600.0);
		assert_eq!(layout["conception"].x, 900.0);

		// Two thyroid nodes in 640px of usable height: spacing 640 / 3.
		let spacing = 640.0 / 3.0;
		assert!((layout["tsh"].y - (80.0 + spacing)).abs() < 1e-9);
		assert!((layout["free_t3"].y - (80.0 + 2.0 * spacing)).abs() < 1e-9);
		// A single node sits in the middle.
		assert_eq!(layout["conception"].y, 400.0);
	}

	#[test]
	fn y_strictly_increases_within_a_column() {
		let nodes = sample();
		let layout = compute_layout(&nodes, viewport(), &LayoutPolicy::columns());
		let ys: Vec<f64> = ["progesterone", "luteal", "cycle"]
			.iter()
			.map(|id| layout[*id].y)
			.collect();
		assert!(ys.windows(2).all(|w| w[0] < w[1]), "{ys:?}");
	}

	#[test]
	fn short_canvas_does_not_produce_negative_spacing() {
		let layout = compute_layout(
			&sample(),
			Viewport::new(400.0, 100.0, false),
			&LayoutPolicy::columns(),
		);
		assert!(layout.values().all(|p| p.y.is_finite() && p.y >= 80.0));
	}

	#[test]
	fn empty_input_gives_empty_layout_and_zero_height() {
		for policy in [LayoutPolicy::columns(), LayoutPolicy::vertical()] {
			assert!(compute_layout(&[], viewport(), &policy).is_empty());
		}
		assert_eq!(vertical_height(&[], &LayoutPolicy::vertical()), Some(0.0));
		assert_eq!(vertical_height(&sample(), &LayoutPolicy::columns()), None);
	}

	#[test]
	fn vertical_places_groups_in_order_with_gaps() {
		let layout = compute_layout(&sample(), viewport(), &LayoutPolicy::vertical());
		assert!(layout.values().all(|p| p.x == 600.0));
		assert_eq!(layout["tsh"].y, 60.0);
		assert_eq!(layout["free_t3"].y, 130.0);
		assert_eq!(layout["progesterone"].y, 250.0);
		assert_eq!(layout["cycle"].y, 390.0);
		assert_eq!(layout["conception"].y, 510.0);
	}

	#[test]
	fn vertical_height_matches_last_node_plus_margin() {
		let nodes = sample();
		let policy = LayoutPolicy::vertical();
		let layout = compute_layout(&nodes, viewport(), &policy);
		let last = layout.values().map(|p| p.y).fold(f64::MIN, f64::max);
		assert_eq!(vertical_height(&nodes, &policy), Some(last + 60.0));
	}

	#[test]
	fn vertical_skips_empty_categories_in_gap_count() {
		let nodes = vec![
			Node::new("tsh", "TSH", Category::Thyroid),
			Node::new("conception", "Conception", Category::Reproductive),
		];
		let policy = LayoutPolicy::vertical();
		// One gap between the two non-empty groups, none for the empty middle.
		assert_eq!(vertical_height(&nodes, &policy), Some(60.0 + 120.0 + 60.0));
		let layout = compute_layout(&nodes, viewport(), &policy);
		assert_eq!(layout["conception"].y, 180.0);
	}

	#[test]
	fn unknown_category_lands_in_middle_group() {
		let nodes = vec![Node::new("odd", "Odd", Category::Unknown)];
		let layout = compute_layout(&nodes, viewport(), &LayoutPolicy::columns());
		assert_eq!(layout["odd"].x, 600.0);
		assert_eq!(category_counts(&nodes)[1], (Category::Intermediate, 1));
	}

	#[test]
	fn window_breakpoints() {
		let phone = Viewport::from_window(390.0, 844.0);
		assert!(phone.compact);
		assert_eq!((phone.width, phone.height), (350.0, 1200.0));

		let tablet = Viewport::from_window(900.0, 1000.0);
		assert!(!tablet.compact);
		assert_eq!((tablet.width, tablet.height), (820.0, 800.0));

		let desktop = Viewport::from_window(2560.0, 1440.0);
		assert_eq!((desktop.width, desktop.height), (1400.0, 900.0));
	}

	#[test]
	fn policy_deserializes_from_tagged_json() {
		let policy: LayoutPolicy = serde_json::from_str(
			r#"{ "policy": "vertical", "margin_top": 10, "margin_bottom": 10, "step": 50, "category_gap": 90 }"#,
		)
		.unwrap();
		assert_eq!(
			policy,
			LayoutPolicy::Vertical {
				margin_top: 10.0,
				margin_bottom: 10.0,
				step: 50.0,
				category_gap: 90.0
			}
		);
	}
}
