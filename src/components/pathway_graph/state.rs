//! Highlight state and its transitions.
//!
//! [`HighlightState`] is the one mutable piece of the engine. UI callbacks are
//! its only writers; the encoder reads a [`Focus`] snapshot of it every frame.
//! Focusing a node replaces both highlight sets in a single assignment, so a
//! frame never observes a half-updated highlight.

use std::collections::HashSet;

use log::debug;
use serde::{Deserialize, Serialize};

use super::encoding::Focus;
use super::traversal::{Direction, reachable_from};
use super::types::{Edge, EdgeId};

/// Which traversals a focused node lights up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathMode {
	/// Causes of the focused node.
	Upstream,
	/// Effects of the focused node.
	#[default]
	Downstream,
	/// Causes and effects.
	Both,
}

impl PathMode {
	/// Every mode, in display order.
	pub const ALL: [PathMode; 3] = [PathMode::Upstream, PathMode::Downstream, PathMode::Both];

	fn directions(self) -> &'static [Direction] {
		match self {
			PathMode::Upstream => &[Direction::Upstream],
			PathMode::Downstream => &[Direction::Downstream],
			PathMode::Both => &[Direction::Upstream, Direction::Downstream],
		}
	}

	/// Button label.
	pub fn label(self) -> &'static str {
		match self {
			PathMode::Upstream => "Causes",
			PathMode::Downstream => "Effects",
			PathMode::Both => "Both",
		}
	}
}

/// Coarse phase of the state machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Interaction {
	/// Nothing focused.
	Idle,
	/// A node is focused and its relatives highlighted.
	NodeFocused(String),
}

/// Session-scoped highlight state. Never persisted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HighlightState {
	/// Nodes related to the focused node.
	pub highlighted_nodes: HashSet<String>,
	/// Edges related to the focused node.
	pub highlighted_links: HashSet<EdgeId>,
	/// Which relatives a focus highlights.
	pub path_mode: PathMode,
	/// Node whose details are shown.
	pub selected_node: Option<String>,
	/// Node under the pointer or keyboard cursor.
	pub hovered_node: Option<String>,
	/// Author-supplied node sequence from a tour step.
	pub highlighted_path: Option<Vec<String>>,
	focused: Option<String>,
}

/// Both highlight sets, computed together and swapped in together.
struct Highlight {
	nodes: HashSet<String>,
	links: HashSet<EdgeId>,
}

fn derive_highlight(id: &str, mode: PathMode, edges: &[Edge]) -> Highlight {
	let mut nodes = HashSet::from([id.to_string()]);
	let mut links = HashSet::new();

	// Direct neighbours in both directions are shown regardless of mode.
	for (i, edge) in edges.iter().enumerate() {
		if edge.source_id() == id {
			nodes.insert(edge.target_id().to_string());
			links.insert(EdgeId(i));
		} else if edge.target_id() == id {
			nodes.insert(edge.source_id().to_string());
			links.insert(EdgeId(i));
		}
	}

	for &direction in mode.directions() {
		let reach = reachable_from(id, edges, direction);
		nodes.extend(reach.reachable);
		links.extend(reach.edges);
	}
	Highlight { nodes, links }
}

impl HighlightState {
	/// Idle state with the given path mode.
	pub fn new(path_mode: PathMode) -> Self {
		Self {
			path_mode,
			..Self::default()
		}
	}

	/// Current phase.
	pub fn phase(&self) -> Interaction {
		match &self.focused {
			Some(id) => Interaction::NodeFocused(id.clone()),
			None => Interaction::Idle,
		}
	}

	/// Focused node, if any.
	pub fn focused(&self) -> Option<&str> {
		self.focused.as_deref()
	}

	/// Highlight everything related to `id` under the current path mode.
	///
	/// Replaces any previous focus; highlights never accumulate.
	pub fn focus_node(&mut self, id: &str, edges: &[Edge]) {
		let Highlight { nodes, links } = derive_highlight(id, self.path_mode, edges);
		debug!(
			"focus {id} ({:?}): {} nodes, {} links",
			self.path_mode,
			nodes.len(),
			links.len()
		);
		self.highlighted_nodes = nodes;
		self.highlighted_links = links;
		self.focused = Some(id.to_string());
	}

	/// Change the path mode, re-deriving the highlight for the same focus.
	pub fn set_path_mode(&mut self, mode: PathMode, edges: &[Edge]) {
		if self.path_mode == mode {
			return;
		}
		self.path_mode = mode;
		if let Some(id) = self.focused.clone() {
			self.focus_node(&id, edges);
		}
	}

	/// Back to idle. The path mode is a preference and survives.
	pub fn clear(&mut self) {
		debug!("clear highlight");
		self.highlighted_nodes.clear();
		self.highlighted_links.clear();
		self.focused = None;
		self.selected_node = None;
		self.highlighted_path = None;
	}

	/// Drop highlight, selection and hover. Used when the graph is reloaded;
	/// the path mode survives like it does for [`clear`](Self::clear).
	pub fn reset(&mut self) {
		*self = Self::new(self.path_mode);
	}

	/// Set or clear the hovered node.
	pub fn set_hover(&mut self, id: Option<&str>) {
		self.hovered_node = id.map(str::to_string);
	}

	/// Click on a node: select and focus it, or deselect when it was already
	/// selected.
	pub fn toggle_select(&mut self, id: &str, edges: &[Edge]) {
		if self.selected_node.as_deref() == Some(id) {
			self.clear();
		} else {
			self.highlighted_path = None;
			self.selected_node = Some(id.to_string());
			self.focus_node(id, edges);
		}
	}

	/// Scripted highlight from a tour step. Does not consult the graph; the
	/// path is matched against edges pairwise by the encoder.
	pub fn set_scripted_highlight(&mut self, node: Option<&str>, path: Option<&[String]>) {
		self.highlighted_nodes.clear();
		self.highlighted_links.clear();
		self.focused = None;
		self.selected_node = node.map(str::to_string);
		self.highlighted_path = path.map(<[String]>::to_vec);
	}

	/// Snapshot for the encoder.
	pub fn focus(&self) -> Focus<'_> {
		let focused = self.focused.is_some();
		Focus {
			path: self.highlighted_path.as_deref(),
			highlighted_nodes: focused.then_some(&self.highlighted_nodes),
			highlighted_links: focused.then_some(&self.highlighted_links),
			hovered: self.hovered_node.as_deref(),
			selected: self.selected_node.as_deref(),
		}
	}
}
