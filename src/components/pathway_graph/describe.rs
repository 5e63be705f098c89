//! Human-readable descriptions of nodes, edges and pathways: screen reader
//! labels, tooltip summaries and the markdown export.

use std::fmt::Write;

use super::traversal::{
	Direction, OverallEffect, PathImpact, all_paths_with_depth_bound, connections, path_impact,
	reachable_from,
};
use super::types::{Edge, Node};
use super::validate::Graph;

/// Longest chain considered when summarising a node's downstream effects.
pub const SUMMARY_DEPTH: usize = 6;

/// Screen-reader label for a node, with its link counts.
pub fn node_aria_label(node: &Node, edges: &[Edge]) -> String {
	let links = connections(&node.id, edges);
	format!(
		"{}: {}. {} incoming links, {} outgoing links. Press Enter to view details.",
		node.display_label(),
		node.description,
		links.incoming.len(),
		links.outgoing.len()
	)
}

/// "TSH inhibits Progesterone. <description>"; unknown endpoints read as their id.
pub fn edge_aria_label(edge: &Edge, graph: &Graph) -> String {
	let label = |id: &str| {
		graph
			.node(id)
			.map_or_else(|| id.to_string(), |n| n.display_label().to_string())
	};
	format!(
		"{} {} {}. {}",
		label(edge.source_id()),
		edge.kind.verb(),
		label(edge.target_id()),
		edge.description
	)
}

/// Numbered reference line, `index` counted from zero.
pub fn format_citation(citation: &str, index: usize) -> String {
	format!("{}. {citation}", index + 1)
}

/// Markdown sheet for one node.
pub fn export_node_markdown(node: &Node, edges: &[Edge]) -> String {
	let links = connections(&node.id, edges);
	let mut md = String::new();

	// Writing to a String cannot fail.
	let _ = writeln!(md, "# {}\n", node.display_label());
	let _ = writeln!(md, "**Category:** {}", node.category.as_str());
	let _ = writeln!(md, "**Description:** {}", node.description);
	if let Some(range) = &node.normal_range {
		match &node.unit {
			Some(unit) => {
				let _ = writeln!(md, "**Normal Range:** {range} {unit}");
			}
			None => {
				let _ = writeln!(md, "**Normal Range:** {range}");
			}
		}
	}
	if let Some(range) = &node.optimal_range {
		let _ = writeln!(md, "**Optimal Range:** {range}");
	}

	let content = &node.educational_content;
	let _ = writeln!(md, "\n## What It Is\n{}", content.what_it_is);
	let _ = writeln!(md, "\n## Why It Matters\n{}", content.why_it_matters);
	if let Some(how) = &content.how_to_optimize {
		let _ = writeln!(md, "\n## How to Optimize\n{how}");
	}

	let _ = writeln!(md, "\n## Connections");
	let _ = writeln!(md, "- **Influences:** {} downstream effects", links.outgoing.len());
	let _ = writeln!(md, "- **Influenced by:** {} upstream factors", links.incoming.len());
	md
}

/// What a tooltip shows for a focused node.
#[derive(Clone, Debug, PartialEq)]
pub struct PathSummary {
	/// Number of nodes upstream of the node.
	pub upstream: usize,
	/// Number of nodes downstream of the node.
	pub downstream: usize,
	/// Longest downstream chain (first found when tied), if the node has effects.
	pub longest_chain: Option<Vec<String>>,
	/// Impact tally of the longest chain.
	pub impact: Option<PathImpact>,
}

impl PathSummary {
	/// Summarize the neighbourhood of `id`.
	pub fn for_node(id: &str, edges: &[Edge]) -> Self {
		let upstream = reachable_from(id, edges, Direction::Upstream).reachable.len();
		let downstream = reachable_from(id, edges, Direction::Downstream).reachable.len();

		let longest_chain = all_paths_with_depth_bound(id, edges, SUMMARY_DEPTH)
			.into_iter()
			.filter(|p| p.len() > 1)
			.reduce(|best, p| if p.len() > best.len() { p } else { best });
		let impact = longest_chain.as_deref().map(|p| path_impact(p, edges));

		Self {
			upstream,
			downstream,
			longest_chain,
			impact,
		}
	}

	/// One-line text, e.g. "3 causes, 4 effects; net effect negative".
	pub fn headline(&self) -> String {
		let mut line = format!("{} causes, {} effects", self.upstream, self.downstream);
		if let Some(impact) = &self.impact {
			let effect = match impact.effect {
				OverallEffect::Positive => "positive",
				OverallEffect::Negative => "negative",
				OverallEffect::Mixed => "mixed",
			};
			let _ = write!(line, "; net effect {effect}");
		}
		line
	}
}
