//! Load-time referential integrity check.
//!
//! Produces the validated [`Graph`] every other module works on. Problems are
//! collected, never fatal: a dangling edge is reported and dropped, a
//! duplicate node id keeps its first occurrence.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use super::types::{Edge, EdgeId, GraphData, Node};

/// A data problem found while loading.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
	/// A link names a source node that does not exist.
	#[error("link {index}: source node '{id}' does not exist")]
	MissingSource {
		/// Position of the link in the input.
		index: usize,
		/// The unknown node id.
		id: String,
	},
	/// A link names a target node that does not exist.
	#[error("link {index}: target node '{id}' does not exist")]
	MissingTarget {
		/// Position of the link in the input.
		index: usize,
		/// The unknown node id.
		id: String,
	},
	/// Two nodes share an id.
	#[error("node '{0}' is defined more than once")]
	DuplicateNode(String),
}

/// Nodes and edges with every edge endpoint known to exist.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	index: HashMap<String, usize>,
}

impl Graph {
	/// Validate `data` and keep only the consistent part of it.
	pub fn from_data(data: GraphData) -> (Self, Vec<ValidationError>) {
		let errors = validate(&data.nodes, &data.links);

		let mut index = HashMap::new();
		let mut nodes = Vec::with_capacity(data.nodes.len());
		for node in data.nodes {
			if index.contains_key(&node.id) {
				continue;
			}
			index.insert(node.id.clone(), nodes.len());
			nodes.push(node);
		}

		let edges = data
			.links
			.into_iter()
			.filter(|edge| index.contains_key(edge.source_id()) && index.contains_key(edge.target_id()))
			.collect();

		(Self { nodes, edges, index }, errors)
	}

	/// Nodes in load order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Edges in load order; [`EdgeId`] indexes into this.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Node by id.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	/// Edge by id.
	pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
		self.edges.get(id.0)
	}

	/// Whether a node with `id` exists.
	pub fn contains(&self, id: &str) -> bool {
		self.index.contains_key(id)
	}

	/// Edges paired with their ids, in load order.
	pub fn edges_with_ids(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
		self.edges.iter().enumerate().map(|(i, e)| (EdgeId(i), e))
	}
}

/// Check that node ids are unique and every edge endpoint names a node.
pub fn validate(nodes: &[Node], links: &[Edge]) -> Vec<ValidationError> {
	let mut errors = Vec::new();
	let mut seen: HashSet<&str> = HashSet::with_capacity(nodes.len());
	for node in nodes {
		if !seen.insert(node.id.as_str()) {
			errors.push(ValidationError::DuplicateNode(node.id.clone()));
		}
	}

	for (index, edge) in links.iter().enumerate() {
		if !seen.contains(edge.source_id()) {
			errors.push(ValidationError::MissingSource {
				index,
				id: edge.source_id().to_string(),
			});
		}
		if !seen.contains(edge.target_id()) {
			errors.push(ValidationError::MissingTarget {
				index,
				id: edge.target_id().to_string(),
			});
		}
	}
	errors
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::pathway_graph::types::{Category, EdgeType, Strength};

	fn data(links: Vec<Edge>) -> GraphData {
		GraphData {
			nodes: vec![
				Node::new("tsh", "TSH", Category::Thyroid),
				Node::new("progesterone", "Progesterone", Category::Intermediate),
			],
			links,
			..GraphData::default()
		}
	}

	#[test]
	fn dangling_target_is_reported_once_and_dropped() {
		let (graph, errors) = Graph::from_data(data(vec![
			Edge::new("tsh", "progesterone", EdgeType::Inhibitory, Strength::Strong),
			Edge::new("tsh", "nonexistent", EdgeType::Inhibitory, Strength::Weak),
		]));

		assert_eq!(errors.len(), 1);
		assert_eq!(
			errors[0].to_string(),
			"link 1: target node 'nonexistent' does not exist"
		);
		assert_eq!(graph.edges().len(), 1);
		assert!(!graph.contains("nonexistent"));
	}

	#[test]
	fn edge_missing_both_ends_yields_two_errors() {
		let errors = validate(
			&data(vec![]).nodes,
			&[Edge::new("x", "y", EdgeType::Regulatory, Strength::Weak)],
		);
		assert_eq!(
			errors,
			vec![
				ValidationError::MissingSource { index: 0, id: "x".into() },
				ValidationError::MissingTarget { index: 0, id: "y".into() },
			]
		);
	}

	#[test]
	fn duplicate_node_keeps_first_definition() {
		let mut input = data(vec![]);
		input.nodes.push(Node::new("tsh", "Second TSH", Category::Intermediate));

		let (graph, errors) = Graph::from_data(input);
		assert_eq!(errors, vec![ValidationError::DuplicateNode("tsh".into())]);
		assert_eq!(graph.nodes().len(), 2);
		assert_eq!(graph.node("tsh").map(|n| n.label.as_str()), Some("TSH"));
	}

	#[test]
	fn valid_data_has_no_errors() {
		let (graph, errors) = Graph::from_data(data(vec![Edge::new(
			"tsh",
			"progesterone",
			EdgeType::Inhibitory,
			Strength::Strong,
		)]));
		assert!(errors.is_empty());
		assert_eq!(graph.edge(EdgeId(0)).map(|e| e.target_id()), Some("progesterone"));
	}
}
