//! Graph data structures: nodes, edges and the endpoint identity rules.
//!
//! Everything here deserializes from the camelCase JSON the dataset is authored
//! in. Unrecognised enum strings map to an explicit `Unknown` variant so a typo
//! in the data degrades to neutral styling instead of failing the whole load.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::scenario::Scenario;
use super::tour::TourStep;

/// Which stage of the cascade a node belongs to. Drives column/group placement
/// and the default node color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
	/// Thyroid marker (TSH, T3, T4, antibodies).
	Thyroid,
	/// Hormone or physiological process in between.
	Intermediate,
	/// Reproductive outcome.
	Reproductive,
	/// Unrecognised category.
	#[default]
	#[serde(other)]
	Unknown,
}

impl Category {
	/// Layout groups in the order they are placed (left to right, top to bottom).
	pub const ORDER: [Category; 3] = [
		Category::Thyroid,
		Category::Intermediate,
		Category::Reproductive,
	];

	/// Index of the layout group this category is placed in.
	/// Unknown nodes share the intermediate group so they are never dropped.
	pub fn group(self) -> usize {
		match self {
			Category::Thyroid => 0,
			Category::Intermediate | Category::Unknown => 1,
			Category::Reproductive => 2,
		}
	}

	/// Lowercase name as it appears in the data.
	pub fn as_str(self) -> &'static str {
		match self {
			Category::Thyroid => "thyroid",
			Category::Intermediate => "intermediate",
			Category::Reproductive => "reproductive",
			Category::Unknown => "unknown",
		}
	}
}

/// How strongly the source influences the target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
	/// Strong influence.
	Strong,
	/// Moderate influence.
	Moderate,
	/// Weak influence.
	Weak,
	/// Unrecognised strength.
	#[default]
	#[serde(other)]
	Unknown,
}

/// Direction of the physiological effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
	/// Source suppresses the target.
	Inhibitory,
	/// Source promotes the target.
	Stimulatory,
	/// Source modulates the target.
	Regulatory,
	/// Unrecognised type.
	#[default]
	#[serde(other)]
	Unknown,
}

impl EdgeType {
	/// Verb used when reading an edge aloud ("TSH inhibits progesterone").
	pub fn verb(self) -> &'static str {
		match self {
			EdgeType::Inhibitory => "inhibits",
			EdgeType::Stimulatory => "stimulates",
			EdgeType::Regulatory => "regulates",
			EdgeType::Unknown => "affects",
		}
	}
}

/// Thyroid dysfunction level selected by the user or implied by a scenario.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
	/// Euthyroid.
	#[default]
	Normal,
	/// Subclinical hypothyroidism.
	Subclinical,
	/// Overt hypothyroidism.
	Overt,
}

impl Severity {
	/// Every level, mildest first.
	pub const ALL: [Severity; 3] = [Severity::Normal, Severity::Subclinical, Severity::Overt];

	/// Display label.
	pub fn label(self) -> &'static str {
		match self {
			Severity::Normal => "Normal",
			Severity::Subclinical => "Subclinical",
			Severity::Overt => "Overt",
		}
	}
}

/// Plain-language explanation shown in the detail panel.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationalContent {
	/// What the marker is.
	pub what_it_is: String,
	/// Why it matters for fertility.
	pub why_it_matters: String,
	/// How to improve it, if applicable.
	pub how_to_optimize: Option<String>,
}

/// A physiological marker or outcome.
///
/// Only `id` is required so that an edge may embed a partial node object as
/// its endpoint.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
	/// Unique node identifier.
	pub id: String,
	/// Display label.
	#[serde(default)]
	pub label: String,
	/// Stage of the cascade.
	#[serde(default)]
	pub category: Category,
	/// Short description.
	#[serde(default)]
	pub description: String,
	/// Reference range, e.g. `"0.4-4.0"`.
	#[serde(default)]
	pub normal_range: Option<String>,
	/// Range optimal for fertility.
	#[serde(default)]
	pub optimal_range: Option<String>,
	/// Unit of the lab value.
	#[serde(default)]
	pub unit: Option<String>,
	/// Detail panel text.
	#[serde(default)]
	pub educational_content: EducationalContent,
}

impl Node {
	/// Node with only id, label and category set.
	pub fn new(id: impl Into<String>, label: impl Into<String>, category: Category) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			category,
			..Self::default()
		}
	}

	/// Label to display, falling back to the id for unlabeled nodes.
	pub fn display_label(&self) -> &str {
		if self.label.is_empty() {
			&self.id
		} else {
			&self.label
		}
	}
}

/// An edge endpoint: either a bare node id or an embedded node record.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum NodeRef {
	/// Bare node id.
	Id(String),
	/// Embedded node record.
	Node(Box<Node>),
}

impl NodeRef {
	/// Canonical id; see [`resolve_id`].
	pub fn id(&self) -> &str {
		resolve_id(self)
	}
}

impl From<&str> for NodeRef {
	fn from(id: &str) -> Self {
		NodeRef::Id(id.to_string())
	}
}

impl From<String> for NodeRef {
	fn from(id: String) -> Self {
		NodeRef::Id(id)
	}
}

impl From<Node> for NodeRef {
	fn from(node: Node) -> Self {
		NodeRef::Node(Box::new(node))
	}
}

/// Canonical id of an endpoint. All endpoint comparisons go through here.
pub fn resolve_id(node_ref: &NodeRef) -> &str {
	match node_ref {
		NodeRef::Id(id) => id,
		NodeRef::Node(node) => &node.id,
	}
}

/// A directed, typed causal relationship.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
	/// Cause.
	pub source: NodeRef,
	/// Effect.
	pub target: NodeRef,
	/// How strong the influence is.
	#[serde(default)]
	pub strength: Strength,
	/// Direction of the effect (`type` in JSON).
	#[serde(rename = "type", default)]
	pub kind: EdgeType,
	/// Short description of the relationship.
	#[serde(default)]
	pub description: String,
	/// Physiological mechanism.
	#[serde(default)]
	pub mechanism_detail: Option<String>,
	/// Supporting references.
	#[serde(default)]
	pub research_citations: Vec<String>,
}

impl Edge {
	/// Edge with no description or citations.
	pub fn new(
		source: impl Into<NodeRef>,
		target: impl Into<NodeRef>,
		kind: EdgeType,
		strength: Strength,
	) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			strength,
			kind,
			description: String::new(),
			mechanism_detail: None,
			research_citations: Vec::new(),
		}
	}

	/// Resolved source id.
	pub fn source_id(&self) -> &str {
		resolve_id(&self.source)
	}

	/// Resolved target id.
	pub fn target_id(&self) -> &str {
		resolve_id(&self.target)
	}

	/// True when either endpoint is `id`.
	pub fn touches(&self, id: &str) -> bool {
		self.source_id() == id || self.target_id() == id
	}

	/// True when this edge runs from `from` to `to`.
	pub fn connects(&self, from: &str, to: &str) -> bool {
		self.source_id() == from && self.target_id() == to
	}
}

/// Identifies an edge by its position in the validated edge list.
///
/// Index-based so parallel edges between the same pair stay distinct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub usize);

impl fmt::Display for EdgeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "link-{}", self.0)
	}
}

/// Complete input document: nodes, links, and the optional tour and scenario
/// content that ships with them.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GraphData {
	/// All nodes.
	pub nodes: Vec<Node>,
	/// All links (`edges` also accepted).
	#[serde(alias = "edges")]
	pub links: Vec<Edge>,
	/// Guided tour steps.
	#[serde(default)]
	pub tour: Vec<TourStep>,
	/// Clinical scenarios.
	#[serde(default)]
	pub scenarios: Vec<Scenario>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn endpoint_forms_resolve_to_same_id() {
		let bare = NodeRef::from("tsh");
		let embedded = NodeRef::from(Node::new("tsh", "TSH", Category::Thyroid));
		assert_eq!(resolve_id(&bare), "tsh");
		assert_eq!(resolve_id(&bare), resolve_id(&embedded));
	}

	#[test]
	fn edge_accepts_string_or_object_endpoints() {
		let json = r#"{
			"source": "tsh",
			"target": { "id": "progesterone_production", "label": "Progesterone" },
			"strength": "strong",
			"type": "inhibitory",
			"description": "TSH impairs the corpus luteum",
			"researchCitations": ["Smith 2019"]
		}"#;
		let edge: Edge = serde_json::from_str(json).unwrap();
		assert!(matches!(edge.source, NodeRef::Id(_)));
		assert!(matches!(edge.target, NodeRef::Node(_)));
		assert!(edge.connects("tsh", "progesterone_production"));
		assert_eq!(edge.kind, EdgeType::Inhibitory);
		assert_eq!(edge.research_citations, vec!["Smith 2019".to_string()]);
	}

	#[test]
	fn unknown_enum_strings_fall_back() {
		let json = r#"{ "source": "a", "target": "b", "strength": "huge", "type": "mystery" }"#;
		let edge: Edge = serde_json::from_str(json).unwrap();
		assert_eq!(edge.strength, Strength::Unknown);
		assert_eq!(edge.kind, EdgeType::Unknown);

		let node: Node = serde_json::from_str(r#"{ "id": "x", "category": "endocrine" }"#).unwrap();
		assert_eq!(node.category, Category::Unknown);
		assert_eq!(node.category.group(), Category::Intermediate.group());
	}

	#[test]
	fn node_reads_camel_case_fields() {
		let json = r#"{
			"id": "free_t3",
			"label": "Free T3",
			"category": "thyroid",
			"description": "Active thyroid hormone",
			"normalRange": "2.3-4.2",
			"optimalRange": "3.0-4.0",
			"unit": "pg/mL",
			"educationalContent": { "whatItIs": "T3", "whyItMatters": "Metabolism" }
		}"#;
		let node: Node = serde_json::from_str(json).unwrap();
		assert_eq!(node.normal_range.as_deref(), Some("2.3-4.2"));
		assert_eq!(node.educational_content.why_it_matters, "Metabolism");
		assert_eq!(node.educational_content.how_to_optimize, None);
	}

	#[test]
	fn edge_id_displays_as_link_name() {
		assert_eq!(EdgeId(7).to_string(), "link-7");
	}

	#[test]
	fn graph_data_accepts_edges_alias() {
		let data: GraphData =
			serde_json::from_str(r#"{ "nodes": [{ "id": "a" }], "edges": [] }"#).unwrap();
		assert_eq!(data.nodes.len(), 1);
		assert!(data.tour.is_empty());
	}
}
