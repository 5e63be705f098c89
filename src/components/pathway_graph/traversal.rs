//! Breadth-first traversal over the edge list.
//!
//! All searches keep a visited set (or, for path enumeration, a per-path
//! membership check), so they terminate on cyclic data even though the
//! authored graph is a DAG. Endpoints are always compared through
//! [`resolve_id`](super::types::resolve_id) via [`Edge::source_id`] and
//! [`Edge::target_id`]. Unknown ids are not errors; they simply reach nothing.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use super::types::{Edge, EdgeId, EdgeType, Node, Strength};

/// Which way to follow edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
	/// Effects: follow source → target.
	Downstream,
	/// Causes: follow target → source.
	Upstream,
}

/// Outgoing neighbours per node for one direction, in edge-list order.
struct Adjacency<'a> {
	next: HashMap<&'a str, Vec<(EdgeId, &'a str)>>,
}

impl<'a> Adjacency<'a> {
	fn new(edges: &'a [Edge], direction: Direction) -> Self {
		let mut next: HashMap<&str, Vec<(EdgeId, &str)>> = HashMap::new();
		for (i, edge) in edges.iter().enumerate() {
			let (from, to) = match direction {
				Direction::Downstream => (edge.source_id(), edge.target_id()),
				Direction::Upstream => (edge.target_id(), edge.source_id()),
			};
			next.entry(from).or_default().push((EdgeId(i), to));
		}
		Self { next }
	}

	fn of(&self, id: &str) -> &[(EdgeId, &'a str)] {
		self.next.get(id).map(Vec::as_slice).unwrap_or(&[])
	}
}

/// Result of a one-directional reachability search.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reachability {
	/// Nodes one edge away in the search direction, deduplicated.
	pub direct_neighbors: Vec<String>,
	/// Every node reachable from the start, in BFS order. Never includes the start.
	pub reachable: Vec<String>,
	/// Every edge followed out of a visited node.
	pub edges: BTreeSet<EdgeId>,
}

/// Breadth-first search from `start` in `direction`.
pub fn reachable_from(start: &str, edges: &[Edge], direction: Direction) -> Reachability {
	let adjacency = Adjacency::new(edges, direction);
	let mut result = Reachability::default();

	let mut seen_neighbors = HashSet::new();
	for &(_, next) in adjacency.of(start) {
		if next != start && seen_neighbors.insert(next) {
			result.direct_neighbors.push(next.to_string());
		}
	}

	let mut visited: HashSet<&str> = HashSet::from([start]);
	let mut queue = VecDeque::from([start]);
	while let Some(current) = queue.pop_front() {
		for &(edge, next) in adjacency.of(current) {
			result.edges.insert(edge);
			if visited.insert(next) {
				result.reachable.push(next.to_string());
				queue.push_back(next);
			}
		}
	}
	result
}

/// Nodes sharing an edge with `id` in either direction, first-seen order.
pub fn direct_neighbors(id: &str, edges: &[Edge]) -> Vec<String> {
	let mut seen = HashSet::new();
	edges
		.iter()
		.filter_map(|edge| {
			if edge.source_id() == id {
				Some(edge.target_id())
			} else if edge.target_id() == id {
				Some(edge.source_id())
			} else {
				None
			}
		})
		.filter(|&other| other != id && seen.insert(other))
		.map(str::to_string)
		.collect()
}

/// Shortest downstream path from `start` to `end` by edge count.
///
/// `Some([start])` when they are the same node, `None` when `end` is not
/// reachable.
pub fn shortest_path(start: &str, end: &str, edges: &[Edge]) -> Option<Vec<String>> {
	if start == end {
		return Some(vec![start.to_string()]);
	}

	let adjacency = Adjacency::new(edges, Direction::Downstream);
	let mut parent: HashMap<&str, &str> = HashMap::new();
	let mut visited: HashSet<&str> = HashSet::from([start]);
	let mut queue = VecDeque::from([start]);

	while let Some(current) = queue.pop_front() {
		for &(_, next) in adjacency.of(current) {
			if !visited.insert(next) {
				continue;
			}
			parent.insert(next, current);
			if next == end {
				let mut path = vec![end.to_string()];
				let mut at = end;
				while let Some(&prev) = parent.get(at) {
					path.push(prev.to_string());
					at = prev;
				}
				path.reverse();
				return Some(path);
			}
			queue.push_back(next);
		}
	}
	None
}

/// Every distinct simple downstream path starting at `start`.
///
/// A branch ends at a sink, after `max_depth` edges, or when every successor is
/// already on the path. Paths come out in breadth-first order and hold at most
/// `max_depth + 1` nodes.
pub fn all_paths_with_depth_bound(start: &str, edges: &[Edge], max_depth: usize) -> Vec<Vec<String>> {
	let adjacency = Adjacency::new(edges, Direction::Downstream);
	let mut paths = Vec::new();
	let mut queue: VecDeque<Vec<&str>> = VecDeque::from([vec![start]]);

	while let Some(path) = queue.pop_front() {
		let current = path[path.len() - 1];
		let depth = path.len() - 1;

		let mut extended = false;
		if depth < max_depth {
			let mut tried = HashSet::new();
			for &(_, next) in adjacency.of(current) {
				if path.contains(&next) || !tried.insert(next) {
					continue;
				}
				let mut longer = path.clone();
				longer.push(next);
				queue.push_back(longer);
				extended = true;
			}
		}

		if !extended {
			paths.push(path.iter().map(|s| s.to_string()).collect());
		}
	}
	paths
}

/// Every simple downstream path from `start` that ends at `end`, with at most
/// `max_depth` edges. Depth-first order.
pub fn paths_between(start: &str, end: &str, edges: &[Edge], max_depth: usize) -> Vec<Vec<String>> {
	fn walk<'a>(
		adjacency: &Adjacency<'a>,
		path: &mut Vec<&'a str>,
		end: &str,
		max_depth: usize,
		found: &mut Vec<Vec<String>>,
	) {
		let current = path[path.len() - 1];
		if current == end {
			found.push(path.iter().map(|s| s.to_string()).collect());
			return;
		}
		if path.len() > max_depth {
			return;
		}
		let mut tried = HashSet::new();
		for &(_, next) in adjacency.of(current) {
			if path.contains(&next) || !tried.insert(next) {
				continue;
			}
			path.push(next);
			walk(adjacency, path, end, max_depth, found);
			path.pop();
		}
	}

	let adjacency = Adjacency::new(edges, Direction::Downstream);
	let mut found = Vec::new();
	walk(&adjacency, &mut vec![start], end, max_depth, &mut found);
	found
}

/// True when `edge` joins two consecutive nodes of `path`, in path direction.
pub fn edge_in_path(edge: &Edge, path: &[String]) -> bool {
	path.windows(2).any(|pair| edge.connects(&pair[0], &pair[1]))
}

/// Ids of every edge that joins consecutive nodes of `path`, parallel edges
/// included.
pub fn edges_in_path(path: &[String], edges: &[Edge]) -> Vec<EdgeId> {
	edges
		.iter()
		.enumerate()
		.filter(|(_, edge)| edge_in_path(edge, path))
		.map(|(i, _)| EdgeId(i))
		.collect()
}

/// Edges entering and leaving one node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Connections {
	/// Edges ending at the node.
	pub incoming: Vec<EdgeId>,
	/// Edges starting at the node.
	pub outgoing: Vec<EdgeId>,
}

/// Incoming and outgoing edges of `id`.
pub fn connections(id: &str, edges: &[Edge]) -> Connections {
	let mut result = Connections::default();
	for (i, edge) in edges.iter().enumerate() {
		if edge.target_id() == id {
			result.incoming.push(EdgeId(i));
		}
		if edge.source_id() == id {
			result.outgoing.push(EdgeId(i));
		}
	}
	result
}

/// Net direction of a chain of effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverallEffect {
	/// More stimulatory than inhibitory links.
	Positive,
	/// More inhibitory than stimulatory links.
	Negative,
	/// Balanced, or no typed links.
	Mixed,
}

/// Edge-type tally along a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathImpact {
	/// Inhibitory links on the path.
	pub inhibitory: usize,
	/// Stimulatory links on the path.
	pub stimulatory: usize,
	/// Regulatory links on the path.
	pub regulatory: usize,
	/// Strong links on the path.
	pub strong: usize,
	/// Net direction of the path.
	pub effect: OverallEffect,
}

/// Count edge types and strong links along `path` (first matching edge per
/// step) and call the net effect.
pub fn path_impact(path: &[String], edges: &[Edge]) -> PathImpact {
	let (mut inhibitory, mut stimulatory, mut regulatory, mut strong) = (0, 0, 0, 0);
	for pair in path.windows(2) {
		let Some(edge) = edges.iter().find(|e| e.connects(&pair[0], &pair[1])) else {
			continue;
		};
		match edge.kind {
			EdgeType::Inhibitory => inhibitory += 1,
			EdgeType::Stimulatory => stimulatory += 1,
			EdgeType::Regulatory => regulatory += 1,
			EdgeType::Unknown => {}
		}
		if edge.strength == Strength::Strong {
			strong += 1;
		}
	}

	let effect = if inhibitory > stimulatory {
		OverallEffect::Negative
	} else if stimulatory > inhibitory {
		OverallEffect::Positive
	} else {
		OverallEffect::Mixed
	};

	PathImpact {
		inhibitory,
		stimulatory,
		regulatory,
		strong,
		effect,
	}
}

/// Find directed cycles, each reported as `[a, b, ..., a]`.
///
/// Depth-first from every node in input order. Each cycle is rotated to start
/// at its smallest id, so it is reported once whichever node reached it.
pub fn detect_cycles(nodes: &[Node], edges: &[Edge]) -> Vec<Vec<String>> {
	fn visit<'a>(
		adjacency: &Adjacency<'a>,
		id: &'a str,
		path: &mut Vec<&'a str>,
		done: &mut HashSet<&'a str>,
		cycles: &mut Vec<Vec<String>>,
	) {
		if let Some(pos) = path.iter().position(|&p| p == id) {
			let body = &path[pos..];
			let start = body
				.iter()
				.enumerate()
				.min_by_key(|&(_, id)| *id)
				.map_or(0, |(i, _)| i);
			let mut cycle: Vec<String> = body[start..]
				.iter()
				.chain(&body[..start])
				.map(|s| s.to_string())
				.collect();
			cycle.push(body[start].to_string());
			if !cycles.contains(&cycle) {
				cycles.push(cycle);
			}
			return;
		}
		if !done.insert(id) {
			return;
		}
		path.push(id);
		for &(_, next) in adjacency.of(id) {
			visit(adjacency, next, path, done, cycles);
		}
		path.pop();
	}

	let adjacency = Adjacency::new(edges, Direction::Downstream);
	let mut cycles = Vec::new();
	for node in nodes {
		let mut done = HashSet::new();
		visit(&adjacency, &node.id, &mut Vec::new(), &mut done, &mut cycles);
	}
	cycles
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::pathway_graph::types::{Category, NodeRef};

	fn edge(s: &str, t: &str) -> Edge {
		Edge::new(s, t, EdgeType::Stimulatory, Strength::Moderate)
	}

	fn ids(v: &[&str]) -> Vec<String> {
		v.iter().map(|s| s.to_string()).collect()
	}

	fn chain() -> Vec<Edge> {
		vec![
			Edge::new("tsh", "progesterone", EdgeType::Inhibitory, Strength::Strong),
			Edge::new("progesterone", "luteal", EdgeType::Stimulatory, Strength::Strong),
			Edge::new("luteal", "conception", EdgeType::Inhibitory, Strength::Strong),
			Edge::new("free_t3", "progesterone", EdgeType::Stimulatory, Strength::Moderate),
		]
	}

	#[test]
	fn downstream_reachability() {
		let r = reachable_from("tsh", &chain(), Direction::Downstream);
		assert_eq!(r.direct_neighbors, ids(&["progesterone"]));
		assert_eq!(r.reachable, ids(&["progesterone", "luteal", "conception"]));
		assert_eq!(r.edges, BTreeSet::from([EdgeId(0), EdgeId(1), EdgeId(2)]));
	}

	#[test]
	fn upstream_reachability() {
		let r = reachable_from("luteal", &chain(), Direction::Upstream);
		assert_eq!(r.direct_neighbors, ids(&["progesterone"]));
		assert_eq!(r.reachable, ids(&["progesterone", "tsh", "free_t3"]));
		assert_eq!(r.edges, BTreeSet::from([EdgeId(0), EdgeId(1), EdgeId(3)]));
	}

	#[test]
	fn unknown_start_reaches_nothing() {
		let r = reachable_from("ghost", &chain(), Direction::Downstream);
		assert_eq!(r, Reachability::default());
		assert_eq!(shortest_path("ghost", "tsh", &chain()), None);
	}

	#[test]
	fn shortest_path_prefers_direct_edge() {
		let edges = vec![edge("A", "B"), edge("B", "C"), edge("A", "C")];
		assert_eq!(shortest_path("A", "C", &edges), Some(ids(&["A", "C"])));
	}

	#[test]
	fn shortest_path_same_node_and_missing() {
		assert_eq!(shortest_path("tsh", "tsh", &chain()), Some(ids(&["tsh"])));
		assert_eq!(shortest_path("conception", "tsh", &chain()), None);
		assert_eq!(
			shortest_path("tsh", "conception", &chain()),
			Some(ids(&["tsh", "progesterone", "luteal", "conception"]))
		);
	}

	#[test]
	fn traversal_terminates_on_cycles() {
		let edges = vec![edge("a", "b"), edge("b", "c"), edge("c", "a"), edge("c", "d")];
		let r = reachable_from("a", &edges, Direction::Downstream);
		assert_eq!(r.reachable, ids(&["b", "c", "d"]));
		assert!(r.reachable.len() <= 4);

		let up = reachable_from("a", &edges, Direction::Upstream);
		assert_eq!(up.reachable, ids(&["c", "b"]));

		let paths = all_paths_with_depth_bound("a", &edges, 10);
		assert_eq!(paths, vec![ids(&["a", "b", "c", "d"])]);
		assert!(paths.iter().all(|p| p.len() <= 11));
	}

	#[test]
	fn self_loop_is_harmless() {
		let edges = vec![edge("a", "a"), edge("a", "b")];
		let r = reachable_from("a", &edges, Direction::Downstream);
		assert_eq!(r.direct_neighbors, ids(&["b"]));
		assert_eq!(r.reachable, ids(&["b"]));
		assert_eq!(all_paths_with_depth_bound("a", &edges, 3), vec![ids(&["a", "b"])]);
	}

	#[test]
	fn depth_bound_cuts_paths() {
		let paths = all_paths_with_depth_bound("tsh", &chain(), 2);
		assert_eq!(paths, vec![ids(&["tsh", "progesterone", "luteal"])]);

		let paths = all_paths_with_depth_bound("tsh", &chain(), 0);
		assert_eq!(paths, vec![ids(&["tsh"])]);
	}

	#[test]
	fn branching_paths_are_distinct() {
		let edges = vec![edge("a", "b"), edge("a", "c"), edge("a", "b"), edge("b", "d")];
		let paths = all_paths_with_depth_bound("a", &edges, 5);
		assert_eq!(paths, vec![ids(&["a", "c"]), ids(&["a", "b", "d"])]);
	}

	#[test]
	fn paths_between_lists_every_route() {
		let edges = vec![edge("A", "B"), edge("B", "C"), edge("A", "C")];
		assert_eq!(
			paths_between("A", "C", &edges, 5),
			vec![ids(&["A", "B", "C"]), ids(&["A", "C"])]
		);
		assert_eq!(paths_between("A", "C", &edges, 1), vec![ids(&["A", "C"])]);
		assert!(paths_between("C", "A", &edges, 5).is_empty());
	}

	#[test]
	fn embedded_endpoints_traverse_like_bare_ids() {
		let embedded = vec![Edge::new(
			NodeRef::from(Node::new("tsh", "TSH", Category::Thyroid)),
			"progesterone",
			EdgeType::Inhibitory,
			Strength::Strong,
		)];
		let bare = vec![Edge::new("tsh", "progesterone", EdgeType::Inhibitory, Strength::Strong)];

		assert_eq!(
			reachable_from("tsh", &embedded, Direction::Downstream),
			reachable_from("tsh", &bare, Direction::Downstream)
		);
		assert_eq!(
			shortest_path("tsh", "progesterone", &embedded),
			shortest_path("tsh", "progesterone", &bare)
		);
		let path = ids(&["tsh", "progesterone"]);
		assert!(edge_in_path(&embedded[0], &path));
		assert!(edge_in_path(&bare[0], &path));
	}

	#[test]
	fn parallel_edges_are_all_on_path() {
		let edges = vec![edge("a", "b"), edge("a", "b"), edge("b", "a")];
		assert_eq!(edges_in_path(&ids(&["a", "b"]), &edges), vec![EdgeId(0), EdgeId(1)]);
	}

	#[test]
	fn neighbors_in_both_directions() {
		assert_eq!(
			direct_neighbors("progesterone", &chain()),
			ids(&["tsh", "luteal", "free_t3"])
		);
		let c = connections("progesterone", &chain());
		assert_eq!(c.incoming, vec![EdgeId(0), EdgeId(3)]);
		assert_eq!(c.outgoing, vec![EdgeId(1)]);
	}

	#[test]
	fn impact_tallies_edge_types() {
		let impact = path_impact(&ids(&["tsh", "progesterone", "luteal", "conception"]), &chain());
		assert_eq!(impact.inhibitory, 2);
		assert_eq!(impact.stimulatory, 1);
		assert_eq!(impact.strong, 3);
		assert_eq!(impact.effect, OverallEffect::Negative);

		let impact = path_impact(&ids(&["free_t3", "progesterone"]), &chain());
		assert_eq!(impact.effect, OverallEffect::Positive);
		assert_eq!(path_impact(&[], &chain()).effect, OverallEffect::Mixed);
	}

	#[test]
	fn cycle_detection() {
		let nodes = vec![
			Node::new("a", "A", Category::Thyroid),
			Node::new("b", "B", Category::Thyroid),
			Node::new("c", "C", Category::Thyroid),
		];
		assert!(detect_cycles(&nodes, &chain()).is_empty());

		let cycles = detect_cycles(&nodes, &[edge("a", "b"), edge("b", "a"), edge("b", "c")]);
		assert!(cycles.contains(&ids(&["a", "b", "a"])));
		assert!(cycles.iter().all(|c| c.first() == c.last()));
	}

	#[test]
	fn each_cycle_reported_once_from_any_entry() {
		let nodes: Vec<Node> = ["c", "b", "a"]
			.iter()
			.map(|&id| Node::new(id, id, Category::Intermediate))
			.collect();
		let edges = [edge("a", "b"), edge("b", "c"), edge("c", "a")];
		assert_eq!(detect_cycles(&nodes, &edges), [ids(&["a", "b", "c", "a"])]);
	}
}
