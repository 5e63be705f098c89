//! UI components.

pub mod pathway_graph;
