use std::collections::HashMap;

use crate::transfers::{DerivedGraph, EdgeKind};
use crate::util::truncate_address;

use super::super::render_utils::node_radius;

pub(in crate::app) struct RenderNode {
    pub(in crate::app) id: String,
    pub(in crate::app) label: String,
    pub(in crate::app) transaction_count: u64,
    pub(in crate::app) radius: f32,
}

pub(in crate::app) struct RenderEdge {
    pub(in crate::app) source: usize,
    pub(in crate::app) target: usize,
    /// Position in the derived edge list, used as the selection key.
    pub(in crate::app) edge_index: usize,
    pub(in crate::app) value: u64,
    pub(in crate::app) kind: EdgeKind,
    pub(in crate::app) timestamp: String,
    pub(in crate::app) amount: Option<f64>,
}

#[derive(Default)]
pub(in crate::app) struct RenderGraph {
    pub(in crate::app) nodes: Vec<RenderNode>,
    pub(in crate::app) edges: Vec<RenderEdge>,
    pub(in crate::app) index_by_id: HashMap<String, usize>,
}

impl RenderGraph {
    pub(in crate::app) fn from_derived(graph: &DerivedGraph) -> Self {
        let max_count = graph
            .nodes
            .iter()
            .map(|node| node.transaction_count)
            .max()
            .unwrap_or(0);

        let mut index_by_id = HashMap::with_capacity(graph.nodes.len());
        let nodes = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                index_by_id.insert(node.id.clone(), index);
                RenderNode {
                    id: node.id.clone(),
                    label: truncate_address(&node.id),
                    transaction_count: node.transaction_count,
                    radius: node_radius(node.transaction_count, max_count),
                }
            })
            .collect();

        let edges = graph
            .edges
            .iter()
            .enumerate()
            .filter_map(|(edge_index, edge)| {
                let source = *index_by_id.get(&edge.source)?;
                let target = *index_by_id.get(&edge.target)?;
                Some(RenderEdge {
                    source,
                    target,
                    edge_index,
                    value: edge.value,
                    kind: edge.kind,
                    timestamp: edge.timestamp.clone(),
                    amount: edge.amount,
                })
            })
            .collect();

        Self {
            nodes,
            edges,
            index_by_id,
        }
    }

    pub(in crate::app) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(in crate::app) fn links(&self) -> Vec<(usize, usize)> {
        self.edges
            .iter()
            .map(|edge| (edge.source, edge.target))
            .collect()
    }

    pub(in crate::app) fn radii(&self) -> Vec<f32> {
        self.nodes.iter().map(|node| node.radius).collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::transfers::{TransferRow, derive_graph};

    use super::*;

    fn graph(rows: &[(&str, &str, u64)]) -> DerivedGraph {
        let rows = rows
            .iter()
            .map(|(from, to, count)| TransferRow {
                from_address: (*from).to_owned(),
                to_address: (*to).to_owned(),
                transaction_count: *count,
            })
            .collect::<Vec<_>>();
        derive_graph(&rows, Utc::now())
    }

    #[test]
    fn empty_graph_renders_nothing() {
        let render = RenderGraph::from_derived(&DerivedGraph::default());
        assert!(render.is_empty());
        assert!(render.links().is_empty());
    }

    #[test]
    fn edges_point_at_node_indices() {
        let render = RenderGraph::from_derived(&graph(&[("A", "B", 10), ("B", "C", 50), ("A", "B", 3)]));
        assert_eq!(render.nodes.len(), 3);
        assert_eq!(render.links(), vec![(0, 1), (1, 2), (0, 1)]);
        assert_eq!(
            render.edges.iter().map(|edge| edge.edge_index).collect::<Vec<_>>(),
            [0, 1, 2]
        );
        assert_eq!(render.index_by_id["C"], 2);
    }

    #[test]
    fn busier_addresses_get_larger_circles() {
        let render = RenderGraph::from_derived(&graph(&[("A", "B", 10), ("C", "D", 50)]));
        let small = render.nodes[render.index_by_id["A"]].radius;
        let large = render.nodes[render.index_by_id["C"]].radius;
        assert!(large > small);
        assert_eq!(render.radii().len(), 4);
    }

    #[test]
    fn labels_are_truncated_addresses() {
        let address = "0x1234567890abcdef1234567890abcdef12345678";
        let render = RenderGraph::from_derived(&graph(&[(address, "0xabc", 1)]));
        assert_eq!(render.nodes[0].label, "0x1234...5678");
        assert_eq!(render.nodes[0].id, address);
    }
}
