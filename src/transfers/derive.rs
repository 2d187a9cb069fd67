use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, Utc};

use super::model::TransferRow;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphNode {
    pub id: String,
    /// Count from the row that first introduced this address.
    pub transaction_count: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Transfer,
    Interaction,
    ContractCall,
}

impl EdgeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Transfer => "transfer",
            Self::Interaction => "interaction",
            Self::ContractCall => "contract_call",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub value: u64,
    pub kind: EdgeKind,
    pub timestamp: String,
    pub amount: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DerivedGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl DerivedGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Turns grouped rows into a node set and an edge list.
pub fn derive_graph(rows: &[TransferRow], fetched_at: DateTime<Utc>) -> DerivedGraph {
    let timestamp = fetched_at.to_rfc3339_opts(SecondsFormat::Millis, true);
    let mut seen = HashSet::with_capacity(rows.len() * 2);
    let mut nodes = Vec::new();
    let mut edges = Vec::with_capacity(rows.len());

    for row in rows {
        for address in [&row.from_address, &row.to_address] {
            if seen.insert(address.as_str()) {
                nodes.push(GraphNode {
                    id: address.clone(),
                    transaction_count: row.transaction_count,
                });
            }
        }

        edges.push(GraphEdge {
            source: row.from_address.clone(),
            target: row.to_address.clone(),
            value: row.transaction_count,
            kind: EdgeKind::Transfer,
            timestamp: timestamp.clone(),
            amount: None,
        });
    }

    DerivedGraph { nodes, edges }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn row(from: &str, to: &str, count: u64) -> TransferRow {
        TransferRow {
            from_address: from.to_owned(),
            to_address: to.to_owned(),
            transaction_count: count,
        }
    }

    fn fetched_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 10, 30, 0).unwrap()
    }

    #[test]
    fn empty_rows_give_empty_graph() {
        let graph = derive_graph(&[], fetched_at());
        assert!(graph.nodes.is_empty());
        assert!(graph.edges.is_empty());
        assert!(graph.is_empty());
    }

    #[test]
    fn first_seen_count_wins() {
        let rows = [row("A", "B", 5), row("B", "C", 9), row("A", "B", 2)];
        let graph = derive_graph(&rows, fetched_at());

        let ids = graph.nodes.iter().map(|node| node.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["A", "B", "C"]);
        assert_eq!(graph.nodes[0].transaction_count, 5);
        assert_eq!(graph.nodes[1].transaction_count, 5);
        assert_eq!(graph.nodes[2].transaction_count, 9);
    }

    #[test]
    fn duplicate_pairs_are_not_merged() {
        let rows = [row("A", "B", 4), row("A", "B", 7)];
        let graph = derive_graph(&rows, fetched_at());

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 2);
        assert_eq!(graph.edges[0].value, 4);
        assert_eq!(graph.edges[1].value, 7);
    }

    #[test]
    fn edges_reference_known_nodes() {
        let rows = [row("A", "B", 1), row("C", "A", 2), row("D", "D", 3)];
        let graph = derive_graph(&rows, fetched_at());

        let ids = graph
            .nodes
            .iter()
            .map(|node| node.id.as_str())
            .collect::<HashSet<_>>();
        assert_eq!(ids.len(), graph.nodes.len());
        for edge in &graph.edges {
            assert!(ids.contains(edge.source.as_str()));
            assert!(ids.contains(edge.target.as_str()));
        }
    }

    #[test]
    fn derivation_is_deterministic() {
        let rows = [row("A", "B", 1), row("B", "C", 2), row("C", "A", 3)];
        assert_eq!(derive_graph(&rows, fetched_at()), derive_graph(&rows, fetched_at()));
    }

    #[test]
    fn edges_carry_fetch_time_and_transfer_kind() {
        let graph = derive_graph(&[row("A", "B", 1)], fetched_at());
        let edge = &graph.edges[0];
        assert_eq!(edge.kind, EdgeKind::Transfer);
        assert_eq!(edge.timestamp, "2024-03-20T10:30:00.000Z");
        assert_eq!(edge.amount, None);
    }
}
