use std::collections::HashMap;

use eframe::egui::{self, RichText, Ui};

use crate::transfers::{DerivedGraph, GraphEdge};
use crate::util::{format_count, format_local_time, truncate_address};

use super::super::controller::ActiveItem;

const COUNTERPARTY_ROWS: usize = 32;

#[derive(Debug, PartialEq, Eq)]
pub(in crate::app) struct NodeSummary {
    pub(in crate::app) address: String,
    pub(in crate::app) transaction_count: u64,
    pub(in crate::app) incoming_edges: usize,
    pub(in crate::app) outgoing_edges: usize,
    pub(in crate::app) incoming_volume: u64,
    pub(in crate::app) outgoing_volume: u64,
    /// Busiest first, then by address.
    pub(in crate::app) counterparties: Vec<(String, u64)>,
}

pub(in crate::app) fn summarize_node(graph: &DerivedGraph, address: &str) -> Option<NodeSummary> {
    let node = graph.nodes.iter().find(|node| node.id == address)?;
    let mut summary = NodeSummary {
        address: node.id.clone(),
        transaction_count: node.transaction_count,
        incoming_edges: 0,
        outgoing_edges: 0,
        incoming_volume: 0,
        outgoing_volume: 0,
        counterparties: Vec::new(),
    };

    let mut volume_by_peer: HashMap<&str, u64> = HashMap::new();
    for edge in &graph.edges {
        if edge.source == address {
            summary.outgoing_edges += 1;
            summary.outgoing_volume = summary.outgoing_volume.saturating_add(edge.value);
        }
        if edge.target == address {
            summary.incoming_edges += 1;
            summary.incoming_volume = summary.incoming_volume.saturating_add(edge.value);
        }

        let peer = if edge.source == address && edge.target != address {
            Some(edge.target.as_str())
        } else if edge.target == address && edge.source != address {
            Some(edge.source.as_str())
        } else {
            None
        };
        if let Some(peer) = peer {
            let volume = volume_by_peer.entry(peer).or_default();
            *volume = volume.saturating_add(edge.value);
        }
    }

    let mut counterparties = volume_by_peer
        .into_iter()
        .map(|(peer, volume)| (peer.to_owned(), volume))
        .collect::<Vec<_>>();
    counterparties.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    summary.counterparties = counterparties;

    Some(summary)
}

pub(in crate::app) fn draw_details(
    ui: &mut Ui,
    graph: Option<&DerivedGraph>,
    active: Option<&ActiveItem>,
) -> Option<ActiveItem> {
    ui.heading("Selection Details");
    ui.add_space(6.0);

    let Some(graph) = graph else {
        ui.label("Search for a wallet address to load its network.");
        return None;
    };

    match active {
        None => {
            ui.label("Click a node or edge in the bubble chart.");
            None
        }
        Some(ActiveItem::Node(address)) => match summarize_node(graph, address) {
            Some(summary) => draw_node(ui, &summary),
            None => {
                ui.label("Selected address is not part of the current graph.");
                None
            }
        },
        Some(ActiveItem::Edge(index)) => {
            match graph.edges.get(*index) {
                Some(edge) => draw_edge(ui, edge),
                None => {
                    ui.label("Selected edge is not part of the current graph.");
                }
            }
            None
        }
    }
}

fn draw_node(ui: &mut Ui, summary: &NodeSummary) -> Option<ActiveItem> {
    let mut selection = None;

    ui.label(RichText::new(truncate_address(&summary.address)).strong());
    ui.horizontal(|ui| {
        ui.small(summary.address.as_str());
        if ui.small_button("Copy").on_hover_text("Copy full address").clicked() {
            ui.ctx().copy_text(summary.address.clone());
        }
    });
    ui.add_space(6.0);

    ui.label(format!(
        "Transaction count: {}",
        format_count(summary.transaction_count)
    ));
    ui.label(format!(
        "Incoming: {} edges, {} transactions",
        summary.incoming_edges,
        format_count(summary.incoming_volume)
    ));
    ui.label(format!(
        "Outgoing: {} edges, {} transactions",
        summary.outgoing_edges,
        format_count(summary.outgoing_volume)
    ));

    ui.separator();
    ui.label(RichText::new("Counterparties").strong());
    if summary.counterparties.is_empty() {
        ui.label("No other addresses in this graph.");
        return None;
    }

    egui::ScrollArea::vertical()
        .id_salt("counterparties_scroll")
        .max_height(320.0)
        .auto_shrink([false, true])
        .show(ui, |ui| {
            for (peer, volume) in summary.counterparties.iter().take(COUNTERPARTY_ROWS) {
                let label = format!("{}  ({})", truncate_address(peer), format_count(*volume));
                if ui.link(label).on_hover_text(peer.as_str()).clicked() {
                    selection = Some(ActiveItem::Node(peer.clone()));
                }
            }
            let hidden = summary.counterparties.len().saturating_sub(COUNTERPARTY_ROWS);
            if hidden > 0 {
                ui.small(format!("and {hidden} more"));
            }
        });

    selection
}

fn draw_edge(ui: &mut Ui, edge: &GraphEdge) {
    ui.label(RichText::new(edge.kind.label().to_uppercase()).strong());
    ui.add_space(6.0);

    egui::Grid::new("edge_details")
        .num_columns(2)
        .spacing([12.0, 4.0])
        .show(ui, |ui| {
            ui.label("From");
            ui.monospace(truncate_address(&edge.source))
                .on_hover_text(edge.source.as_str());
            ui.end_row();

            ui.label("To");
            ui.monospace(truncate_address(&edge.target))
                .on_hover_text(edge.target.as_str());
            ui.end_row();

            ui.label("Transactions");
            ui.label(format_count(edge.value));
            ui.end_row();

            if let Some(amount) = edge.amount {
                ui.label("Amount");
                ui.label(format!("{amount} ETH"));
                ui.end_row();
            }

            ui.label("Time");
            ui.label(format_local_time(&edge.timestamp));
            ui.end_row();
        });
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

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
        derive_graph(&rows, Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
    }

    #[test]
    fn node_summary_splits_directions() {
        let graph = graph(&[("A", "B", 10), ("C", "A", 4), ("A", "C", 2), ("B", "C", 9)]);
        let summary = summarize_node(&graph, "A").unwrap();

        assert_eq!(summary.transaction_count, 10);
        assert_eq!(summary.outgoing_edges, 2);
        assert_eq!(summary.outgoing_volume, 12);
        assert_eq!(summary.incoming_edges, 1);
        assert_eq!(summary.incoming_volume, 4);
        assert_eq!(
            summary.counterparties,
            vec![("B".to_owned(), 10), ("C".to_owned(), 6)]
        );
    }

    #[test]
    fn self_transfers_count_both_ways_but_are_not_counterparties() {
        let graph = graph(&[("A", "A", 3)]);
        let summary = summarize_node(&graph, "A").unwrap();
        assert_eq!(summary.incoming_edges, 1);
        assert_eq!(summary.outgoing_edges, 1);
        assert!(summary.counterparties.is_empty());
    }

    #[test]
    fn huge_counts_saturate_instead_of_overflowing() {
        let graph = graph(&[("A", "B", u64::MAX), ("A", "B", 5), ("C", "A", u64::MAX), ("C", "A", 1)]);
        let summary = summarize_node(&graph, "A").unwrap();
        assert_eq!(summary.outgoing_volume, u64::MAX);
        assert_eq!(summary.incoming_volume, u64::MAX);
        assert_eq!(
            summary.counterparties,
            vec![("B".to_owned(), u64::MAX), ("C".to_owned(), u64::MAX)]
        );
    }

    #[test]
    fn unknown_address_has_no_summary() {
        assert!(summarize_node(&graph(&[("A", "B", 1)]), "Z").is_none());
    }
}
