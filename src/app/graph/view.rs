use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, vec2};

use crate::transfers::EdgeKind;

use super::super::controller::{ActiveItem, TransferSnapshot};
use super::super::render_utils::{
    EDGE_DEFAULT, LABEL_COLOR, MATCH_COLOR, NODE_FILL, NODE_STROKE, NODE_STROKE_ACTIVE, SELF_LOOP_RADIUS,
    circle_visible, dim_color, draw_background, edge_color, edge_stroke, world_to_screen,
};
use super::super::tooltip::TooltipContent;
use super::{GraphView, HoverTarget};

#[derive(Default)]
pub(in crate::app) struct GraphResponse {
    /// `Some(None)` clears the selection.
    pub(in crate::app) selection: Option<Option<ActiveItem>>,
}

impl GraphView {
    pub(in crate::app) fn draw(
        &mut self,
        ui: &mut Ui,
        snapshot: &TransferSnapshot,
        active: Option<&ActiveItem>,
        find_query: &str,
    ) -> GraphResponse {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        if self.needs_rebuild(snapshot.revision) {
            self.rebuild(&snapshot.graph, snapshot.revision, rect.size());
        }

        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);

        if self.graph.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No transfers found for this address.",
                FontId::proportional(14.0),
                LABEL_COLOR,
            );
            self.tooltip.hide();
            self.tooltip.draw(ui.ctx());
            return GraphResponse::default();
        }

        self.handle_zoom(ui, rect, &response);

        let moving = self.step();

        let mut screen_positions = self.screen_positions(rect);
        self.handle_drag(ui, rect, &response, &screen_positions);
        if self.drag.is_some() {
            screen_positions = self.screen_positions(rect);
        }

        let pointer = ui.input(|input| input.pointer.hover_pos());
        let pointer_inside = pointer.filter(|pointer| rect.contains(*pointer));
        self.hovered = if self.drag.is_some() {
            self.drag.as_ref().map(|drag| HoverTarget::Node(drag.node))
        } else {
            self.hover_target(pointer_inside, &screen_positions)
        };

        let mut result = GraphResponse::default();
        if response.clicked_by(egui::PointerButton::Primary) {
            result.selection = Some(self.hovered.and_then(|target| self.active_item_for(target)));
        }

        match (self.hovered, pointer_inside) {
            (Some(target), Some(pointer)) => {
                if let Some(content) = self.tooltip_content(target) {
                    self.tooltip.show(content, pointer);
                }
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
            }
            _ => self.tooltip.hide(),
        }

        let find_active = !find_query.trim().is_empty();
        let matches = self.find_matches(find_query).cloned().unwrap_or_default();

        let active_node = match active {
            Some(ActiveItem::Node(id)) => self.graph.index_by_id.get(id).copied(),
            _ => None,
        };
        let active_edge = match active {
            Some(ActiveItem::Edge(edge_index)) => Some(*edge_index),
            _ => None,
        };

        for (index, edge) in self.graph.edges.iter().enumerate() {
            let start = screen_positions[edge.source];
            let end = screen_positions[edge.target];
            let highlighted = self.hovered == Some(HoverTarget::Edge(index))
                || active_edge == Some(edge.edge_index);
            let mut stroke = edge_stroke(edge.kind, edge.value, self.zoom, highlighted);
            if find_active && !highlighted {
                stroke.color = dim_color(stroke.color, 0.4);
            }

            if edge.source == edge.target {
                let radius = self.screen_radius(self.graph.nodes[edge.source].radius);
                painter.circle_stroke(
                    start - vec2(0.0, radius + SELF_LOOP_RADIUS),
                    SELF_LOOP_RADIUS,
                    stroke,
                );
            } else {
                painter.line_segment([start, end], stroke);
            }
        }

        let show_all_labels = self.zoom >= 0.6;
        for (index, node) in self.graph.nodes.iter().enumerate() {
            let position = screen_positions[index];
            let radius = self.screen_radius(node.radius);
            if !circle_visible(rect, position, radius + 60.0) {
                continue;
            }

            let highlighted =
                self.hovered == Some(HoverTarget::Node(index)) || active_node == Some(index);
            let is_match = matches.contains(&index);

            let fill = if is_match {
                MATCH_COLOR.gamma_multiply(0.85)
            } else if find_active {
                dim_color(NODE_FILL.gamma_multiply(0.35), 0.5)
            } else {
                NODE_FILL.gamma_multiply(0.35)
            };
            let stroke = if highlighted {
                Stroke::new(3.0, NODE_STROKE_ACTIVE)
            } else {
                Stroke::new(2.0, NODE_STROKE)
            };
            painter.circle_filled(position, radius, fill);
            painter.circle_stroke(position, radius, stroke);

            if show_all_labels || highlighted || is_match {
                painter.text(
                    position + vec2(0.0, radius + 4.0),
                    Align2::CENTER_TOP,
                    &node.label,
                    FontId::proportional(12.0),
                    if highlighted { Color32::WHITE } else { LABEL_COLOR },
                );
            }
        }

        draw_legend(&painter, rect);

        if moving || self.drag.is_some() || response.dragged() {
            ui.ctx().request_repaint();
        }
        self.tooltip.draw(ui.ctx());

        result
    }

    fn screen_positions(&self, rect: Rect) -> Vec<Pos2> {
        self.positions()
            .iter()
            .map(|world| world_to_screen(rect, self.origin, self.pan, self.zoom, *world))
            .collect()
    }

    fn tooltip_content(&self, target: HoverTarget) -> Option<TooltipContent> {
        match target {
            HoverTarget::Node(index) => self.graph.nodes.get(index).map(|node| TooltipContent::Node {
                address: node.id.clone(),
                transaction_count: node.transaction_count,
            }),
            HoverTarget::Edge(index) => self.graph.edges.get(index).map(|edge| TooltipContent::Edge {
                kind: edge.kind.label(),
                from: self.graph.nodes[edge.source].id.clone(),
                to: self.graph.nodes[edge.target].id.clone(),
                amount: edge.amount,
                timestamp: edge.timestamp.clone(),
            }),
        }
    }
}

fn draw_legend(painter: &egui::Painter, rect: Rect) {
    let entries = [
        (EdgeKind::Transfer.label(), edge_color(Some(EdgeKind::Transfer))),
        (EdgeKind::Interaction.label(), edge_color(Some(EdgeKind::Interaction))),
        (EdgeKind::ContractCall.label(), edge_color(Some(EdgeKind::ContractCall))),
        ("other", EDGE_DEFAULT),
    ];

    let mut cursor = rect.left_bottom() + vec2(12.0, -12.0 - entries.len() as f32 * 16.0);
    for (label, color) in entries {
        painter.line_segment(
            [cursor + vec2(0.0, 7.0), cursor + vec2(18.0, 7.0)],
            Stroke::new(3.0, color),
        );
        painter.text(
            cursor + vec2(24.0, 0.0),
            Align2::LEFT_TOP,
            label,
            FontId::proportional(11.0),
            LABEL_COLOR,
        );
        cursor.y += 16.0;
    }
}
