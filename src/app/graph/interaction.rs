use eframe::egui::{self, Pos2, Rect, Ui, vec2};

use super::super::controller::ActiveItem;
use super::super::render_utils::{
    SELF_LOOP_RADIUS, distance_to_segment, edge_width, screen_radius, screen_to_world,
};
use super::{DragState, GraphView, HoverTarget};

const EDGE_HIT_SLOP: f32 = 4.0;

impl GraphView {
    pub(super) fn handle_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.origin, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.1, 6.0);
        self.pan = pointer - rect.center() - (world_before - self.origin) * self.zoom;
    }

    pub(super) fn handle_drag(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
        screen_positions: &[Pos2],
    ) {
        if response.drag_started_by(egui::PointerButton::Primary) {
            let origin = ui.input(|input| input.pointer.press_origin());
            let grabbed = origin.and_then(|origin| self.node_at(origin, screen_positions));
            if let Some(node) = grabbed {
                self.drag = Some(DragState { node });
                if let Some(simulation) = self.simulation.as_mut() {
                    simulation.reheat(0.3);
                }
            }
        }

        if let Some(drag) = &self.drag {
            let node = drag.node;
            if let Some(pointer) = response.interact_pointer_pos() {
                let world = screen_to_world(rect, self.origin, self.pan, self.zoom, pointer);
                match self.simulation.as_mut() {
                    Some(simulation) => simulation.pin(node, world),
                    None => {
                        if let Some(position) = self.static_positions.get_mut(node) {
                            *position = world;
                        }
                    }
                }
            }

            if response.drag_stopped() {
                if let Some(simulation) = self.simulation.as_mut() {
                    simulation.release(node);
                    simulation.reheat(0.0);
                }
                self.drag = None;
            }
            return;
        }

        if response.dragged() {
            self.pan += response.drag_delta();
        }
    }

    pub(super) fn node_at(&self, pointer: Pos2, screen_positions: &[Pos2]) -> Option<usize> {
        screen_positions
            .iter()
            .zip(&self.graph.nodes)
            .enumerate()
            .filter_map(|(index, (position, node))| {
                let distance = position.distance(pointer);
                (distance <= self.screen_radius(node.radius)).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    pub(super) fn edge_at(&self, pointer: Pos2, screen_positions: &[Pos2]) -> Option<usize> {
        self.graph
            .edges
            .iter()
            .enumerate()
            .filter_map(|(index, edge)| {
                let start = screen_positions[edge.source];
                let distance = if edge.source == edge.target {
                    let radius = self.screen_radius(self.graph.nodes[edge.source].radius);
                    let ring = start - vec2(0.0, radius + SELF_LOOP_RADIUS);
                    (pointer.distance(ring) - SELF_LOOP_RADIUS).abs()
                } else {
                    distance_to_segment(pointer, start, screen_positions[edge.target])
                };
                let reach = (edge_width(edge.value) * self.zoom.sqrt() * 0.5).max(EDGE_HIT_SLOP);
                (distance <= reach).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    pub(super) fn hover_target(&self, pointer: Option<Pos2>, screen_positions: &[Pos2]) -> Option<HoverTarget> {
        let pointer = pointer?;
        self.node_at(pointer, screen_positions)
            .map(HoverTarget::Node)
            .or_else(|| self.edge_at(pointer, screen_positions).map(HoverTarget::Edge))
    }

    pub(super) fn active_item_for(&self, target: HoverTarget) -> Option<ActiveItem> {
        match target {
            HoverTarget::Node(index) => self
                .graph
                .nodes
                .get(index)
                .map(|node| ActiveItem::Node(node.id.clone())),
            HoverTarget::Edge(index) => self
                .graph
                .edges
                .get(index)
                .map(|edge| ActiveItem::Edge(edge.edge_index)),
        }
    }

    pub(super) fn screen_radius(&self, radius: f32) -> f32 {
        screen_radius(radius, self.zoom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use eframe::egui::{Id, pos2, vec2};

    use crate::transfers::{TransferRow, derive_graph};

    use super::*;

    fn view_with_two_nodes() -> GraphView {
        let rows = [TransferRow {
            from_address: "A".to_owned(),
            to_address: "B".to_owned(),
            transaction_count: 4,
        }];
        let mut view = GraphView::new(Id::new("interaction-test"), true);
        view.rebuild(&derive_graph(&rows, Utc::now()), 1, vec2(400.0, 400.0));
        view
    }

    #[test]
    fn nodes_win_over_edges() {
        let view = view_with_two_nodes();
        let screen = [pos2(100.0, 100.0), pos2(300.0, 100.0)];

        assert_eq!(
            view.hover_target(Some(pos2(102.0, 101.0)), &screen),
            Some(HoverTarget::Node(0))
        );
        assert_eq!(
            view.hover_target(Some(pos2(200.0, 102.0)), &screen),
            Some(HoverTarget::Edge(0))
        );
        assert_eq!(view.hover_target(Some(pos2(200.0, 160.0)), &screen), None);
        assert_eq!(view.hover_target(None, &screen), None);
    }

    #[test]
    fn self_transfer_ring_is_hoverable() {
        let rows = [TransferRow {
            from_address: "A".to_owned(),
            to_address: "A".to_owned(),
            transaction_count: 4,
        }];
        let mut view = GraphView::new(Id::new("self-loop-test"), true);
        view.rebuild(&derive_graph(&rows, Utc::now()), 1, vec2(400.0, 400.0));
        let screen = [pos2(100.0, 100.0)];

        assert_eq!(
            view.hover_target(Some(pos2(100.0, 52.0)), &screen),
            Some(HoverTarget::Edge(0))
        );
        assert_eq!(
            view.hover_target(Some(pos2(108.0, 60.0)), &screen),
            Some(HoverTarget::Edge(0))
        );
        assert_eq!(view.hover_target(Some(pos2(100.0, 60.0)), &screen), None);
        assert_eq!(
            view.hover_target(Some(pos2(100.0, 110.0)), &screen),
            Some(HoverTarget::Node(0))
        );
    }

    #[test]
    fn hover_targets_map_to_selection_keys() {
        let view = view_with_two_nodes();
        assert_eq!(
            view.active_item_for(HoverTarget::Node(1)),
            Some(ActiveItem::Node("B".to_owned()))
        );
        assert_eq!(view.active_item_for(HoverTarget::Edge(0)), Some(ActiveItem::Edge(0)));
        assert_eq!(view.active_item_for(HoverTarget::Node(9)), None);
    }
}
