use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use crate::transfers::EdgeKind;

pub(super) const NODE_FILL: Color32 = Color32::from_rgb(34, 211, 238);
pub(super) const NODE_STROKE: Color32 = Color32::from_rgb(31, 41, 55);
pub(super) const NODE_STROKE_ACTIVE: Color32 = Color32::WHITE;
pub(super) const LABEL_COLOR: Color32 = Color32::from_rgb(156, 163, 175);
pub(super) const MATCH_COLOR: Color32 = Color32::from_rgb(250, 204, 21);

const EDGE_TRANSFER: Color32 = Color32::from_rgb(34, 211, 238);
const EDGE_INTERACTION: Color32 = Color32::from_rgb(167, 139, 250);
const EDGE_CONTRACT_CALL: Color32 = Color32::from_rgb(244, 114, 182);
pub(super) const EDGE_DEFAULT: Color32 = Color32::from_rgb(75, 85, 99);

const EDGE_REST_ALPHA: f32 = 0.6;
pub(super) const SELF_LOOP_RADIUS: f32 = 8.0;

pub(super) fn edge_color(kind: Option<EdgeKind>) -> Color32 {
    match kind {
        Some(EdgeKind::Transfer) => EDGE_TRANSFER,
        Some(EdgeKind::Interaction) => EDGE_INTERACTION,
        Some(EdgeKind::ContractCall) => EDGE_CONTRACT_CALL,
        None => EDGE_DEFAULT,
    }
}

pub(super) fn edge_stroke(kind: EdgeKind, value: u64, zoom: f32, highlighted: bool) -> Stroke {
    let base = edge_color(Some(kind));
    let (width_scale, alpha) = if highlighted {
        (1.5, 1.0)
    } else {
        (1.0, EDGE_REST_ALPHA)
    };
    let width = edge_width(value) * width_scale * zoom.sqrt();
    Stroke::new(width, base.gamma_multiply(alpha))
}

pub(super) fn edge_width(value: u64) -> f32 {
    (value as f32).sqrt().max(0.75)
}

/// Linear in count relative to the busiest address of the graph.
pub(super) fn node_radius(count: u64, max_count: u64) -> f32 {
    6.0 + 26.0 * (count as f32 / max_count.max(1) as f32)
}

pub(super) fn screen_radius(radius: f32, zoom: f32) -> f32 {
    radius * zoom.sqrt()
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgba_unmultiplied(0, 0, 0, 200));
}

pub(super) fn world_to_screen(rect: Rect, origin: Vec2, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + (world - origin) * zoom
}

pub(super) fn screen_to_world(rect: Rect, origin: Vec2, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom + origin
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn distance_to_segment(point: Pos2, start: Pos2, end: Pos2) -> f32 {
    let segment = end - start;
    let length_sq = segment.length_sq();
    if length_sq <= f32::EPSILON {
        return point.distance(start);
    }

    let t = ((point - start).dot(segment) / length_sq).clamp(0.0, 1.0);
    point.distance(start + segment * t)
}
