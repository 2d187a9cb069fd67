use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadNode;

#[derive(Clone, Copy)]
pub(super) struct ChargeParams {
    /// Negative repels.
    pub(super) strength: f32,
    pub(super) alpha: f32,
    pub(super) theta_sq: f32,
    pub(super) distance_min_sq: f32,
}

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) strength: f32,
    pub(super) min_separation: f32,
    pub(super) padding: f32,
    pub(super) max_reach_sq: f32,
}

pub(super) fn jiggle(a: usize, b: usize) -> Vec2 {
    let angle = ((a as f32) * 0.618_034 + (b as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

pub(super) fn accumulate_charge(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    params: ChargeParams,
    velocity: &mut Vec2,
) {
    if node.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other in &node.indices {
            if other == index {
                continue;
            }
            let mut delta = positions[other] - point;
            if delta.length_sq() < 1e-9 {
                delta = jiggle(index, other) * 1e-3;
            }
            let distance_sq = delta.length_sq().max(params.distance_min_sq);
            *velocity += delta * (params.strength * params.alpha / distance_sq);
        }
        return;
    }

    let delta = node.center_of_mass - point;
    let distance_sq = delta.length_sq().max(params.distance_min_sq);
    let side = node.bounds.side_length();
    if !node.bounds.contains(point) && side * side / distance_sq < params.theta_sq {
        *velocity += delta * (params.strength * params.alpha * node.mass / distance_sq);
        return;
    }

    for child in node.children() {
        accumulate_charge(child, index, positions, params, velocity);
    }
}

fn resolve_overlap(
    from: usize,
    to: usize,
    positions: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    velocities: &mut [Vec2],
) {
    let separation = params
        .min_separation
        .max(radii[from] + radii[to] + params.padding);
    let mut delta = positions[from] - positions[to];
    let mut distance = delta.length();
    if distance < 1e-4 {
        delta = jiggle(from, to);
        distance = 1e-4;
    }
    if distance >= separation {
        return;
    }

    let push = delta / distance * ((separation - distance) * params.strength * 0.5);
    velocities[from] += push;
    velocities[to] -= push;
}

pub(super) fn accumulate_collisions(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    positions: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    velocities: &mut [Vec2],
) {
    if node_a.bounds.gap_sq(node_b.bounds) > params.max_reach_sq {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for (offset, &from) in node_a.indices.iter().enumerate() {
                for &to in &node_a.indices[offset + 1..] {
                    resolve_overlap(from, to, positions, radii, params, velocities);
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    resolve_overlap(from, to, positions, radii, params, velocities);
                }
            }
        }
        return;
    }

    if same_node {
        let children = node_a.children().collect::<Vec<_>>();
        for (offset, child_a) in children.iter().enumerate() {
            accumulate_collisions(child_a, child_a, true, positions, radii, params, velocities);
            for child_b in &children[offset + 1..] {
                accumulate_collisions(
                    child_a, child_b, false, positions, radii, params, velocities,
                );
            }
        }
        return;
    }

    let split_a = !node_a.is_leaf()
        && (node_b.is_leaf() || node_a.bounds.half_extent >= node_b.bounds.half_extent);
    if split_a {
        for child in node_a.children() {
            accumulate_collisions(child, node_b, false, positions, radii, params, velocities);
        }
    } else {
        for child in node_b.children() {
            accumulate_collisions(node_a, child, false, positions, radii, params, velocities);
        }
    }
}
