mod forces;
mod quadtree;

use eframe::egui::{Vec2, vec2};

use forces::{ChargeParams, CollisionParams, accumulate_charge, accumulate_collisions, jiggle};
use quadtree::QuadNode;

const ALPHA_MIN: f32 = 0.001;
const COOLING_TICKS: f32 = 300.0;
const INITIAL_SPACING: f32 = 10.0;

#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct SimulationConfig {
    pub link_distance: f32,
    pub charge_strength: f32,
    pub collision_radius: f32,
    pub collision_padding: f32,
    pub collision_strength: f32,
    pub velocity_decay: f32,
    pub theta: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            link_distance: 100.0,
            charge_strength: -300.0,
            collision_radius: 50.0,
            collision_padding: 4.0,
            collision_strength: 0.7,
            velocity_decay: 0.4,
            theta: 0.9,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Link {
    source: usize,
    target: usize,
    strength: f32,
    bias: f32,
}

pub(in crate::app) struct ForceSimulation {
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    pinned: Vec<Option<Vec2>>,
    radii: Vec<f32>,
    links: Vec<Link>,
    center: Vec2,
    config: SimulationConfig,
    alpha: f32,
    alpha_target: f32,
    alpha_decay: f32,
    stopped: bool,
    ticks: u64,
    charge_scratch: Vec<Vec2>,
}

impl ForceSimulation {
    pub(in crate::app) fn new(
        radii: &[f32],
        links: &[(usize, usize)],
        canvas: Vec2,
        config: SimulationConfig,
    ) -> Option<Self> {
        let node_count = radii.len();
        if node_count == 0 {
            return None;
        }

        let center = canvas * 0.5;
        let golden_angle = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
        let positions = (0..node_count)
            .map(|index| {
                let radius = INITIAL_SPACING * (0.5 + index as f32).sqrt();
                let angle = index as f32 * golden_angle;
                center + vec2(angle.cos(), angle.sin()) * radius
            })
            .collect::<Vec<_>>();

        let mut degree = vec![0usize; node_count];
        for &(source, target) in links {
            if source < node_count && target < node_count && source != target {
                degree[source] += 1;
                degree[target] += 1;
            }
        }

        let links = links
            .iter()
            .filter(|(source, target)| {
                *source < node_count && *target < node_count && source != target
            })
            .map(|&(source, target)| {
                let source_degree = degree[source] as f32;
                let target_degree = degree[target] as f32;
                Link {
                    source,
                    target,
                    strength: 1.0 / source_degree.min(target_degree),
                    bias: source_degree / (source_degree + target_degree),
                }
            })
            .collect();

        Some(Self {
            positions,
            velocities: vec![Vec2::ZERO; node_count],
            pinned: vec![None; node_count],
            radii: radii.to_vec(),
            links,
            center,
            config,
            alpha: 1.0,
            alpha_target: 0.0,
            alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / COOLING_TICKS),
            stopped: false,
            ticks: 0,
            charge_scratch: Vec::with_capacity(node_count),
        })
    }

    pub(in crate::app) fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub(in crate::app) fn ticks(&self) -> u64 {
        self.ticks
    }

    pub(in crate::app) fn is_settled(&self) -> bool {
        self.alpha < ALPHA_MIN && self.alpha_target < ALPHA_MIN
    }

    pub(in crate::app) fn is_running(&self) -> bool {
        !self.stopped && !self.is_settled()
    }

    pub(in crate::app) fn stop(&mut self) {
        self.stopped = true;
    }

    pub(in crate::app) fn reheat(&mut self, alpha_target: f32) {
        self.alpha_target = alpha_target.clamp(0.0, 1.0);
        if self.alpha < self.alpha_target {
            self.alpha = self.alpha.max(ALPHA_MIN);
        }
    }

    pub(in crate::app) fn pin(&mut self, index: usize, position: Vec2) {
        if let Some(slot) = self.pinned.get_mut(index) {
            *slot = Some(position);
            self.positions[index] = position;
            self.velocities[index] = Vec2::ZERO;
        }
    }

    pub(in crate::app) fn release(&mut self, index: usize) {
        if let Some(slot) = self.pinned.get_mut(index) {
            *slot = None;
        }
    }

    #[cfg(test)]
    pub(in crate::app) fn is_pinned(&self, index: usize) -> bool {
        self.pinned.get(index).is_some_and(Option::is_some)
    }

    pub(in crate::app) fn tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

        self.apply_links();
        self.apply_charge();
        self.apply_collisions();
        self.integrate();
        self.recenter();

        self.ticks += 1;
        true
    }

    fn apply_links(&mut self) {
        let alpha = self.alpha;
        for link in &self.links {
            let (source, target) = (link.source, link.target);
            let mut delta = (self.positions[target] + self.velocities[target])
                - (self.positions[source] + self.velocities[source]);
            if delta.length_sq() < 1e-9 {
                delta = jiggle(source, target) * 1e-3;
            }
            let distance = delta.length();
            let scale = (distance - self.config.link_distance) / distance * alpha * link.strength;
            let delta = delta * scale;
            self.velocities[target] -= delta * link.bias;
            self.velocities[source] += delta * (1.0 - link.bias);
        }
    }

    fn apply_charge(&mut self) {
        let Some(tree) = QuadNode::build(&self.positions) else {
            return;
        };

        let params = ChargeParams {
            strength: self.config.charge_strength,
            alpha: self.alpha,
            theta_sq: self.config.theta * self.config.theta,
            distance_min_sq: 1.0,
        };

        self.charge_scratch.clear();
        self.charge_scratch.resize(self.positions.len(), Vec2::ZERO);
        for (index, velocity) in self.charge_scratch.iter_mut().enumerate() {
            accumulate_charge(&tree, index, &self.positions, params, velocity);
        }
        for (velocity, delta) in self.velocities.iter_mut().zip(&self.charge_scratch) {
            *velocity += *delta;
        }
    }

    fn apply_collisions(&mut self) {
        let Some(tree) = QuadNode::build(&self.positions) else {
            return;
        };

        let max_radius = self.radii.iter().copied().fold(0.0_f32, f32::max);
        let reach = self
            .config
            .collision_radius
            .max(max_radius * 2.0 + self.config.collision_padding);
        let params = CollisionParams {
            strength: self.config.collision_strength,
            min_separation: self.config.collision_radius,
            padding: self.config.collision_padding,
            max_reach_sq: reach * reach,
        };

        accumulate_collisions(
            &tree,
            &tree,
            true,
            &self.positions,
            &self.radii,
            params,
            &mut self.velocities,
        );
    }

    fn integrate(&mut self) {
        let keep = 1.0 - self.config.velocity_decay;
        for ((position, velocity), pinned) in self
            .positions
            .iter_mut()
            .zip(self.velocities.iter_mut())
            .zip(&self.pinned)
        {
            if let Some(fixed) = pinned {
                *position = *fixed;
                *velocity = Vec2::ZERO;
            } else {
                *velocity *= keep;
                *position += *velocity;
            }
        }
    }

    fn recenter(&mut self) {
        if self.pinned.iter().any(Option::is_some) {
            return;
        }

        let mean = self.positions.iter().fold(Vec2::ZERO, |sum, p| sum + *p)
            / self.positions.len() as f32;
        let shift = mean - self.center;
        if shift.length_sq() > 1e-12 {
            for position in &mut self.positions {
                *position -= shift;
            }
        }
    }
}

pub(in crate::app) fn layout(
    radii: &[f32],
    links: &[(usize, usize)],
    canvas: Vec2,
    config: SimulationConfig,
    max_ticks: usize,
) -> Vec<Vec2> {
    let Some(mut simulation) = ForceSimulation::new(radii, links, canvas, config) else {
        return Vec::new();
    };

    for _ in 0..max_ticks {
        if !simulation.tick() {
            break;
        }
    }

    simulation.positions
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Vec2 = vec2(800.0, 600.0);

    fn simulation(node_count: usize, links: &[(usize, usize)]) -> ForceSimulation {
        ForceSimulation::new(&vec![8.0; node_count], links, CANVAS, SimulationConfig::default())
            .expect("non-empty simulation")
    }

    #[test]
    fn empty_input_creates_no_simulation() {
        assert!(ForceSimulation::new(&[], &[], CANVAS, SimulationConfig::default()).is_none());
        assert!(layout(&[], &[], CANVAS, SimulationConfig::default(), 100).is_empty());
    }

    #[test]
    fn stopped_simulation_no_longer_ticks() {
        let mut sim = simulation(3, &[(0, 1), (1, 2)]);
        assert!(sim.tick());
        assert!(sim.tick());
        assert_eq!(sim.ticks(), 2);

        sim.stop();
        let frozen = sim.positions().to_vec();
        for _ in 0..10 {
            assert!(!sim.tick());
        }
        assert_eq!(sim.ticks(), 2);
        assert_eq!(sim.positions(), frozen.as_slice());
    }

    #[test]
    fn cools_down_on_its_own() {
        let mut sim = simulation(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)]);
        let mut steps = 0;
        while sim.tick() {
            steps += 1;
            assert!(steps < 1_000, "simulation never settled");
        }
        assert!(sim.is_settled());
        assert!((250..=350).contains(&steps));
    }

    #[test]
    fn reheat_wakes_a_settled_simulation() {
        let mut sim = simulation(2, &[(0, 1)]);
        while sim.tick() {}
        assert!(!sim.tick());

        sim.reheat(0.3);
        assert!(sim.tick());

        sim.reheat(0.0);
        while sim.tick() {}
        assert!(sim.is_settled());
    }

    #[test]
    fn linked_pair_settles_near_link_distance() {
        let positions = layout(&[8.0, 8.0], &[(0, 1)], CANVAS, SimulationConfig::default(), 1_000);
        let distance = (positions[0] - positions[1]).length();
        assert!((80.0..140.0).contains(&distance), "distance {distance}");
    }

    #[test]
    fn unlinked_nodes_keep_collision_separation() {
        let positions = layout(&[8.0; 12], &[], CANVAS, SimulationConfig::default(), 1_000);
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let distance = (positions[i] - positions[j]).length();
                assert!(distance > 40.0, "nodes {i} and {j} only {distance} apart");
            }
        }
    }

    #[test]
    fn layout_is_centered_on_canvas() {
        let positions = layout(&[8.0; 5], &[(0, 1), (0, 2)], CANVAS, SimulationConfig::default(), 1_000);
        let mean = positions.iter().fold(Vec2::ZERO, |sum, p| sum + *p) / positions.len() as f32;
        assert!((mean - CANVAS * 0.5).length() < 1.0);
    }

    #[test]
    fn pinned_node_holds_until_released() {
        let mut sim = simulation(3, &[(0, 1), (1, 2)]);
        let anchor = vec2(650.0, 120.0);
        sim.pin(1, anchor);
        for _ in 0..20 {
            sim.tick();
        }
        assert!(sim.is_pinned(1));
        assert_eq!(sim.positions()[1], anchor);

        sim.release(1);
        assert!(!sim.is_pinned(1));
        for _ in 0..20 {
            sim.tick();
        }
        assert_ne!(sim.positions()[1], anchor);
    }

    #[test]
    fn self_loops_and_out_of_range_links_are_ignored() {
        let mut sim = simulation(2, &[(0, 0), (0, 7)]);
        assert!(sim.tick());
        assert!(sim.positions().iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }
}
