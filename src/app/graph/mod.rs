use std::collections::HashSet;

use eframe::egui::{Id, Vec2};
use fuzzy_matcher::skim::SkimMatcherV2;
use tracing::debug;

use crate::transfers::DerivedGraph;
use crate::util::address_matches;

use super::physics::{ForceSimulation, SimulationConfig, layout};
use super::tooltip::Tooltip;

mod build;
mod interaction;
mod view;

pub(in crate::app) use build::RenderGraph;

const STATIC_LAYOUT_TICKS: usize = 400;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HoverTarget {
    Node(usize),
    Edge(usize),
}

struct DragState {
    node: usize,
}

struct FindCache {
    query: String,
    revision: u64,
    matches: HashSet<usize>,
}

pub(in crate::app) struct GraphView {
    revision: Option<u64>,
    graph: RenderGraph,
    simulation: Option<ForceSimulation>,
    static_positions: Vec<Vec2>,
    origin: Vec2,
    live_physics: bool,
    pan: Vec2,
    zoom: f32,
    drag: Option<DragState>,
    hovered: Option<HoverTarget>,
    tooltip: Tooltip,
    find_cache: Option<FindCache>,
}

impl GraphView {
    pub(in crate::app) fn new(id: Id, live_physics: bool) -> Self {
        Self {
            revision: None,
            graph: RenderGraph::default(),
            simulation: None,
            static_positions: Vec::new(),
            origin: Vec2::ZERO,
            live_physics,
            pan: Vec2::ZERO,
            zoom: 1.0,
            drag: None,
            hovered: None,
            tooltip: Tooltip::new(id.with("tooltip")),
            find_cache: None,
        }
    }

    pub(in crate::app) fn set_live_physics(&mut self, enabled: bool) {
        if self.live_physics == enabled {
            return;
        }

        self.live_physics = enabled;
        if enabled {
            self.revision = None;
        } else if let Some(mut simulation) = self.simulation.take() {
            simulation.stop();
            self.static_positions = simulation.positions().to_vec();
        }
    }

    pub(in crate::app) fn reset_camera(&mut self) {
        self.pan = Vec2::ZERO;
        self.zoom = 1.0;
    }

    pub(in crate::app) fn node_count(&self) -> usize {
        self.graph.nodes.len()
    }

    pub(in crate::app) fn edge_count(&self) -> usize {
        self.graph.edges.len()
    }

    pub(in crate::app) fn needs_rebuild(&self, revision: u64) -> bool {
        self.revision != Some(revision)
    }

    pub(in crate::app) fn rebuild(&mut self, graph: &DerivedGraph, revision: u64, canvas: Vec2) {
        self.retire_simulation();

        self.revision = Some(revision);
        self.graph = RenderGraph::from_derived(graph);
        self.static_positions.clear();
        self.drag = None;
        self.hovered = None;
        self.find_cache = None;
        self.tooltip.hide();
        self.origin = canvas * 0.5;

        if self.graph.is_empty() {
            debug!(revision, "empty transfer graph; skipping layout");
            return;
        }

        let radii = self.graph.radii();
        let links = self.graph.links();
        let config = SimulationConfig::default();
        if self.live_physics {
            self.simulation = ForceSimulation::new(&radii, &links, canvas, config);
        } else {
            self.static_positions = layout(&radii, &links, canvas, config, STATIC_LAYOUT_TICKS);
        }
        debug!(
            revision,
            nodes = self.graph.nodes.len(),
            edges = self.graph.edges.len(),
            live = self.live_physics,
            "graph view rebuilt"
        );
    }

    fn retire_simulation(&mut self) {
        if let Some(mut simulation) = self.simulation.take() {
            simulation.stop();
            debug!(ticks = simulation.ticks(), "stopped previous layout simulation");
        }
    }

    pub(in crate::app) fn teardown(&mut self) {
        self.retire_simulation();
        self.tooltip.hide();
        self.drag = None;
        self.hovered = None;
    }

    pub(in crate::app) fn step(&mut self) -> bool {
        self.simulation
            .as_mut()
            .is_some_and(ForceSimulation::tick)
    }

    pub(in crate::app) fn simulation_ticks(&self) -> Option<u64> {
        self.simulation.as_ref().map(ForceSimulation::ticks)
    }

    fn positions(&self) -> &[Vec2] {
        match &self.simulation {
            Some(simulation) => simulation.positions(),
            None => &self.static_positions,
        }
    }

    fn find_matches(&mut self, query: &str) -> Option<&HashSet<usize>> {
        let query = query.trim();
        let revision = self.revision?;
        if query.is_empty() {
            return None;
        }

        let stale = self
            .find_cache
            .as_ref()
            .is_none_or(|cache| cache.revision != revision || cache.query != query);
        if stale {
            let matcher = SkimMatcherV2::default();
            let matches = self
                .graph
                .nodes
                .iter()
                .enumerate()
                .filter(|(_, node)| address_matches(&matcher, &node.id, query))
                .map(|(index, _)| index)
                .collect();
            self.find_cache = Some(FindCache {
                query: query.to_owned(),
                revision,
                matches,
            });
        }

        self.find_cache.as_ref().map(|cache| &cache.matches)
    }
}

impl Drop for GraphView {
    fn drop(&mut self) {
        self.teardown();
    }
}
