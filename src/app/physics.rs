use eframe::egui::{Vec2, vec2};

use super::{ForceConfig, RenderGraph};

pub(super) const ALPHA_MIN: f32 = 0.005;
const ALPHA_DECAY: f32 = 0.05;
const REHEAT_ALPHA: f32 = 0.9;
const DRAG_ALPHA_TARGET: f32 = 0.3;
/// Fraction of velocity retained per step.
const VELOCITY_RETAIN: f32 = 0.6;
/// Slack added to the radii sum when computing an edge's preferred length.
const LINK_DISTANCE: f32 = 30.0;

impl RenderGraph {
    /// Raise the kinetic temperature after a data change; the solver then
    /// cools back down over the next few seconds of steps.
    pub(super) fn reheat(&mut self) {
        self.alpha = self.alpha.max(REHEAT_ALPHA);
    }

    pub(super) fn is_settled(&self) -> bool {
        self.alpha < ALPHA_MIN && self.alpha_target < ALPHA_MIN
    }

    pub(super) fn begin_drag(&mut self) {
        self.alpha_target = DRAG_ALPHA_TARGET;
        self.alpha = self.alpha.max(DRAG_ALPHA_TARGET);
    }

    pub(super) fn end_drag(&mut self) {
        self.alpha_target = 0.0;
    }

    pub(super) fn pin(&mut self, index: usize, position: Vec2) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pinned = Some(position);
        }
    }

    /// Free integration resumes from the pinned position with zero velocity,
    /// so releasing a drag introduces no discontinuity.
    pub(super) fn unpin(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pinned = None;
            node.velocity = Vec2::ZERO;
        }
    }
}

/// One solver step. Forces accumulate into velocities scaled by the current
/// alpha, velocities decay, positions integrate, and the centroid is pulled
/// back to the origin. Returns false once the simulation has settled.
///
/// Charge repulsion and collision are evaluated over all node pairs: O(n^2)
/// per step, acceptable for graphs in the low hundreds of nodes.
pub(super) fn step_simulation(graph: &mut RenderGraph, config: &ForceConfig) -> bool {
    if graph.nodes.is_empty() || graph.is_settled() {
        return false;
    }

    graph.alpha += (graph.alpha_target - graph.alpha) * ALPHA_DECAY;
    let alpha = graph.alpha;
    let node_count = graph.nodes.len();

    // Link attraction toward each edge's preferred length.
    for edge in &graph.edges {
        if edge.source == edge.target || edge.source >= node_count || edge.target >= node_count {
            continue;
        }

        let delta =
            graph.nodes[edge.target].world_pos - graph.nodes[edge.source].world_pos;
        let distance = delta.length().max(0.001);
        let preferred = LINK_DISTANCE
            + graph.nodes[edge.source].display.radius
            + graph.nodes[edge.target].display.radius;
        let correction =
            delta * ((distance - preferred) / distance * config.link_strength * alpha * 0.5);
        graph.nodes[edge.target].velocity -= correction;
        graph.nodes[edge.source].velocity += correction;
    }

    // Pairwise many-body charge and collision avoidance.
    for i in 0..node_count {
        for j in (i + 1)..node_count {
            let delta = graph.nodes[i].world_pos - graph.nodes[j].world_pos;
            let distance_sq = delta.length_sq();
            let direction = if distance_sq > 0.0001 {
                delta / distance_sq.sqrt()
            } else {
                // Coincident nodes get a deterministic separation direction.
                let angle = ((i as f32) * 0.618_034 + (j as f32) * 0.414_214)
                    * std::f32::consts::TAU;
                vec2(angle.cos(), angle.sin())
            };

            let repulsion = -config.charge_strength * alpha / distance_sq.max(1.0);
            graph.nodes[i].velocity += direction * repulsion;
            graph.nodes[j].velocity -= direction * repulsion;

            let min_distance =
                graph.nodes[i].display.radius + graph.nodes[j].display.radius;
            let overlap = min_distance - distance_sq.sqrt();
            if overlap > 0.0 {
                let push = direction * (overlap * 0.5 * config.collision_strength);
                graph.nodes[i].velocity += push;
                graph.nodes[j].velocity -= push;
            }
        }
    }

    // Weak axis restoring forces toward the origin, x and y independently.
    for node in &mut graph.nodes {
        node.velocity -= node.world_pos * (config.xy_strength * alpha);
    }

    // Integrate. Pinned nodes are externally driven and skip displacement.
    let mut centroid = Vec2::ZERO;
    let mut free_count = 0usize;
    for node in &mut graph.nodes {
        if let Some(pinned) = node.pinned {
            node.world_pos = pinned;
            node.velocity = Vec2::ZERO;
            continue;
        }

        node.velocity *= VELOCITY_RETAIN;
        node.world_pos += node.velocity;
        centroid += node.world_pos;
        free_count += 1;
    }

    // Centering: translate the free nodes so their centroid tracks the origin.
    if free_count > 0 {
        let shift = centroid / free_count as f32 * config.center_strength;
        if shift.length_sq() > 0.000_001 {
            for node in &mut graph.nodes {
                if node.pinned.is_none() {
                    node.world_pos -= shift;
                }
            }
        }
    }

    true
}
