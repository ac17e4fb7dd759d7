use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};
use log::warn;

use crate::util::stable_pair;

use super::super::{RenderGraph, SimEdge, SimNode, ViewModel, display, filter};

/// World-space radius of the ring new nodes are seeded onto.
const SEED_RADIUS: f32 = 160.0;

impl ViewModel {
    /// Recomputes the filtered subgraph and its display attributes, then
    /// swaps it into the live simulation. Nodes surviving the swap keep
    /// their positions and velocities; new nodes get a stable per-id seed.
    /// Runs on filter/time changes, not on every painted frame.
    pub(in crate::app) fn rebuild_render_graph(&mut self) {
        let filtered = filter::visible_subgraph(&self.graph, self.observed_at, &self.toggles);

        let mut prior_nodes = self
            .render_graph
            .take()
            .map(|graph| {
                graph
                    .nodes
                    .into_iter()
                    .map(|node| (node.id, node))
                    .collect::<HashMap<_, _>>()
            })
            .unwrap_or_default();

        let mut nodes = Vec::with_capacity(filtered.node_count());
        let mut index_by_id = HashMap::with_capacity(filtered.node_count());
        for person in &filtered.people {
            let display = display::node_display(person, self.observed_at);
            let node = match prior_nodes.remove(&person.id) {
                Some(mut node) => {
                    node.display = display;
                    // The drag gesture tracks indices of the old node set, so
                    // a pin carried across the swap could never be released.
                    if node.pinned.take().is_some() {
                        node.velocity = Vec2::ZERO;
                    }
                    node
                }
                None => {
                    let (jx, jy) = stable_pair(person.id);
                    SimNode {
                        id: person.id,
                        world_pos: vec2(jx, jy) * SEED_RADIUS,
                        velocity: Vec2::ZERO,
                        pinned: None,
                        display,
                    }
                }
            };
            index_by_id.insert(person.id, nodes.len());
            nodes.push(node);
        }

        let mut edges = Vec::with_capacity(filtered.edge_count());
        for relationship in &filtered.relationships {
            let (Some(&source), Some(&target)) = (
                index_by_id.get(&relationship.source),
                index_by_id.get(&relationship.target),
            ) else {
                continue;
            };

            let Some(display) = display::edge_display(relationship, self.observed_at) else {
                warn!(
                    "relationship {} has no status at {}; skipping this rebuild",
                    relationship.id, self.observed_at
                );
                continue;
            };

            edges.push(SimEdge {
                relationship_id: relationship.id,
                source,
                target,
                display,
            });
        }

        let mut render_graph = RenderGraph {
            nodes,
            edges,
            index_by_id,
            alpha: 0.0,
            alpha_target: 0.0,
        };
        render_graph.reheat();

        self.visible_node_count = render_graph.nodes.len();
        self.visible_edge_count = render_graph.edges.len();
        self.render_graph = Some(render_graph);
        self.drag_index = None;
        self.graph_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use eframe::egui::{Vec2, vec2};

    use super::super::super::ViewModel;
    use crate::people::{
        Gender, Person, Relationship, RelationshipStatus, SocialGraph, StatusKind,
    };

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn person(id: u32) -> Person {
        Person {
            id,
            first_name: format!("First{id}"),
            last_name: format!("Last{id}"),
            maiden_name: String::new(),
            nickname: String::new(),
            gender: Gender::Other,
            birth_date: None,
            death_date: None,
            memberships: Vec::new(),
        }
    }

    fn two_person_model() -> ViewModel {
        let graph = SocialGraph::build(
            vec![person(1), person(2)],
            vec![Relationship {
                id: 10,
                source: 1,
                target: 2,
                statuses: vec![RelationshipStatus {
                    status: StatusKind::Dating,
                    date_start: Some(date(2015, 1, 1)),
                    date_end: None,
                }],
            }],
        );
        ViewModel::new(graph)
    }

    #[test]
    fn rebuild_keeps_positions_and_velocities_of_surviving_nodes() {
        let mut model = two_person_model();
        model.rebuild_render_graph();

        let held = vec2(40.0, -10.0);
        let drift = vec2(1.5, -0.5);
        {
            let render_graph = model.render_graph.as_mut().unwrap();
            render_graph.nodes[0].world_pos = held;
            render_graph.nodes[0].velocity = drift;
        }

        model.graph_dirty = true;
        model.rebuild_render_graph();

        let render_graph = model.render_graph.as_ref().unwrap();
        assert_eq!(render_graph.nodes[0].id, 1);
        assert_eq!(render_graph.nodes[0].world_pos, held);
        assert_eq!(render_graph.nodes[0].velocity, drift);
    }

    #[test]
    fn rebuild_releases_pins_left_by_an_interrupted_drag() {
        let mut model = two_person_model();
        model.rebuild_render_graph();

        let held = vec2(40.0, -10.0);
        {
            let render_graph = model.render_graph.as_mut().unwrap();
            render_graph.begin_drag();
            render_graph.pin(0, held);
            render_graph.nodes[0].world_pos = held;
            render_graph.nodes[0].velocity = vec2(3.0, 3.0);
        }
        model.drag_index = Some(0);

        model.graph_dirty = true;
        model.rebuild_render_graph();

        let render_graph = model.render_graph.as_ref().unwrap();
        assert!(render_graph.nodes[0].pinned.is_none());
        assert_eq!(render_graph.nodes[0].velocity, Vec2::ZERO);
        assert_eq!(render_graph.nodes[0].world_pos, held);
        assert_eq!(model.drag_index, None);
    }
}
