use std::collections::{HashMap, HashSet};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use chrono::NaiveDate;
use eframe::egui::{self, Context, Vec2};

use crate::app::display::{EdgeDisplay, NodeDisplay};
use crate::people::{SocialGraph, load_snapshot};

mod display;
mod filter;
mod graph;
mod physics;
mod render_utils;
mod ui;

pub struct PeopleGraphApp {
    source: String,
    state: AppState,
    reload_rx: Option<Receiver<Result<SocialGraph, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<SocialGraph, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    graph: SocialGraph,
    toggles: FilterToggles,
    forces: ForceConfig,
    /// Event dates plus "today"; the time scrubber snaps to these.
    timeline: Vec<NaiveDate>,
    timeline_index: usize,
    observed_at: NaiveDate,
    search: String,
    search_matches: HashSet<u32>,
    search_pulse_until: Option<f64>,
    /// Selected person ids, newest first, at most two.
    selected: Vec<u32>,
    pan: Vec2,
    zoom: f32,
    graph_dirty: bool,
    render_graph: Option<RenderGraph>,
    drag_index: Option<usize>,
    canvas_size: Vec2,
    visible_node_count: usize,
    visible_edge_count: usize,
}

/// Checkbox state of the filter panel. Node toggles OR-combine; with none
/// enabled every node passes. Edge toggles OR-combine strictly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FilterToggles {
    ksp: bool,
    kms: bool,
    fks: bool,
    non_trojsten: bool,
    show_isolated: bool,
    serious: bool,
    past_serious: bool,
    blood_bound: bool,
    rumour: bool,
    past_rumour: bool,
}

impl Default for FilterToggles {
    fn default() -> Self {
        Self {
            ksp: true,
            kms: true,
            fks: true,
            non_trojsten: true,
            show_isolated: true,
            serious: true,
            past_serious: true,
            blood_bound: true,
            rumour: true,
            past_rumour: true,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct ForceConfig {
    /// Fraction of the centroid drift corrected per step.
    center_strength: f32,
    /// Scale on the pairwise overlap push.
    collision_strength: f32,
    /// Many-body charge; negative repels. O(n^2) per step, fine for graphs
    /// in the low hundreds of nodes.
    charge_strength: f32,
    /// Spring strength along visible edges.
    link_strength: f32,
    /// Weak axis-aligned pull toward the origin, applied to x and y
    /// independently.
    xy_strength: f32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            center_strength: 1.0,
            collision_strength: 1.0,
            charge_strength: -200.0,
            link_strength: 0.3,
            xy_strength: 0.04,
        }
    }
}

struct RenderGraph {
    nodes: Vec<SimNode>,
    edges: Vec<SimEdge>,
    index_by_id: HashMap<u32, usize>,
    alpha: f32,
    alpha_target: f32,
}

struct SimNode {
    id: u32,
    world_pos: Vec2,
    velocity: Vec2,
    /// While set, the solver holds the node here and skips force
    /// displacement. Driven by the drag gesture.
    pinned: Option<Vec2>,
    display: NodeDisplay,
}

struct SimEdge {
    relationship_id: u32,
    source: usize,
    target: usize,
    display: EdgeDisplay,
}

impl PeopleGraphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, source: String) -> Self {
        let state = Self::start_load(source.clone());
        Self {
            source,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(source: String) -> Receiver<Result<SocialGraph, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_snapshot(&source).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: String) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }
}

impl eframe::App for PeopleGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(graph) => AppState::Ready(Box::new(ViewModel::new(graph))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading relationship graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the relationship graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.source.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.source, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.source.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(graph) => AppState::Ready(Box::new(ViewModel::new(graph))),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
