use std::collections::HashSet;

use chrono::Local;
use eframe::egui::{self, Align, Context, Layout, Vec2};

use crate::people::SocialGraph;
use crate::util::format_date;

use super::super::{FilterToggles, ForceConfig, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(graph: SocialGraph) -> Self {
        // The scrubber snaps to relationship event dates, with today as the
        // final stop so the default view is the present.
        let mut timeline = graph.event_dates();
        timeline.push(Local::now().date_naive());
        timeline.sort_unstable();
        timeline.dedup();

        let timeline_index = timeline.len() - 1;
        let observed_at = timeline[timeline_index];

        Self {
            graph,
            toggles: FilterToggles::default(),
            forces: ForceConfig::default(),
            timeline,
            timeline_index,
            observed_at,
            search: String::new(),
            search_matches: HashSet::new(),
            search_pulse_until: None,
            selected: Vec::new(),
            pan: Vec2::ZERO,
            zoom: 1.0,
            graph_dirty: true,
            render_graph: None,
            drag_index: None,
            canvas_size: Vec2::ZERO,
            visible_node_count: 0,
            visible_edge_count: 0,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source: &str,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("people-graph");
                    ui.separator();
                    ui.label(format!("source: {source}"));
                    ui.label(format!("people: {}", self.graph.node_count()));
                    ui.label(format!("relationships: {}", self.graph.edge_count()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload snapshot"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!(
                            "visible: {} people, {} relationships",
                            self.visible_node_count, self.visible_edge_count
                        ));
                        ui.label(format!("viewing {}", format_date(Some(self.observed_at))));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::TopBottomPanel::bottom("timeline")
            .resizable(false)
            .show(ctx, |ui| self.draw_timeline(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading relationship graph...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });
    }
}
