use eframe::egui::{self, Ui};

use crate::util::format_date;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_timeline(&mut self, ui: &mut Ui) {
        let max_index = self.timeline.len().saturating_sub(1);

        ui.horizontal(|ui| {
            ui.label("Time");
            ui.spacing_mut().slider_width = (ui.available_width() - 140.0).max(120.0);

            let slider = ui
                .add_enabled(
                    max_index > 0,
                    egui::Slider::new(&mut self.timeline_index, 0..=max_index)
                        .show_value(false)
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text(
                    "Scrub through relationship history; the graph shows the world \
                     as of the selected date.",
                );

            if slider.changed() {
                self.observed_at = self.timeline[self.timeline_index];
                self.graph_dirty = true;
            }

            ui.label(format_date(Some(self.observed_at)));
        });
    }
}
