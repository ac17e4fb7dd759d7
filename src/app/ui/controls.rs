use eframe::egui::{self, Key, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::super::{ViewModel, filter};

/// How long a search keeps its matches pulsing, in seconds.
const SEARCH_PULSE_SECONDS: f64 = 3.0;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search (name or nickname)");
        let search_response = ui
            .text_edit_singleline(&mut self.search)
            .on_hover_text("Press Enter to pulse-highlight matching people on the canvas.");
        if search_response.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter)) {
            let now = ui.input(|input| input.time);
            self.run_search(now);
        }

        ui.separator();

        let mut changed = false;

        ui.label("People");
        changed |= ui
            .checkbox(&mut self.toggles.ksp, "KSP")
            .on_hover_text("People with an active KSP membership at the viewed date.")
            .changed();
        changed |= ui
            .checkbox(&mut self.toggles.kms, "KMS")
            .on_hover_text("People with an active KMS membership at the viewed date.")
            .changed();
        changed |= ui
            .checkbox(&mut self.toggles.fks, "FKS")
            .on_hover_text("People with an active FKS membership at the viewed date.")
            .changed();
        changed |= ui
            .checkbox(&mut self.toggles.non_trojsten, "Non-Trojsten")
            .on_hover_text("People with no active seminar membership at the viewed date.")
            .changed();
        changed |= ui
            .checkbox(&mut self.toggles.show_isolated, "Show isolated people")
            .on_hover_text("Keep people without any visible relationship on the canvas.")
            .changed();

        ui.separator();

        ui.label("Relationships");
        changed |= ui
            .checkbox(&mut self.toggles.serious, "Serious")
            .on_hover_text("Ongoing dating, engagements and marriages.")
            .changed();
        changed |= ui
            .checkbox(&mut self.toggles.past_serious, "Past serious")
            .on_hover_text("Dating, engagements and marriages that have ended.")
            .changed();
        changed |= ui
            .checkbox(&mut self.toggles.rumour, "Rumours")
            .on_hover_text("Ongoing rumours.")
            .changed();
        changed |= ui
            .checkbox(&mut self.toggles.past_rumour, "Past rumours")
            .on_hover_text("Rumours that have ended.")
            .changed();
        changed |= ui
            .checkbox(&mut self.toggles.blood_bound, "Blood bound")
            .on_hover_text("Blood relatives, siblings, parents and children.")
            .changed();

        if changed {
            self.graph_dirty = true;
        }

        ui.separator();

        ui.collapsing("Physics tuning", |ui| {
            let mut forces_changed = false;

            forces_changed |= ui
                .add(
                    egui::Slider::new(&mut self.forces.charge_strength, -600.0..=0.0)
                        .text("Charge")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("Many-body repulsion; more negative pushes nodes further apart.")
                .changed();
            forces_changed |= ui
                .add(
                    egui::Slider::new(&mut self.forces.link_strength, 0.0..=1.0)
                        .text("Link")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("How strongly related people pull toward each other.")
                .changed();
            forces_changed |= ui
                .add(
                    egui::Slider::new(&mut self.forces.collision_strength, 0.0..=2.0)
                        .text("Collision")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("Extra separation push between overlapping nodes.")
                .changed();
            forces_changed |= ui
                .add(
                    egui::Slider::new(&mut self.forces.center_strength, 0.0..=1.0)
                        .text("Centering")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("How quickly the layout centroid tracks the canvas center.")
                .changed();
            forces_changed |= ui
                .add(
                    egui::Slider::new(&mut self.forces.xy_strength, 0.0..=0.2)
                        .text("Axis pull")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("Weak pull toward the canvas center along each axis.")
                .changed();

            if ui.button("Reheat layout").clicked() {
                forces_changed = true;
            }

            if forces_changed && let Some(render_graph) = &mut self.render_graph {
                render_graph.reheat();
            }
        });
    }

    /// Fuzzy-matches the query against the name fields of currently visible
    /// people and starts the highlight pulse. An empty query clears any
    /// active pulse.
    fn run_search(&mut self, now: f64) {
        self.search_matches.clear();

        let query = self.search.trim();
        if query.is_empty() {
            self.search_pulse_until = None;
            return;
        }

        // Matching the filtered subgraph keeps every pulse on a node that is
        // actually on the canvas.
        let visible = filter::visible_subgraph(&self.graph, self.observed_at, &self.toggles);
        let matcher = SkimMatcherV2::default();
        for person in &visible.people {
            let haystack = format!(
                "{} {} {} {}",
                person.first_name, person.last_name, person.maiden_name, person.nickname
            );
            if matcher.fuzzy_match(&haystack, query).is_some() {
                self.search_matches.insert(person.id);
            }
        }

        self.search_pulse_until = Some(now + SEARCH_PULSE_SECONDS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::people::{Gender, Person, SocialGraph};

    fn named(id: u32, first: &str, last: &str, nickname: &str) -> Person {
        Person {
            id,
            first_name: first.to_owned(),
            last_name: last.to_owned(),
            maiden_name: String::new(),
            nickname: nickname.to_owned(),
            gender: Gender::Other,
            birth_date: None,
            death_date: None,
            memberships: Vec::new(),
        }
    }

    fn model_with_people(people: Vec<Person>) -> ViewModel {
        ViewModel::new(SocialGraph::build(people, Vec::new()))
    }

    #[test]
    fn search_matches_names_and_nicknames_fuzzily() {
        let mut model = model_with_people(vec![
            named(1, "Jozef", "Novak", "Jojo"),
            named(2, "Maria", "Kovacova", ""),
            named(3, "Peter", "Horvath", ""),
        ]);

        model.search = "jojo".to_owned();
        model.run_search(10.0);
        assert!(model.search_matches.contains(&1));
        assert!(!model.search_matches.contains(&3));
        assert_eq!(model.search_pulse_until, Some(10.0 + SEARCH_PULSE_SECONDS));

        // Subsequence matching still finds the surname.
        model.search = "kvcova".to_owned();
        model.run_search(20.0);
        assert!(model.search_matches.contains(&2));
    }

    #[test]
    fn search_skips_people_hidden_by_the_filters() {
        let mut model = model_with_people(vec![named(1, "Jozef", "Novak", "Jojo")]);
        // With the non-Trojsten toggle off, a person without any seminar
        // membership is not on the canvas and must not pulse.
        model.toggles.non_trojsten = false;
        model.search = "jojo".to_owned();
        model.run_search(10.0);
        assert!(model.search_matches.is_empty());

        model.toggles.non_trojsten = true;
        model.run_search(20.0);
        assert!(model.search_matches.contains(&1));
    }

    #[test]
    fn empty_query_clears_matches_and_pulse() {
        let mut model = model_with_people(vec![named(1, "Jozef", "Novak", "Jojo")]);
        model.search = "jojo".to_owned();
        model.run_search(10.0);
        assert!(!model.search_matches.is_empty());

        model.search = "   ".to_owned();
        model.run_search(11.0);
        assert!(model.search_matches.is_empty());
        assert_eq!(model.search_pulse_until, None);
    }
}
