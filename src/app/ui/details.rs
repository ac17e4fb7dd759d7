use eframe::egui::Ui;

use crate::people::{GroupCategory, Membership, Person, Relationship};
use crate::util::format_date;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Details");
        ui.separator();

        if self.selected.is_empty() {
            ui.label(
                "Click a person to inspect them. Select two connected people \
                 to see their relationship history.",
            );
            return;
        }

        for &id in &self.selected {
            if let Some(person) = self.graph.person(id) {
                draw_person(ui, person);
                ui.add_space(8.0);
            }
        }

        if let [a, b] = self.selected[..] {
            ui.separator();
            match self.graph.find_relationship(a, b) {
                Some(relationship) => draw_relationship(ui, &self.graph, relationship),
                None => {
                    ui.label("No recorded relationship between the selected people.");
                }
            }
        }

        ui.add_space(8.0);
        if ui.button("Clear selection").clicked() {
            self.selected.clear();
        }
    }
}

fn draw_person(ui: &mut Ui, person: &Person) {
    ui.strong(person.label());
    ui.label(format!("{} {}", person.first_name, person.last_name));
    if !person.maiden_name.is_empty() {
        ui.label(format!("maiden name: {}", person.maiden_name));
    }
    if person.birth_date.is_some() {
        ui.label(format!("born: {}", format_date(person.birth_date)));
    }
    if person.death_date.is_some() {
        ui.label(format!("died: {}", format_date(person.death_date)));
    }

    let seminars = memberships_in(person, |category| category == GroupCategory::Seminar);
    let schools = memberships_in(person, |category| {
        matches!(
            category,
            GroupCategory::ElementarySchool | GroupCategory::HighSchool | GroupCategory::University
        )
    });
    let other = memberships_in(person, |category| category == GroupCategory::Other);

    draw_membership_group(ui, "Seminars", &seminars);
    draw_membership_group(ui, "Schools", &schools);
    draw_membership_group(ui, "Other groups", &other);
}

fn memberships_in<'a>(
    person: &'a Person,
    include: impl Fn(GroupCategory) -> bool,
) -> Vec<&'a Membership> {
    person
        .memberships
        .iter()
        .filter(|membership| include(membership.group_category))
        .collect()
}

fn draw_membership_group(ui: &mut Ui, title: &str, memberships: &[&Membership]) {
    if memberships.is_empty() {
        return;
    }

    ui.add_space(4.0);
    ui.label(title);
    for membership in memberships {
        ui.label(format!(
            "  {}: {} - {}",
            membership.group_name,
            format_date(membership.date_started),
            format_date(membership.date_ended),
        ));
    }
}

fn draw_relationship(ui: &mut Ui, graph: &crate::people::SocialGraph, relationship: &Relationship) {
    let endpoint = |id| {
        graph
            .person(id)
            .map(|person| person.label())
            .unwrap_or_else(|| format!("#{id}"))
    };
    ui.strong(format!(
        "{} & {}",
        endpoint(relationship.source),
        endpoint(relationship.target)
    ));

    for status in &relationship.statuses {
        ui.label(format!(
            "{}: {} - {}",
            status.status.label(),
            format_date(status.date_start),
            format_date(status.date_end),
        ));
    }
}
