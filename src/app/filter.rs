use std::collections::HashSet;

use chrono::NaiveDate;

use super::FilterToggles;
use crate::people::{Person, Relationship, SocialGraph, StatusKind};

const TROJSTEN_SEMINARS: [&str; 3] = ["KSP", "KMS", "FKS"];

/// Derives the visible subgraph for one observation time and toggle set.
/// Pure: equal inputs always produce a value-equal graph, record order is
/// snapshot order, and the input graph is never mutated.
pub(super) fn visible_subgraph(
    graph: &SocialGraph,
    observed_at: NaiveDate,
    toggles: &FilterToggles,
) -> SocialGraph {
    let mut person_ids = graph
        .people
        .iter()
        .filter(|person| node_visible(person, observed_at, toggles))
        .map(|person| person.id)
        .collect::<HashSet<_>>();

    // Edges require both endpoints visible on top of their own predicate.
    let relationship_ids = graph
        .relationships
        .iter()
        .filter(|relationship| {
            person_ids.contains(&relationship.source)
                && person_ids.contains(&relationship.target)
                && edge_visible(relationship, observed_at, toggles)
        })
        .map(|relationship| relationship.id)
        .collect::<HashSet<_>>();

    if !toggles.show_isolated {
        let mut connected = HashSet::new();
        for relationship in &graph.relationships {
            if relationship_ids.contains(&relationship.id) {
                connected.insert(relationship.source);
                connected.insert(relationship.target);
            }
        }
        person_ids.retain(|id| connected.contains(id));
    }

    graph.subgraph(&person_ids, &relationship_ids)
}

fn node_visible(person: &Person, observed_at: NaiveDate, toggles: &FilterToggles) -> bool {
    let predicates: [(bool, fn(&Person, NaiveDate) -> bool); 4] = [
        (toggles.ksp, |p, t| is_seminar_member(p, "KSP", t)),
        (toggles.kms, |p, t| is_seminar_member(p, "KMS", t)),
        (toggles.fks, |p, t| is_seminar_member(p, "FKS", t)),
        (toggles.non_trojsten, is_non_trojsten),
    ];

    // With no node toggle enabled nothing is excluding the node.
    if predicates.iter().all(|(enabled, _)| !enabled) {
        return true;
    }

    predicates
        .iter()
        .any(|(enabled, predicate)| *enabled && predicate(person, observed_at))
}

fn is_seminar_member(person: &Person, seminar: &str, observed_at: NaiveDate) -> bool {
    person
        .memberships
        .iter()
        .any(|membership| membership.group_name == seminar && membership.active_at(observed_at))
}

fn is_non_trojsten(person: &Person, observed_at: NaiveDate) -> bool {
    !TROJSTEN_SEMINARS
        .iter()
        .any(|seminar| is_seminar_member(person, seminar, observed_at))
}

fn edge_visible(
    relationship: &Relationship,
    observed_at: NaiveDate,
    toggles: &FilterToggles,
) -> bool {
    let Some(current) = relationship.status_at(observed_at) else {
        return false;
    };
    let ended = current.date_end.is_some();

    match current.status {
        StatusKind::Dating | StatusKind::Engaged | StatusKind::Married => {
            if ended {
                toggles.past_serious
            } else {
                toggles.serious
            }
        }
        StatusKind::BloodRelative | StatusKind::Sibling | StatusKind::ParentChild => {
            toggles.blood_bound
        }
        StatusKind::Rumour => {
            if ended {
                toggles.past_rumour
            } else {
                toggles.rumour
            }
        }
    }
}
