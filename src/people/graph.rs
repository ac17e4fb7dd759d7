use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use log::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupCategory {
    ElementarySchool,
    HighSchool,
    University,
    Seminar,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusKind {
    BloodRelative,
    Sibling,
    ParentChild,
    Married,
    Engaged,
    Dating,
    Rumour,
}

impl StatusKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::BloodRelative => "Blood relatives",
            Self::Sibling => "Siblings",
            Self::ParentChild => "Parent and child",
            Self::Married => "Married",
            Self::Engaged => "Engaged",
            Self::Dating => "Dating",
            Self::Rumour => "Rumour",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Membership {
    pub group_name: String,
    pub group_category: GroupCategory,
    /// Missing start means the membership has always been active.
    pub date_started: Option<NaiveDate>,
    /// Missing end means the membership is ongoing.
    pub date_ended: Option<NaiveDate>,
}

impl Membership {
    pub fn active_at(&self, observed_at: NaiveDate) -> bool {
        let started = self.date_started.is_none_or(|started| started <= observed_at);
        let not_ended = self.date_ended.is_none_or(|ended| ended >= observed_at);
        started && not_ended
    }

    /// Days spent in the group up to `observed_at`. A membership without a
    /// recorded start has no measurable duration and contributes zero.
    pub fn duration_days_at(&self, observed_at: NaiveDate) -> i64 {
        let Some(started) = self.date_started else {
            return 0;
        };

        let until = match self.date_ended {
            Some(ended) => ended.min(observed_at),
            None => observed_at,
        };
        crate::util::days_between(started, until).max(0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Person {
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
    pub maiden_name: String,
    pub nickname: String,
    pub gender: Gender,
    pub birth_date: Option<NaiveDate>,
    pub death_date: Option<NaiveDate>,
    pub memberships: Vec<Membership>,
}

impl Person {
    pub fn label(&self) -> String {
        if self.nickname.is_empty() {
            format!("{} {}", self.first_name, self.last_name)
        } else {
            self.nickname.clone()
        }
    }

    /// Age in 365-day years as of `observed_at`, capped at the death date.
    /// Unknown birth dates and not-yet-born observation times clamp to zero.
    pub fn age_years_at(&self, observed_at: NaiveDate) -> f64 {
        let Some(birth) = self.birth_date else {
            return 0.0;
        };
        let until = self.death_date.unwrap_or(observed_at);
        crate::util::years_between(birth, until).max(0.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RelationshipStatus {
    pub status: StatusKind,
    /// Missing start counts as having always been in effect.
    pub date_start: Option<NaiveDate>,
    /// Missing end means the status is current.
    pub date_end: Option<NaiveDate>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Relationship {
    pub id: u32,
    pub source: u32,
    pub target: u32,
    /// Chronologically ordered by start date; enforced by `SocialGraph::build`.
    pub statuses: Vec<RelationshipStatus>,
}

impl Relationship {
    /// The status in effect at `observed_at`: the last one started by then.
    pub fn status_at(&self, observed_at: NaiveDate) -> Option<&RelationshipStatus> {
        self.statuses
            .iter()
            .filter(|status| status.date_start.is_none_or(|start| start <= observed_at))
            .next_back()
    }

    pub fn connects(&self, a: u32, b: u32) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

/// One immutable snapshot of people and the relationships between them.
/// Filtered subgraphs are fresh `SocialGraph` values owning cloned records.
#[derive(Clone, Debug, PartialEq)]
pub struct SocialGraph {
    pub people: Vec<Person>,
    pub relationships: Vec<Relationship>,
    index_by_id: HashMap<u32, usize>,
}

impl SocialGraph {
    pub fn build(people: Vec<Person>, relationships: Vec<Relationship>) -> Self {
        let index_by_id = people
            .iter()
            .enumerate()
            .map(|(index, person)| (person.id, index))
            .collect::<HashMap<_, _>>();

        let relationships = relationships
            .into_iter()
            .filter(|relationship| {
                let known = index_by_id.contains_key(&relationship.source)
                    && index_by_id.contains_key(&relationship.target);
                if !known {
                    warn!(
                        "dropping relationship {} between unknown people {} and {}",
                        relationship.id, relationship.source, relationship.target
                    );
                }
                known
            })
            .map(|mut relationship| {
                relationship.statuses.sort_by_key(|status| status.date_start);
                relationship
            })
            .collect();

        Self {
            people,
            relationships,
            index_by_id,
        }
    }

    pub fn node_count(&self) -> usize {
        self.people.len()
    }

    pub fn edge_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn person(&self, id: u32) -> Option<&Person> {
        self.index_by_id.get(&id).map(|&index| &self.people[index])
    }

    /// The relationship between two people, endpoint order agnostic.
    pub fn find_relationship(&self, a: u32, b: u32) -> Option<&Relationship> {
        self.relationships
            .iter()
            .find(|relationship| relationship.connects(a, b))
    }

    /// A new graph owning clones of the selected records, in snapshot order.
    pub fn subgraph(&self, person_ids: &HashSet<u32>, relationship_ids: &HashSet<u32>) -> Self {
        let people = self
            .people
            .iter()
            .filter(|person| person_ids.contains(&person.id))
            .cloned()
            .collect();
        let relationships = self
            .relationships
            .iter()
            .filter(|relationship| relationship_ids.contains(&relationship.id))
            .cloned()
            .collect();
        Self::build(people, relationships)
    }

    /// Every status start and end date, sorted and deduplicated. Drives the
    /// time scrubber range.
    pub fn event_dates(&self) -> Vec<NaiveDate> {
        let mut dates = self
            .relationships
            .iter()
            .flat_map(|relationship| relationship.statuses.iter())
            .flat_map(|status| [status.date_start, status.date_end])
            .flatten()
            .collect::<Vec<_>>();
        dates.sort_unstable();
        dates.dedup();
        dates
    }
}
