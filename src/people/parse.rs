use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::warn;
use serde::Deserialize;

use super::graph::{
    Gender, GroupCategory, Membership, Person, Relationship, RelationshipStatus, SocialGraph,
    StatusKind,
};

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    nodes: Vec<RawPerson>,
    #[serde(default)]
    edges: Vec<RawRelationship>,
}

#[derive(Debug, Deserialize)]
struct RawPerson {
    id: u32,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    maiden_name: Option<String>,
    #[serde(default)]
    nickname: Option<String>,
    #[serde(default)]
    gender: Option<u8>,
    #[serde(default)]
    birth_date: Option<String>,
    #[serde(default)]
    death_date: Option<String>,
    #[serde(default)]
    memberships: Vec<RawMembership>,
}

#[derive(Debug, Deserialize)]
struct RawMembership {
    #[serde(default)]
    group_name: String,
    #[serde(default)]
    group_category: Option<u8>,
    #[serde(default)]
    date_started: Option<String>,
    #[serde(default)]
    date_ended: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRelationship {
    id: u32,
    source: u32,
    target: u32,
    #[serde(default)]
    statuses: Vec<RawStatus>,
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    status: u8,
    #[serde(default)]
    date_start: Option<String>,
    #[serde(default)]
    date_end: Option<String>,
}

pub(super) fn parse_snapshot(raw: &str) -> Result<SocialGraph> {
    let snapshot: RawSnapshot =
        serde_json::from_str(raw).context("invalid JSON in graph snapshot")?;

    let people = snapshot.nodes.into_iter().map(convert_person).collect();
    let relationships = snapshot
        .edges
        .into_iter()
        .map(convert_relationship)
        .collect();

    Ok(SocialGraph::build(people, relationships))
}

fn convert_person(raw: RawPerson) -> Person {
    let id = raw.id;
    Person {
        id,
        first_name: raw.first_name,
        last_name: raw.last_name,
        maiden_name: raw.maiden_name.unwrap_or_default(),
        nickname: raw.nickname.unwrap_or_default(),
        gender: gender_from_code(raw.gender),
        birth_date: parse_date(raw.birth_date.as_deref(), "birth_date", id),
        death_date: parse_date(raw.death_date.as_deref(), "death_date", id),
        memberships: raw
            .memberships
            .into_iter()
            .map(|membership| convert_membership(membership, id))
            .collect(),
    }
}

fn convert_membership(raw: RawMembership, person_id: u32) -> Membership {
    Membership {
        group_category: category_from_code(raw.group_category),
        date_started: parse_date(raw.date_started.as_deref(), "date_started", person_id),
        date_ended: parse_date(raw.date_ended.as_deref(), "date_ended", person_id),
        group_name: raw.group_name,
    }
}

fn convert_relationship(raw: RawRelationship) -> Relationship {
    let id = raw.id;
    let statuses = raw
        .statuses
        .into_iter()
        .filter_map(|status| {
            let Some(kind) = status_from_code(status.status) else {
                warn!(
                    "skipping status with unknown kind code {} on relationship {id}",
                    status.status
                );
                return None;
            };
            Some(RelationshipStatus {
                status: kind,
                date_start: parse_date(status.date_start.as_deref(), "date_start", id),
                date_end: parse_date(status.date_end.as_deref(), "date_end", id),
            })
        })
        .collect();

    Relationship {
        id,
        source: raw.source,
        target: raw.target,
        statuses,
    }
}

/// Missing and unparseable dates both resolve to `None`, which downstream
/// code reads as an open interval end.
fn parse_date(value: Option<&str>, field: &str, record_id: u32) -> Option<NaiveDate> {
    let value = value?;
    match value.parse::<NaiveDate>() {
        Ok(date) => Some(date),
        Err(_) => {
            warn!("unparseable {field} {value:?} on record {record_id}; treating as open-ended");
            None
        }
    }
}

fn gender_from_code(code: Option<u8>) -> Gender {
    match code {
        Some(1) => Gender::Male,
        Some(2) => Gender::Female,
        _ => Gender::Other,
    }
}

fn category_from_code(code: Option<u8>) -> GroupCategory {
    match code {
        Some(1) => GroupCategory::ElementarySchool,
        Some(2) => GroupCategory::HighSchool,
        Some(3) => GroupCategory::University,
        Some(4) => GroupCategory::Seminar,
        _ => GroupCategory::Other,
    }
}

fn status_from_code(code: u8) -> Option<StatusKind> {
    match code {
        1 => Some(StatusKind::BloodRelative),
        2 => Some(StatusKind::Sibling),
        3 => Some(StatusKind::ParentChild),
        4 => Some(StatusKind::Married),
        5 => Some(StatusKind::Engaged),
        6 => Some(StatusKind::Dating),
        7 => Some(StatusKind::Rumour),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "nodes": [
            {
                "id": 1,
                "first_name": "Ada",
                "last_name": "Example",
                "nickname": "ada",
                "gender": 2,
                "birth_date": "1990-01-01",
                "memberships": [
                    {
                        "group_name": "KSP",
                        "group_category": 4,
                        "date_started": "2010-01-01",
                        "date_ended": "2012-01-01"
                    }
                ]
            },
            {"id": 2, "first_name": "Bob", "last_name": "Example", "gender": 1}
        ],
        "edges": [
            {
                "id": 10,
                "source": 1,
                "target": 2,
                "statuses": [
                    {"status": 6, "date_start": "2015-01-01"},
                    {"status": 99, "date_start": "2016-01-01"}
                ]
            },
            {"id": 11, "source": 1, "target": 999, "statuses": []}
        ]
    }"#;

    #[test]
    fn parses_snapshot_and_drops_bad_records() {
        let graph = parse_snapshot(SNAPSHOT).unwrap();

        assert_eq!(graph.node_count(), 2);
        // Edge 11 references an unknown person and is dropped, not fatal.
        assert_eq!(graph.edge_count(), 1);

        let relationship = &graph.relationships[0];
        assert_eq!(relationship.id, 10);
        // The unknown status code 99 was skipped.
        assert_eq!(relationship.statuses.len(), 1);
        assert_eq!(relationship.statuses[0].status, StatusKind::Dating);
        // Missing date_end reads as a current status.
        assert!(relationship.statuses[0].date_end.is_none());

        let ada = graph.person(1).unwrap();
        assert_eq!(ada.gender, Gender::Female);
        assert_eq!(ada.memberships[0].group_category, GroupCategory::Seminar);
    }

    #[test]
    fn unparseable_dates_become_open_ended() {
        let graph = parse_snapshot(
            r#"{"nodes": [{"id": 1, "birth_date": "not-a-date"}], "edges": []}"#,
        )
        .unwrap();
        assert!(graph.person(1).unwrap().birth_date.is_none());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(parse_snapshot("{").is_err());
    }
}
