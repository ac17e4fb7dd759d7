use chrono::NaiveDate;
use eframe::egui::Color32;

use crate::people::{Person, Relationship, StatusKind};

const BASE_NODE_RADIUS: f32 = 3.0;
const ENDED_EDGE_WIDTH: f32 = 1.0;

/// Seminar color table. Only memberships in groups listed here contribute
/// pie segments; everything else falls back to the solid fill.
const SEMINAR_COLORS: [(&str, Color32); 3] = [
    ("KSP", Color32::from_rgb(0x81, 0x8f, 0x3d)),
    ("KMS", Color32::from_rgb(0x4a, 0x6f, 0xd8)),
    ("FKS", Color32::from_rgb(0xe3, 0x9f, 0x3c)),
];

pub(super) fn seminar_color(group_name: &str) -> Option<Color32> {
    SEMINAR_COLORS
        .iter()
        .find(|(name, _)| *name == group_name)
        .map(|(_, color)| *color)
}

pub(super) fn status_color(kind: StatusKind) -> Color32 {
    match kind {
        StatusKind::BloodRelative => Color32::from_rgb(0x00, 0x80, 0x80),
        StatusKind::Sibling => Color32::from_rgb(0x00, 0x87, 0x00),
        StatusKind::ParentChild => Color32::from_rgb(0x80, 0x80, 0xff),
        StatusKind::Married => Color32::from_rgb(0xb7, 0x00, 0x00),
        StatusKind::Engaged => Color32::from_rgb(0xff, 0xc0, 0x00),
        StatusKind::Dating => Color32::from_rgb(0xff, 0xff, 0xff),
        StatusKind::Rumour => Color32::from_rgb(0xff, 0x00, 0xff),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(super) struct NodeDisplay {
    pub(super) label: String,
    /// World-space radius; also the hit-test radius.
    pub(super) radius: f32,
    /// Sequential slices starting at angle 0 and summing to a full turn.
    /// Empty when no colored membership has measurable duration.
    pub(super) pie: Vec<PieSlice>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct PieSlice {
    pub(super) angle_start: f32,
    pub(super) angle_end: f32,
    pub(super) color: Color32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct EdgeDisplay {
    pub(super) color: Color32,
    /// World-space line width.
    pub(super) width: f32,
    /// Ended statuses render dashed, ongoing ones solid.
    pub(super) dashed: bool,
}

pub(super) fn node_display(person: &Person, observed_at: NaiveDate) -> NodeDisplay {
    let age_years = person.age_years_at(observed_at);
    let radius = BASE_NODE_RADIUS + (age_years * 2.0).sqrt().ceil() as f32;

    let colored = person
        .memberships
        .iter()
        .filter_map(|membership| {
            let color = seminar_color(&membership.group_name)?;
            let duration = membership.duration_days_at(observed_at);
            (duration > 0).then_some((duration, color))
        })
        .collect::<Vec<_>>();

    let total_days: i64 = colored.iter().map(|(duration, _)| duration).sum();
    let mut pie = Vec::with_capacity(colored.len());
    let mut angle = 0.0_f32;
    for (index, (duration, color)) in colored.iter().enumerate() {
        let span = (*duration as f64 / total_days as f64) as f32 * std::f32::consts::TAU;
        let angle_end = if index == colored.len() - 1 {
            // Absorb accumulated rounding so the slices close the circle.
            std::f32::consts::TAU
        } else {
            angle + span
        };
        pie.push(PieSlice {
            angle_start: angle,
            angle_end,
            color: *color,
        });
        angle = angle_end;
    }

    NodeDisplay {
        label: person.label(),
        radius,
        pie,
    }
}

/// `None` when no status has begun by `observed_at`; such edges are not
/// drawable and the temporal filter never emits them.
pub(super) fn edge_display(
    relationship: &Relationship,
    observed_at: NaiveDate,
) -> Option<EdgeDisplay> {
    let current = relationship.status_at(observed_at)?;
    let color = status_color(current.status);

    let (width, dashed) = match current.date_end {
        Some(_) => (ENDED_EDGE_WIDTH, true),
        None => {
            let duration_days = current
                .date_start
                .map(|start| crate::util::days_between(start, observed_at).max(0))
                .unwrap_or(0);
            (ongoing_edge_width(duration_days), false)
        }
    };

    Some(EdgeDisplay {
        color,
        width,
        dashed,
    })
}

/// Grows with log(sqrt(days / 10)), floored at 1. Short durations push the
/// logarithm non-positive (or NaN at zero); those clamp to the floor.
fn ongoing_edge_width(duration_days: i64) -> f32 {
    let raw = ((duration_days as f32 / 10.0).sqrt()).ln();
    if raw.is_finite() && raw > 1.0 {
        raw.ceil()
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::TAU;

    use super::*;
    use crate::people::{Gender, GroupCategory, Membership, RelationshipStatus};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn person(id: u32, birth: Option<NaiveDate>, memberships: Vec<Membership>) -> Person {
        Person {
            id,
            first_name: "First".to_owned(),
            last_name: "Last".to_owned(),
            maiden_name: String::new(),
            nickname: String::new(),
            gender: Gender::Other,
            birth_date: birth,
            death_date: None,
            memberships,
        }
    }

    fn membership(group: &str, start: NaiveDate, end: Option<NaiveDate>) -> Membership {
        Membership {
            group_name: group.to_owned(),
            group_category: GroupCategory::Seminar,
            date_started: Some(start),
            date_ended: end,
        }
    }

    fn dating_since(start: NaiveDate) -> Relationship {
        Relationship {
            id: 10,
            source: 1,
            target: 2,
            statuses: vec![RelationshipStatus {
                status: StatusKind::Dating,
                date_start: Some(start),
                date_end: None,
            }],
        }
    }

    #[test]
    fn radius_is_non_decreasing_in_observation_time() {
        let person = person(1, Some(date(2000, 1, 1)), Vec::new());
        let mut previous = 0.0_f32;
        for year in 2000..2040 {
            let radius = node_display(&person, date(year, 6, 1)).radius;
            assert!(radius >= previous, "radius shrank at year {year}");
            previous = radius;
        }
    }

    #[test]
    fn unknown_birth_date_clamps_to_minimum_radius() {
        let person = person(1, None, Vec::new());
        assert_eq!(node_display(&person, date(2020, 1, 1)).radius, 3.0);
    }

    #[test]
    fn pie_slices_close_the_full_circle() {
        let person = person(
            1,
            Some(date(1990, 1, 1)),
            vec![
                membership("KSP", date(2010, 1, 1), Some(date(2012, 1, 1))),
                membership("KMS", date(2012, 1, 1), Some(date(2013, 1, 1))),
            ],
        );
        let display = node_display(&person, date(2020, 1, 1));

        assert_eq!(display.pie.len(), 2);
        assert_eq!(display.pie[0].angle_start, 0.0);
        assert_eq!(display.pie.last().unwrap().angle_end, TAU);
        let spanned: f32 = display
            .pie
            .iter()
            .map(|slice| slice.angle_end - slice.angle_start)
            .sum();
        assert!((spanned - TAU).abs() < 1e-4);
        // KSP ran twice as long as KMS.
        let ksp_span = display.pie[0].angle_end - display.pie[0].angle_start;
        assert!((ksp_span - TAU * 2.0 / 3.0).abs() < 0.01);
    }

    #[test]
    fn no_colored_duration_means_no_pie() {
        let uncolored = person(
            1,
            Some(date(1990, 1, 1)),
            vec![membership("Gymnazium", date(2005, 1, 1), None)],
        );
        assert!(node_display(&uncolored, date(2020, 1, 1)).pie.is_empty());

        // A colored membership observed before it started contributes nothing.
        let not_yet = person(
            2,
            Some(date(1990, 1, 1)),
            vec![membership("KSP", date(2010, 1, 1), None)],
        );
        assert!(node_display(&not_yet, date(2009, 1, 1)).pie.is_empty());
    }

    #[test]
    fn ended_status_renders_dashed_and_thin() {
        let mut relationship = dating_since(date(2010, 1, 1));
        relationship.statuses[0].date_end = Some(date(2012, 1, 1));
        relationship.statuses[0].status = StatusKind::Married;

        let display = edge_display(&relationship, date(2020, 1, 1)).unwrap();
        assert!(display.dashed);
        assert_eq!(display.width, 1.0);
        assert_eq!(display.color, status_color(StatusKind::Married));
    }

    #[test]
    fn ongoing_status_renders_solid_with_floored_width() {
        let relationship = dating_since(date(2019, 12, 31));
        // One day of dating: log(sqrt(0.1)) is negative, clamps to 1.
        let display = edge_display(&relationship, date(2020, 1, 1)).unwrap();
        assert!(!display.dashed);
        assert_eq!(display.width, 1.0);

        // A decade of dating grows past the floor.
        let display = edge_display(&relationship, date(2030, 1, 1)).unwrap();
        assert!(display.width > 1.0);
    }

    #[test]
    fn edge_without_begun_status_has_no_display() {
        let relationship = dating_since(date(2015, 1, 1));
        assert!(edge_display(&relationship, date(2014, 1, 1)).is_none());
    }

    #[test]
    fn scenario_two_people_observed_in_2020() {
        let a = person(1, Some(date(2000, 1, 1)), Vec::new());
        let b = person(
            2,
            Some(date(1990, 1, 1)),
            vec![membership("KSP", date(2010, 1, 1), Some(date(2012, 1, 1)))],
        );
        let relationship = dating_since(date(2015, 1, 1));
        let observed = date(2020, 1, 1);

        let a_display = node_display(&a, observed);
        let b_display = node_display(&b, observed);
        assert!(a_display.radius < b_display.radius);

        assert_eq!(b_display.pie.len(), 1);
        assert_eq!(b_display.pie[0].angle_start, 0.0);
        assert_eq!(b_display.pie[0].angle_end, TAU);
        assert_eq!(b_display.pie[0].color, seminar_color("KSP").unwrap());

        let edge = edge_display(&relationship, observed).unwrap();
        assert!(!edge.dashed);
        assert_eq!(edge.color, status_color(StatusKind::Dating));
    }
}
