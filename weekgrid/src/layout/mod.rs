/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Column layout for the weekly grid.
//!
//! Each [`OverlapGroup`] is drawn as `group.len()` equal-width columns inside
//! its day column.  Members are ordered by start time (stable, so equal starts
//! keep input order) and the position in that order is the column index.
//!
//! This is a placement policy, not interval-graph coloring: a chained group
//! such as `A–B–C` where `B` and `C` never meet still gets three columns.
//!
//! # Geometry
//!
//! ```text
//! top    = (start − window_start) × hour_height_px      [px]
//! height = duration × hour_height_px                    [px]
//! width  = day_width_pct / group_len                    [%]
//! left   = day.index() × day_width_pct + column × width [%]
//! ```
//!
//! Sessions reaching outside the display window are not clipped; `top` may be
//! negative and `top + height` may exceed [`GridGeometry::total_height_px`].
//!
//! # Example
//! ```rust
//! use weekgrid::color::ColorAllocator;
//! use weekgrid::layout::{layout_schedule, GridGeometry};
//! use weekgrid::session::{SessionRecord, TimeSpanRecord};
//!
//! let record = |id: &str, start: &str, end: &str| SessionRecord {
//!     id: id.into(),
//!     crn: id.into(),
//!     day: "Monday".into(),
//!     time: TimeSpanRecord { start: start.into(), end: end.into() },
//!     ..Default::default()
//! };
//! let records = vec![record("a", "09:00", "10:00"), record("b", "09:30", "10:30")];
//!
//! let mut colors = ColorAllocator::new();
//! let layout = layout_schedule(&records, &GridGeometry::default(), &mut colors);
//! assert_eq!(layout.sessions.len(), 2);
//! assert_eq!(layout.sessions[0].placement.geometry.width_pct, 10.0);
//! ```

pub mod error;

pub use error::SessionIssue;

use std::collections::HashSet;

use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::color::{Color, ColorAllocator};
use crate::grouping::{group_by_day, OverlapGroup};
use crate::session::{ClockTime, Day, Session, SessionRecord, TimeRange};

// ── Grid geometry ─────────────────────────────────────────────────────────────

/// Fixed dimensions of the weekly grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry {
    /// Time shown at the top edge of the grid.
    pub window_start: ClockTime,
    /// Time shown at the bottom edge of the grid.
    pub window_end: ClockTime,
    /// Vertical pixels per hour.
    pub hour_height_px: f64,
    /// Width of one day column as a percentage of the grid width.
    pub day_width_pct: f64,
}

impl Default for GridGeometry {
    /// 08:00–18:00, 60 px per hour, five 20 % day columns.
    fn default() -> Self {
        Self {
            window_start: ClockTime::hm(8, 0),
            window_end: ClockTime::hm(18, 0),
            hour_height_px: 60.0,
            day_width_pct: 20.0,
        }
    }
}

impl GridGeometry {
    /// Left edge of `day`'s column, in percent.
    pub fn day_offset_pct(&self, day: Day) -> f64 {
        day.index() as f64 * self.day_width_pct
    }

    /// Height of the whole visible window in pixels.
    pub fn total_height_px(&self) -> f64 {
        (self.window_end.as_hours() - self.window_start.as_hours()) * self.hour_height_px
    }

    /// `(top, height)` in pixels for `time`.
    pub fn vertical_span(&self, time: &TimeRange) -> (f64, f64) {
        let top = (time.start().as_hours() - self.window_start.as_hours()) * self.hour_height_px;
        let height = time.duration_minutes() as f64 / 60.0 * self.hour_height_px;
        (top, height)
    }
}

// ── Output records ────────────────────────────────────────────────────────────

/// Box for one session.  Vertical values in pixels, horizontal in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Geometry {
    pub top_px: f64,
    pub height_px: f64,
    pub left_pct: f64,
    pub width_pct: f64,
}

impl Geometry {
    pub fn right_pct(&self) -> f64 {
        self.left_pct + self.width_pct
    }
}

/// One session's column within its group, with geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub session: Session,
    /// Zero-based column inside the group.
    pub column: usize,
    /// Number of columns the group was split into (the group size).
    pub columns: usize,
    pub geometry: Geometry,
}

/// A placement plus the section color, ready for a view layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedSession {
    #[serde(flatten)]
    pub placement: Placement,
    pub color: Color,
}

/// Result of one full layout pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScheduleLayout {
    /// Placed sessions in day order, then group order, then column order.
    pub sessions: Vec<RenderedSession>,
    /// Number of overlap groups across all days.
    pub group_count: usize,
    /// Records left out of the grid, and why.
    #[serde(serialize_with = "issues_as_text")]
    pub issues: Vec<SessionIssue>,
}

fn issues_as_text<S: Serializer>(issues: &[SessionIssue], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(issues.iter().map(ToString::to_string))
}

impl ScheduleLayout {
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&RenderedSession> {
        self.sessions.iter().find(|r| r.placement.session.id == id)
    }
}

/// Structural view of one group: who is in it and in which column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    pub day: Day,
    pub members: Vec<ColumnAssignment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnAssignment {
    pub id: String,
    pub crn: String,
    pub column: usize,
}

// ── Pure layout functions ─────────────────────────────────────────────────────

/// Members of `group` in column order: start time ascending, ties in input
/// order.
pub fn assign_columns<'a>(group: &OverlapGroup<'a>) -> Vec<&'a Session> {
    let mut ordered = group.sessions().to_vec();
    // `sort_by_key` is stable.
    ordered.sort_by_key(|s| s.time.start());
    ordered
}

/// Place every member of `group` in its column.
pub fn layout_group(group: &OverlapGroup<'_>, geometry: &GridGeometry) -> Vec<Placement> {
    let columns = group.len();
    let width = geometry.day_width_pct / columns as f64;
    let offset = geometry.day_offset_pct(group.day());

    assign_columns(group)
        .into_iter()
        .enumerate()
        .map(|(column, session)| {
            let (top_px, height_px) = geometry.vertical_span(&session.time);
            Placement {
                session: session.clone(),
                column,
                columns,
                geometry: Geometry {
                    top_px,
                    height_px,
                    left_pct: offset + column as f64 * width,
                    width_pct: width,
                },
            }
        })
        .collect()
}

/// Validate `records`, keeping the first valid copy of each id.
///
/// Only valid sessions claim an id, so a rejected record never shadows a
/// later good one.  Returns the valid sessions in input order and one issue
/// per rejected record.
pub fn normalize(records: &[SessionRecord]) -> (Vec<Session>, Vec<SessionIssue>) {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut sessions = Vec::with_capacity(records.len());
    let mut issues = Vec::new();

    for record in records {
        match Session::from_record(record) {
            Ok(session) if seen.insert(record.id.as_str()) => sessions.push(session),
            Ok(_) => issues.push(SessionIssue::DuplicateId {
                id: record.id.clone(),
            }),
            Err(issue) => issues.push(issue),
        }
    }

    (sessions, issues)
}

/// Partition and column indices only; no geometry and no colors.
pub fn structure(records: &[SessionRecord]) -> Vec<GroupSummary> {
    let (sessions, _) = normalize(records);
    let by_day = group_by_day(&sessions);

    by_day
        .values()
        .flatten()
        .map(|group| GroupSummary {
            day: group.day(),
            members: assign_columns(group)
                .into_iter()
                .enumerate()
                .map(|(column, s)| ColumnAssignment {
                    id: s.id.clone(),
                    crn: s.crn.clone(),
                    column,
                })
                .collect(),
        })
        .collect()
}

// ── Full pass ─────────────────────────────────────────────────────────────────

/// Run one complete layout pass over the schedule.
///
/// Everything is recomputed from `records`; only `colors` carries state
/// between passes.  Bad records are reported in
/// [`ScheduleLayout::issues`] and skipped, never failing the pass.
pub fn layout_schedule(
    records: &[SessionRecord],
    geometry: &GridGeometry,
    colors: &mut ColorAllocator,
) -> ScheduleLayout {
    let (sessions, issues) = normalize(records);
    for issue in &issues {
        warn!(session = %issue.session_id(), "{issue}");
    }

    let by_day = group_by_day(&sessions);
    let mut rendered = Vec::with_capacity(sessions.len());
    let mut group_count = 0usize;

    for (day, groups) in &by_day {
        for group in groups {
            group_count += 1;
            debug!(
                day = %day,
                size = group.len(),
                first = %group.sessions()[0].id,
                "laying out overlap group"
            );
            for placement in layout_group(group, geometry) {
                let color = colors.color_for(&placement.session.crn);
                rendered.push(RenderedSession { placement, color });
            }
        }
    }

    info!(
        records = records.len(),
        placed = rendered.len(),
        groups = group_count,
        excluded = issues.len(),
        "layout pass complete"
    );

    ScheduleLayout {
        sessions: rendered,
        group_count,
        issues,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
