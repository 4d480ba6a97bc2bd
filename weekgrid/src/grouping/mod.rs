//! Overlap grouping.
//!
//! Sessions on one day are nodes of an undirected graph with an edge wherever
//! two time ranges overlap (strictly, see [`TimeRange::overlaps`]).  An
//! [`OverlapGroup`] is one connected component of that graph, so a chain
//! `A–B–C` lands in one group even when `A` and `C` never meet.
//!
//! # Complexity
//! Edges are found by testing all `n·(n−1)/2` pairs and merged with a
//! [`DisjointSet`].  That is quadratic, which is fine for a weekly course
//! load (tens of sessions per day at most).
//!
//! # Determinism
//! Groups are returned in order of their first member's input position, and
//! members keep their input order.  Column layout relies on this for stable
//! tie-breaking.
//!
//! [`TimeRange::overlaps`]: crate::session::TimeRange::overlaps

pub mod disjoint_set;

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use crate::session::{Day, Session};
use disjoint_set::DisjointSet;

// ── OverlapGroup ──────────────────────────────────────────────────────────────

/// A maximal overlap-connected set of sessions on one day.
///
/// Never empty.  Recomputed on every pass; nothing about it is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapGroup<'a> {
    day: Day,
    sessions: Vec<&'a Session>,
}

impl<'a> OverlapGroup<'a> {
    pub fn day(&self) -> Day {
        self.day
    }

    /// Members in input order.
    pub fn sessions(&self) -> &[&'a Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.iter().any(|s| s.id == id)
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Partition the sessions of a single `day` into overlap groups.
///
/// Sessions whose `day` differs from `day` are ignored with a warning; use
/// [`group_by_day`] for a mixed list.
pub fn group_day<'a>(day: Day, sessions: &[&'a Session]) -> Vec<OverlapGroup<'a>> {
    let members: Vec<&'a Session> = sessions
        .iter()
        .copied()
        .filter(|s| {
            let same_day = s.day == day;
            if !same_day {
                warn!(session = %s.id, expected = %day, actual = %s.day, "session passed for the wrong day, ignoring");
            }
            same_day
        })
        .collect();

    let n = members.len();
    let mut sets = DisjointSet::new(n);
    for i in 0..n {
        for j in (i + 1)..n {
            if members[i].time.overlaps(&members[j].time) {
                sets.union(i, j);
            }
        }
    }

    // root → position in `groups`, assigned in first-seen order
    let mut slot_of_root: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<OverlapGroup<'a>> = Vec::new();
    for (i, session) in members.iter().copied().enumerate() {
        let root = sets.find(i);
        let slot = *slot_of_root.entry(root).or_insert_with(|| {
            groups.push(OverlapGroup {
                day,
                sessions: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].sessions.push(session);
    }

    debug!(
        day = %day,
        sessions = n,
        groups = groups.len(),
        "grouped day"
    );
    groups
}

/// Split `sessions` by day and group each day independently.
///
/// Days with no sessions are absent from the map.  `BTreeMap` keeps the days
/// in Monday → Friday order.
pub fn group_by_day(sessions: &[Session]) -> BTreeMap<Day, Vec<OverlapGroup<'_>>> {
    let mut by_day: BTreeMap<Day, Vec<&Session>> = BTreeMap::new();
    for session in sessions {
        by_day.entry(session.day).or_default().push(session);
    }

    by_day
        .into_iter()
        .map(|(day, day_sessions)| (day, group_day(day, &day_sessions)))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
