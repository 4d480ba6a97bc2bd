/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Course catalog index.
//!
//! A flat list of catalog sessions is indexed three levels deep:
//!
//! ```text
//! subject prefix ──► course title ──► CRN ──► Vec<SessionRecord>
//!    "BLG"            "BLG 231E - Digital Circuits"   "21345"
//! ```
//!
//! The prefix is the first whitespace-separated token of `code`; the title is
//! `"{code} - {name}"`.  All levels are `BTreeMap`s, so listings come out
//! sorted without further work.
//!
//! The catalog is read-only from the layout's point of view: it is only used
//! to find the sessions of a section before adding them to a
//! [`Schedule`](crate::schedule::Schedule).

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::session::{Day, SessionRecord};

type SectionMap = BTreeMap<String, Vec<SessionRecord>>;
type TitleMap = BTreeMap<String, SectionMap>;

/// Placeholder title suffix when a course has no name.
const UNNAMED_COURSE: &str = "N/A";

// ── Catalog ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    subjects: BTreeMap<String, TitleMap>,
    session_count: usize,
}

impl Catalog {
    /// Index `records`.  Records without a CRN or a course code are skipped
    /// with a warning.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = SessionRecord>,
    {
        let mut catalog = Self::default();
        let mut skipped = 0usize;

        for record in records {
            if record.crn.trim().is_empty() {
                warn!(id = %record.id, "catalog entry has no CRN, skipping");
                skipped += 1;
                continue;
            }
            let code = record.code.trim().to_string();
            let Some(prefix) = code.split_whitespace().next().map(str::to_string) else {
                warn!(id = %record.id, crn = %record.crn, "catalog entry has no course code, skipping");
                skipped += 1;
                continue;
            };

            let name = record
                .name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or(UNNAMED_COURSE);
            let title = format!("{code} - {name}");

            catalog
                .subjects
                .entry(prefix)
                .or_default()
                .entry(title)
                .or_default()
                .entry(record.crn.clone())
                .or_default()
                .push(record);
            catalog.session_count += 1;
        }

        info!(
            subjects = catalog.subjects.len(),
            sessions = catalog.session_count,
            skipped,
            "catalog indexed"
        );
        catalog
    }

    /// Read a YAML list of catalog records and index it.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading course catalog from: {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open catalog file: {}", path.display()))?;
        let records: Vec<SessionRecord> = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?;
        Ok(Self::from_records(records))
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Number of indexed sessions.
    pub fn session_count(&self) -> usize {
        self.session_count
    }

    /// All subject prefixes, sorted.
    pub fn prefixes(&self) -> Vec<&str> {
        self.subjects.keys().map(String::as_str).collect()
    }

    /// Prefixes containing `filter`, ignoring case.  An empty filter matches
    /// everything.
    pub fn search_prefixes(&self, filter: &str) -> Vec<&str> {
        let needle = filter.trim().to_uppercase();
        self.subjects
            .keys()
            .filter(|p| p.to_uppercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    /// Course titles under `prefix`, sorted.  Empty for an unknown prefix.
    pub fn titles(&self, prefix: &str) -> Vec<&str> {
        self.subjects
            .get(prefix)
            .map(|titles| titles.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// CRN → sessions for one course.
    pub fn sections(&self, prefix: &str, title: &str) -> Option<&SectionMap> {
        self.subjects.get(prefix)?.get(title)
    }

    /// Sessions of `crn`, wherever it is filed.
    pub fn find_crn(&self, crn: &str) -> Option<&[SessionRecord]> {
        self.subjects
            .values()
            .flat_map(|titles| titles.values())
            .find_map(|sections| sections.get(crn))
            .map(Vec::as_slice)
    }
}

// ── SectionSummary ────────────────────────────────────────────────────────────

/// One-line description of a section for pick lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionSummary {
    pub crn: String,
    /// Distinct instructor names in first-seen order.
    pub instructors: Vec<String>,
    pub days: Vec<String>,
    /// `start-end` per session, aligned with `days`.
    pub times: Vec<String>,
    /// `building classroom` per session; blanks omitted.
    pub locations: Vec<String>,
}

impl SectionSummary {
    /// Summarise `parts`, ordering sessions Monday → Friday with unknown days
    /// last.
    pub fn from_parts(crn: &str, parts: &[SessionRecord]) -> Self {
        let mut sorted: Vec<&SessionRecord> = parts.iter().collect();
        sorted.sort_by_key(|p| p.day.parse::<Day>().map_or(Day::ALL.len(), Day::index));

        let days = sorted
            .iter()
            .map(|p| p.day.clone())
            .filter(|d| !d.is_empty())
            .collect();
        let times = sorted
            .iter()
            .map(|p| format!("{}-{}", p.time.start, p.time.end))
            .collect();
        let locations = sorted
            .iter()
            .map(|p| format!("{} {}", p.building, p.classroom).trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();

        let mut instructors: Vec<String> = Vec::new();
        for name in parts
            .iter()
            .flat_map(|p| p.instructor.split(','))
            .map(str::trim)
            .filter(|n| !n.is_empty())
        {
            if !instructors.iter().any(|known| known == name) {
                instructors.push(name.to_string());
            }
        }

        Self {
            crn: crn.to_string(),
            instructors,
            days,
            times,
            locations,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
