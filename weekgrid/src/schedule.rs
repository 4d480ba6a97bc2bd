/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The user's schedule and the add/drop/relayout cycle around it.
//!
//! [`Schedule`] is a plain ordered collection of [`SessionRecord`]s.  It does
//! no validation: records with unknown days or malformed times stay in it so
//! the list view can still show them, and only the grid pass drops them.
//!
//! [`Planner`] ties a schedule to a [`ColorAllocator`] and a
//! [`GridGeometry`].  Every mutation is followed by a full
//! [`layout`](Planner::layout); nothing is diffed incrementally.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::color::{ColorAllocator, PaletteError};
use crate::config::GridConfig;
use crate::layout::{layout_schedule, GridGeometry, ScheduleLayout};
use crate::session::SessionRecord;

// ── Schedule ──────────────────────────────────────────────────────────────────

/// Sessions the user has added, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    records: Vec<SessionRecord>,
}

/// All sessions of one CRN, for the list view.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledSection<'a> {
    pub crn: &'a str,
    /// Course code of the first session seen for this CRN.
    pub code: &'a str,
    /// Instructor of the first session seen for this CRN.
    pub instructor: &'a str,
    pub sessions: Vec<&'a SessionRecord>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap records as-is (duplicates included; the layout pass flags them).
    pub fn from_records(records: Vec<SessionRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Add every record whose `id` is not already present.  Returns how many
    /// were added.
    pub fn add_sessions<I>(&mut self, parts: I) -> usize
    where
        I: IntoIterator<Item = SessionRecord>,
    {
        let mut added = 0;
        for part in parts {
            if self.records.iter().any(|r| r.id == part.id) {
                debug!(id = %part.id, "session already in schedule");
                continue;
            }
            self.records.push(part);
            added += 1;
        }
        added
    }

    /// Remove every record of `crn`.  Returns how many were removed.
    pub fn drop_crn(&mut self, crn: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.crn != crn);
        before - self.records.len()
    }

    pub fn contains_crn(&self, crn: &str) -> bool {
        self.records.iter().any(|r| r.crn == crn)
    }

    /// `true` if any of `parts` (matched by id) is already scheduled.
    pub fn contains_any(&self, parts: &[SessionRecord]) -> bool {
        parts
            .iter()
            .any(|p| self.records.iter().any(|r| r.id == p.id))
    }

    /// Distinct CRNs in first-seen order.
    pub fn crns(&self) -> Vec<&str> {
        self.sections().into_iter().map(|s| s.crn).collect()
    }

    /// Records grouped by CRN, sections in first-seen order.
    pub fn sections(&self) -> Vec<ScheduledSection<'_>> {
        let mut slot: HashMap<&str, usize> = HashMap::new();
        let mut sections: Vec<ScheduledSection<'_>> = Vec::new();
        for record in &self.records {
            let i = *slot.entry(record.crn.as_str()).or_insert_with(|| {
                sections.push(ScheduledSection {
                    crn: &record.crn,
                    code: &record.code,
                    instructor: &record.instructor,
                    sessions: Vec::new(),
                });
                sections.len() - 1
            });
            sections[i].sessions.push(record);
        }
        sections
    }

    /// Read a YAML list of records.  A missing or empty file is an empty
    /// schedule.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No schedule at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open schedule file: {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Self::new());
        }

        let records: Vec<SessionRecord> = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?;
        info!("Loaded {} session(s) from {}", records.len(), path.display());
        Ok(Self::from_records(records))
    }

    /// Write the schedule as a YAML list of records.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(&self.records).context("Failed to serialise schedule")?;
        std::fs::write(path, content)
            .with_context(|| format!("Cannot write schedule file: {}", path.display()))?;
        info!("Saved {} session(s) to {}", self.records.len(), path.display());
        Ok(())
    }
}

// ── Planner ───────────────────────────────────────────────────────────────────

/// Schedule + color state + grid dimensions.
#[derive(Debug, Clone)]
pub struct Planner {
    schedule: Schedule,
    colors: ColorAllocator,
    geometry: GridGeometry,
}

impl Planner {
    pub fn new(schedule: Schedule, colors: ColorAllocator, geometry: GridGeometry) -> Self {
        Self {
            schedule,
            colors,
            geometry,
        }
    }

    /// # Errors
    /// [`PaletteError::Empty`] if the configured palette is empty.
    pub fn from_config(schedule: Schedule, config: &GridConfig) -> Result<Self, PaletteError> {
        let colors = ColorAllocator::with_palette(config.palette.clone())?;
        Ok(Self::new(schedule, colors, config.geometry.clone()))
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn colors(&self) -> &ColorAllocator {
        &self.colors
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Add a section's sessions (those not already present).
    pub fn add_section(&mut self, parts: Vec<SessionRecord>) -> usize {
        let added = self.schedule.add_sessions(parts);
        info!(added, total = self.schedule.len(), "section added");
        added
    }

    /// Drop all sessions of `crn` and hand its color back to the pool.
    ///
    /// The color is released once, and only if something was removed.
    pub fn drop_section(&mut self, crn: &str) -> usize {
        let removed = self.schedule.drop_crn(crn);
        if removed > 0 {
            self.colors.release(crn);
        }
        info!(crn, removed, total = self.schedule.len(), "section dropped");
        removed
    }

    /// Recompute the whole grid.
    pub fn layout(&mut self) -> ScheduleLayout {
        layout_schedule(self.schedule.records(), &self.geometry, &mut self.colors)
    }

    pub fn into_schedule(self) -> Schedule {
        self.schedule
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::session::fixtures::record;
    use tempfile::TempDir;

    const RED: Color = Color::rgb(255, 0, 0);
    const GREEN: Color = Color::rgb(0, 255, 0);

    fn two_color_planner(schedule: Schedule) -> Planner {
        let colors = ColorAllocator::with_palette(vec![RED, GREEN]).unwrap();
        Planner::new(schedule, colors, GridGeometry::default())
    }

    // ── Schedule ──────────────────────────────────────────────────────────────

    #[test]
    fn add_skips_ids_already_present() {
        let mut schedule = Schedule::new();
        assert_eq!(
            schedule.add_sessions(vec![
                record("1", "100", "Monday", "09:00", "10:00"),
                record("2", "100", "Wednesday", "09:00", "10:00"),
            ]),
            2
        );
        assert_eq!(
            schedule.add_sessions(vec![record("2", "100", "Wednesday", "09:00", "10:00")]),
            0
        );
        assert_eq!(schedule.len(), 2);
    }

    #[test]
    fn drop_removes_every_session_of_the_crn() {
        let mut schedule = Schedule::from_records(vec![
            record("1", "100", "Monday", "09:00", "10:00"),
            record("2", "200", "Monday", "11:00", "12:00"),
            record("3", "100", "Thursday", "09:00", "10:00"),
        ]);
        assert_eq!(schedule.drop_crn("100"), 2);
        assert!(!schedule.contains_crn("100"));
        assert_eq!(schedule.drop_crn("100"), 0);
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn sections_group_by_crn_in_first_seen_order() {
        let schedule = Schedule::from_records(vec![
            record("1", "200", "Monday", "09:00", "10:00"),
            record("2", "100", "Monday", "11:00", "12:00"),
            record("3", "200", "Saturday", "09:00", "10:00"),
        ]);
        let sections = schedule.sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].crn, "200");
        assert_eq!(sections[0].code, "CRS 200");
        // Unknown-day session is still listed.
        assert_eq!(sections[0].sessions.len(), 2);
        assert_eq!(schedule.crns(), ["200", "100"]);
    }

    #[test]
    fn contains_any_matches_by_id() {
        let schedule = Schedule::from_records(vec![record("1", "100", "Monday", "09:00", "10:00")]);
        assert!(schedule.contains_any(&[record("1", "100", "Monday", "09:00", "10:00")]));
        assert!(!schedule.contains_any(&[record("9", "100", "Monday", "09:00", "10:00")]));
    }

    #[test]
    fn save_then_load_preserves_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schedule.yaml");
        let mut original = Schedule::new();
        let mut lab = record("2", "100", "Perşembe", "13:30", "15:20");
        lab.building = "EEB".to_string();
        original.add_sessions(vec![record("1", "100", "Monday", "09:00", "10:00"), lab]);

        original.save_to_file(&path).unwrap();
        let loaded = Schedule::load_from_file(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn missing_schedule_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let loaded = Schedule::load_from_file(&dir.path().join("absent.yaml")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn malformed_schedule_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "- id: [unterminated").unwrap();
        assert!(Schedule::load_from_file(&path).is_err());
    }

    // ── Planner ───────────────────────────────────────────────────────────────

    #[test]
    fn drop_releases_the_color_for_reuse() {
        let mut planner = two_color_planner(Schedule::new());
        planner.add_section(vec![record("1", "100", "Monday", "09:00", "10:00")]);
        planner.add_section(vec![record("2", "200", "Monday", "09:30", "10:30")]);
        let layout = planner.layout();
        assert_eq!(layout.get("1").unwrap().color, RED);
        assert_eq!(layout.get("2").unwrap().color, GREEN);

        assert_eq!(planner.drop_section("100"), 1);
        assert_eq!(planner.colors().assigned("100"), None);

        planner.add_section(vec![record("3", "300", "Tuesday", "09:00", "10:00")]);
        let layout = planner.layout();
        assert_eq!(layout.get("3").unwrap().color, RED);
        assert_eq!(layout.get("2").unwrap().color, GREEN);
        // Survivor now has the full day column.
        assert_eq!(layout.get("2").unwrap().placement.columns, 1);
    }

    #[test]
    fn planner_edits_persist_without_a_layout_pass() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schedule.yaml");
        let mut planner = two_color_planner(Schedule::from_records(vec![record(
            "1", "100", "Monday", "09:00", "10:00",
        )]));
        planner.add_section(vec![record("2", "200", "Tuesday", "09:00", "10:00")]);
        planner.drop_section("100");
        planner.into_schedule().save_to_file(&path).unwrap();

        let loaded = Schedule::load_from_file(&path).unwrap();
        assert_eq!(loaded.crns(), ["200"]);
    }

    #[test]
    fn dropping_an_absent_crn_leaves_colors_alone() {
        let mut planner = two_color_planner(Schedule::new());
        planner.add_section(vec![record("1", "100", "Monday", "09:00", "10:00")]);
        planner.layout();
        assert_eq!(planner.drop_section("999"), 0);
        assert_eq!(planner.colors().live_count(), 1);
    }

    #[test]
    fn from_config_uses_the_configured_palette() {
        let config = GridConfig {
            palette: vec![GREEN],
            ..GridConfig::default()
        };
        let mut planner = Planner::from_config(Schedule::new(), &config).unwrap();
        planner.add_section(vec![record("1", "100", "Monday", "09:00", "10:00")]);
        assert_eq!(planner.layout().sessions[0].color, GREEN);
    }

    #[test]
    fn from_config_rejects_empty_palette() {
        let config = GridConfig {
            palette: Vec::new(),
            ..GridConfig::default()
        };
        assert!(Planner::from_config(Schedule::new(), &config).is_err());
    }
}
