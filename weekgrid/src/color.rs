/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Per-section color allocation.
//!
//! [`ColorAllocator`] hands out one palette color per CRN and takes it back
//! when the section is dropped.  It is the only stateful piece of the layout
//! pipeline; grouping and column placement are pure functions.
//!
//! # Pool semantics
//!
//! ```text
//! palette  [c0 c1 c2 … cN-1]           fixed
//! pool     front ─► [c3 c4 … ] ◄─ back  unused colors
//!
//! color_for(new crn)  pop_front; refill with the whole palette when empty
//! release(crn)        push_back
//! ```
//!
//! Once more CRNs are live than the palette has colors, the refill hands out
//! colors that are already in use.  Colliding colors are accepted in that case.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::debug;

// ── Color ─────────────────────────────────────────────────────────────────────

/// An sRGB color, rendered as the CSS string `rgb(r, g, b)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The string is neither `rgb(r, g, b)` nor `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color '{0}' (expected \"rgb(r, g, b)\" or \"#rrggbb\")")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let trimmed = s.trim();

        if let Some(hex) = trimmed.strip_prefix('#') {
            if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(err());
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
            return Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?));
        }

        let inner = trimmed
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(err)?;
        let channels = inner
            .split(',')
            .map(|part| part.trim().parse::<u8>().map_err(|_| err()))
            .collect::<Result<Vec<u8>, _>>()?;
        match channels.as_slice() {
            [r, g, b] => Ok(Color::rgb(*r, *g, *b)),
            _ => Err(err()),
        }
    }
}

/// The twelve colors the course grid has always used, in allocation order.
pub const DEFAULT_PALETTE: [Color; 12] = [
    Color::rgb(252, 161, 241),
    Color::rgb(91, 150, 210),
    Color::rgb(115, 44, 196),
    Color::rgb(135, 147, 61),
    Color::rgb(178, 168, 144),
    Color::rgb(196, 145, 145),
    Color::rgb(53, 118, 161),
    Color::rgb(184, 114, 106),
    Color::rgb(17, 47, 137),
    Color::rgb(27, 176, 139),
    Color::rgb(175, 217, 239),
    Color::rgb(114, 203, 180),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("color palette must contain at least one color")]
    Empty,
}

// ── ColorAllocator ────────────────────────────────────────────────────────────

/// CRN → color map plus the pool of currently unused colors.
#[derive(Debug, Clone)]
pub struct ColorAllocator {
    /// Never empty.
    palette: Vec<Color>,
    pool: VecDeque<Color>,
    assigned: HashMap<String, Color>,
}

impl Default for ColorAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorAllocator {
    /// Allocator over [`DEFAULT_PALETTE`].
    pub fn new() -> Self {
        Self::from_nonempty(DEFAULT_PALETTE.to_vec())
    }

    /// Allocator over a custom palette.
    ///
    /// # Errors
    /// [`PaletteError::Empty`] if `palette` has no colors.
    pub fn with_palette(palette: Vec<Color>) -> Result<Self, PaletteError> {
        if palette.is_empty() {
            return Err(PaletteError::Empty);
        }
        Ok(Self::from_nonempty(palette))
    }

    fn from_nonempty(palette: Vec<Color>) -> Self {
        Self {
            pool: palette.iter().copied().collect(),
            palette,
            assigned: HashMap::new(),
        }
    }

    /// Color for `crn`, allocating one from the pool on first sight.
    ///
    /// Repeated calls without an intervening [`release`](Self::release)
    /// return the same color.
    pub fn color_for(&mut self, crn: &str) -> Color {
        if let Some(color) = self.assigned.get(crn) {
            return *color;
        }

        if self.pool.is_empty() {
            debug!(
                palette = self.palette.len(),
                live = self.assigned.len(),
                "color pool exhausted, cycling palette again"
            );
            self.pool.extend(self.palette.iter().copied());
        }

        let color = self.pool.pop_front().unwrap_or(self.palette[0]);
        debug!(crn, color = %color, "assigned color");
        self.assigned.insert(crn.to_string(), color);
        color
    }

    /// Drop the assignment for `crn` and return its color to the pool.
    ///
    /// Returns the freed color, or `None` (and does nothing) if `crn` had no
    /// assignment.
    pub fn release(&mut self, crn: &str) -> Option<Color> {
        let color = self.assigned.remove(crn)?;
        self.pool.push_back(color);
        debug!(crn, color = %color, "released color");
        Some(color)
    }

    /// Release every assignment whose CRN is not in `live`.
    ///
    /// Stale CRNs are released in sorted order so the resulting pool order
    /// does not depend on hash iteration.  Returns how many were released.
    pub fn release_absent<'a, I>(&mut self, live: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let live: HashSet<&str> = live.into_iter().collect();
        let mut stale: Vec<String> = self
            .assigned
            .keys()
            .filter(|crn| !live.contains(crn.as_str()))
            .cloned()
            .collect();
        stale.sort();

        for crn in &stale {
            self.release(crn);
        }
        stale.len()
    }

    /// Current color of `crn` without allocating.
    pub fn assigned(&self, crn: &str) -> Option<Color> {
        self.assigned.get(crn).copied()
    }

    /// Number of CRNs holding a color.
    pub fn live_count(&self) -> usize {
        self.assigned.len()
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    /// Colors currently waiting in the pool, front first.
    pub fn unused(&self) -> impl Iterator<Item = Color> + '_ {
        self.pool.iter().copied()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
