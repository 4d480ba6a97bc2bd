/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Data-quality issues found while preparing a layout pass.
//!
//! None of these abort a pass.  The offending record is left out of the grid
//! (or, for [`SessionIssue::DuplicateId`], only its later copies are) and the
//! issue is returned alongside the geometry in
//! [`ScheduleLayout::issues`](super::ScheduleLayout::issues).
//!
//! | Variant | Effect on the grid |
//! |---|---|
//! | `UnparsableTime` | record excluded |
//! | `InvalidInterval` | record excluded |
//! | `UnknownDay` | record excluded (still shown in list views) |
//! | `DuplicateId` | first occurrence kept, later ones excluded |

use thiserror::Error;

use crate::session::{ClockTime, ParseTimeError};

/// Why a single schedule record did not produce grid geometry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionIssue {
    /// Start or end time is not a valid `HH:MM` string.
    #[error("session '{id}': {source}")]
    UnparsableTime { id: String, source: ParseTimeError },

    /// `start >= end`.
    #[error("session '{id}': interval {start}-{end} is empty or reversed")]
    InvalidInterval {
        id: String,
        start: ClockTime,
        end: ClockTime,
    },

    /// The day is not one of Monday–Friday.
    #[error("session '{id}': unknown day '{day}'")]
    UnknownDay { id: String, day: String },

    /// Another record with the same id was already accepted in this pass.
    #[error("session '{id}' appears more than once; only the first copy is placed")]
    DuplicateId { id: String },
}

impl SessionIssue {
    /// Id of the record this issue is about.
    pub fn session_id(&self) -> &str {
        match self {
            SessionIssue::UnparsableTime { id, .. }
            | SessionIssue::InvalidInterval { id, .. }
            | SessionIssue::UnknownDay { id, .. }
            | SessionIssue::DuplicateId { id } => id,
        }
    }
}
