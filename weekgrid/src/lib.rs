/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Weekly course grid layout.
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── session     – Day, ClockTime, TimeRange, SessionRecord → Session
//! ├── grouping/   – overlap groups (connected components per day)
//! ├── layout/     – column placement, geometry, full layout pass
//! ├── color       – per-CRN color allocation with a recycling pool
//! ├── schedule    – the user's schedule and the add/drop Planner
//! ├── catalog     – prefix → title → CRN index of the course catalog
//! └── config/     – YAML grid dimensions and palette
//! ```
//!
//! Data flow for one pass:
//!
//! ```text
//! records ─► normalize ─► group_by_day ─► layout_group (per group) ─► ScheduleLayout
//!                                                    ▲
//!                               ColorAllocator ──────┘ (keyed by CRN)
//! ```

pub mod catalog;
pub mod color;
pub mod config;
pub mod grouping;
pub mod layout;
pub mod schedule;
pub mod session;
