/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info, warn};

use weekgrid::catalog::{Catalog, SectionSummary};
use weekgrid::config::GridConfig;
use weekgrid::layout::structure;
use weekgrid::schedule::{Planner, Schedule};

// ── CLI argument definition ───────────────────────────────────────────────────

/// Weekly course grid: overlap grouping, column layout and section colors.
///
/// Example:
///   weekgrid -s my_schedule.yaml -k catalog.yaml add 21345
///   weekgrid -s my_schedule.yaml layout
#[derive(Debug, Parser)]
#[command(name = "weekgrid", about = "Weekly course grid layout", long_about = None)]
struct Cli {
    /// Path to the YAML grid configuration (window, sizes, palette).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Path to the YAML schedule file (list of session records).
    #[arg(short = 's', long = "schedule", default_value = "schedule.yaml")]
    schedule: PathBuf,

    /// Path to the YAML course catalog (needed by `add` and `search`).
    #[arg(short = 'k', long = "catalog")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print geometry and color for every placed session.
    Layout,
    /// Print the overlap groups with column indices only.
    Groups,
    /// Print the schedule grouped by CRN.
    List,
    /// Add every session of a catalog section to the schedule.
    Add { crn: String },
    /// Remove every session of a section from the schedule.
    Drop { crn: String },
    /// Search catalog subject prefixes and list their sections.
    Search { filter: Option<String> },
}

// ── Output shapes ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ListEntry<'a> {
    crn: &'a str,
    code: &'a str,
    instructor: &'a str,
    sessions: usize,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    // Logs go to stderr; stdout carries command output only.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!(
        config   = ?cli.config,
        schedule = %cli.schedule.display(),
        catalog  = ?cli.catalog,
        "Configuration"
    );

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => GridConfig::load_from_file(path)?,
        None => {
            warn!("No grid configuration file provided, using default grid settings");
            GridConfig::default()
        }
    };

    let schedule = Schedule::load_from_file(&cli.schedule)?;
    let mut planner = Planner::from_config(schedule, &config)?;

    match cli.command {
        Command::Layout => {
            let layout = planner.layout();
            print_yaml(&layout)?;
        }
        Command::Groups => {
            print_yaml(&structure(planner.schedule().records()))?;
        }
        Command::List => {
            let entries: Vec<ListEntry<'_>> = planner
                .schedule()
                .sections()
                .into_iter()
                .map(|s| ListEntry {
                    crn: s.crn,
                    code: s.code,
                    instructor: s.instructor,
                    sessions: s.sessions.len(),
                })
                .collect();
            print_yaml(&entries)?;
        }
        Command::Add { crn } => {
            let catalog = load_catalog(cli.catalog.as_deref())?;
            let Some(parts) = catalog.find_crn(&crn) else {
                bail!("CRN {crn} is not in the catalog");
            };
            if planner.schedule().contains_any(parts) {
                info!(crn = %crn, "section already added");
                return Ok(());
            }
            planner.add_section(parts.to_vec());
            planner.into_schedule().save_to_file(&cli.schedule)?;
        }
        Command::Drop { crn } => {
            if planner.drop_section(&crn) == 0 {
                warn!(crn = %crn, "section not in schedule, nothing dropped");
                return Ok(());
            }
            planner.into_schedule().save_to_file(&cli.schedule)?;
        }
        Command::Search { filter } => {
            let catalog = load_catalog(cli.catalog.as_deref())?;
            let mut found: BTreeMap<&str, BTreeMap<&str, Vec<SectionSummary>>> = BTreeMap::new();
            for prefix in catalog.search_prefixes(filter.as_deref().unwrap_or("")) {
                let titles = found.entry(prefix).or_default();
                for title in catalog.titles(prefix) {
                    let summaries = catalog
                        .sections(prefix, title)
                        .map(|sections| {
                            sections
                                .iter()
                                .map(|(crn, parts)| SectionSummary::from_parts(crn, parts))
                                .collect()
                        })
                        .unwrap_or_default();
                    titles.insert(title, summaries);
                }
            }
            print_yaml(&found)?;
        }
    }

    Ok(())
}

fn load_catalog(path: Option<&std::path::Path>) -> Result<Catalog> {
    let path = path.context("this command needs --catalog <FILE>")?;
    Catalog::load_from_file(path)
}

fn print_yaml<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_yaml::to_string(value).context("Failed to serialise output")?;
    print!("{text}");
    Ok(())
}
