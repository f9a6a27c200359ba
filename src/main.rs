//! # Moon Phase Application Entry Point
//!
//! Prints the upcoming principal moon phases after an anchor instant, as text or
//! JSON, with an optional ASCII illumination chart around the anchor.
//!
//! ```text
//! moon-phase --from 2024-01-01T00:00:00Z --count 4
//! moon-phase --phase full --phase new --json
//! moon-phase --chart --verbose
//! ```

use anyhow::{bail, Context};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use clap::Parser;
use moon_phase_lib::config::{Config, CONFIG_FILE};
use moon_phase_lib::renderer::IlluminationChart;
use moon_phase_lib::{
    illuminated_fraction, moon_angle, phases_between, upcoming_phases_of, Instant, PhaseEvent,
    PhaseKind,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "moon-phase",
    version,
    about = "Find the next new, first quarter, full and last quarter moons"
)]
struct Args {
    /// Anchor instant in RFC 3339, e.g. 2024-01-01T00:00:00Z (default: now)
    #[arg(long)]
    from: Option<String>,

    /// Only list these phases: new, first-quarter, full, last-quarter
    #[arg(long = "phase")]
    phases: Vec<PhaseKind>,

    /// Number of events to list
    #[arg(long, short = 'n')]
    count: Option<usize>,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,

    /// Draw the illumination chart around the anchor
    #[arg(long)]
    chart: bool,

    /// Configuration file
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Log search details to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output document.
#[derive(Serialize)]
struct Report {
    anchor: Instant,
    moon_angle: f64,
    illuminated_fraction: f64,
    events: Vec<PhaseEvent>,
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install log subscriber")?;

    let config = Config::load_from_path(&args.config);
    check_time_format(&config.output.time_format)?;

    let anchor = match &args.from {
        Some(text) => DateTime::parse_from_rfc3339(text)
            .with_context(|| format!("invalid --from instant {text:?}, expected RFC 3339"))?,
        None => Local::now().fixed_offset(),
    };
    let output_offset = config.output.offset();

    let kinds = if args.phases.is_empty() {
        config.calendar.phases.clone()
    } else {
        args.phases.clone()
    };
    let count = args.count.unwrap_or(config.calendar.count);
    debug!(%anchor, ?kinds, count, "listing phases");

    let events: Vec<PhaseEvent> = upcoming_phases_of(anchor, &kinds, count)
        .with_context(|| format!("phase search failed after {anchor}"))?
        .into_iter()
        .map(|event| match output_offset {
            Some(offset) => event.with_offset(offset),
            None => event,
        })
        .collect();
    // printed in the configured offset, searched in the caller's
    let shown_anchor = match output_offset {
        Some(offset) => anchor.with_timezone(&offset),
        None => anchor,
    };

    if args.json || config.output.json {
        let report = Report {
            anchor: shown_anchor,
            moon_angle: moon_angle(anchor),
            illuminated_fraction: illuminated_fraction(anchor),
            events,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        if args.chart {
            eprintln!("Chart is not drawn in JSON mode");
        }
        return Ok(());
    }

    print_text(shown_anchor, &events, &config.output.time_format);

    if args.chart {
        let chart = IlluminationChart::around(anchor, &config.chart)
            .context("anchor too close to the supported date range for a chart")?;
        let marked = phases_between(chart.start(), chart.end(), &PhaseKind::ALL)
            .context("phase search failed while drawing the chart")?;
        println!();
        println!("{}", chart.render(&marked));
    }

    Ok(())
}

fn print_text(anchor: Instant, events: &[PhaseEvent], time_format: &str) {
    println!(
        "Moon at {}: angle {:.1}°, {:.1}% lit",
        anchor.format(time_format),
        moon_angle(anchor),
        100.0 * illuminated_fraction(anchor)
    );
    if events.is_empty() {
        println!("No phases selected");
        return;
    }
    for event in events {
        println!("  {:<14} {}", event.kind.to_string(), event.at.format(time_format));
    }
}

/// Reject format strings chrono cannot render; formatting them later would panic.
fn check_time_format(time_format: &str) -> anyhow::Result<()> {
    if StrftimeItems::new(time_format).any(|item| matches!(item, Item::Error)) {
        bail!("invalid time_format {time_format:?} in configuration");
    }
    Ok(())
}
