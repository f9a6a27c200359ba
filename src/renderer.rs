//! # Illumination Chart Rendering
//!
//! Renders the Moon's illuminated fraction around an anchor instant as an ASCII
//! chart for the terminal. The anchor sits in the middle column, marked `X`, and
//! principal phases falling inside the chart are marked on a line beneath it.
//!
//! ```text
//! 100%│              ••••X•••
//!     │          ••••        ••••
//!  50%│      ••••                ••••
//!     │  ••••                        ••••
//!   0%│••                                ••
//!          N           1     F           3
//!     -15d             Now             +15d
//! ```

use crate::angle::illuminated_fraction;
use crate::calendar::PhaseEvent;
use crate::config::ChartConfig;
use crate::phase::PhaseKind;
use crate::search::PhaseError;
use crate::Instant;
use chrono::Duration;
use tracing::warn;

/// Samples per day; one column each.
const SAMPLES_PER_DAY: i64 = 2;
const Y_AXIS_WIDTH: usize = 5; // Space for Y-axis labels
const MIN_ROWS: usize = 3;

/// Widest chart drawn, in days each side of the anchor.
pub const MAX_DAYS_EACH_SIDE: i64 = 366;

/// One column of the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IlluminationSample {
    pub at: Instant,
    /// Illuminated fraction, `0..=1`
    pub fraction: f64,
}

/// Illuminated fraction sampled evenly on both sides of an anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct IlluminationChart {
    pub anchor: Instant,
    pub days_each_side: i64,
    pub rows: usize,
    pub samples: Vec<IlluminationSample>,
    start: Instant,
    end: Instant,
}

impl IlluminationChart {
    /// Sample the chart window around `anchor`.
    ///
    /// `days_each_side` is clamped to `1..=MAX_DAYS_EACH_SIDE` and at least three
    /// rows are drawn.
    pub fn around(anchor: Instant, config: &ChartConfig) -> Result<Self, PhaseError> {
        let days_each_side = config.days_each_side.clamp(1, MAX_DAYS_EACH_SIDE);
        if days_each_side != config.days_each_side {
            warn!(
                requested = config.days_each_side,
                days_each_side, "chart width out of range, clamped"
            );
        }
        let span = Duration::try_days(days_each_side).ok_or(PhaseError::OutOfRange(anchor))?;
        let step = Duration::hours(24 / SAMPLES_PER_DAY);
        let start = anchor
            .checked_sub_signed(span)
            .ok_or(PhaseError::OutOfRange(anchor))?;
        let end = anchor
            .checked_add_signed(span)
            .ok_or(PhaseError::OutOfRange(anchor))?;

        let columns = 2 * days_each_side * SAMPLES_PER_DAY + 1;
        let samples = (0..columns as i32)
            .map(|column| {
                let at = start + step * column;
                IlluminationSample {
                    at,
                    fraction: illuminated_fraction(at),
                }
            })
            .collect();

        Ok(IlluminationChart {
            anchor,
            days_each_side,
            rows: config.rows.max(MIN_ROWS),
            samples,
            start,
            end,
        })
    }

    /// First instant covered by the chart.
    pub fn start(&self) -> Instant {
        self.start
    }

    /// Last instant covered by the chart.
    pub fn end(&self) -> Instant {
        self.end
    }

    fn fraction_to_row(&self, fraction: f64) -> usize {
        let fraction = fraction.clamp(0.0, 1.0);
        ((1.0 - fraction) * (self.rows as f64 - 1.0)).round() as usize
    }

    /// Column of `at`, or `None` if it falls outside the chart.
    fn column_of(&self, at: Instant) -> Option<usize> {
        let minutes_per_column = (24 * 60 / SAMPLES_PER_DAY) as f64;
        let offset = (at - self.start()).num_minutes() as f64 / minutes_per_column;
        let column = offset.round();
        if column < 0.0 || column as usize >= self.samples.len() {
            None
        } else {
            Some(column as usize)
        }
    }

    /// Draw the chart, marking whichever of `events` fall inside it.
    pub fn render(&self, events: &[PhaseEvent]) -> String {
        let sample_count = self.samples.len();
        let mut grid = vec![vec![' '; sample_count + Y_AXIS_WIDTH]; self.rows];

        // Y-axis: full, half and none
        for (fraction, label) in [(1.0, "100%"), (0.5, " 50%"), (0.0, "  0%")] {
            let row = self.fraction_to_row(fraction);
            for (i, ch) in label.chars().enumerate() {
                grid[row][i] = ch;
            }
        }
        for row in grid.iter_mut() {
            row[Y_AXIS_WIDTH - 1] = '│';
        }

        // Plot illumination with the anchor at the center of the chart
        let center_index = sample_count / 2;
        for (column, sample) in self.samples.iter().enumerate() {
            let row = self.fraction_to_row(sample.fraction);
            grid[row][column + Y_AXIS_WIDTH] = if column == center_index { 'X' } else { '•' };
        }

        let mut lines: Vec<String> = grid
            .into_iter()
            .map(|row| row.into_iter().collect::<String>())
            .collect();

        // Phase markers below the chart
        let mut markers = vec![' '; sample_count];
        for event in events {
            if let Some(column) = self.column_of(event.at) {
                markers[column] = marker(event.kind);
            }
        }
        let padding = " ".repeat(Y_AXIS_WIDTH);
        lines.push(format!("{}{}", padding, markers.into_iter().collect::<String>()).trim_end().to_string());

        // Time labels, with "Now" centered under the X marker
        let now_text = "Now";
        let now_offset = now_text.len() / 2;
        let left_width = center_index.saturating_sub(now_offset);
        let right_width = (sample_count + now_offset).saturating_sub(center_index + now_text.len());
        let left_part = format!("{:<width$}", format!("-{}d", self.days_each_side), width = left_width);
        let right_part = format!("{:>width$}", format!("+{}d", self.days_each_side), width = right_width);
        lines.push(format!("{}{}{}{}", padding, left_part, now_text, right_part));

        lines.join("\n")
    }
}

/// Single-character marker used under the chart.
pub fn marker(kind: PhaseKind) -> char {
    match kind {
        PhaseKind::New => 'N',
        PhaseKind::FirstQuarter => '1',
        PhaseKind::Full => 'F',
        PhaseKind::LastQuarter => '3',
    }
}
