//! Plain-text rendering of list views and the dashboard.
//!
//! Everything renders into a `String`; the caller decides where it goes. ANSI
//! styling is applied only when [`RenderOptions::color`] is set.

use crate::domain::DashboardSummary;
use crate::ui::helpers::{bold, clip_ranges, dim, fit, highlight, kept_len, width};
use crate::ui::viewmodel::{EmptyState, ListView, TableView};
use std::fmt::Write as _;

/// Widest a single column may grow.
const MAX_COLUMN_WIDTH: usize = 32;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit ANSI styling.
    pub color: bool,
}

/// Renders one list screen under `title`.
#[must_use]
pub fn render_list(title: &str, view: &ListView, options: RenderOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", bold(title, options.color));

    match view {
        ListView::AuthPending => {
            let _ = writeln!(out, "Checking credentials…");
        }
        ListView::Loading => {
            let _ = writeln!(out, "Loading…");
        }
        ListView::Error { message, retry_hint } => {
            let _ = writeln!(out, "Error: {message}");
            let _ = writeln!(out, "{}", dim(retry_hint, options.color));
        }
        ListView::Empty(empty) | ListView::NoMatches(empty) => render_empty(&mut out, empty, options),
        ListView::Populated(table) => render_table(&mut out, table, options),
    }
    out
}

fn render_empty(out: &mut String, empty: &EmptyState, options: RenderOptions) {
    let _ = writeln!(out, "{}", empty.message);
    let _ = writeln!(out, "{}", dim(&empty.subtitle, options.color));
}

fn column_widths(table: &TableView) -> Vec<usize> {
    table
        .columns
        .iter()
        .enumerate()
        .map(|(index, heading)| {
            table
                .rows
                .iter()
                .filter_map(|row| row.cells.get(index))
                .map(|cell| width(cell))
                .chain(std::iter::once(width(heading)))
                .max()
                .unwrap_or(0)
                .min(MAX_COLUMN_WIDTH)
        })
        .collect()
}

fn render_table(out: &mut String, table: &TableView, options: RenderOptions) {
    let widths = column_widths(table);

    let header: Vec<String> = table
        .columns
        .iter()
        .zip(&widths)
        .map(|(heading, w)| fit(heading, *w))
        .collect();
    let _ = writeln!(out, "  {}", bold(header.join("  ").trim_end(), options.color));

    for row in &table.rows {
        let marker = if row.is_selected { "> " } else { "  " };
        let cells: Vec<String> = row
            .cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(index, (cell, w))| {
                let padded = fit(cell, *w);
                let ranges = row.highlights.get(index).map_or(&[][..], Vec::as_slice);
                highlight(&padded, &clip_ranges(ranges, kept_len(cell, *w)), options.color)
            })
            .collect();
        let _ = writeln!(out, "{marker}{}", cells.join("  ").trim_end());
    }

    let _ = writeln!(out, "{}", dim(&table.summary, options.color));
}

/// Renders the dashboard summary as a short report.
#[must_use]
pub fn render_dashboard(summary: &DashboardSummary, options: RenderOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", bold("Dashboard", options.color));
    let _ = writeln!(out, "Total pumps: {}", summary.total_pumps);

    if !summary.by_status.is_empty() {
        let _ = writeln!(out, "\nBy status:");
        for (status, count) in &summary.by_status {
            let _ = writeln!(
                out,
                "  {}  {count:>5}  ({:.1}%)",
                fit(status, 16),
                summary.status_share(status)
            );
        }
    }

    if !summary.by_institution.is_empty() {
        let _ = writeln!(out, "\nBy institution:");
        for (institution, count) in &summary.by_institution {
            let _ = writeln!(out, "  {}  {count:>5}", fit(institution, 24));
        }
    }
    out
}
