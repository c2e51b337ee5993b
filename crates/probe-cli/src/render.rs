// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Text and JSON renderings of a registration result.

use std::fmt::{self, Write as _};
use std::time::Duration;

use comfy_table::Table;
use probe_align::{DropReason, FrameSummary, Registration, ScannerId};
use serde::Serialize;

/// Output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Human-readable report.
    Text,
    /// One JSON object.
    Json,
}

#[derive(Serialize)]
struct PositionRow {
    scanner: ScannerId,
    position: [i64; 3],
}

#[derive(Serialize)]
struct DroppedRow {
    a: ScannerId,
    b: ScannerId,
    reason: String,
}

#[derive(Serialize)]
struct JsonReport {
    root_scanner: ScannerId,
    #[serde(flatten)]
    summary: FrameSummary,
    positions: Vec<PositionRow>,
    dropped_overlaps: Vec<DroppedRow>,
    malformed_scanner_ids: Vec<ScannerId>,
    resolved_overlaps: usize,
    digest: String,
}

fn describe(reason: &DropReason) -> String {
    match reason {
        DropReason::TooFewCorrespondences { found } => {
            format!("too few correspondences ({found})")
        }
        DropReason::Underdetermined { candidates } => {
            format!("underdetermined ({candidates} rotations fit)")
        }
    }
}

fn id_list(ids: impl IntoIterator<Item = ScannerId>) -> String {
    let ids: Vec<String> = ids.into_iter().map(|id| id.to_string()).collect();
    if ids.is_empty() {
        "none".to_owned()
    } else {
        ids.join(", ")
    }
}

/// Renders `reg` in `format`. `elapsed` is printed by the text format only.
pub fn render(reg: &Registration, format: Format, elapsed: Option<Duration>) -> anyhow::Result<String> {
    match format {
        Format::Text => Ok(render_text(reg, elapsed)?),
        Format::Json => render_json(reg),
    }
}

fn render_text(reg: &Registration, elapsed: Option<Duration>) -> Result<String, fmt::Error> {
    let frame = reg.frame();
    let summary = reg.summary();
    let mut out = String::new();
    writeln!(out, "global points: {}", summary.global_point_count)?;
    writeln!(
        out,
        "max scanner distance: {}",
        summary.max_scanner_manhattan_distance
    )?;
    writeln!(
        out,
        "overlaps: {} resolved of {}",
        resolved_overlaps(reg),
        reg.overlaps().len()
    )?;

    let mut table = Table::new();
    table.set_header(vec!["scanner", "x", "y", "z"]);
    for (id, p) in frame.positions() {
        let marker = if *id == frame.root() {
            format!("{id} (root)")
        } else {
            id.to_string()
        };
        table.add_row(vec![
            marker,
            p.x().to_string(),
            p.y().to_string(),
            p.z().to_string(),
        ]);
    }
    writeln!(out, "{table}")?;
    writeln!(
        out,
        "unplaced: {}",
        id_list(summary.unplaced_scanner_ids.iter().copied())
    )?;
    for d in reg.dropped() {
        writeln!(out, "dropped overlap {}-{}: {}", d.a, d.b, describe(&d.reason))?;
    }
    if !reg.malformed().is_empty() {
        writeln!(out, "malformed: {}", id_list(reg.malformed().iter().copied()))?;
    }
    if let Some(t) = elapsed {
        writeln!(out, "elapsed: {:.3} ms", t.as_secs_f64() * 1_000.0)?;
    }
    Ok(out)
}

fn resolved_overlaps(reg: &Registration) -> usize {
    reg.overlaps().iter().filter(|o| o.is_resolved()).count()
}

fn render_json(reg: &Registration) -> anyhow::Result<String> {
    let frame = reg.frame();
    let report = JsonReport {
        root_scanner: frame.root(),
        summary: reg.summary(),
        positions: frame
            .positions()
            .iter()
            .map(|(id, p)| PositionRow {
                scanner: *id,
                position: p.to_array(),
            })
            .collect(),
        dropped_overlaps: reg
            .dropped()
            .iter()
            .map(|d| DroppedRow {
                a: d.a,
                b: d.b,
                reason: describe(&d.reason),
            })
            .collect(),
        malformed_scanner_ids: reg.malformed().to_vec(),
        resolved_overlaps: resolved_overlaps(reg),
        digest: hex::encode(frame.digest()),
    };
    let mut text = serde_json::to_string_pretty(&report)?;
    text.push('\n');
    Ok(text)
}
