//! Output rendering for the analyse command.
//!
//! Supports `human` (default) and `json` outputs. The human form is a
//! Type / Core / To Check table followed by parse warnings, theme update
//! results and a summary; the JSON form carries the same data plus a
//! top-level summary object.

use crate::analyse::{AnalyseReport, ThemeUpdate};
use crate::apply::HunkStatus;
use crate::utils::{self, use_colors};
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

const HEADERS: [&str; 3] = ["Type", "Core", "To Check"];

/// Print an analysis report in the requested format.
pub fn print_report(report: &AnalyseReport, output: &str) {
    match output {
        "json" => match serde_json::to_string_pretty(&compose_report_json(report)) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("{} cannot encode report: {}", utils::error_prefix(), e),
        },
        _ => {
            let color = use_colors(output);
            for f in &report.failures {
                let path = f.path.as_deref().unwrap_or("<unknown>");
                eprintln!(
                    "{} {} (patch line {}): {}",
                    utils::warn_prefix(),
                    path,
                    f.line,
                    f.error
                );
            }
            for line in render_table(report).iter() {
                println!("{}", line);
            }
            for u in &report.updates {
                println!("{}", render_update(u, color));
            }
            let s = &report.summary;
            let mut summary = format!(
                "— Summary — files={} skipped={} findings={} parse_failures={}",
                s.files, s.skipped, s.findings, s.parse_failures
            );
            if !report.updates.is_empty() {
                summary.push_str(&format!(
                    " hunks_applied={} hunks_rejected={}",
                    s.hunks_applied, s.hunks_rejected
                ));
            }
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
            if s.findings > 0 {
                println!(
                    "{} You should review the above {} items alongside {}",
                    utils::note_prefix(),
                    s.findings,
                    report.residual
                );
            }
        }
    }
}

/// Table rows padded to column width; header and separator first.
pub fn render_table(report: &AnalyseReport) -> Vec<String> {
    let rows: Vec<[&str; 3]> = report
        .findings
        .iter()
        .map(|f| {
            [
                f.kind.label.as_str(),
                f.source_file.as_str(),
                f.overriding_location.as_str(),
            ]
        })
        .collect();
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }
    let fmt_row = |cells: &[&str; 3]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect();
        format!("| {} |", padded.join(" | "))
    };
    let rule = format!(
        "+{}+",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );
    let mut out = vec![rule.clone(), fmt_row(&HEADERS), rule.clone()];
    out.extend(rows.iter().map(fmt_row));
    out.push(rule);
    out
}

fn render_update(u: &ThemeUpdate, color: bool) -> String {
    if let Some(err) = &u.error {
        return format!("{} {}: {}", utils::warn_prefix(), u.file, err);
    }
    let applied = u
        .hunks
        .iter()
        .filter(|h| matches!(h.status, HunkStatus::Applied { .. }))
        .count();
    let label = if u.wrote {
        "theme updated:"
    } else {
        "theme unchanged:"
    };
    let label = match (color, u.wrote) {
        (true, true) => label.green().bold().to_string(),
        (true, false) => label.yellow().bold().to_string(),
        (false, _) => label.to_string(),
    };
    let mut line = format!(
        "{} {} ({}/{} hunks applied)",
        label,
        u.file,
        applied,
        u.hunks.len()
    );
    for h in &u.hunks {
        match &h.status {
            HunkStatus::Applied { fuzz_used, line: at } if *fuzz_used > 0 => {
                line.push_str(&format!(
                    "\n    hunk -{} applied at line {} with fuzz {}",
                    h.old_start, at, fuzz_used
                ));
            }
            HunkStatus::Applied { .. } => {}
            HunkStatus::Rejected { reason } => {
                line.push_str(&format!("\n    hunk -{} rejected: {}", h.old_start, reason));
            }
        }
    }
    line
}

/// Compose report JSON object (pure) for testing/snapshot purposes.
pub fn compose_report_json(report: &AnalyseReport) -> JsonVal {
    let items: Vec<_> = report
        .findings
        .iter()
        .map(|f| {
            json!({
                "type": f.kind.label,
                "file_copy": f.kind.file_copy,
                "core": f.source_file,
                "to_check": f.overriding_location,
            })
        })
        .collect();
    json!({
        "results": items,
        "failures": report.failures,
        "skipped": report.skipped,
        "updates": report.updates,
        "residual": report.residual,
        "summary": report.summary,
    })
}
