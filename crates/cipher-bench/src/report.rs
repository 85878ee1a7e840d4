//! Rendering of benchmark results for the terminal or as JSON.
//!
//! Rendering is pure: the same results always produce the same text, one row
//! per result in input order. A failed result becomes a flagged failure line
//! in place of its numeric row and does not affect the rows after it.

use common::{BenchmarkConfig, BenchmarkReport, BenchmarkResult};

use crate::runner::MISMATCH_DETAIL;

const NAME_WIDTH: usize = 24;

/// One-line description of the run parameters.
pub fn render_header(cfg: &BenchmarkConfig) -> String {
    format!(
        "Benchmark: encrypt=>decrypt {} bytes (+{} AAD) {} times",
        group_thousands(cfg.payload_size as u64),
        group_thousands(cfg.aad_size as u64),
        group_thousands(cfg.iterations),
    )
}

/// Render `results` as an aligned table with a trailing legend.
pub fn render_table(results: &[BenchmarkResult]) -> String {
    let mut out = format!(
        "{:<NAME_WIDTH$}{:>14}{:>12}{:>8}{:>14}{:>11}\n",
        "Name", "avg time (ms)", "plain(*)", "AAD(*)", "encrypted(*)", "overhead"
    );

    for r in results {
        if r.passed {
            out.push_str(&format!(
                "{:<NAME_WIDTH$}{:>14.4}{:>12}{:>8}{:>14}{:>11}\n",
                r.name,
                r.avg_millis(),
                group_thousands(r.plain_size as u64),
                group_thousands(r.aad_size as u64),
                group_thousands(r.encrypted_size as u64),
                percent(r.overhead_ratio),
            ));
        } else {
            let detail = r
                .failure
                .as_ref()
                .map_or(MISMATCH_DETAIL, |f| f.detail.as_str());
            out.push_str(&format!("\n>>> {}: ERROR! {} <<<\n\n", r.name, detail));
        }
    }

    out.push_str("\n(*) sizes in bytes. AAD travels in clear at the front of the encrypted message\n");
    out.push_str("    and is counted in its size; overhead is relative to plain + AAD.\n");
    out
}

/// Header, blank line, then the table.
pub fn render_report(report: &BenchmarkReport) -> String {
    format!(
        "{}\n\n{}",
        render_header(&report.config),
        render_table(&report.results)
    )
}

/// Pretty-printed JSON form of `report`.
///
/// Failed results carry `failure` instead of `avg_duration` and
/// `overhead_ratio`, matching the table.
///
/// # Errors
///
/// Propagates `serde_json` serialisation errors.
pub fn render_json(report: &BenchmarkReport) -> serde_json::Result<String> {
    let mut value = serde_json::to_value(report)?;
    if let Some(results) = value["results"].as_array_mut() {
        for entry in results.iter_mut().filter(|r| r["passed"] == false) {
            if let Some(fields) = entry.as_object_mut() {
                fields.remove("avg_duration");
                fields.remove("overhead_ratio");
            }
        }
    }
    serde_json::to_string_pretty(&value)
}

/// `1234567` → `"1,234,567"`.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Whole-number percentage, or `n/a` when the ratio is undefined.
fn percent(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{:.0}%", r * 100.0),
        None => "n/a".into(),
    }
}
