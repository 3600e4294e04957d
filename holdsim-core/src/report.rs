//! Tabular report over the five derived series.
//!
//! The output is a printed/persisted contract and must stay byte-stable:
//! for each series, a `---- <Name> ----` header, a `Date,<Name>` column
//! row, one `YYYY-MM-DD,<value>` row per date ascending with `{:.6}`
//! values, and a trailing blank line per section.

use std::fmt::Write;

use crate::engine::DerivedSeries;
use crate::series::SparseSeries;

/// Render the five-section report. Pure string producer; callers decide the
/// destination.
pub fn render_report(derived: &DerivedSeries) -> String {
    let mut out = String::new();
    write_section(&mut out, "Shares", &derived.shares);
    write_section(&mut out, "Cost", &derived.cost);
    write_section(&mut out, "Value", &derived.value);
    write_section(&mut out, "Gain", &derived.gain);
    write_section(&mut out, "GainPercent", &derived.gainp);
    out
}

fn write_section(out: &mut String, name: &str, series: &SparseSeries<f64>) {
    // Writing into a String cannot fail.
    let _ = writeln!(out, "---- {name} ----");
    let _ = writeln!(out, "Date,{name}");
    for (date, value) in series.iter() {
        let _ = writeln!(out, "{},{:.6}", date.format("%Y-%m-%d"), value);
    }
    let _ = writeln!(out);
}
