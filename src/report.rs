// Interval report rendering: human-readable text or one JSON object per line.

use std::fmt::Write as _;

use serde::Deserialize;

use crate::models::{CounterDelta, IntervalReport};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

pub fn render(report: &IntervalReport, format: ReportFormat) -> anyhow::Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Json => {
            let mut line = serde_json::to_string(report)?;
            line.push('\n');
            Ok(line)
        }
    }
}

fn delta_cell(delta: &CounterDelta) -> String {
    match delta.advanced() {
        Some(d) => d.to_string(),
        None => "wrapped".into(),
    }
}

fn overflow_block(out: &mut String, label: &str, delta: &CounterDelta) {
    if let CounterDelta::Wrapped {
        before,
        after,
        difference,
    } = delta
    {
        let _ = writeln!(out, "!! {} OVERFLOW !!", label);
        let _ = writeln!(
            out,
            "Before: {}, After: {}, Difference: {}",
            before, after, difference
        );
    }
}

pub fn render_text(report: &IntervalReport) -> String {
    let m = &report.current;
    let mut out = String::new();

    let _ = writeln!(out, "--- PACKETS ---");
    let _ = writeln!(
        out,
        "  Input (Download): {} (total), {} (delta)",
        m.total_input_packets,
        delta_cell(&report.input_packets)
    );
    let _ = writeln!(
        out,
        "  Output (Upload): {} (total), {} (delta)",
        m.total_output_packets,
        delta_cell(&report.output_packets)
    );

    let _ = writeln!(out, "--- BYTES ---");
    let _ = writeln!(
        out,
        "  Input (Download): {} (total), {} (delta)",
        m.total_input_bytes,
        delta_cell(&report.input_bytes)
    );
    let _ = writeln!(
        out,
        "  Output (Upload): {} (total), {} (delta)",
        m.total_output_bytes,
        delta_cell(&report.output_bytes)
    );

    overflow_block(&mut out, "INPUT", &report.input_bytes);
    overflow_block(&mut out, "OUTPUT", &report.output_bytes);
    overflow_block(&mut out, "INPUT PACKET", &report.input_packets);
    overflow_block(&mut out, "OUTPUT PACKET", &report.output_packets);

    out.push_str("\n\n");
    out
}
