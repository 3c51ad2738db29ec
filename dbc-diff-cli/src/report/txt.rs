//! Plain-text report

use super::{cycle_time, file_list};
use chrono::{DateTime, Local};
use dbc_diff::{BatchReport, FieldDiffs, FileDiff, MessageSummary, SignalRef};
use std::fmt::{self, Write};

const RULE: &str = "═══════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────";

/// Render the whole batch as text
pub fn render(report: &BatchReport, generated_at: DateTime<Local>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = render_into(&mut out, report, generated_at);
    out
}

fn render_into(out: &mut String, report: &BatchReport, generated_at: DateTime<Local>) -> fmt::Result {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "  DBC Diff Report")?;
    writeln!(out, "  Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "{}\n", RULE)?;

    writeln!(out, "DBC files")?;
    writeln!(out, "  Added:   {}", file_list(&report.added_files))?;
    writeln!(out, "  Removed: {}", file_list(&report.removed_files))?;

    if !report.failures.is_empty() {
        writeln!(out, "\nFailed files")?;
        for failure in &report.failures {
            writeln!(out, "  {}: {}", failure.file_name, failure.reason)?;
        }
    }

    for file in &report.files {
        out.push('\n');
        render_file(out, file)?;
    }

    Ok(())
}

fn render_file(out: &mut String, file: &FileDiff) -> fmt::Result {
    let result = &file.result;
    let summary = result.summary();

    writeln!(out, "{}", THIN_RULE)?;
    writeln!(out, "{}", file.file_name)?;
    writeln!(out, "{}", THIN_RULE)?;
    if let Some(error) = &file.baseline_error {
        writeln!(out, "Baseline unreadable, compared as new: {}", error)?;
    }
    writeln!(
        out,
        "Summary: Nodes: {}, Messages: {}, Signals: {}",
        file.stats.num_nodes, file.stats.num_messages, file.stats.num_signals
    )?;
    writeln!(
        out,
        "  Messages added: {}, removed: {}, changed: {}",
        summary.messages_added, summary.messages_removed, summary.messages_changed
    )?;
    writeln!(
        out,
        "  Signals added: {}, removed: {}, changed: {}",
        summary.signals_added, summary.signals_removed, summary.signals_changed
    )?;

    writeln!(out, "\nNodes: {}", file_list(&result.nodes))?;

    render_messages(out, "Messages added", &result.messages.added)?;
    render_messages(out, "Messages removed", &result.messages.removed)?;

    writeln!(out, "\nMessages changed")?;
    if result.messages.changed.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for change in &result.messages.changed {
        writeln!(out, "  {} : {}", change.frame_id, change.name)?;
        render_diffs(out, &change.diffs)?;
    }

    render_signals(out, "Signals added", &result.signals.added)?;
    render_signals(out, "Signals removed", &result.signals.removed)?;

    writeln!(out, "\nSignals changed")?;
    if result.signals.changed.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for change in &result.signals.changed {
        writeln!(out, "  {} : {}", change.frame_id, change.signal_name)?;
        render_diffs(out, &change.diffs)?;
    }

    Ok(())
}

fn render_messages(out: &mut String, title: &str, messages: &[MessageSummary]) -> fmt::Result {
    writeln!(out, "\n{}", title)?;
    if messages.is_empty() {
        writeln!(out, "  (none)")?;
        return Ok(());
    }
    writeln!(out, "  {:<10} {:<24} {:>4} {:>6}  Signals", "ID", "Name", "DLC", "Cycle")?;
    for msg in messages {
        writeln!(
            out,
            "  {:<10} {:<24} {:>4} {:>6}  {}",
            msg.frame_id,
            msg.name,
            msg.length,
            cycle_time(msg.cycle_time),
            msg.signals.join(", ")
        )?;
    }
    Ok(())
}

fn render_signals(out: &mut String, title: &str, signals: &[SignalRef]) -> fmt::Result {
    writeln!(out, "\n{}", title)?;
    if signals.is_empty() {
        writeln!(out, "  (none)")?;
        return Ok(());
    }
    writeln!(out, "  {:<10} Signal", "Message ID")?;
    for sig in signals {
        writeln!(out, "  {:<10} {}", sig.frame_id, sig.signal_name)?;
    }
    Ok(())
}

fn render_diffs(out: &mut String, diffs: &FieldDiffs) -> fmt::Result {
    for change in diffs.iter() {
        writeln!(out, "    {:<20} {} -> {}", change.field, change.old, change.new)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures;

    #[test]
    fn test_txt_report_sections() {
        let text = render(&fixtures::batch_report(), fixtures::generated_at());

        assert!(text.contains("Generated: 2024-05-01 12:00:00"));
        assert!(text.contains("  Added:   body.dbc"));
        assert!(text.contains("  Removed: None"));
        assert!(text.contains("  broken.dbc: Failed to load network definition: bad"));
        assert!(text.contains("Summary: Nodes: 1, Messages: 2, Signals: 2"));
        assert!(text.contains("  Messages added: 1, removed: 0, changed: 1"));
        assert!(text.contains("  Signals added: 1, removed: 1, changed: 1"));
        assert!(text.contains("    cycle_time           20 -> 50"));
        assert!(text.contains("    signals              [v, rpm] -> [v]"));
        assert!(text.contains("    scale                0.1 -> 0.01"));
    }

    #[test]
    fn test_txt_report_unreadable_baseline() {
        let mut report = fixtures::batch_report();
        assert!(!render(&report, fixtures::generated_at()).contains("Baseline unreadable"));

        report.files[0].baseline_error = Some("Failed to parse DBC".to_string());
        let text = render(&report, fixtures::generated_at());
        assert!(text.contains("Baseline unreadable, compared as new: Failed to parse DBC"));
    }

    #[test]
    fn test_txt_report_field_order() {
        let text = render(&fixtures::batch_report(), fixtures::generated_at());
        let cycle = text.find("cycle_time").unwrap();
        let signals = text.find("    signals").unwrap();
        assert!(cycle < signals);
    }
}
