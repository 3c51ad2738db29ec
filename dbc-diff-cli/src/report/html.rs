//! HTML report
//!
//! Plain semantic markup: one section per file, tables for added and removed
//! entries, and field/before/after tables for changes. Rows carry `added`,
//! `removed` or `changed` classes for whoever wants to style them.

use super::{cycle_time, file_list};
use chrono::{DateTime, Local};
use dbc_diff::{BatchReport, FieldDiffs, FileDiff, MessageSummary, SignalRef};
use std::fmt::{self, Write};

/// Render the whole batch as an HTML document
pub fn render(report: &BatchReport, generated_at: DateTime<Local>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = render_into(&mut out, report, generated_at);
    out
}

fn render_into(out: &mut String, report: &BatchReport, generated_at: DateTime<Local>) -> fmt::Result {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>\n<meta charset=\"UTF-8\">\n<title>DBC Diff Report</title>\n</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "<h1>DBC Diff Report</h1>")?;
    writeln!(out, "<p>Generated: {}</p>", generated_at.format("%Y-%m-%d %H:%M:%S"))?;

    writeln!(out, "<h2>DBC files</h2>")?;
    writeln!(out, "<p>Added: {}</p>", escape(&file_list(&report.added_files)))?;
    writeln!(out, "<p>Removed: {}</p>", escape(&file_list(&report.removed_files)))?;

    if !report.failures.is_empty() {
        writeln!(out, "<h2>Failed files</h2>\n<ul>")?;
        for failure in &report.failures {
            writeln!(
                out,
                "<li><b>{}</b>: {}</li>",
                escape(&failure.file_name),
                escape(&failure.reason)
            )?;
        }
        writeln!(out, "</ul>")?;
    }

    if !report.files.is_empty() {
        writeln!(out, "<nav>\n<ul>")?;
        for (index, file) in report.files.iter().enumerate() {
            writeln!(
                out,
                "<li><a href=\"#{}\">{}</a></li>",
                anchor(index, &file.file_name),
                escape(&file.file_name)
            )?;
        }
        writeln!(out, "</ul>\n</nav>")?;
    }

    for (index, file) in report.files.iter().enumerate() {
        render_file(out, &anchor(index, &file.file_name), file)?;
    }

    writeln!(out, "</body>\n</html>")
}

fn render_file(out: &mut String, id: &str, file: &FileDiff) -> fmt::Result {
    let result = &file.result;
    let summary = result.summary();

    writeln!(out, "<section id=\"{}\">", id)?;
    writeln!(out, "<h2>{}</h2>", escape(&file.file_name))?;
    if let Some(error) = &file.baseline_error {
        writeln!(
            out,
            "<p class=\"warning\">Baseline unreadable, compared as new: {}</p>",
            escape(error)
        )?;
    }
    writeln!(
        out,
        "<p><b>Summary:</b> Nodes: {}, Messages: {}, Signals: {}<br>",
        file.stats.num_nodes, file.stats.num_messages, file.stats.num_signals
    )?;
    writeln!(
        out,
        "Messages added: {}, removed: {}, changed: {}<br>",
        summary.messages_added, summary.messages_removed, summary.messages_changed
    )?;
    writeln!(
        out,
        "Signals added: {}, removed: {}, changed: {}</p>",
        summary.signals_added, summary.signals_removed, summary.signals_changed
    )?;

    writeln!(out, "<h3>Nodes</h3>\n<ul>")?;
    for node in &result.nodes {
        writeln!(out, "<li>{}</li>", escape(node))?;
    }
    writeln!(out, "</ul>")?;

    render_messages(out, "Messages added", "added", &result.messages.added)?;
    render_messages(out, "Messages removed", "removed", &result.messages.removed)?;

    writeln!(out, "<h3>Messages changed</h3>")?;
    if result.messages.changed.is_empty() {
        writeln!(out, "<p>No messages changed.</p>")?;
    }
    for change in &result.messages.changed {
        writeln!(out, "<h4>{} : {}</h4>", change.frame_id, escape(&change.name))?;
        render_diffs(out, &change.diffs)?;
    }

    render_signals(out, "Signals added", "added", &result.signals.added)?;
    render_signals(out, "Signals removed", "removed", &result.signals.removed)?;

    writeln!(out, "<h3>Signals changed</h3>")?;
    if result.signals.changed.is_empty() {
        writeln!(out, "<p>No signals changed.</p>")?;
    }
    for change in &result.signals.changed {
        writeln!(out, "<h4>{} : {}</h4>", change.frame_id, escape(&change.signal_name))?;
        render_diffs(out, &change.diffs)?;
    }

    writeln!(out, "</section>")
}

fn render_messages(
    out: &mut String,
    title: &str,
    class: &str,
    messages: &[MessageSummary],
) -> fmt::Result {
    writeln!(out, "<h3>{}</h3>", title)?;
    if messages.is_empty() {
        return writeln!(out, "<p>None.</p>");
    }
    writeln!(out, "<table>")?;
    writeln!(out, "<tr><th>ID</th><th>Name</th><th>DLC</th><th>Cycle</th><th>Signals</th></tr>")?;
    for msg in messages {
        writeln!(
            out,
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            class,
            msg.frame_id,
            escape(&msg.name),
            msg.length,
            cycle_time(msg.cycle_time),
            escape(&msg.signals.join(", "))
        )?;
    }
    writeln!(out, "</table>")
}

fn render_signals(out: &mut String, title: &str, class: &str, signals: &[SignalRef]) -> fmt::Result {
    writeln!(out, "<h3>{}</h3>", title)?;
    if signals.is_empty() {
        return writeln!(out, "<p>None.</p>");
    }
    writeln!(out, "<table>")?;
    writeln!(out, "<tr><th>Message ID</th><th>Signal</th></tr>")?;
    for sig in signals {
        writeln!(
            out,
            "<tr class=\"{}\"><td>{}</td><td>{}</td></tr>",
            class,
            sig.frame_id,
            escape(&sig.signal_name)
        )?;
    }
    writeln!(out, "</table>")
}

fn render_diffs(out: &mut String, diffs: &FieldDiffs) -> fmt::Result {
    writeln!(out, "<table>")?;
    writeln!(out, "<tr><th>Field</th><th>Before</th><th>After</th></tr>")?;
    for change in diffs.iter() {
        writeln!(
            out,
            "<tr class=\"changed\"><td>{}</td><td><code>{}</code></td><td><code>{}</code></td></tr>",
            change.field,
            escape(&change.old.to_string()),
            escape(&change.new.to_string())
        )?;
    }
    writeln!(out, "</table>")
}

/// Fragment id for the section of the file at `index`
///
/// Characters outside `[A-Za-z0-9_.-]` become `-`; the index keeps ids
/// unique when two names map to the same text.
pub(crate) fn anchor(index: usize, name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!("file-{}-{}", index, slug)
}

/// Escape text for use in HTML content and attribute values
pub(crate) fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
