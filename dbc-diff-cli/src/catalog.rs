//! Signal catalog export
//!
//! Lists every message of every loaded file with its signal layout, one
//! table per message. Written as `dbc_signals.<ext>` next to the diff report.

use crate::config::OutputFormat;
use crate::report::html::{anchor, escape};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use dbc_diff::{ByteOrder, Catalog, CatalogEntry, Message, Signal};
use std::fmt::{self, Write};
use std::fs;
use std::path::{Path, PathBuf};

/// Base name of the generated catalog file
const CATALOG_STEM: &str = "dbc_signals";

const RULE: &str = "═══════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────";

const COLUMNS: [&str; 11] = [
    "Signal Name",
    "Start Bit",
    "Length (bits)",
    "Byte Order",
    "Signed",
    "Factor",
    "Offset",
    "Min",
    "Max",
    "Unit",
    "Choices",
];

/// Render a catalog in the given format
pub fn render(catalog: &Catalog, format: OutputFormat, generated_at: DateTime<Local>) -> Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Txt => render_txt(&mut out, catalog, generated_at)?,
        OutputFormat::Html => render_html(&mut out, catalog, generated_at)?,
        OutputFormat::Json => {
            return serde_json::to_string_pretty(catalog).context("Failed to serialize catalog to JSON")
        }
    }
    Ok(out)
}

/// Render and write a catalog, returning the written path
pub fn write_catalog(catalog: &Catalog, format: OutputFormat, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let content = render(catalog, format, Local::now())?;
    let path = output_dir.join(format!("{}.{}", CATALOG_STEM, format.extension()));
    fs::write(&path, content).with_context(|| format!("Failed to write catalog: {:?}", path))?;

    log::info!("Catalog with {} signal(s) written to {:?}", catalog.num_signals(), path);
    Ok(path)
}

/// The cells of one signal row, in column order
fn signal_row(signal: &Signal) -> [String; 11] {
    [
        signal.name.clone(),
        signal.start.to_string(),
        signal.length.to_string(),
        byte_order(signal.byte_order).to_string(),
        signal.is_signed.to_string(),
        signal.scale.to_string(),
        signal.offset.to_string(),
        optional(signal.minimum),
        optional(signal.maximum),
        signal.unit.clone().unwrap_or_default(),
        signal
            .choices
            .iter()
            .map(|(value, label)| format!("{}={}", value, label))
            .collect::<Vec<_>>()
            .join(", "),
    ]
}

fn byte_order(order: ByteOrder) -> &'static str {
    match order {
        ByteOrder::LittleEndian => "Intel",
        ByteOrder::BigEndian => "Motorola",
    }
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn senders(message: &Message) -> String {
    if message.senders.is_empty() {
        "Unknown".to_string()
    } else {
        message.senders.join(", ")
    }
}

fn render_txt(out: &mut String, catalog: &Catalog, generated_at: DateTime<Local>) -> fmt::Result {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "  DBC Signal Catalog")?;
    writeln!(out, "  Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "{}", RULE)?;

    if !catalog.failures.is_empty() {
        writeln!(out, "\nFailed files")?;
        for failure in &catalog.failures {
            writeln!(out, "  {}: {}", failure.file_name, failure.reason)?;
        }
    }

    for entry in &catalog.files {
        writeln!(out, "\n{}\n{}\n{}", THIN_RULE, entry.file_name, THIN_RULE)?;
        for message in &entry.model.messages {
            writeln!(
                out,
                "\nMessage: {}  ID: {:#x}  Sender(s): {}",
                message.name,
                message.frame_id,
                senders(message)
            )?;
            writeln!(out, "  {}", COLUMNS.join(" | "))?;
            for signal in &message.signals {
                writeln!(out, "  {}", signal_row(signal).join(" | "))?;
            }
        }
    }

    Ok(())
}

fn render_html(out: &mut String, catalog: &Catalog, generated_at: DateTime<Local>) -> fmt::Result {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>\n<meta charset=\"UTF-8\">\n<title>DBC Signal Catalog</title>\n</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "<h1>DBC Signal Catalog</h1>")?;
    writeln!(out, "<p>Generated: {}</p>", generated_at.format("%Y-%m-%d %H:%M:%S"))?;

    if !catalog.failures.is_empty() {
        writeln!(out, "<h2>Failed files</h2>\n<ul>")?;
        for failure in &catalog.failures {
            writeln!(
                out,
                "<li><b>{}</b>: {}</li>",
                escape(&failure.file_name),
                escape(&failure.reason)
            )?;
        }
        writeln!(out, "</ul>")?;
    }

    for (index, entry) in catalog.files.iter().enumerate() {
        render_html_file(out, &anchor(index, &entry.file_name), entry)?;
    }

    writeln!(out, "</body>\n</html>")
}

fn render_html_file(out: &mut String, id: &str, entry: &CatalogEntry) -> fmt::Result {
    writeln!(out, "<section id=\"{}\">", id)?;
    writeln!(out, "<h2>{}</h2>", escape(&entry.file_name))?;

    for message in &entry.model.messages {
        writeln!(out, "<h3>Message: {}</h3>", escape(&message.name))?;
        writeln!(
            out,
            "<p>ID: {:#x}, Sender(s): {}</p>",
            message.frame_id,
            escape(&senders(message))
        )?;
        writeln!(out, "<table>")?;
        write!(out, "<tr>")?;
        for column in COLUMNS {
            write!(out, "<th>{}</th>", column)?;
        }
        writeln!(out, "</tr>")?;
        for signal in &message.signals {
            write!(out, "<tr>")?;
            for cell in signal_row(signal) {
                write!(out, "<td>{}</td>", escape(&cell))?;
            }
            writeln!(out, "</tr>")?;
        }
        writeln!(out, "</table>")?;
    }

    writeln!(out, "</section>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::generated_at;
    use dbc_diff::{FileFailure, Model};

    fn catalog() -> Catalog {
        let model = Model::new()
            .with_node("ECU1")
            .with_message(
                Message::new(100, "Speed", 8)
                    .with_sender("ECU1")
                    .with_signal(
                        Signal::new("v", 0, 16)
                            .with_scaling(0.1, 0.0)
                            .with_range(0.0, 250.0)
                            .with_unit("km/h"),
                    )
                    .with_signal(
                        Signal::new("gear", 16, 4)
                            .signed()
                            .with_byte_order(ByteOrder::BigEndian)
                            .with_choice(0, "Park")
                            .with_choice(1, "Drive"),
                    ),
            )
            .with_message(Message::new(0x7FF, "Diag<Req>", 8).with_signal(Signal::new("sid", 0, 8)));

        Catalog {
            files: vec![CatalogEntry {
                file_name: "power train.dbc".to_string(),
                model,
            }],
            failures: vec![FileFailure {
                file_name: "broken.dbc".to_string(),
                reason: "Failed to load network definition: bad".to_string(),
            }],
        }
    }

    #[test]
    fn test_signal_row() {
        let catalog = catalog();
        let speed = &catalog.files[0].model.messages[0];

        assert_eq!(
            signal_row(&speed.signals[0]),
            ["v", "0", "16", "Intel", "false", "0.1", "0", "0", "250", "km/h", ""].map(String::from)
        );
        assert_eq!(
            signal_row(&speed.signals[1]),
            ["gear", "16", "4", "Motorola", "true", "1", "0", "", "", "", "0=Park, 1=Drive"]
                .map(String::from)
        );
    }

    #[test]
    fn test_txt_catalog() {
        let text = render(&catalog(), OutputFormat::Txt, generated_at()).unwrap();

        assert!(text.contains("  DBC Signal Catalog"));
        assert!(text.contains("  broken.dbc: Failed to load network definition: bad"));
        assert!(text.contains("\npower train.dbc\n"));
        assert!(text.contains("Message: Speed  ID: 0x64  Sender(s): ECU1"));
        assert!(text.contains("Message: Diag<Req>  ID: 0x7ff  Sender(s): Unknown"));
        assert!(text.contains("  Signal Name | Start Bit | Length (bits) | Byte Order"));
        assert!(text.contains("  v | 0 | 16 | Intel | false | 0.1 | 0 | 0 | 250 | km/h | \n"));

        // Messages keep declaration order
        assert!(text.find("Message: Speed").unwrap() < text.find("Message: Diag").unwrap());
    }

    #[test]
    fn test_html_catalog() {
        let html = render(&catalog(), OutputFormat::Html, generated_at()).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<section id=\"file-0-power-train.dbc\">"));
        assert!(html.contains("<h3>Message: Diag&lt;Req&gt;</h3>"));
        assert!(html.contains("<p>ID: 0x64, Sender(s): ECU1</p>"));
        assert!(html.contains("<th>Signal Name</th><th>Start Bit</th>"));
        assert!(html.contains("<td>gear</td><td>16</td><td>4</td><td>Motorola</td><td>true</td>"));
        assert!(html.contains("<li><b>broken.dbc</b>"));
    }

    #[test]
    fn test_json_catalog() {
        let json = render(&catalog(), OutputFormat::Json, generated_at()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let speed = &value["files"][0]["model"]["messages"][0];
        assert_eq!(speed["senders"], serde_json::json!(["ECU1"]));
        assert_eq!(speed["signals"][0]["unit"], "km/h");
        assert_eq!(speed["signals"][1]["is_signed"], true);
        assert_eq!(value["failures"][0]["file_name"], "broken.dbc");
    }

    #[test]
    fn test_write_catalog() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_catalog(&catalog(), OutputFormat::Html, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("dbc_signals.html"));
        assert!(fs::read_to_string(path).unwrap().contains("DBC Signal Catalog"));
    }
}
