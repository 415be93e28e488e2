use std::fmt::Write as _;
use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use tbinary_protocol::{MessageHeader, Value};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Decoded message as reported by `inspect`.
#[derive(Serialize)]
pub struct InspectOutput {
    pub message: MessageHeader,
    pub body: Value,
    pub message_bytes: usize,
    pub trailing_bytes: usize,
}

pub fn print_inspect(out: &InspectOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "TYPE", "VALUE"]);
            if let Value::Struct(fields) = &out.body {
                for field in fields {
                    table.add_row(vec![
                        field.id.to_string(),
                        field.value.ttype().to_string(),
                        compact(&field.value),
                    ]);
                }
            }
            println!(
                "{} {} seq={} ({} bytes, {} trailing)",
                out.message.kind,
                out.message.name,
                out.message.sequence_id,
                out.message_bytes,
                out.trailing_bytes
            );
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let mut text = format!(
                "{} {} seq={}\n",
                out.message.kind, out.message.name, out.message.sequence_id
            );
            render(&out.body, 1, &mut text);
            print!("{text}");
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn hex(data: &[u8]) -> String {
    data.iter().fold(String::with_capacity(data.len() * 2), |mut acc, byte| {
        let _ = write!(acc, "{byte:02x}");
        acc
    })
}

fn compact(value: &Value) -> String {
    match value {
        Value::Bool(v) => v.to_string(),
        Value::Byte(v) => v.to_string(),
        Value::I16(v) => v.to_string(),
        Value::I32(v) => v.to_string(),
        Value::I64(v) => v.to_string(),
        Value::Double(v) => v.to_string(),
        Value::String(text) => text.clone(),
        Value::Binary(bytes) => format!("<binary {}>", hex(bytes)),
        composite => serde_json::to_string(composite).unwrap_or_else(|_| "?".to_string()),
    }
}

fn render(value: &Value, depth: usize, text: &mut String) {
    let pad = "  ".repeat(depth);
    match value {
        Value::Struct(fields) => {
            for field in fields {
                let _ = write!(text, "{pad}{}: {}", field.id, field.value.ttype());
                render_child(&field.value, depth, text);
            }
        }
        Value::List { elements, .. } | Value::Set { elements, .. } => {
            for (index, element) in elements.iter().enumerate() {
                let _ = write!(text, "{pad}[{index}] {}", element.ttype());
                render_child(element, depth, text);
            }
        }
        Value::Map { entries, .. } => {
            for (key, entry) in entries {
                let _ = write!(text, "{pad}{}", compact(key));
                render_child(entry, depth, text);
            }
        }
        scalar => {
            let _ = writeln!(text, "{pad}{}", compact(scalar));
        }
    }
}

fn render_child(value: &Value, depth: usize, text: &mut String) {
    if value.ttype().is_composite() {
        text.push('\n');
        render(value, depth + 1, text);
    } else {
        let _ = writeln!(text, " = {}", compact(value));
    }
}
