use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use skytraq_frame::Frame;
use skytraq_link::{NavigationSolution, SoftwareVersion};

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

/// One JSON line: a `type` tag and timestamp around the record's own fields.
#[derive(Serialize)]
struct Record<'a, T: Serialize> {
    #[serde(rename = "type")]
    kind: &'a str,
    timestamp: String,
    #[serde(flatten)]
    data: &'a T,
}

fn print_json<T: Serialize>(kind: &str, data: &T) {
    let record = Record {
        kind,
        timestamp: now_unix_seconds(),
        data,
    };
    match serde_json::to_string(&record) {
        Ok(line) => println!("{line}"),
        Err(_) => println!("{{}}"),
    }
}

fn print_table(header: &[&str], row: Vec<String>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec())
        .add_row(row);
    println!("{table}");
}

pub fn print_version(version: &SoftwareVersion, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json("software_version", version),
        OutputFormat::Table => print_table(
            &["KERNEL", "ODM", "REVISION"],
            vec![
                version.kernel.to_string(),
                version.odm.to_string(),
                version.revision.to_string(),
            ],
        ),
        OutputFormat::Pretty => println!("{version}"),
    }
}

pub fn print_navigation(nav: &NavigationSolution, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json("navigation", nav),
        OutputFormat::Table => print_table(
            &["FIX", "SATS", "LAT", "LON", "ALT", "HDOP", "VELOCITY"],
            vec![
                nav.fix.to_string(),
                nav.satellite_count.to_string(),
                nav.latitude.to_string(),
                nav.longitude.to_string(),
                nav.altitude.to_string(),
                nav.hdop.to_string(),
                format!("{} {} {}", nav.vx, nav.vy, nav.vz),
            ],
        ),
        OutputFormat::Pretty => println!(
            "fix={} satellites={} lat={} lon={} alt={} hdop={} velocity=({}, {}, {})",
            nav.fix,
            nav.satellite_count,
            nav.latitude,
            nav.longitude,
            nav.altitude,
            nav.hdop,
            nav.vx,
            nav.vy,
            nav.vz
        ),
    }
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    id: u8,
    name: &'a str,
    payload_size: usize,
    payload: String,
}

pub fn print_frame(frame: &Frame, format: OutputFormat) {
    let payload = hex::encode(frame.payload.as_ref());
    match format {
        OutputFormat::Json => print_json(
            "frame",
            &FrameOutput {
                id: frame.id.0,
                name: frame.id.name(),
                payload_size: frame.payload.len(),
                payload,
            },
        ),
        OutputFormat::Table => print_table(
            &["ID", "NAME", "SIZE", "PAYLOAD"],
            vec![
                frame.id.to_string(),
                frame.id.name().to_string(),
                frame.payload.len().to_string(),
                payload,
            ],
        ),
        OutputFormat::Pretty => println!(
            "id={} ({}) size={} payload={}",
            frame.id,
            frame.id.name(),
            frame.payload.len(),
            payload
        ),
    }
}

#[derive(Serialize)]
struct WireOutput<'a> {
    id: u8,
    name: &'a str,
    wire: String,
}

/// Print an encoded frame. Text formats space-separate the bytes.
pub fn print_wire(frame: &Frame, wire: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(
            "wire",
            &WireOutput {
                id: frame.id.0,
                name: frame.id.name(),
                wire: hex::encode(wire),
            },
        ),
        OutputFormat::Table => print_table(
            &["ID", "NAME", "WIRE"],
            vec![
                frame.id.to_string(),
                frame.id.name().to_string(),
                spaced_hex(wire),
            ],
        ),
        OutputFormat::Pretty => println!("{}", spaced_hex(wire)),
    }
}

pub fn spaced_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
