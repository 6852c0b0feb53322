use std::io::IsTerminal;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use co2mon_frame::{operation_name, Encoding, Quantity, RawFrame, Reading};
use co2mon_monitor::{render_prometheus, ReadingSink, Readings};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

use crate::exit::{monitor_error, CliResult};

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    /// Prometheus text exposition of the latest values, printed once at exit.
    Prometheus,
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

#[derive(Serialize)]
struct ReadingOutput<'a> {
    operation: String,
    code: u8,
    name: &'a str,
    quantity: Option<Quantity>,
    value: f64,
    unit: Option<&'a str>,
    timestamp: String,
}

impl<'a> ReadingOutput<'a> {
    fn new(reading: &Reading) -> Self {
        let quantity = reading.quantity();
        Self {
            operation: operation_char(reading.operation()),
            code: reading.operation(),
            name: operation_name(reading.operation()),
            quantity,
            value: reading.value(),
            unit: quantity.map(Quantity::unit),
            timestamp: now_unix_seconds(),
        }
    }
}

pub fn print_reading(reading: &Reading, format: OutputFormat) {
    let out = ReadingOutput::new(reading);
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["OPERATION", "NAME", "VALUE", "UNIT"])
                .add_row(vec![
                    out.operation.clone(),
                    out.name.to_string(),
                    out.value.to_string(),
                    out.unit.unwrap_or("raw").to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "op={} ({}) value={} {}",
                out.operation,
                out.name,
                out.value,
                out.unit.unwrap_or("raw")
            );
        }
        OutputFormat::Prometheus => {}
    }
}

#[derive(Serialize)]
struct DecodedOutput<'a> {
    wire: String,
    plaintext: String,
    encoding: Encoding,
    raw_value: u16,
    #[serde(flatten)]
    reading: ReadingOutput<'a>,
}

pub fn print_decoded(
    wire: &RawFrame,
    plain: &RawFrame,
    encoding: Encoding,
    raw_value: u16,
    reading: &Reading,
    format: OutputFormat,
) {
    let out = DecodedOutput {
        wire: hex(wire),
        plaintext: hex(plain),
        encoding,
        raw_value,
        reading: ReadingOutput::new(reading),
    };
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"])
                .add_row(vec!["wire", out.wire.as_str()])
                .add_row(vec!["plaintext", out.plaintext.as_str()])
                .add_row(vec!["encoding", encoding_name(encoding)])
                .add_row(vec!["operation", out.reading.operation.as_str()])
                .add_row(vec!["name", out.reading.name]);
            table.add_row(vec!["raw value".to_string(), raw_value.to_string()]);
            table.add_row(vec![
                "value".to_string(),
                format!("{} {}", out.reading.value, out.reading.unit.unwrap_or("raw")),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Prometheus => {
            println!(
                "{} -> {} ({}) op={} ({}) raw={} value={} {}",
                out.wire,
                out.plaintext,
                encoding_name(encoding),
                out.reading.operation,
                out.reading.name,
                raw_value,
                out.reading.value,
                out.reading.unit.unwrap_or("raw")
            );
        }
    }
}

/// Print the end-of-run summary for formats that have one.
pub fn print_summary(readings: &Readings, format: OutputFormat) -> CliResult<()> {
    if format == OutputFormat::Prometheus {
        let text = render_prometheus(&readings.snapshot())
            .map_err(|err| monitor_error("metrics rendering failed", err))?;
        print!("{text}");
    }
    Ok(())
}

/// Sink that records every reading and prints the recognized ones.
///
/// Raises `stop` once `limit` readings have been printed.
pub struct ReadingPrinter<'a> {
    readings: &'a Readings,
    format: OutputFormat,
    include_unknown: bool,
    limit: Option<usize>,
    printed: AtomicUsize,
    stop: &'a AtomicBool,
}

impl<'a> ReadingPrinter<'a> {
    pub fn new(
        readings: &'a Readings,
        format: OutputFormat,
        include_unknown: bool,
        limit: Option<usize>,
        stop: &'a AtomicBool,
    ) -> Self {
        Self {
            readings,
            format,
            include_unknown,
            limit,
            printed: AtomicUsize::new(0),
            stop,
        }
    }
}

impl ReadingSink for ReadingPrinter<'_> {
    fn publish(&self, reading: &Reading) {
        self.readings.record(reading);
        if reading.quantity().is_none() && !self.include_unknown {
            return;
        }

        print_reading(reading, self.format);
        let printed = self.printed.fetch_add(1, Ordering::SeqCst) + 1;
        if self.limit.is_some_and(|limit| printed >= limit) {
            self.stop.store(true, Ordering::SeqCst);
        }
    }
}

fn operation_char(code: u8) -> String {
    if code.is_ascii_graphic() {
        char::from(code).to_string()
    } else {
        format!("0x{code:02x}")
    }
}

fn encoding_name(encoding: Encoding) -> &'static str {
    match encoding {
        Encoding::Plain => "plain",
        Encoding::Obfuscated => "obfuscated",
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
