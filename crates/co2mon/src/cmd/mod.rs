use std::time::Duration;

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod decode;
pub mod replay;
pub mod version;
#[cfg(target_os = "linux")]
pub mod watch;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read live values from a hidraw device.
    #[cfg(target_os = "linux")]
    Watch(WatchArgs),
    /// Decode a file of captured raw frames.
    Replay(ReplayArgs),
    /// Decode a single frame given as hex.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        #[cfg(target_os = "linux")]
        Command::Watch(args) => watch::run(args, format),
        Command::Replay(args) => replay::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// hidraw device node (e.g. /dev/hidraw0).
    pub device: PathBuf,
    /// Exit after printing N readings.
    #[arg(long)]
    pub count: Option<usize>,
    /// Fail if no report arrives within this time (e.g. 5s, 500ms).
    #[arg(long)]
    pub timeout: Option<String>,
    /// Also print frames with unrecognized operation codes.
    #[arg(long)]
    pub unknown: bool,
}

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// File of concatenated raw 8-byte frames.
    pub capture: PathBuf,
    /// Stop after printing N readings.
    #[arg(long)]
    pub count: Option<usize>,
    /// Also print frames with unrecognized operation codes.
    #[arg(long)]
    pub unknown: bool,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Frame bytes as hex; ' ', ':' and '-' separators are ignored.
    #[arg(num_args = 1.., required = true)]
    pub frame: Vec<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    if millis {
        Ok(Duration::from_millis(value))
    } else {
        Ok(Duration::from_secs(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert_eq!(parse_duration("").unwrap_err().code, USAGE);
    }
}
