use std::fs::File;
use std::io::BufReader;
use std::sync::atomic::AtomicBool;

use co2mon_frame::FrameReader;
use co2mon_monitor::{Monitor, Readings};

use crate::cmd::ReplayArgs;
use crate::exit::{io_error, monitor_error, CliResult, SUCCESS};
use crate::output::{print_summary, OutputFormat, ReadingPrinter};

pub fn run(args: ReplayArgs, format: OutputFormat) -> CliResult<i32> {
    let file = File::open(&args.capture).map_err(|err| {
        io_error(&format!("failed opening {}", args.capture.display()), err)
    })?;

    let stop = AtomicBool::new(false);
    let readings = Readings::new();
    let printer = ReadingPrinter::new(&readings, format, args.unknown, args.count, &stop);

    let mut monitor = Monitor::new(FrameReader::new(BufReader::new(file)));
    let result = monitor.run(&printer, &stop);
    print_summary(&readings, format)?;

    match result {
        Ok(_) => Ok(SUCCESS),
        Err(err) if err.is_end_of_stream() => {
            tracing::debug!(frames = monitor.frames(), "end of capture");
            Ok(SUCCESS)
        }
        Err(err) => Err(monitor_error("replay failed", err)),
    }
}
