use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use co2mon_monitor::{connect_with_config, Monitor, Readings};
use co2mon_transport::DeviceConfig;

use crate::cmd::{parse_duration, WatchArgs};
use crate::exit::{monitor_error, CliError, CliResult, SUCCESS};
use crate::output::{print_summary, OutputFormat, ReadingPrinter};

pub fn run(args: WatchArgs, format: OutputFormat) -> CliResult<i32> {
    let read_timeout = args.timeout.as_deref().map(parse_duration).transpose()?;
    let source = connect_with_config(&args.device, DeviceConfig { read_timeout })
        .map_err(|err| monitor_error("connect failed", err))?;

    let stop = Arc::new(AtomicBool::new(false));
    install_ctrlc_handler(stop.clone())?;

    let readings = Readings::new();
    let printer = ReadingPrinter::new(&readings, format, args.unknown, args.count, &stop);

    let mut monitor = Monitor::new(source);
    let result = monitor.run(&printer, &*stop);
    print_summary(&readings, format)?;

    let frames = result.map_err(|err| monitor_error("read failed", err))?;
    tracing::info!(frames, "watch finished");
    Ok(SUCCESS)
}

fn install_ctrlc_handler(stop: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        stop.store(true, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
