use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Target prefix shared by every crate in the workspace.
const TARGET_PREFIX: &str = "co2mon";

/// Events from the co2mon crates at `level` and above. Anything logged by
/// dependencies is dropped.
pub fn log_filter(level: LogLevel) -> Targets {
    Targets::new().with_target(TARGET_PREFIX, LevelFilter::from(level))
}

/// Install the stderr subscriber. Thread names are kept so lines from the
/// acquisition thread stand out.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(LevelFilter::from(level))
        .with_ansi(false)
        .with_thread_names(true)
        .with_target(false);

    match format {
        LogFormat::Text => {
            let _ = builder.finish().with(log_filter(level)).try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().finish().with(log_filter(level)).try_init();
        }
    }
}
