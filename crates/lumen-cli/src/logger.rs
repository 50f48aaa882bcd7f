use log::{Level, LevelFilter, Log, Metadata, Record};
use owo_colors::OwoColorize;

/// Environment variable read when `--log-level` is not given.
pub const LOG_ENV: &str = "LUMEN_LOG";

/// Writes records to stderr so evaluation results on stdout stay clean.
pub struct CliLogger;

impl Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            Level::Error => "ERROR".red().bold().to_string(),
            Level::Warn => "WARN".yellow().bold().to_string(),
            Level::Info => "INFO".green().to_string(),
            Level::Debug => "DEBUG".cyan().to_string(),
            Level::Trace => "TRACE".bright_black().to_string(),
        };
        eprintln!(
            "[{level}][{target}] {message}",
            level = level,
            target = record.target().dimmed(),
            message = record.args()
        );
    }

    fn flush(&self) {}
}

/// Picks the explicit level, else `LUMEN_LOG`, else `warn`.
pub fn resolve_level(explicit: Option<LevelFilter>) -> LevelFilter {
    if let Some(level) = explicit {
        return level;
    }
    match std::env::var(LOG_ENV) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            eprintln!("{}: ignoring {}={}", "warning".yellow().bold(), LOG_ENV, raw);
            LevelFilter::Warn
        }),
        Err(_) => LevelFilter::Warn,
    }
}

pub fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    static LOGGER: CliLogger = CliLogger;
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}
