use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

static LOG_FILE: OnceLock<Mutex<File>> = OnceLock::new();
static LEVEL: OnceLock<LogLevel> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn parse(s: &str) -> LogLevel {
        match s.to_lowercase().as_str() {
            "error" => LogLevel::Error,
            "warn" | "warning" => LogLevel::Warn,
            "info" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            _ => LogLevel::Info,
        }
    }

    fn from_env() -> LogLevel {
        LogLevel::parse(&std::env::var("PGUSERDEMO_LOG").unwrap_or_default())
    }
}

/// Set the threshold; `None` reads `PGUSERDEMO_LOG`. Only the first call wins.
pub fn set_level(level: Option<LogLevel>) {
    let _ = LEVEL.set(level.unwrap_or_else(LogLevel::from_env));
}

/// Also append log lines to `log_path`.
pub fn init(log_path: impl AsRef<Path>) -> std::io::Result<PathBuf> {
    let path = log_path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let _ = LOG_FILE.set(Mutex::new(file));
    debug(&format!("logging initialized: {}", path.display()));
    Ok(path.to_path_buf())
}

fn now_ts() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    format!("{}.{:03}", now.as_secs(), now.subsec_millis())
}

fn rank(level: LogLevel) -> u8 {
    match level {
        LogLevel::Trace => 0,
        LogLevel::Debug => 1,
        LogLevel::Info => 2,
        LogLevel::Warn => 3,
        LogLevel::Error => 4,
    }
}

fn passes(level: LogLevel, min: LogLevel) -> bool {
    rank(level) >= rank(min)
}

fn enabled(level: LogLevel) -> bool {
    passes(level, *LEVEL.get_or_init(LogLevel::from_env))
}

fn format_line(level: &str, msg: &str) -> String {
    format!("{} [{}] {}", now_ts(), level, msg)
}

fn write_line(level: &str, msg: &str) {
    let line = format_line(level, msg);
    let _ = writeln!(std::io::stderr().lock(), "{}", line);
    if let Some(m) = LOG_FILE.get() {
        if let Ok(mut f) = m.lock() {
            let _ = writeln!(f, "{}", line);
            let _ = f.flush();
        }
    }
}

pub fn error(msg: &str) {
    if enabled(LogLevel::Error) { write_line("ERROR", msg); }
}
pub fn warn(msg: &str) {
    if enabled(LogLevel::Warn) { write_line("WARN", msg); }
}
pub fn info(msg: &str) {
    if enabled(LogLevel::Info) { write_line("INFO", msg); }
}
pub fn debug(msg: &str) {
    if enabled(LogLevel::Debug) { write_line("DEBUG", msg); }
}
pub fn trace(msg: &str) {
    if enabled(LogLevel::Trace) { write_line("TRACE", msg); }
}
