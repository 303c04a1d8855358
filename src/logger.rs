use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Once, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

// Bitflags for log levels
pub const LOG_LEVEL_ERROR: u8 = 1;
pub const LOG_LEVEL_WARN: u8 = 2;
pub const LOG_LEVEL_INFO: u8 = 4;
pub const LOG_LEVEL_TRACE: u8 = 8;

pub const LOG_LEVEL_NONE: u8 = 0;
pub const LOG_LEVEL_ALL: u8 = LOG_LEVEL_ERROR | LOG_LEVEL_WARN | LOG_LEVEL_INFO | LOG_LEVEL_TRACE;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error = 1,
    Warning = 2,
    Info = 4,
    Trace = 8,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Trace => "TRACE",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: u64,
    pub level: LogLevel,
    pub message: String,
    pub thread_id: u32,
}

/// Receives every entry that passes the level mask.
pub type LogSink = fn(&LogEntry);

// Global state
pub static GLOBAL_LOG_LEVEL: AtomicU8 = AtomicU8::new(LOG_LEVEL_ERROR | LOG_LEVEL_WARN); // Default safe mask
static GLOBAL_LOG_SINK: OnceLock<LogSink> = OnceLock::new();
static ENV_INIT: Once = Once::new();

/// Install a sink for log entries. Only the first call wins.
pub fn init_logger(sink: LogSink) -> bool {
    GLOBAL_LOG_SINK.set(sink).is_ok()
}

/// Set the global log level mask
pub fn set_log_level(mask: u8) {
    ensure_env_init();
    GLOBAL_LOG_LEVEL.store(mask, Ordering::Relaxed);
}

pub fn log_level() -> u8 {
    ensure_env_init();
    GLOBAL_LOG_LEVEL.load(Ordering::Relaxed)
}

/// One-time read of the mask from the environment; `set_log_level` always overrides it.
fn ensure_env_init() {
    ENV_INIT.call_once(|| {
        if let Some(mask) = crate::config::LogConfig::from_env().mask {
            GLOBAL_LOG_LEVEL.store(mask, Ordering::Relaxed);
        }
    });
}

/// Internal function to log a message if level is enabled
pub fn log_internal(level: LogLevel, msg: String) {
    // 1. Atomic check (Zero-cost if disabled)
    if (log_level() & (level as u8)) == 0 {
        return;
    }

    // 2. Construct entry
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let entry = LogEntry {
        timestamp,
        level,
        message: msg,
        thread_id: current_thread_id(),
    };

    // 3. Dispatch
    match GLOBAL_LOG_SINK.get() {
        Some(sink) => sink(&entry),
        None => default_sink(&entry),
    }
}

pub fn format_entry(entry: &LogEntry) -> String {
    format!("[{}] [{}] [nativefiledialog] {}", entry.thread_id, entry.level.as_str(), entry.message)
}

#[cfg(windows)]
fn current_thread_id() -> u32 {
    unsafe { windows_sys::Win32::System::Threading::GetCurrentThreadId() }
}

#[cfg(not(windows))]
fn current_thread_id() -> u32 {
    0
}

/// Emits to DebugView on Windows, stderr elsewhere.
#[cfg(windows)]
fn default_sink(entry: &LogEntry) {
    let line = crate::utils::to_wstring(&format_entry(entry));
    unsafe {
        windows_sys::Win32::System::Diagnostics::Debug::OutputDebugStringW(line.as_ptr());
    }
}

#[cfg(not(windows))]
fn default_sink(entry: &LogEntry) {
    eprintln!("{}", format_entry(entry));
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::logger::log_internal($crate::logger::LogLevel::Error, format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logger::log_internal($crate::logger::LogLevel::Warning, format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logger::log_internal($crate::logger::LogLevel::Info, format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {
        $crate::logger::log_internal($crate::logger::LogLevel::Trace, format!($($arg)*))
    };
}
