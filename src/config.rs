use std::path::{Path, PathBuf};

use crate::filter::FileFilter;
use crate::flags::Fos;
use crate::logger::{LOG_LEVEL_ALL, LOG_LEVEL_ERROR, LOG_LEVEL_INFO, LOG_LEVEL_NONE, LOG_LEVEL_WARN};

/// Environment variable read once when the first message is logged.
pub const LOG_ENV_VAR: &str = "NATIVEFILEDIALOG_LOG";

/// Per-call dialog options. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DialogConfig {
    pub title: Option<String>,
    pub init_dir: Option<PathBuf>,
    pub init_file: Option<String>,
    /// `None` picks the mode's default filter set, `Some(vec![])` shows no type dropdown.
    pub filters: Option<Vec<FileFilter>>,
    pub confirm_button_label: Option<String>,
    pub input_label: Option<String>,
    /// Extra FOS bits OR-ed over the baseline.
    pub flags: Fos,
}

impl DialogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn init_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.init_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn init_file(mut self, name: impl Into<String>) -> Self {
        self.init_file = Some(name.into());
        self
    }

    pub fn filters(mut self, filters: impl IntoIterator<Item = FileFilter>) -> Self {
        self.filters = Some(filters.into_iter().collect());
        self
    }

    /// Appends one filter, starting from an empty list rather than the defaults.
    pub fn filter(mut self, filter: impl Into<FileFilter>) -> Self {
        self.filters.get_or_insert_with(Vec::new).push(filter.into());
        self
    }

    pub fn confirm_button_label(mut self, label: impl Into<String>) -> Self {
        self.confirm_button_label = Some(label.into());
        self
    }

    pub fn input_label(mut self, label: impl Into<String>) -> Self {
        self.input_label = Some(label.into());
        self
    }

    pub fn flags(mut self, flags: Fos) -> Self {
        self.flags |= flags;
        self
    }
}

/// Logging settings taken from the environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// `None` leaves the built-in default (Error | Warn) in place.
    pub mask: Option<u8>,
}

impl LogConfig {
    pub fn from_env() -> Self {
        let mask = std::env::var(LOG_ENV_VAR).ok().and_then(|v| parse_log_mask(&v));
        Self { mask }
    }
}

/// Accepts a level name (each level includes the ones above it) or a raw bitmask.
pub fn parse_log_mask(value: &str) -> Option<u8> {
    let value = value.trim();
    let mask = match value.to_ascii_lowercase().as_str() {
        "off" | "none" => LOG_LEVEL_NONE,
        "error" => LOG_LEVEL_ERROR,
        "warn" | "warning" => LOG_LEVEL_ERROR | LOG_LEVEL_WARN,
        "info" => LOG_LEVEL_ERROR | LOG_LEVEL_WARN | LOG_LEVEL_INFO,
        "trace" | "all" => LOG_LEVEL_ALL,
        other => {
            let n = match other.strip_prefix("0x") {
                Some(hex) => u8::from_str_radix(hex, 16).ok()?,
                None => other.parse::<u8>().ok()?,
            };
            n & LOG_LEVEL_ALL
        }
    };
    Some(mask)
}
