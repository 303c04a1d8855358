//! The public entry points: one method per dialog kind.

use std::path::PathBuf;

use crate::config::DialogConfig;
use crate::error::Result;
use crate::filter::{default_open_filters, default_save_filters};
use crate::flags::Fos;
use crate::log_error;
use crate::platform;
use crate::session::{self, SessionConfig};
use crate::shell::{OleShell, Shell};

/// Native Open/Save/Folder dialogs.
///
/// Every call is modal and blocks the calling thread until the user closes the
/// dialog. A cancelled dialog yields `Ok(None)`.
#[derive(Debug, Clone)]
pub struct NativeFileDialog<S: Shell = OleShell> {
    shell: S,
}

impl NativeFileDialog<OleShell> {
    /// Fails with `PlatformUnsupported` unless running on Vista or newer.
    pub fn new() -> Result<Self> {
        platform::ensure_supported()?;
        Ok(Self { shell: OleShell })
    }
}

impl<S: Shell> NativeFileDialog<S> {
    #[cfg(test)]
    pub(crate) fn with_shell(shell: S) -> Self {
        Self { shell }
    }

    /// Folder picker.
    pub fn get_dir(&self, config: DialogConfig) -> Result<Option<PathBuf>> {
        let session = SessionConfig {
            title: config.title,
            init_dir: config.init_dir,
            init_file: None,
            multiselect: false,
            confirm_button_label: config.confirm_button_label,
            input_label: config.input_label,
            flags: Fos::PICKFOLDERS | config.flags,
            filters: Vec::new(),
            save_mode: false,
        };
        self.run(&session).map(|s| s.into_single())
    }

    /// Open dialog for one existing file.
    pub fn get_file(&self, config: DialogConfig) -> Result<Option<PathBuf>> {
        self.run(&open_session(config, false)).map(|s| s.into_single())
    }

    /// Open dialog allowing several files; paths come back in dialog order.
    pub fn get_files(&self, config: DialogConfig) -> Result<Option<Vec<PathBuf>>> {
        self.run(&open_session(config, true)).map(|s| s.into_many())
    }

    /// Save dialog. The active filter's extension is appended when the typed name lacks it.
    pub fn set_file(&self, config: DialogConfig) -> Result<Option<PathBuf>> {
        let filters = config.filters.unwrap_or_else(default_save_filters);
        let strict = if filters.is_empty() { Fos::NONE } else { Fos::STRICTFILETYPES };
        let session = SessionConfig {
            title: config.title,
            init_dir: config.init_dir,
            init_file: config.init_file,
            multiselect: false,
            confirm_button_label: config.confirm_button_label,
            input_label: config.input_label,
            flags: strict | config.flags,
            filters,
            save_mode: true,
        };
        self.run(&session).map(|s| s.into_single())
    }

    fn run(&self, session: &SessionConfig) -> Result<session::Selection> {
        session::run(&self.shell, session).inspect_err(|e| log_error!("{}", e))
    }
}

fn open_session(config: DialogConfig, multiselect: bool) -> SessionConfig {
    SessionConfig {
        title: config.title,
        init_dir: config.init_dir,
        init_file: config.init_file,
        multiselect,
        confirm_button_label: config.confirm_button_label,
        input_label: config.input_label,
        flags: config.flags,
        filters: config.filters.unwrap_or_else(default_open_filters),
        save_mode: false,
    }
}
