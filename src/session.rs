//! One dialog invocation: create, configure, show, extract, release.
//!
//! Every interface pointer lives in [`Handles`], whose `Drop` releases whatever is
//! still held, and COM is torn down by [`Apartment`] after that. Early returns
//! therefore never leak, and nothing is released twice because per-item pointers
//! are cleared as soon as they are released.
//!
//! Sessions are only started by [`crate::NativeFileDialog`], after its platform check:
//!
//! ```compile_fail
//! use nativefiledialog::session::{run, SessionConfig};
//! use nativefiledialog::shell::OleShell;
//!
//! let _ = run(&OleShell, &SessionConfig::default());
//! ```

use std::path::PathBuf;

use crate::error::{DialogError, Result};
use crate::filter::FileFilter;
use crate::flags::Fos;
use crate::guid::{self, GuidExt, IID_ISHELL_ITEM};
use crate::shell::Shell;
use crate::types::*;
use crate::utils::{hresult_hex, os_from_wide_ptr, path_to_wstring, to_wstring, ToPcwstr};
use crate::vtable::{self, is_null, Method};
use crate::{log_info, log_trace, log_warn};

/// Everything a single invocation needs.
#[derive(Debug, Clone, Default)]
pub(crate) struct SessionConfig {
    pub title: Option<String>,
    pub init_dir: Option<PathBuf>,
    pub init_file: Option<String>,
    pub multiselect: bool,
    pub confirm_button_label: Option<String>,
    pub input_label: Option<String>,
    pub flags: Fos,
    /// Order matters: the dialog reports the active filter by 1-based position.
    pub filters: Vec<FileFilter>,
    pub save_mode: bool,
}

/// Outcome of a dialog that was not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The user cancelled.
    None,
    One(PathBuf),
    Many(Vec<PathBuf>),
}

impl Selection {
    fn from_paths(mut paths: Vec<PathBuf>, multiselect: bool) -> Self {
        if paths.is_empty() {
            Selection::None
        } else if multiselect {
            Selection::Many(paths)
        } else {
            Selection::One(paths.swap_remove(0))
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Selection::None)
    }

    /// First path, if any.
    pub fn into_single(self) -> Option<PathBuf> {
        match self {
            Selection::None => None,
            Selection::One(p) => Some(p),
            Selection::Many(v) => v.into_iter().next(),
        }
    }

    pub fn into_many(self) -> Option<Vec<PathBuf>> {
        match self {
            Selection::None => None,
            Selection::One(p) => Some(vec![p]),
            Selection::Many(v) => Some(v),
        }
    }
}

/// Pairs a successful `CoInitializeEx` with `CoUninitialize`.
struct Apartment<'a, S: Shell> {
    shell: &'a S,
}

impl<S: Shell> Drop for Apartment<'_, S> {
    fn drop(&mut self) {
        self.shell.uninitialize();
    }
}

/// Interface pointers owned by the session.
struct Handles {
    dialog: *mut c_void,
    folder: *mut c_void,
    items: *mut c_void,
    item: *mut c_void,
}

impl Default for Handles {
    fn default() -> Self {
        Self {
            dialog: std::ptr::null_mut(),
            folder: std::ptr::null_mut(),
            items: std::ptr::null_mut(),
            item: std::ptr::null_mut(),
        }
    }
}

impl Drop for Handles {
    fn drop(&mut self) {
        unsafe { vtable::release(&[self.item, self.items, self.folder, self.dialog]) }
    }
}

/// A string from the COM task allocator, freed on drop.
struct TaskString<'a, S: Shell> {
    ptr: PWSTR,
    shell: &'a S,
}

impl<S: Shell> Drop for TaskString<'_, S> {
    fn drop(&mut self) {
        unsafe { self.shell.free_string(self.ptr) }
    }
}

/// Runs the dialog to completion on the calling thread.
///
/// Callers go through `NativeFileDialog`, which has already checked the platform.
pub(crate) fn run<S: Shell>(shell: &S, config: &SessionConfig) -> Result<Selection> {
    let hr = shell.initialize();
    if failed(hr) {
        return Err(DialogError::com_init(hr));
    }
    // Declared before `handles` so it drops after every pointer is released.
    let _apartment = Apartment { shell };
    let mut handles = Handles::default();

    let (clsid, iid) = guid::dialog_ids(config.save_mode);
    log_trace!("CoCreateInstance clsid={} iid={}", clsid.to_braced_upper(), iid.to_braced_upper());
    let hr = shell.create_instance(clsid, iid, &mut handles.dialog);
    if failed(hr) || is_null(handles.dialog) {
        return Err(DialogError::creation(or_pointer(hr)));
    }

    unsafe { configure(shell, config, &mut handles) };

    let hr = unsafe { vtable::show(handles.dialog, HWND_NONE) };
    if hr == HRESULT_CANCELLED {
        log_info!("dialog cancelled by user");
        return Ok(Selection::None);
    }
    if failed(hr) {
        return Err(DialogError::invocation(hr));
    }

    let paths = unsafe {
        if config.save_mode {
            extract_saved(shell, config, &mut handles)?
        } else {
            extract_opened(shell, &mut handles)?
        }
    };
    log_info!("dialog returned {} path(s)", paths.len());
    Ok(Selection::from_paths(paths, config.multiselect))
}

/// A success code paired with a null out-pointer still counts as a failure.
fn or_pointer(hr: HRESULT) -> HRESULT {
    if failed(hr) { hr } else { E_POINTER }
}

/// Configuration calls are best effort: a failing setter is logged and the dialog still shows.
fn check(method: Method, hr: HRESULT) {
    if failed(hr) {
        log_warn!("{} failed with HRESULT {}", method.name(), hresult_hex(hr));
    }
}

unsafe fn configure<S: Shell>(shell: &S, config: &SessionConfig, h: &mut Handles) { unsafe {
    // Read-modify-write; without a successful read the options are left alone.
    let mut current = 0u32;
    let hr = vtable::get_options(h.dialog, &mut current);
    if failed(hr) {
        log_warn!("{} failed with HRESULT {}, leaving dialog options untouched", Method::GetOptions.name(), hresult_hex(hr));
    } else {
        let options = Fos::compose(Fos(current), config.multiselect, config.flags);
        log_trace!("options {:?} -> {:?}", Fos(current), options);
        check(Method::SetOptions, vtable::set_options(h.dialog, options.bits()));
    }

    let prepared = FileFilter::prepare(&config.filters);
    if !prepared.is_empty() {
        let wide: Vec<(Vec<u16>, Vec<u16>)> = prepared
            .iter()
            .map(|(label, pattern)| (to_wstring(label), to_wstring(pattern)))
            .collect();
        let specs: Vec<COMDLG_FILTERSPEC> = wide
            .iter()
            .map(|(label, pattern)| COMDLG_FILTERSPEC { pszName: label.as_ptr(), pszSpec: pattern.as_ptr() })
            .collect();
        check(Method::SetFileTypes, vtable::set_file_types(h.dialog, &specs));
        check(Method::SetFileTypeIndex, vtable::set_file_type_index(h.dialog, 1));
    }

    let texts = [
        (Method::SetTitle, &config.title),
        (Method::SetFileName, &config.init_file),
        (Method::SetOkButtonLabel, &config.confirm_button_label),
        (Method::SetFileNameLabel, &config.input_label),
    ];
    for (method, value) in texts {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            check(method, vtable::set_wide(h.dialog, method, &value.to_pcwstr()));
        }
    }

    if let Some(dir) = config.init_dir.as_deref().filter(|d| !d.as_os_str().is_empty()) {
        let wide = path_to_wstring(dir);
        let hr = shell.create_item_from_parsing_name(&wide, &IID_ISHELL_ITEM, &mut h.folder);
        if succeeded(hr) && !is_null(h.folder) {
            check(Method::SetFolder, vtable::set_folder(h.dialog, h.folder));
        } else {
            log_warn!(
                "initial directory {} could not be resolved ({}), showing dialog without it",
                dir.display(),
                hresult_hex(hr)
            );
        }
    }
}}

/// Filesystem path of a shell item, code units preserved.
unsafe fn read_path<S: Shell>(shell: &S, item: *mut c_void) -> Result<PathBuf> { unsafe {
    let mut name = TaskString { ptr: std::ptr::null_mut(), shell };
    let hr = vtable::get_display_name(item, SIGDN_FILESYSPATH, &mut name.ptr);
    if failed(hr) || name.ptr.is_null() {
        return Err(DialogError::extraction(Method::GetDisplayName.name(), or_pointer(hr)));
    }
    os_from_wide_ptr(name.ptr)
        .map(PathBuf::from)
        .ok_or(DialogError::extraction(Method::GetDisplayName.name(), E_POINTER))
}}

unsafe fn extract_opened<S: Shell>(shell: &S, h: &mut Handles) -> Result<Vec<PathBuf>> { unsafe {
    let hr = vtable::get_results(h.dialog, &mut h.items);
    if failed(hr) || is_null(h.items) {
        return Err(DialogError::extraction(Method::GetResults.name(), or_pointer(hr)));
    }

    let mut count = 0u32;
    let hr = vtable::get_count(h.items, &mut count);
    if failed(hr) {
        return Err(DialogError::extraction(Method::GetCount.name(), hr));
    }

    let mut paths = Vec::with_capacity(count as usize);
    for i in 0..count {
        let hr = vtable::get_item_at(h.items, i, &mut h.item);
        if failed(hr) || is_null(h.item) {
            log_warn!("item {} of {} unavailable, discarding {} collected path(s)", i, count, paths.len());
            return Err(DialogError::extraction(Method::GetItemAt.name(), or_pointer(hr)));
        }
        let path = read_path(shell, h.item);
        vtable::release_slot(&mut h.item);
        paths.push(path?);
    }
    Ok(paths)
}}

unsafe fn extract_saved<S: Shell>(shell: &S, config: &SessionConfig, h: &mut Handles) -> Result<Vec<PathBuf>> { unsafe {
    let hr = vtable::get_result(h.dialog, &mut h.item);
    if failed(hr) || is_null(h.item) {
        return Err(DialogError::extraction(Method::GetResult.name(), or_pointer(hr)));
    }
    let path = read_path(shell, h.item);
    vtable::release_slot(&mut h.item);
    let path = path?;

    if config.filters.is_empty() {
        return Ok(vec![path]);
    }
    let mut index = 0u32;
    let hr = vtable::get_file_type_index(h.dialog, &mut index);
    if failed(hr) {
        log_warn!("{} failed with HRESULT {}, keeping path as typed", Method::GetFileTypeIndex.name(), hresult_hex(hr));
        return Ok(vec![path]);
    }
    Ok(vec![apply_filter_extension(&config.filters, index, path)])
}}

/// Maps the dialog's 1-based filter index back onto `filters`.
pub(crate) fn filter_for_index(filters: &[FileFilter], index: u32) -> Option<&FileFilter> {
    (index as usize).checked_sub(1).and_then(|i| filters.get(i))
}

/// Appends the active filter's default extension unless the path already matches it.
pub(crate) fn apply_filter_extension(filters: &[FileFilter], index: u32, path: PathBuf) -> PathBuf {
    match filter_for_index(filters, index) {
        Some(filter) => PathBuf::from(filter.normalize_extension(path)),
        None => {
            log_warn!("filter index {} outside 1..={}, keeping path as typed", index, filters.len());
            path
        }
    }
}
