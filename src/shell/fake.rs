//! In-memory shell for tests.
//!
//! Objects handed out carry real vtables laid out at the documented slots, so the
//! session code runs through `vtable::resolve` exactly as it does against the OS.
//! Every acquisition and release is counted in a ledger.

use std::cell::{Cell, RefCell};

use super::Shell;
use crate::guid::{guid_eq, CLSID_FILE_SAVE_DIALOG};
use crate::types::*;
use crate::utils::from_wide_ptr;
use crate::vtable::Method;

const E_INVALIDARG: HRESULT = 0x80070057u32 as HRESULT;

/// What the fake shell and its objects answer.
#[derive(Debug, Clone, Default)]
pub(crate) struct Script {
    pub init_hr: HRESULT,
    pub create_hr: HRESULT,
    pub null_dialog: bool,
    pub folder_hr: HRESULT,
    pub initial_options: u32,
    pub get_options_hr: HRESULT,
    pub show_hr: HRESULT,
    /// UTF-16 paths without terminator, so ill-formed names can be scripted.
    pub selection: Vec<Vec<u16>>,
    /// Index reported by GetFileTypeIndex; 0 echoes whatever SetFileTypeIndex stored.
    pub file_type_index: u32,
    pub get_file_type_index_hr: HRESULT,
    pub get_result_hr: HRESULT,
    pub get_results_hr: HRESULT,
    pub get_count_hr: HRESULT,
    pub fail_item_at: Option<u32>,
    pub fail_display_name_at: Option<u32>,
}

impl Script {
    pub fn selecting(paths: &[&str]) -> Self {
        Self::selecting_wide(paths.iter().map(|p| p.encode_utf16().collect()).collect())
    }

    pub fn selecting_wide(paths: Vec<Vec<u16>>) -> Self {
        Self { selection: paths, ..Default::default() }
    }
}

/// What the session asked the dialog to do.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Recorded {
    pub save_dialog: Option<bool>,
    pub options: Option<u32>,
    pub file_types: Vec<(String, String)>,
    pub file_type_index: Option<u32>,
    pub title: Option<String>,
    pub file_name: Option<String>,
    pub ok_label: Option<String>,
    pub field_label: Option<String>,
    pub folder: Option<String>,
    /// Exact code units the folder was parsed from.
    pub folder_wide: Option<Vec<u16>>,
    pub shown: bool,
    pub owner_was_null: bool,
}

#[derive(Default)]
struct Ledger {
    acquired: u32,
    released: u32,
    over_released: u32,
    inits_ok: u32,
    uninits: u32,
    strings_out: u32,
    live_strings: Vec<Box<[u16]>>,
    bad_frees: u32,
    objects: Vec<Box<FakeObject>>,
    recorded: Recorded,
}

struct Fixture {
    script: Script,
    ledger: RefCell<Ledger>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    OpenDialog,
    SaveDialog,
    Folder,
    Item,
    Array,
}

#[repr(C)]
struct FakeObject {
    vtbl: *const usize,
    table: Vec<usize>,
    fx: *const Fixture,
    kind: Kind,
    refs: Cell<u32>,
    path: Vec<u16>,
    index: u32,
}

pub(crate) struct FakeShell {
    fx: Box<Fixture>,
}

/// Counts read back after a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Balance {
    pub acquired: u32,
    pub released: u32,
    pub over_released: u32,
    pub inits_ok: u32,
    pub uninits: u32,
    pub strings_out: u32,
    pub strings_leaked: u32,
    pub bad_frees: u32,
}

impl FakeShell {
    pub fn new(script: Script) -> Self {
        Self { fx: Box::new(Fixture { script, ledger: RefCell::new(Ledger::default()) }) }
    }

    pub fn recorded(&self) -> Recorded {
        self.fx.ledger.borrow().recorded.clone()
    }

    pub fn balance(&self) -> Balance {
        let l = self.fx.ledger.borrow();
        Balance {
            acquired: l.acquired,
            released: l.released,
            over_released: l.over_released,
            inits_ok: l.inits_ok,
            uninits: l.uninits,
            strings_out: l.strings_out,
            strings_leaked: l.live_strings.len() as u32,
            bad_frees: l.bad_frees,
        }
    }

    /// Every acquired object released exactly once, every string freed, COM torn down.
    pub fn assert_clean(&self) {
        let b = self.balance();
        assert_eq!(b.acquired, b.released, "acquire/release mismatch: {:?}", b);
        assert_eq!(b.over_released, 0, "double release: {:?}", b);
        assert_eq!(b.inits_ok, b.uninits, "CoInitialize/CoUninitialize mismatch: {:?}", b);
        assert_eq!(b.strings_leaked, 0, "display name leaked: {:?}", b);
        assert_eq!(b.bad_frees, 0, "foreign string freed: {:?}", b);
    }

    fn fixture(&self) -> &Fixture {
        &self.fx
    }
}

impl Shell for FakeShell {
    fn initialize(&self) -> HRESULT {
        let fx = self.fixture();
        if succeeded(fx.script.init_hr) {
            fx.ledger.borrow_mut().inits_ok += 1;
        }
        fx.script.init_hr
    }

    fn uninitialize(&self) {
        self.fixture().ledger.borrow_mut().uninits += 1;
    }

    fn create_instance(&self, clsid: &GUID, _iid: &GUID, out: &mut *mut c_void) -> HRESULT {
        let fx = self.fixture();
        *out = std::ptr::null_mut();
        if failed(fx.script.create_hr) {
            return fx.script.create_hr;
        }
        if fx.script.null_dialog {
            return S_OK;
        }
        let save = guid_eq(clsid, &CLSID_FILE_SAVE_DIALOG);
        fx.ledger.borrow_mut().recorded.save_dialog = Some(save);
        let kind = if save { Kind::SaveDialog } else { Kind::OpenDialog };
        *out = new_object(fx, kind, Vec::new(), 0);
        S_OK
    }

    fn create_item_from_parsing_name(&self, path: &[u16], _iid: &GUID, out: &mut *mut c_void) -> HRESULT {
        let fx = self.fixture();
        *out = std::ptr::null_mut();
        if failed(fx.script.folder_hr) {
            return fx.script.folder_hr;
        }
        let path = path.iter().copied().take_while(|&u| u != 0).collect();
        *out = new_object(fx, Kind::Folder, path, 0);
        S_OK
    }

    unsafe fn free_string(&self, s: PWSTR) {
        if s.is_null() {
            return;
        }
        let mut l = self.fixture().ledger.borrow_mut();
        match l.live_strings.iter().position(|b| b.as_ptr() == s as *const u16) {
            Some(i) => {
                l.live_strings.remove(i);
            }
            None => l.bad_frees += 1,
        }
    }
}

fn new_object(fx: &Fixture, kind: Kind, path: Vec<u16>, index: u32) -> *mut c_void {
    let table = build_table(kind);
    let mut obj = Box::new(FakeObject {
        vtbl: std::ptr::null(),
        table,
        fx: fx as *const Fixture,
        kind,
        refs: Cell::new(1),
        path,
        index,
    });
    obj.vtbl = obj.table.as_ptr();
    let ptr = &*obj as *const FakeObject as *mut c_void;
    let mut l = fx.ledger.borrow_mut();
    l.acquired += 1;
    l.objects.push(obj);
    ptr
}

fn build_table(kind: Kind) -> Vec<usize> {
    let mut t = vec![unexpected as usize; 32];
    t[Method::Release.slot()] = release as usize;
    match kind {
        Kind::OpenDialog | Kind::SaveDialog => {
            t[Method::Show.slot()] = show as usize;
            t[Method::SetFileTypes.slot()] = set_file_types as usize;
            t[Method::SetFileTypeIndex.slot()] = set_file_type_index as usize;
            t[Method::GetFileTypeIndex.slot()] = get_file_type_index as usize;
            t[Method::SetOptions.slot()] = set_options as usize;
            t[Method::GetOptions.slot()] = get_options as usize;
            t[Method::SetFolder.slot()] = set_folder as usize;
            t[Method::SetFileName.slot()] = set_file_name as usize;
            t[Method::SetTitle.slot()] = set_title as usize;
            t[Method::SetOkButtonLabel.slot()] = set_ok_label as usize;
            t[Method::SetFileNameLabel.slot()] = set_field_label as usize;
            t[Method::GetResult.slot()] = get_result as usize;
            if kind == Kind::OpenDialog {
                t[Method::GetResults.slot()] = get_results as usize;
            }
        }
        Kind::Folder | Kind::Item => {
            t[Method::GetDisplayName.slot()] = get_display_name as usize;
        }
        Kind::Array => {
            t[Method::GetCount.slot()] = get_count as usize;
            t[Method::GetItemAt.slot()] = get_item_at as usize;
        }
    }
    t
}

unsafe fn this<'a>(p: *mut c_void) -> (&'a FakeObject, &'a Fixture) {
    unsafe {
        let o = &*(p as *const FakeObject);
        (o, &*o.fx)
    }
}

unsafe extern "system" fn unexpected(_this: *mut c_void) -> HRESULT {
    E_NOTIMPL
}

unsafe extern "system" fn release(p: *mut c_void) -> u32 {
    let (o, fx) = unsafe { this(p) };
    let mut l = fx.ledger.borrow_mut();
    if o.refs.get() == 0 {
        l.over_released += 1;
        return 0;
    }
    o.refs.set(o.refs.get() - 1);
    l.released += 1;
    o.refs.get()
}

unsafe extern "system" fn show(p: *mut c_void, owner: HWND) -> HRESULT {
    let (_, fx) = unsafe { this(p) };
    let mut l = fx.ledger.borrow_mut();
    l.recorded.shown = true;
    l.recorded.owner_was_null = owner.is_null();
    fx.script.show_hr
}

unsafe extern "system" fn set_file_types(p: *mut c_void, count: u32, specs: *const COMDLG_FILTERSPEC) -> HRESULT {
    let (_, fx) = unsafe { this(p) };
    let specs = unsafe { std::slice::from_raw_parts(specs, count as usize) };
    let types = specs
        .iter()
        .map(|s| unsafe {
            (
                from_wide_ptr(s.pszName).unwrap_or_default(),
                from_wide_ptr(s.pszSpec).unwrap_or_default(),
            )
        })
        .collect();
    fx.ledger.borrow_mut().recorded.file_types = types;
    S_OK
}

unsafe extern "system" fn set_file_type_index(p: *mut c_void, index: u32) -> HRESULT {
    let (_, fx) = unsafe { this(p) };
    fx.ledger.borrow_mut().recorded.file_type_index = Some(index);
    S_OK
}

unsafe extern "system" fn get_file_type_index(p: *mut c_void, out: *mut u32) -> HRESULT {
    let (_, fx) = unsafe { this(p) };
    if failed(fx.script.get_file_type_index_hr) {
        return fx.script.get_file_type_index_hr;
    }
    let index = match fx.script.file_type_index {
        0 => fx.ledger.borrow().recorded.file_type_index.unwrap_or(0),
        i => i,
    };
    unsafe { *out = index };
    S_OK
}

unsafe extern "system" fn set_options(p: *mut c_void, options: u32) -> HRESULT {
    let (_, fx) = unsafe { this(p) };
    fx.ledger.borrow_mut().recorded.options = Some(options);
    S_OK
}

unsafe extern "system" fn get_options(p: *mut c_void, out: *mut u32) -> HRESULT {
    let (_, fx) = unsafe { this(p) };
    if failed(fx.script.get_options_hr) {
        return fx.script.get_options_hr;
    }
    unsafe { *out = fx.script.initial_options };
    S_OK
}

unsafe extern "system" fn set_folder(p: *mut c_void, item: *mut c_void) -> HRESULT {
    let (_, fx) = unsafe { this(p) };
    let (folder, _) = unsafe { this(item) };
    debug_assert_eq!(folder.kind, Kind::Folder);
    let mut l = fx.ledger.borrow_mut();
    l.recorded.folder = Some(String::from_utf16_lossy(&folder.path));
    l.recorded.folder_wide = Some(folder.path.clone());
    S_OK
}

fn record_wide(p: *mut c_void, value: PCWSTR, pick: fn(&mut Recorded) -> &mut Option<String>) -> HRESULT {
    let (_, fx) = unsafe { this(p) };
    let text = unsafe { from_wide_ptr(value) };
    *pick(&mut fx.ledger.borrow_mut().recorded) = text;
    S_OK
}

unsafe extern "system" fn set_file_name(p: *mut c_void, v: PCWSTR) -> HRESULT {
    record_wide(p, v, |r| &mut r.file_name)
}

unsafe extern "system" fn set_title(p: *mut c_void, v: PCWSTR) -> HRESULT {
    record_wide(p, v, |r| &mut r.title)
}

unsafe extern "system" fn set_ok_label(p: *mut c_void, v: PCWSTR) -> HRESULT {
    record_wide(p, v, |r| &mut r.ok_label)
}

unsafe extern "system" fn set_field_label(p: *mut c_void, v: PCWSTR) -> HRESULT {
    record_wide(p, v, |r| &mut r.field_label)
}

unsafe extern "system" fn get_result(p: *mut c_void, out: *mut *mut c_void) -> HRESULT {
    let (_, fx) = unsafe { this(p) };
    unsafe { *out = std::ptr::null_mut() };
    if failed(fx.script.get_result_hr) {
        return fx.script.get_result_hr;
    }
    match fx.script.selection.first() {
        Some(path) => {
            unsafe { *out = new_object(fx, Kind::Item, path.clone(), 0) };
            S_OK
        }
        None => E_FAIL,
    }
}

unsafe extern "system" fn get_results(p: *mut c_void, out: *mut *mut c_void) -> HRESULT {
    let (_, fx) = unsafe { this(p) };
    unsafe { *out = std::ptr::null_mut() };
    if failed(fx.script.get_results_hr) {
        return fx.script.get_results_hr;
    }
    unsafe { *out = new_object(fx, Kind::Array, Vec::new(), 0) };
    S_OK
}

unsafe extern "system" fn get_display_name(p: *mut c_void, sigdn: u32, out: *mut PWSTR) -> HRESULT {
    let (o, fx) = unsafe { this(p) };
    unsafe { *out = std::ptr::null_mut() };
    if sigdn != SIGDN_FILESYSPATH {
        return E_INVALIDARG;
    }
    if o.kind == Kind::Item && fx.script.fail_display_name_at == Some(o.index) {
        return E_FAIL;
    }
    let mut wide: Box<[u16]> = o.path.iter().copied().chain(std::iter::once(0)).collect();
    let ptr = wide.as_mut_ptr();
    let mut l = fx.ledger.borrow_mut();
    l.live_strings.push(wide);
    l.strings_out += 1;
    unsafe { *out = ptr };
    S_OK
}

unsafe extern "system" fn get_count(p: *mut c_void, out: *mut u32) -> HRESULT {
    let (_, fx) = unsafe { this(p) };
    if failed(fx.script.get_count_hr) {
        return fx.script.get_count_hr;
    }
    unsafe { *out = fx.script.selection.len() as u32 };
    S_OK
}

unsafe extern "system" fn get_item_at(p: *mut c_void, index: u32, out: *mut *mut c_void) -> HRESULT {
    let (_, fx) = unsafe { this(p) };
    unsafe { *out = std::ptr::null_mut() };
    if fx.script.fail_item_at == Some(index) {
        return E_FAIL;
    }
    match fx.script.selection.get(index as usize) {
        Some(path) => {
            unsafe { *out = new_object(fx, Kind::Item, path.clone(), index) };
            S_OK
        }
        None => E_INVALIDARG,
    }
}
