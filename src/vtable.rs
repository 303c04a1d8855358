//! Manual COM dispatch by vtable slot.
//!
//! Slot indices follow the interface layouts in `shobjidl_core.h`:
//!
//! - `IUnknown`: 0 QueryInterface, 1 AddRef, 2 Release
//! - `IModalWindow`: 3 Show
//! - `IFileDialog`: 4 SetFileTypes, 5 SetFileTypeIndex, 6 GetFileTypeIndex, 7 Advise,
//!   8 Unadvise, 9 SetOptions, 10 GetOptions, 11 SetDefaultFolder, 12 SetFolder,
//!   13 GetFolder, 14 GetCurrentSelection, 15 SetFileName, 16 GetFileName, 17 SetTitle,
//!   18 SetOkButtonLabel, 19 SetFileNameLabel, 20 GetResult, 21 AddPlace,
//!   22 SetDefaultExtension, 23 Close, 24 SetClientGuid, 25 ClearClientData, 26 SetFilter
//! - `IFileOpenDialog`: 27 GetResults, 28 GetSelectedItems
//! - `IShellItem`: 3 BindToHandler, 4 GetParent, 5 GetDisplayName
//! - `IShellItemArray`: 3 BindToHandler, 4 GetPropertyStore, 5 GetPropertyDescriptionList,
//!   6 GetAttributes, 7 GetCount, 8 GetItemAt
//!
//! COM has no reflection, so these numbers are the whole binding.

use std::mem::size_of;

use crate::types::*;

/// Parameter list after the implicit `this`. Every method returns an `HRESULT`
/// except `Release`, which returns the new reference count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signature {
    /// `()`
    Unit,
    /// `(HWND)`
    Hwnd,
    /// `(UINT, const COMDLG_FILTERSPEC*)`
    FilterSpecs,
    /// `(UINT)` / `(DWORD)`
    U32,
    /// `(UINT*)` / `(DWORD*)`
    OutU32,
    /// `(IShellItem*)`
    Item,
    /// `(LPCWSTR)`
    Wide,
    /// `(IUnknown**)`
    OutPtr,
    /// `(SIGDN, LPWSTR*)`
    SigdnOutWide,
    /// `(DWORD, IShellItem**)`
    U32OutPtr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Release,
    Show,
    SetFileTypes,
    SetFileTypeIndex,
    GetFileTypeIndex,
    SetOptions,
    GetOptions,
    SetFolder,
    SetFileName,
    SetTitle,
    SetOkButtonLabel,
    SetFileNameLabel,
    GetResult,
    GetResults,
    GetDisplayName,
    GetCount,
    GetItemAt,
}

#[derive(Debug, Clone, Copy)]
pub struct MethodEntry {
    pub method: Method,
    pub name: &'static str,
    pub slot: usize,
    pub signature: Signature,
}

const fn entry(method: Method, name: &'static str, slot: usize, signature: Signature) -> MethodEntry {
    MethodEntry { method, name, slot, signature }
}

/// Indexed by `Method as usize`.
pub static METHOD_TABLE: [MethodEntry; 17] = [
    entry(Method::Release, "IUnknown::Release", 2, Signature::Unit),
    entry(Method::Show, "IModalWindow::Show", 3, Signature::Hwnd),
    entry(Method::SetFileTypes, "IFileDialog::SetFileTypes", 4, Signature::FilterSpecs),
    entry(Method::SetFileTypeIndex, "IFileDialog::SetFileTypeIndex", 5, Signature::U32),
    entry(Method::GetFileTypeIndex, "IFileDialog::GetFileTypeIndex", 6, Signature::OutU32),
    entry(Method::SetOptions, "IFileDialog::SetOptions", 9, Signature::U32),
    entry(Method::GetOptions, "IFileDialog::GetOptions", 10, Signature::OutU32),
    entry(Method::SetFolder, "IFileDialog::SetFolder", 12, Signature::Item),
    entry(Method::SetFileName, "IFileDialog::SetFileName", 15, Signature::Wide),
    entry(Method::SetTitle, "IFileDialog::SetTitle", 17, Signature::Wide),
    entry(Method::SetOkButtonLabel, "IFileDialog::SetOkButtonLabel", 18, Signature::Wide),
    entry(Method::SetFileNameLabel, "IFileDialog::SetFileNameLabel", 19, Signature::Wide),
    entry(Method::GetResult, "IFileDialog::GetResult", 20, Signature::OutPtr),
    entry(Method::GetResults, "IFileOpenDialog::GetResults", 27, Signature::OutPtr),
    entry(Method::GetDisplayName, "IShellItem::GetDisplayName", 5, Signature::SigdnOutWide),
    entry(Method::GetCount, "IShellItemArray::GetCount", 7, Signature::OutU32),
    entry(Method::GetItemAt, "IShellItemArray::GetItemAt", 8, Signature::U32OutPtr),
];

impl Method {
    #[inline]
    pub fn entry(self) -> &'static MethodEntry {
        &METHOD_TABLE[self as usize]
    }

    #[inline]
    pub fn slot(self) -> usize {
        self.entry().slot
    }

    #[inline]
    pub fn name(self) -> &'static str {
        self.entry().name
    }

    #[inline]
    pub fn signature(self) -> Signature {
        self.entry().signature
    }
}

// --- Function pointer types, one per Signature ---

pub type ReleaseFn = unsafe extern "system" fn(*mut c_void) -> u32;
pub type HwndFn = unsafe extern "system" fn(*mut c_void, HWND) -> HRESULT;
pub type FilterSpecsFn = unsafe extern "system" fn(*mut c_void, u32, *const COMDLG_FILTERSPEC) -> HRESULT;
pub type U32Fn = unsafe extern "system" fn(*mut c_void, u32) -> HRESULT;
pub type OutU32Fn = unsafe extern "system" fn(*mut c_void, *mut u32) -> HRESULT;
pub type ItemFn = unsafe extern "system" fn(*mut c_void, *mut c_void) -> HRESULT;
pub type WideFn = unsafe extern "system" fn(*mut c_void, PCWSTR) -> HRESULT;
pub type OutPtrFn = unsafe extern "system" fn(*mut c_void, *mut *mut c_void) -> HRESULT;
pub type SigdnOutWideFn = unsafe extern "system" fn(*mut c_void, u32, *mut PWSTR) -> HRESULT;
pub type U32OutPtrFn = unsafe extern "system" fn(*mut c_void, u32, *mut *mut c_void) -> HRESULT;

/// Reads the function pointer stored at `method`'s slot of `this`'s vtable.
///
/// # Safety
/// `this` must be a live COM interface pointer whose vtable has `method`, and `F`
/// must be the `extern "system"` fn type for `method.signature()`.
#[inline]
pub unsafe fn resolve<F: Copy>(this: *mut c_void, method: Method) -> F { unsafe {
    debug_assert!(!this.is_null(), "resolve({}) on null interface", method.name());
    debug_assert_eq!(size_of::<F>(), size_of::<usize>());
    let vtbl = *(this as *const usize);
    let addr = vtbl + method.slot() * size_of::<usize>();
    std::mem::transmute_copy::<usize, F>(&*(addr as *const usize))
}}

#[inline]
pub fn is_null(p: *mut c_void) -> bool {
    p.is_null()
}

/// Calls `Release` on every non-null pointer. Nulls are skipped.
///
/// # Safety
/// Each non-null pointer must be a live COM interface the caller owns one reference to.
pub unsafe fn release(ptrs: &[*mut c_void]) { unsafe {
    for &p in ptrs {
        if !is_null(p) {
            let f: ReleaseFn = resolve(p, Method::Release);
            f(p);
        }
    }
}}

/// Releases `*slot` if set and clears it, so a later `release` is a no-op.
///
/// # Safety
/// See [`release`].
pub unsafe fn release_slot(slot: &mut *mut c_void) { unsafe {
    let p = std::mem::replace(slot, std::ptr::null_mut());
    release(&[p]);
}}

// --- Typed wrappers ---
// Safety for all of these: `this` must be a live interface of the kind named in the method table.

pub unsafe fn show(this: *mut c_void, owner: HWND) -> HRESULT { unsafe {
    let f: HwndFn = resolve(this, Method::Show);
    f(this, owner)
}}

pub unsafe fn set_file_types(this: *mut c_void, specs: &[COMDLG_FILTERSPEC]) -> HRESULT { unsafe {
    let f: FilterSpecsFn = resolve(this, Method::SetFileTypes);
    f(this, specs.len() as u32, specs.as_ptr())
}}

pub unsafe fn set_file_type_index(this: *mut c_void, index: u32) -> HRESULT { unsafe {
    let f: U32Fn = resolve(this, Method::SetFileTypeIndex);
    f(this, index)
}}

pub unsafe fn get_file_type_index(this: *mut c_void, index: &mut u32) -> HRESULT { unsafe {
    let f: OutU32Fn = resolve(this, Method::GetFileTypeIndex);
    f(this, index)
}}

pub unsafe fn set_options(this: *mut c_void, options: u32) -> HRESULT { unsafe {
    let f: U32Fn = resolve(this, Method::SetOptions);
    f(this, options)
}}

pub unsafe fn get_options(this: *mut c_void, options: &mut u32) -> HRESULT { unsafe {
    let f: OutU32Fn = resolve(this, Method::GetOptions);
    f(this, options)
}}

pub unsafe fn set_folder(this: *mut c_void, item: *mut c_void) -> HRESULT { unsafe {
    let f: ItemFn = resolve(this, Method::SetFolder);
    f(this, item)
}}

/// `method` must be one of the `Signature::Wide` setters.
pub unsafe fn set_wide(this: *mut c_void, method: Method, value: &[u16]) -> HRESULT { unsafe {
    debug_assert_eq!(method.signature(), Signature::Wide);
    let f: WideFn = resolve(this, method);
    f(this, value.as_ptr())
}}

pub unsafe fn get_result(this: *mut c_void, item: &mut *mut c_void) -> HRESULT { unsafe {
    let f: OutPtrFn = resolve(this, Method::GetResult);
    f(this, item)
}}

pub unsafe fn get_results(this: *mut c_void, items: &mut *mut c_void) -> HRESULT { unsafe {
    let f: OutPtrFn = resolve(this, Method::GetResults);
    f(this, items)
}}

pub unsafe fn get_display_name(this: *mut c_void, sigdn: u32, name: &mut PWSTR) -> HRESULT { unsafe {
    let f: SigdnOutWideFn = resolve(this, Method::GetDisplayName);
    f(this, sigdn, name)
}}

pub unsafe fn get_count(this: *mut c_void, count: &mut u32) -> HRESULT { unsafe {
    let f: OutU32Fn = resolve(this, Method::GetCount);
    f(this, count)
}}

pub unsafe fn get_item_at(this: *mut c_void, index: u32, item: &mut *mut c_void) -> HRESULT { unsafe {
    let f: U32OutPtrFn = resolve(this, Method::GetItemAt);
    f(this, index, item)
}}
