//! The flat OS entry points a dialog session needs.
//!
//! Everything else is reached through vtables (see [`crate::vtable`]), so this is
//! the only place that links against `ole32` / `shell32`.

use crate::types::*;

#[cfg(test)]
pub(crate) mod fake;

pub trait Shell {
    /// `CoInitializeEx` for the calling thread.
    fn initialize(&self) -> HRESULT;

    /// `CoUninitialize`; only called after a successful `initialize`.
    fn uninitialize(&self);

    /// `CoCreateInstance` for an in-process server.
    fn create_instance(&self, clsid: &GUID, iid: &GUID, out: &mut *mut c_void) -> HRESULT;

    /// `SHCreateItemFromParsingName`. `path` is null-terminated UTF-16.
    fn create_item_from_parsing_name(&self, path: &[u16], iid: &GUID, out: &mut *mut c_void) -> HRESULT;

    /// `CoTaskMemFree` for strings handed out by `IShellItem::GetDisplayName`.
    ///
    /// # Safety
    /// `s` must be null or a string allocated by the COM task allocator that has not been freed yet.
    unsafe fn free_string(&self, s: PWSTR);
}

/// The real Windows shell.
#[derive(Debug, Default, Clone, Copy)]
pub struct OleShell;

#[cfg(windows)]
impl Shell for OleShell {
    fn initialize(&self) -> HRESULT {
        use windows_sys::Win32::System::Com::CoInitializeEx;
        unsafe { CoInitializeEx(std::ptr::null(), COINIT_APARTMENTTHREADED as _) }
    }

    fn uninitialize(&self) {
        use windows_sys::Win32::System::Com::CoUninitialize;
        unsafe { CoUninitialize() }
    }

    fn create_instance(&self, clsid: &GUID, iid: &GUID, out: &mut *mut c_void) -> HRESULT {
        use windows_sys::Win32::System::Com::CoCreateInstance;
        unsafe { CoCreateInstance(clsid, std::ptr::null_mut(), CLSCTX_INPROC_SERVER, iid, out) }
    }

    fn create_item_from_parsing_name(&self, path: &[u16], iid: &GUID, out: &mut *mut c_void) -> HRESULT {
        use windows_sys::Win32::UI::Shell::SHCreateItemFromParsingName;
        debug_assert_eq!(path.last(), Some(&0));
        unsafe { SHCreateItemFromParsingName(path.as_ptr(), std::ptr::null_mut(), iid, out) }
    }

    unsafe fn free_string(&self, s: PWSTR) {
        use windows_sys::Win32::System::Com::CoTaskMemFree;
        if !s.is_null() {
            unsafe { CoTaskMemFree(s as *const c_void) }
        }
    }
}

// Never reached: `NativeFileDialog::new` refuses to construct off Windows.
#[cfg(not(windows))]
impl Shell for OleShell {
    fn initialize(&self) -> HRESULT {
        E_NOTIMPL
    }

    fn uninitialize(&self) {}

    fn create_instance(&self, _clsid: &GUID, _iid: &GUID, out: &mut *mut c_void) -> HRESULT {
        *out = std::ptr::null_mut();
        E_NOTIMPL
    }

    fn create_item_from_parsing_name(&self, _path: &[u16], _iid: &GUID, out: &mut *mut c_void) -> HRESULT {
        *out = std::ptr::null_mut();
        E_NOTIMPL
    }

    unsafe fn free_string(&self, _s: PWSTR) {}
}
