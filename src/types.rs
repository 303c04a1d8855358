#![allow(non_camel_case_types, non_snake_case)]

// Basic Types
pub type DWORD = u32;
pub type HANDLE = *mut c_void;
pub type HWND = HANDLE;
pub type HRESULT = windows_sys::core::HRESULT;
pub type PCWSTR = *const u16;
pub type PWSTR = *mut u16;
pub use std::ffi::c_void;
pub use windows_sys::core::GUID;

// Constants
pub const S_OK: HRESULT = 0;
pub const E_POINTER: HRESULT = 0x80004003u32 as HRESULT;
pub const E_FAIL: HRESULT = 0x80004005u32 as HRESULT;
pub const E_NOTIMPL: HRESULT = 0x80004001u32 as HRESULT;

/// HRESULT_FROM_WIN32(ERROR_CANCELLED), returned by `IModalWindow::Show` when the user dismisses the dialog.
pub const HRESULT_CANCELLED: HRESULT = 0x800704C7u32 as HRESULT;

// COM
pub const CLSCTX_INPROC_SERVER: u32 = 0x1;
pub const COINIT_APARTMENTTHREADED: u32 = 0x2;

/// SIGDN_FILESYSPATH for `IShellItem::GetDisplayName`.
pub const SIGDN_FILESYSPATH: u32 = 0x80058000;

/// No owner window.
pub const HWND_NONE: HWND = std::ptr::null_mut();

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct COMDLG_FILTERSPEC {
    pub pszName: PCWSTR,
    pub pszSpec: PCWSTR,
}

#[inline]
pub const fn succeeded(hr: HRESULT) -> bool {
    hr >= 0
}

#[inline]
pub const fn failed(hr: HRESULT) -> bool {
    hr < 0
}
