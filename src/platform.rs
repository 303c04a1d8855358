//! Host checks performed once per process.

use std::sync::OnceLock;

use crate::error::{DialogError, Result};
use crate::log_error;

/// Common Item Dialogs first shipped with Vista (NT 6.0).
pub const MIN_MAJOR_VERSION: u32 = 6;

static SUPPORT: OnceLock<Result<()>> = OnceLock::new();

/// Fails with `PlatformUnsupported` off Windows or before Vista. The answer is cached.
pub fn ensure_supported() -> Result<()> {
    SUPPORT
        .get_or_init(|| {
            let result = detect();
            if let Err(e) = &result {
                log_error!("{}", e);
            }
            result
        })
        .clone()
}

/// Checks a reported major version against the minimum.
pub fn check_version(major: u32) -> Result<()> {
    if major >= MIN_MAJOR_VERSION {
        Ok(())
    } else {
        Err(DialogError::PlatformUnsupported {
            reason: format!("Windows NT {} is older than Vista", major),
        })
    }
}

#[cfg(windows)]
fn detect() -> Result<()> {
    use windows_sys::Win32::System::SystemInformation::{GetVersionExW, OSVERSIONINFOW};

    unsafe {
        let mut info: OSVERSIONINFOW = std::mem::zeroed();
        info.dwOSVersionInfoSize = size_of::<OSVERSIONINFOW>() as u32;
        if GetVersionExW(&mut info) == 0 {
            return Err(DialogError::PlatformUnsupported {
                reason: "GetVersionExW failed".to_string(),
            });
        }
        check_version(info.dwMajorVersion)
    }
}

#[cfg(not(windows))]
fn detect() -> Result<()> {
    Err(DialogError::PlatformUnsupported {
        reason: format!("{} has no Windows shell", std::env::consts::OS),
    })
}
