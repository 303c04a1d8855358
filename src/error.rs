//! Error types for the dialog layer.
//!
//! A cancelled dialog is not an error: the façade reports it as `Ok(None)`.

use thiserror::Error;

use crate::types::HRESULT;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DialogError {
    /// Wrong operating system or a Windows release older than Vista.
    #[error("native file dialogs are not supported here: {reason}")]
    PlatformUnsupported { reason: String },

    #[error("CoInitializeEx failed with HRESULT {hresult:#010X}")]
    ComInitializationFailed { hresult: u32 },

    #[error("CoCreateInstance failed with HRESULT {hresult:#010X}")]
    ObjectCreationFailed { hresult: u32 },

    /// `Show` returned a failure other than the user cancelling.
    #[error("dialog failed with HRESULT {hresult:#010X}")]
    DialogInvocationFailed { hresult: u32 },

    /// Reading the chosen items failed; partial results are dropped.
    #[error("{operation} failed with HRESULT {hresult:#010X}")]
    ResultExtractionFailed { operation: &'static str, hresult: u32 },
}

impl DialogError {
    pub(crate) fn com_init(hr: HRESULT) -> Self {
        DialogError::ComInitializationFailed { hresult: hr as u32 }
    }

    pub(crate) fn creation(hr: HRESULT) -> Self {
        DialogError::ObjectCreationFailed { hresult: hr as u32 }
    }

    pub(crate) fn invocation(hr: HRESULT) -> Self {
        DialogError::DialogInvocationFailed { hresult: hr as u32 }
    }

    pub(crate) fn extraction(operation: &'static str, hr: HRESULT) -> Self {
        DialogError::ResultExtractionFailed { operation, hresult: hr as u32 }
    }

    /// Raw HRESULT carried by the error, if any.
    pub fn hresult(&self) -> Option<HRESULT> {
        match self {
            DialogError::PlatformUnsupported { .. } => None,
            DialogError::ComInitializationFailed { hresult }
            | DialogError::ObjectCreationFailed { hresult }
            | DialogError::DialogInvocationFailed { hresult }
            | DialogError::ResultExtractionFailed { hresult, .. } => Some(*hresult as HRESULT),
        }
    }

    /// True for errors that will not go away by retrying on this machine.
    pub fn is_platform(&self) -> bool {
        matches!(self, DialogError::PlatformUnsupported { .. })
    }
}

pub type Result<T> = std::result::Result<T, DialogError>;
