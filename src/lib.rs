//! Native Windows Open, Save and Folder dialogs.
//!
//! The Common Item Dialog COM objects are driven directly through their vtables,
//! without generated bindings for the interfaces themselves.
//!
//! ```no_run
//! use nativefiledialog::{CommonFilter, DialogConfig, NativeFileDialog};
//!
//! let nfd = NativeFileDialog::new()?;
//! let cfg = DialogConfig::new().title("Open track").filter(CommonFilter::Flac);
//! if let Some(path) = nfd.get_file(cfg)? {
//!     println!("{}", path.display());
//! }
//! # Ok::<(), nativefiledialog::DialogError>(())
//! ```

pub mod logger;

pub mod config;
pub mod dialog;
pub mod error;
pub mod filter;
pub mod flags;
pub mod guid;
pub mod platform;
pub mod session;
pub mod shell;
pub mod types;
pub mod utils;
pub mod vtable;

pub use config::DialogConfig;
pub use dialog::NativeFileDialog;
pub use error::{DialogError, Result};
pub use filter::{CommonFilter, FileFilter};
pub use flags::Fos;
pub use session::Selection;
