//! Global error handling for ctxfile
//!
//! This module provides the crate-wide error type plus the per-file read
//! error that document generation recovers from locally.

use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;

use thiserror::Error;

use crate::clipboard::ClipboardError;

/// Global error type for ctxfile operations
#[derive(Error, Debug)]
pub enum CtxError {
    /// Document generation was requested with no files selected
    #[error("No files selected.")]
    EmptySelection,

    /// A selected file does not live under the root folder
    #[error("Path {} is not under root folder {}", path.display(), root.display())]
    PathResolution {
        /// The offending file
        path: PathBuf,
        /// Root folder used for relativization
        root: PathBuf,
    },

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Clipboard errors
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Specialized Result type for ctxfile operations
pub type Result<T> = std::result::Result<T, CtxError>;

/// Failure to read one selected file. Rendered inline in the document.
#[derive(Error, Debug)]
pub enum ReadError {
    /// The file could not be opened or read
    #[error("{source}: '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid UTF-8
    #[error("'utf-8' codec can't decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: FromUtf8Error,
    },
}

/// Creates a CtxError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::CtxError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

// Lets the binary keep an io::Result main like the rest of the tooling
impl From<CtxError> for io::Error {
    fn from(err: CtxError) -> Self {
        match err {
            CtxError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}
