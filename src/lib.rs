/*!
 * ctxfile - Bundle a set of files into one markdown context document
 *
 * Files are collected into an ordered, deduplicated selection with an
 * inferred (or explicit) root folder, then rendered as a markdown document
 * holding an ASCII tree of their layout and each file's fenced contents.
 */

pub mod clipboard;
pub mod config;
pub mod document;
pub mod error;
pub mod fileset;
pub mod report;
pub mod types;
pub mod utils;


// Re-export main components for easier access
pub use config::Config;
pub use document::{Document, DocumentBuilder, DocumentStatistics};
pub use error::{CtxError, ReadError, Result};
pub use fileset::{ExpandOptions, FileSetManager};
pub use report::{GenerationReport, ReportFormat, Reporter};
pub use types::{AddResult, RootMode, TreeNode};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
