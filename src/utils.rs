/*!
 * Utility functions for ctxfile
 */

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use path_absolutize::Absolutize;
use tracing::warn;

/// Make a path absolute and resolve `.`/`..` without touching the filesystem
///
/// Paths that do not exist are normalized all the same. If the current
/// directory cannot be determined the path is returned unchanged.
pub fn normalize_path(path: &Path) -> PathBuf {
    match path.absolutize() {
        Ok(Cow::Borrowed(p)) => p.to_path_buf(),
        Ok(Cow::Owned(p)) => p,
        Err(e) => {
            warn!("Could not normalize {}: {}", path.display(), e);
            path.to_path_buf()
        }
    }
}

/// Longest common leading run of components shared by every path
///
/// Returns `None` for an empty input. Paths with nothing in common yield an
/// empty `PathBuf`.
pub fn common_ancestor<'a, I>(paths: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut iter = paths.into_iter();
    let first = iter.next()?;
    let mut prefix: Vec<Component<'a>> = first.components().collect();

    for path in iter {
        let shared = prefix
            .iter()
            .zip(path.components())
            .take_while(|(a, b)| **a == *b)
            .count();
        prefix.truncate(shared);
        if prefix.is_empty() {
            break;
        }
    }

    Some(prefix.iter().collect())
}

/// Fence language tag for a file: its extension without the dot
pub fn language_tag(path: &Path) -> Cow<'_, str> {
    path.extension()
        .map(|ext| ext.to_string_lossy())
        .unwrap_or(Cow::Borrowed(""))
}

/// Translate `\r\n` and lone `\r` line endings to `\n`
pub fn normalize_newlines(content: String) -> String {
    if !content.contains('\r') {
        return content;
    }
    content.replace("\r\n", "\n").replace('\r', "\n")
}

/// Format a number with human-readable units
pub fn format_number(num: usize) -> String {
    if num >= 1_000_000 {
        format!("{:.1}M", num as f64 / 1_000_000.0)
    } else if num >= 1_000 {
        format!("{:.1}K", num as f64 / 1_000.0)
    } else {
        num.to_string()
    }
}
