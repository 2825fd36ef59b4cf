/*!
 * Ordered, deduplicated file selection and root folder tracking
 */

use std::path::{Path, PathBuf};

use glob_match::glob_match;
use hashlink::LinkedHashSet;
use ignore::WalkBuilder;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::bail;
use crate::error::Result;
use crate::types::{AddResult, RootMode};
use crate::utils::{common_ancestor, normalize_path};

/// Filters applied when a directory is expanded into files
///
/// The defaults keep every file found by the traversal.
#[derive(Debug, Clone, Default)]
pub struct ExpandOptions {
    /// Skip entries matched by .gitignore and friends
    pub respect_gitignore: bool,
    /// Extra ignore file name honoured alongside .gitignore
    pub gitignore_path: Option<PathBuf>,
    /// File or directory name globs to skip
    pub ignore_patterns: Vec<String>,
    /// File name globs to keep (empty keeps everything)
    pub include_patterns: Vec<String>,
}

impl ExpandOptions {
    /// Check if an entry should be skipped based on its name
    pub fn should_ignore(&self, path: &Path) -> bool {
        let file_name = path.file_name().unwrap_or_default().to_string_lossy();
        self.ignore_patterns
            .iter()
            .any(|pattern| glob_match(pattern, &file_name))
    }

    /// Check if a file should be kept based on include patterns
    pub fn should_include(&self, path: &Path) -> bool {
        if self.include_patterns.is_empty() {
            return true;
        }

        let file_name = path.file_name().unwrap_or_default().to_string_lossy();
        self.include_patterns
            .iter()
            .any(|pattern| glob_match(pattern, &file_name))
    }
}

/// The set of files selected for a document, plus its root folder
#[derive(Debug, Default)]
pub struct FileSetManager {
    files: LinkedHashSet<PathBuf>,
    root_mode: RootMode,
    inferred_root: Option<PathBuf>,
    options: ExpandOptions,
}

impl FileSetManager {
    /// Create an empty manager that keeps every file of expanded directories
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty manager with directory expansion filters
    pub fn with_options(options: ExpandOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Append paths not already present, keeping input order
    pub fn add_files<I, P>(&mut self, paths: I) -> AddResult
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut result = AddResult::default();

        for path in paths {
            let path = normalize_path(path.as_ref());
            if self.files.insert(path.clone()) {
                debug!("Added {}", path.display());
                result.added += 1;
            } else {
                debug!("Skipped duplicate {}", path.display());
                result.skipped += 1;
            }
        }

        if result.added > 0 {
            self.recompute_root();
        }

        result
    }

    /// Expand a directory recursively and add every file found
    pub fn add_directory(&mut self, dir: &Path) -> Result<AddResult> {
        let dir = normalize_path(dir);
        if !dir.is_dir() {
            bail!(InvalidArgument, "Not a directory: {}", dir.display());
        }

        let files = self.walk_directory(&dir);
        debug!("Expanded {} into {} files", dir.display(), files.len());
        Ok(self.add_files(files))
    }

    /// Resolve an input path to the files it stands for
    ///
    /// Directories expand recursively (sorted by name at each level), any
    /// other path is returned as a single normalized entry.
    pub fn expand_to_files(&self, path: &Path) -> Vec<PathBuf> {
        let path = normalize_path(path);
        if path.is_dir() {
            self.walk_directory(&path)
        } else {
            vec![path]
        }
    }

    /// Remove a file, returning whether it was present
    pub fn remove_file(&mut self, path: &Path) -> bool {
        let path = normalize_path(path);
        let removed = self.files.remove(&path);
        if removed {
            debug!("Removed {}", path.display());
            self.recompute_root();
        }
        removed
    }

    /// Remove every file and return to an inferred root
    pub fn clear(&mut self) {
        self.files.clear();
        self.root_mode = RootMode::Inferred;
        self.inferred_root = None;
    }

    /// Pin the root folder regardless of the selected files
    pub fn set_root_override(&mut self, folder: &Path) {
        let folder = normalize_path(folder);
        debug!("Root folder set to: {}", folder.display());
        self.root_mode = RootMode::Overridden(folder);
    }

    /// Go back to deriving the root from the selected files
    pub fn use_inferred_root(&mut self) {
        self.root_mode = RootMode::Inferred;
    }

    pub fn root_mode(&self) -> &RootMode {
        &self.root_mode
    }

    /// Selected files in insertion order
    pub fn current_files(&self) -> Vec<&Path> {
        self.files.iter().map(PathBuf::as_path).collect()
    }

    /// Root folder in effect, if any
    ///
    /// An empty selection has no root, even while an override is set.
    pub fn current_root(&self) -> Option<&Path> {
        if self.files.is_empty() {
            return None;
        }

        match &self.root_mode {
            RootMode::Overridden(folder) => Some(folder),
            RootMode::Inferred => self.inferred_root.as_deref(),
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains(&normalize_path(path))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    // Common ancestor of the files' parent directories
    fn recompute_root(&mut self) {
        self.inferred_root =
            common_ancestor(self.files.iter().map(|f| f.parent().unwrap_or(f.as_path())));
        debug!("Inferred root: {:?}", self.inferred_root);
    }

    fn walk_directory(&self, dir: &Path) -> Vec<PathBuf> {
        let options = &self.options;

        if options.respect_gitignore {
            let mut walker = WalkBuilder::new(dir);
            walker
                .hidden(false)
                .require_git(false)
                .sort_by_file_name(|a, b| a.cmp(b));

            if let Some(gitignore_path) = &options.gitignore_path {
                walker.add_custom_ignore_filename(gitignore_path);
            }

            let patterns = options.clone();
            let root = dir.to_path_buf();
            walker.filter_entry(move |e| e.path() == root || !patterns.should_ignore(e.path()));

            walker
                .build()
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        warn!("Skipping unreadable entry under {}: {}", dir.display(), e);
                        None
                    }
                })
                .filter(|e| is_leaf_file(e.path(), e.file_type()))
                .filter(|e| options.should_include(e.path()))
                .map(|e| e.into_path())
                .collect()
        } else {
            WalkDir::new(dir)
                .sort_by(|a, b| a.file_name().cmp(b.file_name()))
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || !options.should_ignore(e.path()))
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        warn!("Skipping unreadable entry under {}: {}", dir.display(), e);
                        None
                    }
                })
                .filter(|e| is_leaf_file(e.path(), Some(e.file_type())))
                .filter(|e| options.should_include(e.path()))
                .map(|e| e.into_path())
                .collect()
        }
    }
}

// Regular files, and symlinks that do not lead to a directory
fn is_leaf_file(path: &Path, file_type: Option<std::fs::FileType>) -> bool {
    match file_type {
        Some(ft) if ft.is_file() => true,
        Some(ft) if ft.is_symlink() => !path.is_dir(),
        _ => false,
    }
}
