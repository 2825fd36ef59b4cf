/*!
 * Markdown document generation: file tree rendering and content assembly
 */

use std::fs;
use std::path::{Path, PathBuf};

use hashlink::LinkedHashMap;
use indicatif::ProgressBar;
use tracing::{debug, warn};

use crate::error::{CtxError, ReadError, Result};
use crate::fileset::FileSetManager;
use crate::report::FileReportInfo;
use crate::types::TreeNode;
use crate::utils::{language_tag, normalize_newlines};

const BRANCH: &str = "├───";
const LAST_BRANCH: &str = "└───";
const PIPE_INDENT: &str = "│   ";
const SPACE_INDENT: &str = "    ";

/// Statistics gathered while assembling a document
#[derive(Debug, Clone, Default)]
pub struct DocumentStatistics {
    /// Number of files whose section was written
    pub files_processed: usize,
    /// Total number of lines across readable files
    pub total_lines: usize,
    /// Total number of characters across readable files
    pub total_chars: usize,
    /// Files that were replaced by an error notice
    pub read_errors: usize,
    /// Per-file details, keyed by relative path, in selection order
    pub file_details: Vec<(String, FileReportInfo)>,
}

/// A generated document together with its statistics
#[derive(Debug, Clone)]
pub struct Document {
    /// The markdown text
    pub text: String,
    /// What went into it
    pub statistics: DocumentStatistics,
}

/// Builds the file tree and markdown document for a set of files
pub struct DocumentBuilder {
    /// Progress bar advanced once per file read
    pub progress: ProgressBar,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new(ProgressBar::hidden())
    }
}

impl DocumentBuilder {
    /// Create a new builder
    pub fn new(progress: ProgressBar) -> Self {
        Self { progress }
    }

    /// Generate the document for the current selection of a file set
    pub fn generate(&self, file_set: &FileSetManager) -> Result<Document> {
        if file_set.is_empty() {
            return Err(CtxError::EmptySelection);
        }

        let files = file_set.current_files();
        let root = file_set.current_root().unwrap_or(Path::new(""));
        let (text, statistics) = self.assemble(&files, root)?;

        Ok(Document { text, statistics })
    }

    /// Build the full markdown document for `files` relative to `root`
    pub fn build_document<P: AsRef<Path>>(&self, files: &[P], root: &Path) -> Result<String> {
        self.assemble(files, root).map(|(text, _)| text)
    }

    /// Build the nested tree of paths relative to `root`
    pub fn build_tree<P: AsRef<Path>>(&self, files: &[P], root: &Path) -> Result<TreeNode> {
        let mut tree = TreeNode::directory();

        for file in files {
            let segments: Vec<String> = relative_path(file.as_ref(), root)?
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            insert_segments(&mut tree, &segments);
        }

        Ok(tree)
    }

    /// Render a tree as display lines with box-drawing connectors
    pub fn render_tree(&self, node: &TreeNode) -> Vec<String> {
        let mut lines = Vec::new();
        render_into(node, "", &mut lines);
        lines
    }

    /// Read a whole file as UTF-8 text
    pub fn read_file_content(&self, path: &Path) -> std::result::Result<String, ReadError> {
        let bytes = fs::read(path).map_err(|source| ReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let content = String::from_utf8(bytes).map_err(|source| ReadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(normalize_newlines(content))
    }

    fn assemble<P: AsRef<Path>>(
        &self,
        files: &[P],
        root: &Path,
    ) -> Result<(String, DocumentStatistics)> {
        let tree = self.build_tree(files, root)?;
        let mut statistics = DocumentStatistics::default();

        let mut markdown = String::from("# File Structure\n\n\n");
        markdown.push_str("```\n");
        markdown.push_str(&self.render_tree(&tree).join("\n"));
        markdown.push_str("\n```");
        markdown.push_str("\n\n\n# File Contents\n\n");

        self.progress.set_length(files.len() as u64);

        for file in files {
            let file = file.as_ref();
            let rel_path = relative_path(file, root)?.display().to_string();
            self.progress.set_message(rel_path.clone());

            markdown.push_str(&format!("## {}\n\n", rel_path));

            match self.read_file_content(file) {
                Ok(content) => {
                    markdown.push_str(&format!(
                        "```{}\n{}\n```\n\n",
                        language_tag(file),
                        content
                    ));

                    let info = FileReportInfo {
                        lines: content.lines().count(),
                        chars: content.chars().count(),
                        error: None,
                    };
                    statistics.total_lines += info.lines;
                    statistics.total_chars += info.chars;
                    statistics.file_details.push((rel_path, info));
                }
                Err(e) => {
                    warn!("Error reading file {}: {}", file.display(), e);
                    markdown.push_str(&format!("Error reading file: {}\n\n", e));

                    statistics.read_errors += 1;
                    statistics.file_details.push((
                        rel_path,
                        FileReportInfo {
                            error: Some(e.to_string()),
                            ..FileReportInfo::default()
                        },
                    ));
                }
            }

            statistics.files_processed += 1;
            self.progress.inc(1);
        }

        debug!(
            "Assembled document: {} files, {} bytes",
            statistics.files_processed,
            markdown.len()
        );

        Ok((markdown, statistics))
    }
}

// Strictly-below relativization; the root itself is not a file of the tree
fn relative_path(file: &Path, root: &Path) -> Result<PathBuf> {
    match file.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => Err(path_resolution(file, root)),
        Ok(rel) => Ok(rel.to_path_buf()),
        Err(_) => Err(path_resolution(file, root)),
    }
}

fn path_resolution(file: &Path, root: &Path) -> CtxError {
    CtxError::PathResolution {
        path: file.to_path_buf(),
        root: root.to_path_buf(),
    }
}

fn insert_segments(tree: &mut TreeNode, segments: &[String]) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = tree;
    for part in parents {
        current = directory_entries(current)
            .entry(part.clone())
            .or_insert_with(TreeNode::directory);
    }

    let children = directory_entries(current);
    match children.get(last) {
        Some(TreeNode::Directory(_)) => {
            warn!("Keeping directory {} over a file of the same name", last);
        }
        Some(TreeNode::File) => {}
        None => {
            children.insert(last.clone(), TreeNode::File);
        }
    }
}

// A file entry that has to hold children becomes an empty directory
fn directory_entries(node: &mut TreeNode) -> &mut LinkedHashMap<String, TreeNode> {
    match node {
        TreeNode::Directory(children) => children,
        TreeNode::File => {
            warn!("Treating file entry as a directory to hold nested paths");
            *node = TreeNode::directory();
            directory_entries(node)
        }
    }
}

fn render_into(node: &TreeNode, prefix: &str, lines: &mut Vec<String>) {
    let Some(children) = node.children() else {
        return;
    };

    let count = children.len();
    for (i, (name, child)) in children.iter().enumerate() {
        let is_last = i + 1 == count;
        let (connector, indent) = if is_last {
            (LAST_BRANCH, SPACE_INDENT)
        } else {
            (BRANCH, PIPE_INDENT)
        };

        lines.push(format!("{}{}{}", prefix, connector, name));
        if !child.is_file() {
            render_into(child, &format!("{}{}", prefix, indent), lines);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs::File;
    use std::io::Write;

    use tempfile::tempdir;

    fn builder() -> DocumentBuilder {
        DocumentBuilder::default()
    }

    #[test]
    fn test_render_tree_layout() -> Result<()> {
        let files = ["root/a.txt", "root/dir/b.txt"];
        let tree = builder().build_tree(&files, Path::new("root"))?;

        let rendered = builder().render_tree(&tree).join("\n");
        assert_eq!(rendered, "├───a.txt\n└───dir\n    └───b.txt");
        Ok(())
    }

    #[test]
    fn test_render_tree_nested_pipes() -> Result<()> {
        let files = [
            "/r/src/main.rs",
            "/r/src/util/io.rs",
            "/r/src/util/fmt.rs",
            "/r/README.md",
        ];
        let tree = builder().build_tree(&files, Path::new("/r"))?;

        let expected = [
            "├───src",
            "│   ├───main.rs",
            "│   └───util",
            "│       ├───io.rs",
            "│       └───fmt.rs",
            "└───README.md",
        ];
        assert_eq!(builder().render_tree(&tree), expected);
        Ok(())
    }

    #[test]
    fn test_tree_follows_insertion_order() -> Result<()> {
        let files = ["/r/zeta.txt", "/r/alpha.txt"];
        let tree = builder().build_tree(&files, Path::new("/r"))?;

        assert_eq!(
            builder().render_tree(&tree),
            vec!["├───zeta.txt", "└───alpha.txt"]
        );
        Ok(())
    }

    #[test]
    fn test_build_tree_rejects_paths_outside_root() {
        let files = ["/r/in.txt", "/elsewhere/out.txt"];
        let err = builder().build_tree(&files, Path::new("/r")).unwrap_err();

        match err {
            CtxError::PathResolution { path, root } => {
                assert_eq!(path, PathBuf::from("/elsewhere/out.txt"));
                assert_eq!(root, PathBuf::from("/r"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_build_tree_rejects_root_itself() {
        let files = ["/r"];
        assert!(builder().build_tree(&files, Path::new("/r")).is_err());
    }

    #[test]
    fn test_directory_not_clobbered_by_same_named_file() -> Result<()> {
        let files = ["/r/pkg/mod.rs", "/r/pkg"];
        let tree = builder().build_tree(&files, Path::new("/r"))?;

        assert_eq!(
            builder().render_tree(&tree),
            vec!["└───pkg", "    └───mod.rs"]
        );
        Ok(())
    }

    #[test]
    fn test_file_entry_becomes_directory_for_nested_paths() -> Result<()> {
        let files = ["/r/pkg", "/r/pkg/inner/mod.rs", "/r/top.rs"];
        let tree = builder().build_tree(&files, Path::new("/r"))?;

        assert_eq!(
            builder().render_tree(&tree),
            vec!["├───pkg", "│   └───inner", "│       └───mod.rs", "└───top.rs"]
        );
        Ok(())
    }

    #[test]
    fn test_render_file_node_is_empty() {
        assert!(builder().render_tree(&TreeNode::File).is_empty());
    }

    #[test]
    fn test_document_layout_is_exact() -> Result<()> {
        let temp_dir = tempdir()?;
        let root = temp_dir.path();
        fs::write(root.join("main.py"), "hello")?;
        fs::create_dir(root.join("docs"))?;
        fs::write(root.join("docs").join("README"), "read me")?;

        let files = [root.join("main.py"), root.join("docs").join("README")];
        let document = builder().build_document(&files, root)?;

        let expected = format!(
            "# File Structure\n\n\n```\n├───main.py\n└───docs\n    └───README\n```\n\n\n\
             # File Contents\n\n\
             ## main.py\n\n```py\nhello\n```\n\n\
             ## {}\n\n```\nread me\n```\n\n",
            Path::new("docs").join("README").display()
        );
        assert_eq!(document, expected);
        Ok(())
    }

    #[test]
    fn test_document_contains_fenced_content() -> Result<()> {
        let temp_dir = tempdir()?;
        let file = temp_dir.path().join("script.py");
        fs::write(&file, "hello")?;

        let document = builder().build_document(&[&file], temp_dir.path())?;
        assert!(document.contains("```py\nhello\n```"));
        Ok(())
    }

    #[test]
    fn test_read_error_is_isolated() -> Result<()> {
        let temp_dir = tempdir()?;
        let kept = temp_dir.path().join("kept.txt");
        let gone = temp_dir.path().join("gone.txt");
        fs::write(&kept, "still here\nsecond line")?;
        fs::write(&gone, "soon deleted")?;
        fs::remove_file(&gone)?;

        let (document, statistics) =
            builder().assemble(&[&gone, &kept], temp_dir.path())?;

        assert!(document.contains("## gone.txt\n\nError reading file: "));
        assert!(document.contains("```txt\nstill here\nsecond line\n```"));
        assert_eq!(statistics.files_processed, 2);
        assert_eq!(statistics.read_errors, 1);
        assert_eq!(statistics.total_lines, 2);
        Ok(())
    }

    #[test]
    fn test_invalid_utf8_reported_inline() -> Result<()> {
        let temp_dir = tempdir()?;
        let binary = temp_dir.path().join("blob.bin");
        let mut file = File::create(&binary)?;
        file.write_all(&[0xff, 0xfe, 0x00, 0x80])?;

        let err = builder().read_file_content(&binary).unwrap_err();
        assert!(matches!(err, ReadError::Decode { .. }));

        let document = builder().build_document(&[&binary], temp_dir.path())?;
        assert!(document.contains("Error reading file: 'utf-8' codec can't decode"));
        Ok(())
    }

    #[test]
    fn test_crlf_translated() -> Result<()> {
        let temp_dir = tempdir()?;
        let file = temp_dir.path().join("win.txt");
        fs::write(&file, "one\r\ntwo\r\n")?;

        assert_eq!(builder().read_file_content(&file).unwrap(), "one\ntwo\n");
        Ok(())
    }

    #[test]
    fn test_generate_requires_files() {
        let err = builder().generate(&FileSetManager::new()).unwrap_err();
        assert!(matches!(err, CtxError::EmptySelection));
    }

    #[test]
    fn test_generate_uses_file_set_root() -> Result<()> {
        let temp_dir = tempdir()?;
        let nested = temp_dir.path().join("pkg");
        fs::create_dir(&nested)?;
        fs::write(nested.join("lib.rs"), "pub fn f() {}")?;
        fs::write(nested.join("mod.rs"), "mod lib;")?;

        let mut file_set = FileSetManager::new();
        file_set.add_files([nested.join("mod.rs"), nested.join("lib.rs")]);

        let document = builder().generate(&file_set)?;
        assert!(document
            .text
            .starts_with("# File Structure\n\n\n```\n├───mod.rs\n└───lib.rs\n```"));
        assert!(document.text.contains("## lib.rs\n\n```rs\npub fn f() {}\n```"));
        assert_eq!(document.statistics.file_details[0].0, "mod.rs");

        file_set.set_root_override(temp_dir.path());
        let document = builder().generate(&file_set)?;
        assert!(document.text.contains("└───pkg\n    ├───mod.rs\n    └───lib.rs"));
        Ok(())
    }
}
