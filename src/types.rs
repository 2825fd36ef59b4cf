/*!
 * Core types and data structures for ctxfile
 */

use std::fmt;
use std::path::PathBuf;

use hashlink::LinkedHashMap;

/// Outcome of adding paths to a file set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddResult {
    /// Paths appended to the set
    pub added: usize,
    /// Paths already present (or repeated in the same input)
    pub skipped: usize,
}

impl AddResult {
    /// Merge counts from another add operation
    pub fn merge(&mut self, other: AddResult) {
        self.added += other.added;
        self.skipped += other.skipped;
    }
}

impl fmt::Display for AddResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Added {} files. Skipped {} duplicate files.",
            self.added, self.skipped
        )
    }
}

/// How the root folder of a file set is determined
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RootMode {
    /// Common ancestor of the current files, recomputed on every change
    #[default]
    Inferred,
    /// Fixed folder chosen by the caller
    Overridden(PathBuf),
}

/// A node of the relative-path tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    /// Directory entries keyed by segment name, in insertion order
    Directory(LinkedHashMap<String, TreeNode>),
    /// Leaf file
    File,
}

impl TreeNode {
    /// Empty directory node
    pub fn directory() -> Self {
        TreeNode::Directory(LinkedHashMap::new())
    }

    /// Entries of a directory node, `None` for files
    pub fn children(&self) -> Option<&LinkedHashMap<String, TreeNode>> {
        match self {
            TreeNode::Directory(children) => Some(children),
            TreeNode::File => None,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, TreeNode::File)
    }
}

impl Default for TreeNode {
    fn default() -> Self {
        Self::directory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_result_message() {
        let mut result = AddResult { added: 2, skipped: 0 };
        result.merge(AddResult { added: 1, skipped: 3 });

        assert_eq!(result, AddResult { added: 3, skipped: 3 });
        assert_eq!(
            result.to_string(),
            "Added 3 files. Skipped 3 duplicate files."
        );
    }

    #[test]
    fn test_tree_node_children() {
        assert!(TreeNode::File.children().is_none());
        assert!(TreeNode::File.is_file());
        assert_eq!(TreeNode::default().children().map(|c| c.len()), Some(0));
    }
}
