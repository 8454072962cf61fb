//! Test-only in-memory directory tree.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::domain::FileSystemNode;
use crate::error::{Result, SdkError};
use crate::packages::DirectoryListing;

/// A fake tree rooted at `/mem`, built from relative file paths.
///
/// Children are stored in reverse-name order so tests catch a walker that
/// forgets to sort.
pub struct MemoryListing {
    root: PathBuf,
    children: BTreeMap<PathBuf, Vec<FileSystemNode>>,
    listed: RefCell<Vec<PathBuf>>,
}

impl MemoryListing {
    pub fn from_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let root = PathBuf::from("/mem");
        let mut entries: BTreeMap<PathBuf, BTreeSet<(bool, PathBuf)>> = BTreeMap::new();
        entries.insert(root.clone(), BTreeSet::new());

        for file in files {
            let full = root.join(file.as_ref());
            let mut child = full.clone();
            let mut is_dir = false;
            while let Some(parent) = child.parent() {
                entries
                    .entry(parent.to_path_buf())
                    .or_default()
                    .insert((is_dir, child.clone()));
                if parent == root {
                    break;
                }
                child = parent.to_path_buf();
                is_dir = true;
            }
        }

        let children = entries
            .into_iter()
            .map(|(dir, kids)| {
                let nodes = kids
                    .into_iter()
                    .rev()
                    .map(|(is_dir, path)| {
                        if is_dir {
                            FileSystemNode::dir(path)
                        } else {
                            FileSystemNode::file(path)
                        }
                    })
                    .collect();
                (dir, nodes)
            })
            .collect();

        Self {
            root,
            children,
            listed: RefCell::new(Vec::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the walker asked for `relative`'s children.
    pub fn was_listed(&self, relative: &str) -> bool {
        let target = self.root.join(relative);
        self.listed.borrow().iter().any(|p| *p == target)
    }
}

impl DirectoryListing for MemoryListing {
    fn list(&self, dir: &Path) -> Result<Vec<FileSystemNode>> {
        self.listed.borrow_mut().push(dir.to_path_buf());
        self.children
            .get(dir)
            .cloned()
            .ok_or_else(|| SdkError::NotFound {
                path: dir.to_path_buf(),
            })
    }
}
