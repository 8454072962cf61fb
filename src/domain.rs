use serde::Serialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::error::{Result, SdkError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystemNode {
    pub path: PathBuf,
    pub kind: NodeKind,
}

impl FileSystemNode {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: NodeKind::File,
        }
    }

    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: NodeKind::Directory,
        }
    }

    /// Final path component. Fails on names that are not valid UTF-8.
    pub fn name(&self) -> Result<&str> {
        let name = self.path.file_name().unwrap_or_default();
        name.to_str().ok_or_else(|| SdkError::InvalidName {
            path: self.path.clone(),
        })
    }

    pub fn is_hidden(&self, marker: char) -> Result<bool> {
        Ok(self.name()?.starts_with(marker))
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }
}

/// Dotted package name derived from a file's parent directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PackageName(String);

impl PackageName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// `a/b/c/file.js` becomes `a.b.c`; a file with no parent becomes `""`.
    pub fn from_relative(path: &Path) -> Result<Self> {
        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        let mut parts = Vec::new();
        for component in parent.components() {
            if let Component::Normal(part) = component {
                let part = part.to_str().ok_or_else(|| SdkError::InvalidName {
                    path: path.to_path_buf(),
                })?;
                parts.push(part);
            }
        }
        Ok(Self(parts.join(".")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files: usize,
    pub dirs: usize,
    pub skipped: usize,
}
