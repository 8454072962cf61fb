//! Package-name derivation from a compiled-output tree.
//!
//! The tree walk is written against [`DirectoryListing`] so the traversal
//! rules (hidden pruning, name ordering, relative paths) can be checked
//! without touching the disk. [`FsListing`] is the real implementation.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::Formatter;
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::domain::{FileSystemNode, PackageName};
use crate::error::{Result, SdkError};

/// Lists the immediate children of a directory.
///
/// Each returned node's path is `dir` joined with the child's name.
pub trait DirectoryListing {
    fn list(&self, dir: &Path) -> Result<Vec<FileSystemNode>>;
}

/// Directory listing backed by the local filesystem.
///
/// Directory symlinks are neither descended into nor reported, so link
/// cycles cannot stall a walk.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsListing;

impl DirectoryListing for FsListing {
    fn list(&self, dir: &Path) -> Result<Vec<FileSystemNode>> {
        let metadata = fs::metadata(dir).map_err(|e| SdkError::io(dir, e))?;
        if !metadata.is_dir() {
            return Err(SdkError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }

        let mut nodes = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            let file_type = entry.file_type();
            if file_type.is_dir() {
                nodes.push(FileSystemNode::dir(entry.path()));
            } else if file_type.is_symlink() && entry.path().is_dir() {
                trace!(path = %entry.path().display(), "skipping directory symlink");
            } else {
                nodes.push(FileSystemNode::file(entry.path()));
            }
        }
        Ok(nodes)
    }
}

/// Traversal switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOptions {
    pub include_hidden: bool,
    pub hidden_marker: char,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            include_hidden: false,
            hidden_marker: '.',
        }
    }
}

/// Walk `root` top-down and return every file path relative to `root`.
///
/// Within a directory, files come first in name order, then each
/// subdirectory is walked in name order. Hidden directories are pruned
/// unless `include_hidden` is set.
pub fn walk_files<L>(listing: &L, root: &Path, options: &WalkOptions) -> Result<Vec<PathBuf>>
where
    L: DirectoryListing + ?Sized,
{
    let mut files = Vec::new();
    let mut pending = vec![(root.to_path_buf(), PathBuf::new())];

    while let Some((dir, relative)) = pending.pop() {
        let mut entries = Vec::new();
        for entry in listing.list(&dir)? {
            let name = entry.name()?.to_owned();
            if options.include_hidden || !entry.is_hidden(options.hidden_marker)? {
                entries.push((name, entry));
            }
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let (dirs, leaves): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(|(_, e)| e.is_dir());
        for (name, _) in leaves {
            files.push(relative.join(name));
        }
        // Reversed so the first subdirectory is popped next.
        for (name, sub) in dirs.into_iter().rev() {
            pending.push((sub.path, relative.join(name)));
        }
    }

    Ok(files)
}

/// Map a relative file path to its package name.
pub fn package_name(relative: &Path) -> Result<PackageName> {
    PackageName::from_relative(relative)
}

/// Walk `root` and collect the distinct package names of its files.
pub fn list_packages<L>(
    listing: &L,
    root: &Path,
    options: &WalkOptions,
) -> Result<BTreeSet<PackageName>>
where
    L: DirectoryListing + ?Sized,
{
    let files = walk_files(listing, root, options)?;
    debug!(root = %root.display(), files = files.len(), "walked package tree");
    files.iter().map(|f| package_name(f)).collect()
}

/// Compact JSON with `", "` and `": "` separators, the layout the SDK
/// loader has always been fed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }
}

/// Overwrite `path` with the packages as a JSON array of strings.
///
/// Missing parent directories are created. The write is not atomic.
pub fn write_package_config(path: &Path, packages: &BTreeSet<PackageName>) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SdkError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| SdkError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, SpacedFormatter);
    packages
        .serialize(&mut serializer)
        .map_err(|source| SdkError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    writer.flush().map_err(|e| SdkError::io(path, e))?;
    Ok(())
}
