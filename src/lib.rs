use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;

use crate::domain::{CopyStats, PackageName};
use crate::error::Result;
use crate::fs::{copy_classes, copy_js, prepare};
use crate::packages::{FsListing, WalkOptions, list_packages, write_package_config};
use crate::settings::Settings;

pub mod domain;
pub mod error;
pub mod fs;
pub mod logging;
pub mod packages;
pub mod settings;
#[cfg(test)]
mod test_support;

pub use error::SdkError;

#[derive(Parser, Debug)]
#[command(author, version, about = "Prepare framework files for an SDK release", long_about = None)]
pub struct Args {
    /// Base directory that relative paths are resolved against
    #[arg(short, long, global = true)]
    pub base: Option<PathBuf>,

    /// YAML settings file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replace the SDK framework directories with a fresh copy of the build output
    Extract {
        /// Framework build output
        src: PathBuf,

        /// SDK distribution root
        dest: PathBuf,

        /// Also copy compiled class files into the class directory
        #[arg(long)]
        with_classes: bool,
    },
    /// Write the package names found under a compiled-output tree
    Packages {
        /// Compiled-output tree to scan
        root: PathBuf,

        /// Include entries whose names start with the hidden marker
        #[arg(long)]
        hidden: bool,

        /// Package config file (defaults to the configured location)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Outcome of an `extract` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractReport {
    pub js: CopyStats,
    pub classes: Option<CopyStats>,
}

/// Clear stale framework output under `dest` and copy `src` into it.
pub fn run_extract(
    settings: &Settings,
    src: &Path,
    dest: &Path,
    with_classes: bool,
) -> Result<ExtractReport> {
    let src = settings.resolve(src);
    let dest = settings.resolve(dest);
    info!(src = %src.display(), dest = %dest.display(), "extracting framework files");

    prepare(&dest, settings)?;
    let js = copy_js(&src, &dest, settings)?;
    info!(files = js.files, skipped = js.skipped, "copied script files");

    let classes = if with_classes {
        let stats = copy_classes(&src, &dest, settings)?;
        info!(files = stats.files, skipped = stats.skipped, "copied class files");
        Some(stats)
    } else {
        None
    };

    Ok(ExtractReport { js, classes })
}

/// Scan `root` and write its package names to the package config file.
///
/// `output` overrides the configured artifact path; both are resolved
/// against the base.
pub fn run_packages(
    settings: &Settings,
    root: &Path,
    include_hidden: bool,
    output: Option<&Path>,
) -> Result<BTreeSet<PackageName>> {
    let root = settings.resolve(root);
    let output = match output {
        Some(path) => settings.resolve(path),
        None => settings.package_config_path(),
    };
    info!(root = %root.display(), "scanning compiled output");
    if let Ok(cwd) = std::env::current_dir() {
        info!(cwd = %cwd.display(), "invocation directory");
    }

    let options = WalkOptions {
        include_hidden,
        hidden_marker: settings.hidden_marker,
    };
    let packages = list_packages(&FsListing, &root, &options)?;
    write_package_config(&output, &packages)?;

    let listed: Vec<&str> = packages.iter().map(PackageName::as_str).collect();
    info!(output = %output.display(), count = packages.len(), packages = ?listed, "wrote package config");
    Ok(packages)
}
