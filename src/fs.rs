use std::fs;
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::domain::CopyStats;
use crate::error::{Result, SdkError};
use crate::settings::Settings;

/// Build a matcher for file-name patterns such as `*.class`.
pub fn exclude_set<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern.as_ref())?);
    }
    Ok(builder.build()?)
}

pub fn prepare(dest_root: &Path, settings: &Settings) -> Result<()> {
    for sub in [&settings.js_dir, &settings.class_dir] {
        let stale = dest_root.join(sub);
        if stale.exists() {
            info!(path = %stale.display(), "removing stale output");
            fs::remove_dir_all(&stale).map_err(|e| SdkError::io(&stale, e))?;
        }
    }
    Ok(())
}

/// Recursively copy `src_root` into `dest_dir`, skipping any entry whose
/// name matches `exclude`. Excluded directories are skipped whole.
///
/// `dest_dir` must not exist yet.
pub fn copy_filtered(src_root: &Path, dest_dir: &Path, exclude: &GlobSet) -> Result<CopyStats> {
    let metadata = fs::metadata(src_root).map_err(|e| SdkError::io(src_root, e))?;
    if !metadata.is_dir() {
        return Err(SdkError::NotADirectory {
            path: src_root.to_path_buf(),
        });
    }
    if dest_dir.exists() {
        return Err(SdkError::DestinationExists {
            path: dest_dir.to_path_buf(),
        });
    }

    let mut stats = CopyStats::default();
    let mut skipped = 0;
    let walker = WalkDir::new(src_root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let keep = entry.depth() == 0 || !exclude.is_match(entry.file_name());
            if !keep {
                skipped += 1;
            }
            keep
        });

    for entry in walker {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src_root)
            .unwrap_or_else(|_| Path::new(""));
        let target = dest_dir.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| SdkError::io(&target, e))?;
            stats.dirs += 1;
        } else {
            copy_file(entry.path(), &target)?;
            stats.files += 1;
        }
    }

    stats.skipped = skipped;
    Ok(stats)
}

fn copy_file(path: &Path, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).map_err(|e| SdkError::io(parent, e))?;
    }
    debug!(from = %path.display(), to = %output_path.display(), "copying");
    fs::copy(path, output_path).map_err(|e| SdkError::io(path, e))?;
    Ok(())
}

pub fn copy_js(src_root: &Path, dest_root: &Path, settings: &Settings) -> Result<CopyStats> {
    let exclude = exclude_set(&settings.js_exclude)?;
    copy_filtered(src_root, &dest_root.join(&settings.js_dir), &exclude)
}

pub fn copy_classes(src_root: &Path, dest_root: &Path, settings: &Settings) -> Result<CopyStats> {
    let exclude = exclude_set(&settings.class_exclude)?;
    copy_filtered(src_root, &dest_root.join(&settings.class_dir), &exclude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclude_set_matches_extension_patterns() {
        let set = exclude_set(&["*.class"]).unwrap();
        assert!(set.is_match("Activity.class"));
        assert!(!set.is_match("Activity.js"));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = exclude_set(&["[unclosed"]).unwrap_err();
        assert!(matches!(err, SdkError::Pattern(_)));
    }
}
