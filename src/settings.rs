//! Layout and filter settings, optionally loaded from a YAML file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, SdkError};

/// Settings shared by `extract` and `packages`.
///
/// Relative command-line paths are resolved against `base`. Missing fields
/// in a settings file fall back to the defaults below.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Base directory for every relative path argument.
    pub base: PathBuf,

    /// Package config artifact, relative to `base`.
    pub package_config: PathBuf,

    /// Script output directory under the destination root.
    pub js_dir: PathBuf,

    /// Compiled class output directory under the destination root.
    pub class_dir: PathBuf,

    /// Names skipped when copying scripts.
    pub js_exclude: Vec<String>,

    /// Names skipped when copying class files.
    pub class_exclude: Vec<String>,

    /// Leading character marking a hidden entry.
    pub hidden_marker: char,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base: PathBuf::from(".."),
            package_config: PathBuf::from("sdk_config/package_name.json"),
            js_dir: PathBuf::from("js/framework"),
            class_dir: PathBuf::from("class/framework"),
            js_exclude: vec!["*.class".to_string()],
            class_exclude: vec!["*.js".to_string()],
            hidden_marker: '.',
        }
    }
}

impl Settings {
    /// Resolve `path` against the base. Absolute paths are returned as-is.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.base.join(path)
    }

    pub fn package_config_path(&self) -> PathBuf {
        self.resolve(&self.package_config)
    }
}

/// Load settings from `path`.
///
/// Returns `Settings::default()` when no path is given or the file is missing.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    if !path.exists() {
        debug!(path = %path.display(), "settings file missing, using defaults");
        return Ok(Settings::default());
    }
    let raw = fs::read_to_string(path).map_err(|e| SdkError::io(path, e))?;
    serde_yaml::from_str(&raw).map_err(|source| SdkError::Settings {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_sdk_layout() {
        let settings = Settings::default();
        assert_eq!(
            settings.package_config_path(),
            PathBuf::from("../sdk_config/package_name.json")
        );
        assert_eq!(settings.js_exclude, vec!["*.class"]);
        assert_eq!(settings.hidden_marker, '.');
    }

    #[test]
    fn resolve_keeps_absolute_paths() {
        let settings = Settings::default();
        assert_eq!(settings.resolve(Path::new("/abs/out")), PathBuf::from("/abs/out"));
        assert_eq!(settings.resolve(Path::new("bin")), PathBuf::from("../bin"));
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let settings: Settings =
            serde_yaml::from_str("base: /work\njs_exclude: ['*.class', '*.map']\n").unwrap();
        assert_eq!(settings.base, PathBuf::from("/work"));
        assert_eq!(settings.js_exclude.len(), 2);
        assert_eq!(settings.class_dir, PathBuf::from("class/framework"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let settings = load_settings(Some(Path::new("/definitely/not/here.yaml"))).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(load_settings(None).unwrap(), Settings::default());
    }

    #[test]
    fn loads_yaml_file_from_disk() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("sdk-prep.yaml");
        fs::write(
            &path,
            "base: /release\npackage_config: cfg/packages.json\nhidden_marker: '_'\n",
        )
        .unwrap();

        let settings = load_settings(Some(path.as_path())).unwrap();
        assert_eq!(
            settings.package_config_path(),
            PathBuf::from("/release/cfg/packages.json")
        );
        assert_eq!(settings.hidden_marker, '_');
        assert_eq!(settings.js_dir, PathBuf::from("js/framework"));
    }

    #[test]
    fn malformed_yaml_is_reported() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("broken.yaml");
        fs::write(&path, "base: [unclosed\n").unwrap();

        let err = load_settings(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, SdkError::Settings { .. }));
        assert!(err.to_string().contains("broken.yaml"));
    }
}
