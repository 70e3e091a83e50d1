//! Configuration file management
//!
//! Handles finding, loading, and saving configuration files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::VisualTestConfig;

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./phantomcss.yaml",
    "./phantomcss.yml",
    "./.phantomcss.yaml",
    "./phantomcss.json",
    "~/.config/phantomcss-runner/config.yaml",
];

const SUPPORTED_VERSIONS: &[&str] = &["1.0"];

/// Full configuration file structure
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Version of config file format
    #[serde(default = "default_version")]
    pub version: String,

    /// Run settings
    #[serde(default)]
    pub phantomcss: VisualTestConfig,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: default_version(),
            phantomcss: VisualTestConfig::default(),
        }
    }
}

impl ConfigFile {
    /// Find configuration file in standard locations
    pub fn find() -> Option<PathBuf> {
        CONFIG_LOCATIONS
            .iter()
            .map(|location| expand_path(location))
            .find(|path| path.exists())
    }

    /// Load an explicit file, else the first standard location, else defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => match Self::find() {
                Some(path) => {
                    tracing::debug!("Using config file {}", path.display());
                    Self::load(&path)
                }
                None => Ok(Self::default()),
            },
        }
    }

    /// Load and version-check a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;

        let config: Self = match FileFormat::of(path) {
            FileFormat::Yaml => serde_yaml::from_str::<Self>(&text).map_err(anyhow::Error::from),
            FileFormat::Json => serde_json::from_str::<Self>(&text).map_err(anyhow::Error::from),
        }
        .with_context(|| format!("Malformed {} config: {}", FileFormat::of(path), path.display()))?;

        config.check_version()?;
        Ok(config)
    }

    /// Write the file, creating missing parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = match FileFormat::of(path) {
            FileFormat::Yaml => serde_yaml::to_string(self)?,
            FileFormat::Json => serde_json::to_string_pretty(self)?,
        };

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create {}", dir.display()))?;
        }
        std::fs::write(path, text).with_context(|| format!("Cannot write {}", path.display()))
    }

    fn check_version(&self) -> Result<()> {
        if !SUPPORTED_VERSIONS.contains(&self.version.as_str()) {
            anyhow::bail!("Unsupported config version: {}", self.version);
        }
        Ok(())
    }

    /// Example configuration written by `config init`
    pub fn example() -> Self {
        Self {
            version: default_version(),
            phantomcss: VisualTestConfig::default()
                .with_option("--ignore-ssl-errors=true")
                .with_option("--ssl-protocol=any"),
        }
    }
}

/// Expand ~ to home directory
fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// On-disk encoding, picked by extension; anything but `.yaml`/`.yml` is JSON
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => FileFormat::Yaml,
            _ => FileFormat::Json,
        }
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            FileFormat::Yaml => "YAML",
            FileFormat::Json => "JSON",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_file_default() {
        let config = ConfigFile::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.phantomcss, VisualTestConfig::default());
    }

    #[test]
    fn test_config_file_save_load_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("phantomcss.yaml");

        let config = ConfigFile::example();
        config.save(&path).unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(loaded.phantomcss, config.phantomcss);
    }

    #[test]
    fn test_config_file_save_load_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("phantomcss.json");

        let mut config = ConfigFile::default();
        config.phantomcss.synchronous = true;
        config.save(&path).unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        assert!(loaded.phantomcss.synchronous);
    }

    #[test]
    fn test_unsupported_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("phantomcss.yaml");
        std::fs::write(&path, "version: \"9.9\"\n").unwrap();

        assert!(ConfigFile::load(&path).is_err());
    }

    #[test]
    fn test_resolve_explicit_missing_file() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.yaml");
        assert!(ConfigFile::resolve(Some(&missing)).is_err());
    }

    #[test]
    fn test_file_format_by_extension() {
        assert_eq!(FileFormat::of(Path::new("a/phantomcss.yml")), FileFormat::Yaml);
        assert_eq!(FileFormat::of(Path::new(".phantomcss.yaml")), FileFormat::Yaml);
        assert_eq!(FileFormat::of(Path::new("phantomcss.json")), FileFormat::Json);
        assert_eq!(FileFormat::of(Path::new("phantomcss")), FileFormat::Json);
    }

    #[test]
    fn test_malformed_file_names_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("phantomcss.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = ConfigFile::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Malformed JSON config"));
    }

    #[test]
    fn test_expand_path() {
        let path = expand_path("./phantomcss.yaml");
        assert_eq!(path, PathBuf::from("./phantomcss.yaml"));
    }
}
