//! Backend settings and format-agnostic settings files

use std::path::{Path, PathBuf};

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use crate::disk::{DEFAULT_DIR_MODE, DEFAULT_FILE_MODE};

use crate::disk::write_atomic;
use crate::durability::Durability;
use crate::{Error, Result};

/// Largest permission value, setuid/setgid/sticky included.
const MAX_MODE: u32 = 0o7777;

/// How a local repository backend is set up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Repository root directory.
    pub root: PathBuf,

    /// Mode of directories created by `init`. Octal string or integer.
    #[serde(serialize_with = "serialize_mode", deserialize_with = "deserialize_mode")]
    pub dir_mode: u32,

    /// Mode of stored blobs and the config record.
    #[serde(serialize_with = "serialize_mode", deserialize_with = "deserialize_mode")]
    pub file_mode: u32,

    /// Flush files and directories after writes.
    pub fsync: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            dir_mode: DEFAULT_DIR_MODE,
            file_mode: DEFAULT_FILE_MODE,
            fsync: true,
        }
    }
}

impl Settings {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }
}

/// Parse an octal permission string such as `"0700"`, `"700"` or `"0o700"`.
pub fn parse_mode(s: &str) -> Option<u32> {
    let digits = s.trim().trim_start_matches("0o");
    if digits.is_empty() {
        return None;
    }
    u32::from_str_radix(digits, 8).ok().filter(|m| *m <= MAX_MODE)
}

fn serialize_mode<S: Serializer>(mode: &u32, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{:04o}", mode))
}

fn deserialize_mode<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Mode {
        Int(u32),
        Str(String),
    }

    match Mode::deserialize(deserializer)? {
        Mode::Int(m) if m <= MAX_MODE => Ok(m),
        Mode::Int(m) => Err(de::Error::custom(format!(
            "mode {m:o} exceeds {MAX_MODE:o}"
        ))),
        Mode::Str(s) => {
            parse_mode(&s).ok_or_else(|| de::Error::custom(format!("invalid octal mode '{s}'")))
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Toml,
    Json,
    Yaml,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match extension.as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}

/// Loads and saves settings files.
///
/// The format is detected from the file extension:
/// - `.toml` -> TOML
/// - `.json` -> JSON
/// - `.yaml`, `.yml` -> YAML
#[derive(Debug, Default)]
pub struct SettingsStore {
    durability: Durability,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_durability(durability: Durability) -> Self {
        Self { durability }
    }

    pub fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        let parsed = match format {
            Format::Toml => toml::from_str(&content).map_err(|e| e.to_string()),
            Format::Json => serde_json::from_str(&content).map_err(|e| e.to_string()),
            Format::Yaml => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| Error::ConfigParse {
            path: path.to_path_buf(),
            format: format.name().into(),
            message,
        })
    }

    /// Save with an atomic write, so a crash leaves the old file or the new
    /// one.
    pub fn save<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let format = Format::from_path(path)?;

        let rendered = match format {
            Format::Toml => toml::to_string_pretty(value).map_err(|e| e.to_string()),
            Format::Json => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
            Format::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        };
        let content = rendered.map_err(|message| Error::ConfigSerialize {
            path: path.to_path_buf(),
            format: format.name().into(),
            message,
        })?;

        write_atomic(
            &self.durability,
            DEFAULT_FILE_MODE,
            DEFAULT_DIR_MODE,
            path,
            &mut content.as_bytes(),
        )?;
        Ok(())
    }
}
