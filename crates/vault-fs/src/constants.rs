//! Object categories and fixed names in the repository layout.

use std::path::Path;
use std::str::FromStr;

use crate::Error;

/// File name of the config record, directly under the repository root.
pub const CONFIG_FILE: &str = "config";

/// Number of shard directories under `data/`.
pub const SHARD_COUNT: usize = 256;

/// Prefix of in-flight temporary files. Never a valid identifier.
pub const TEMP_PREFIX: &str = ".tmp-";

/// Logical namespace for a kind of object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Pack files. The only sharded category.
    Data,
    Index,
    Keys,
    Locks,
    Snapshots,
}

impl Category {
    /// All categories, in the order directories are created.
    pub const ALL: [Category; 5] = [
        Self::Data,
        Self::Index,
        Self::Keys,
        Self::Locks,
        Self::Snapshots,
    ];

    /// Get the directory name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Index => "index",
            Self::Keys => "keys",
            Self::Locks => "locks",
            Self::Snapshots => "snapshots",
        }
    }

    /// Whether objects of this category live in `<category>/<shard>/`.
    pub fn is_sharded(&self) -> bool {
        matches!(self, Self::Data)
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::InvalidCategory { name: s.to_string() })
    }
}

impl AsRef<Path> for Category {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
