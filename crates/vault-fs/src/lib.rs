//! Local-disk storage backend for content-addressed backup repositories
//!
//! Maps object categories (data, index, keys, locks, snapshots) and the
//! config record onto a directory tree and provides durable create, read,
//! list and delete over it. Writes are atomic and deletes are idempotent, so
//! callers can blindly retry any operation.

pub mod checksum;
pub mod constants;
pub mod disk;
pub mod durability;
pub mod error;
pub mod filesystem;
pub mod init;
pub mod layout;
pub mod repository;
pub mod settings;

pub use constants::{CONFIG_FILE, Category, SHARD_COUNT, TEMP_PREFIX};
pub use disk::DiskFilesystem;
pub use durability::{Durability, OsSyncer, SyncOutcome, Syncer};
pub use error::{Error, Result};
pub use filesystem::{Blob, Filesystem};
pub use init::create_repo;
pub use layout::{RepoLayout, shard, shard_name};
pub use repository::Repository;
pub use settings::{Settings, SettingsStore};
