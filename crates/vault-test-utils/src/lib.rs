//! Shared test utilities for the vault workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`vault`]: [`TestVault`](vault::TestVault), a repository in a temp dir
//! - [`sync`]: [`Syncer`](vault_fs::Syncer) doubles that simulate
//!   filesystems without flush support or with failing devices

pub mod sync;
pub mod vault;

pub use sync::{CountingSyncer, FailingSyncer, UnsupportedSyncer};
pub use vault::TestVault;
