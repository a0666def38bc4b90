//! Command implementations for vault-cli

pub mod blob;
pub mod config;
pub mod init;

use std::io::Read;
use std::path::Path;

use crate::error::Result;

pub use blob::{run_cat, run_list, run_put, run_rm, run_stat};
pub use config::{run_config_get, run_config_rm, run_config_set, run_config_stat};
pub use init::run_init;

/// Read a whole input file, `-` meaning stdin.
pub(crate) fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut content = Vec::new();
        std::io::stdin().lock().read_to_end(&mut content)?;
        Ok(content)
    } else {
        Ok(std::fs::read(path).map_err(|e| vault_fs::Error::io(path, e))?)
    }
}
