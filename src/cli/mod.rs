//! Command-line interface module.

mod args;
pub mod freeze;
pub mod init;
pub mod resolve;

pub use args::{Cli, Commands, FreezeArgs, ResolveArgs};

use anyhow::Result;
use std::path::Path;

use crate::config::{FreezeConfig, FreezeOverrides, ProjectConfig};

/// Load `[freeze]` from `config_path`, then apply command-line overrides.
pub fn load_config(config_path: &Path, overrides: FreezeOverrides) -> Result<FreezeConfig> {
    let mut config = ProjectConfig::load(config_path)?.freeze;
    config.merge(overrides);
    config.check()?;
    Ok(config)
}
