//! `resolve` command: re-express a written freeze map for its location.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::asset::{Asset, SessionId};
use crate::config::FreezeConfig;
use crate::freeze::resolve_standalone;
use crate::log;
use crate::utils::path::absolutize;

/// Rewrite the freeze map at `map_file` in place.
///
/// Frozen paths are joined onto the map's directory and made relative to
/// `map_base_dir`. Without a base directory the map is only reformatted.
pub fn resolve_map_file(map_file: &Path, config: &FreezeConfig) -> Result<()> {
    let path = absolutize(map_file);
    let contents = fs::read(&path).with_context(|| format!("failed to read `{}`", path.display()))?;

    let mut asset = Asset::freeze_map(&path, SessionId::next()).with_contents(contents);
    resolve_standalone(config).resolve(&mut asset)?;

    fs::write(&path, asset.contents.as_deref().unwrap_or_default())
        .with_context(|| format!("failed to write `{}`", path.display()))?;

    match &config.map_base_dir {
        Some(base) => log!("resolve"; "{} relative to {}", path.display(), base.display()),
        None => log!("resolve"; "no map_base_dir set, {} left as is", path.display()),
    }
    Ok(())
}
