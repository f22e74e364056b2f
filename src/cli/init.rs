//! `init` command: write a commented config template.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::config::FreezeConfig;
use crate::log;

/// Generate freeze.toml content with comments.
pub fn config_template() -> String {
    let mut out = format!(
        "# tola-freeze configuration file (v{})\n\n",
        env!("CARGO_PKG_VERSION")
    );
    out.push_str(&FreezeConfig::template_with_header());
    out.push('\n');
    out
}

/// Write the template to `path`, or print it when `dry_run` is set.
///
/// An existing file is never overwritten.
pub fn write_config(path: &Path, dry_run: bool) -> Result<()> {
    if dry_run {
        print!("{}", config_template());
        return Ok(());
    }

    if path.exists() {
        bail!("`{}` already exists", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create `{}`", parent.display()))?;
    }
    fs::write(path, config_template())
        .with_context(|| format!("failed to write `{}`", path.display()))?;

    log!("init"; "wrote {}", path.display());
    Ok(())
}
