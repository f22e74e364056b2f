//! `freeze` command: freeze every stylesheet of a directory.
//!
//! ```text
//! INPUT_DIR/css/main.css ──► OUTPUT_DIR/css/main.css   (links rewritten)
//!          fonts/a.woff  ──► OUTPUT_DIR/f/f00d….woff   (frozen)
//!                        ──► OUTPUT_DIR/freeze-map.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use jwalk::WalkDir;
use rustc_hash::FxHashSet;

use crate::asset::{Asset, AssetKind};
use crate::config::FreezeConfig;
use crate::freeze::FreezeSession;
use crate::transform::CssTransform;
use crate::utils::path::absolutize;
use crate::utils::plural_count;
use crate::{debug, log};

/// Counts reported after a freeze run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FreezeSummary {
    pub stylesheets: usize,
    pub frozen: usize,
    pub failed: usize,
    pub map_path: Option<PathBuf>,
}

/// Freeze all stylesheets under `input` into `output`.
///
/// Stylesheets that fail are reported and skipped; the rest of the run,
/// including the freeze map, is still written.
pub fn freeze_dir(input: &Path, output: &Path, config: &FreezeConfig) -> Result<FreezeSummary> {
    let input = absolutize(input);
    let output = absolutize(output);
    if !input.is_dir() {
        bail!("input directory `{}` does not exist", input.display());
    }

    let stylesheets = scan_stylesheets(&input)?;
    debug!("freeze"; "found {} in {}", plural_count(stylesheets.len(), "stylesheet"), input.display());

    let mut summary = FreezeSummary::default();
    let mut written = FxHashSet::default();

    for result in FreezeSession::new(config.clone()).run(stylesheets, CssTransform::relinking()) {
        let asset = match result {
            Ok(asset) => asset,
            Err(err) => {
                log!("error"; "{:#}", anyhow::Error::new(err));
                summary.failed += 1;
                continue;
            }
        };

        if asset.is_frozen() && !written.insert(asset.path.clone()) {
            continue;
        }

        let dest = output.join(&asset.path);
        write_asset(&dest, &asset)?;

        match asset.kind {
            AssetKind::FreezeMap(_) => summary.map_path = Some(dest),
            AssetKind::Regular if asset.is_frozen() => summary.frozen += 1,
            AssetKind::Regular => summary.stylesheets += 1,
        }
    }

    Ok(summary)
}

/// Find `.css` files, sorted, as assets with output-relative paths.
fn scan_stylesheets(input: &Path) -> Result<Vec<Asset>> {
    let mut paths: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| crate::asset::extension_of(p).eq_ignore_ascii_case(".css"))
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| -> Result<Asset> {
            let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
            let relative = path.strip_prefix(input).unwrap_or(&path).to_path_buf();
            let mut asset = Asset::read(&path, base)
                .with_context(|| format!("failed to read `{}`", path.display()))?;
            asset.path = relative;
            Ok(asset)
        })
        .collect()
}

fn write_asset(dest: &Path, asset: &Asset) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create `{}`", parent.display()))?;
    }
    fs::write(dest, asset.contents.as_deref().unwrap_or_default())
        .with_context(|| format!("failed to write `{}`", dest.display()))
}

/// Run the `freeze` command and log a summary.
pub fn run_freeze(input: &Path, output: &Path, config: &FreezeConfig) -> Result<()> {
    let summary = freeze_dir(input, output, config)?;

    log!(
        "freeze";
        "{}, {}",
        plural_count(summary.stylesheets, "stylesheet"),
        plural_count(summary.frozen, "frozen file")
    );
    if let Some(map_path) = &summary.map_path {
        log!("freeze"; "map written to {}", map_path.display());
    }

    if summary.failed > 0 {
        bail!("{} failed", plural_count(summary.failed, "stylesheet"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MissingPolicy;
    use crate::freeze::{FreezeMap, content_file_name, shard_path};
    use tempfile::TempDir;

    const FONT: &[u8] = b"wOFFfont";
    const LOGO: &[u8] = b"\x89PNGlogo";

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("css/theme")).unwrap();
        fs::create_dir_all(root.join("fonts")).unwrap();
        fs::write(root.join("fonts/a.woff"), FONT).unwrap();
        fs::write(root.join("logo.png"), LOGO).unwrap();
        fs::write(
            root.join("css/main.css"),
            "@font-face{src:url('../fonts/a.woff?#iefix')}h1{background:url(../logo.png)}",
        )
        .unwrap();
        fs::write(root.join("css/theme/dark.css"), "h1{background:url(\"../../logo.png\")}").unwrap();
        fs::write(root.join("readme.txt"), "url(logo.png)").unwrap();
        dir
    }

    fn frozen(contents: &[u8], ext: &str) -> String {
        shard_path(&content_file_name(contents, ext, Default::default()), 1)
    }

    #[test]
    fn test_freeze_dir_writes_outputs() {
        let src = site();
        let out = TempDir::new().unwrap();
        let config = FreezeConfig {
            map_base_dir: Some(absolutize(src.path())),
            ..Default::default()
        };

        let summary = freeze_dir(src.path(), out.path(), &config).unwrap();
        assert_eq!(summary.stylesheets, 2);
        assert_eq!(summary.frozen, 2);
        assert_eq!(summary.failed, 0);

        let font = frozen(FONT, ".woff");
        let logo = frozen(LOGO, ".png");
        assert_eq!(fs::read(out.path().join(&font)).unwrap(), FONT);
        assert_eq!(fs::read(out.path().join(&logo)).unwrap(), LOGO);

        let main = fs::read_to_string(out.path().join("css/main.css")).unwrap();
        assert_eq!(
            main,
            format!("@font-face{{src:url('../{font}?#iefix')}}h1{{background:url(../{logo})}}")
        );
        let dark = fs::read_to_string(out.path().join("css/theme/dark.css")).unwrap();
        assert_eq!(dark, format!("h1{{background:url(\"../../{logo}\")}}"));
        assert!(!out.path().join("readme.txt").exists());

        let map_path = summary.map_path.unwrap();
        assert_eq!(map_path, absolutize(out.path()).join("freeze-map.json"));
        let map = FreezeMap::from_json(&fs::read(&map_path).unwrap(), &map_path).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("fonts/a.woff"), Some(font.as_str()));
        assert_eq!(map.get("logo.png"), Some(logo.as_str()));
    }

    #[test]
    fn test_freeze_dir_strict_reports_failures() {
        let src = site();
        fs::write(src.path().join("css/broken.css"), "a{b:url(missing.png)}").unwrap();
        let out = TempDir::new().unwrap();
        let config = FreezeConfig {
            on_missing: MissingPolicy::Error,
            ..Default::default()
        };

        let summary = freeze_dir(src.path(), out.path(), &config).unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.stylesheets, 2);
        assert!(!out.path().join("css/broken.css").exists());
        assert!(summary.map_path.is_some());

        assert!(run_freeze(src.path(), out.path(), &config).is_err());
    }

    #[test]
    fn test_run_freeze_mixed_case_urls() {
        let src = TempDir::new().unwrap();
        let root = src.path();
        fs::create_dir_all(root.join("css")).unwrap();
        fs::write(root.join("logo.png"), LOGO).unwrap();
        fs::write(root.join("fonts.woff"), FONT).unwrap();
        fs::write(
            root.join("css/Site.CSS"),
            b"h1{background:URL(\t'../logo.png' )}\n@font-face{src:Url(\r\n\"../fonts.woff\"\t)}\np:after{content:\"\xE9\"}",
        )
        .unwrap();
        let out = TempDir::new().unwrap();
        let config = FreezeConfig {
            map_base_dir: Some(absolutize(root)),
            on_missing: MissingPolicy::Error,
            ..Default::default()
        };

        run_freeze(root, out.path(), &config).unwrap();

        let logo = frozen(LOGO, ".png");
        let font = frozen(FONT, ".woff");
        let mut expected = format!(
            "h1{{background:url('../{logo}')}}\n@font-face{{src:url(\"../{font}\")}}\np:after{{content:\""
        )
        .into_bytes();
        expected.extend_from_slice(b"\xE9\"}");
        assert_eq!(fs::read(out.path().join("css/Site.CSS")).unwrap(), expected);

        let map_path = out.path().join("freeze-map.json");
        let map = FreezeMap::from_json(&fs::read(&map_path).unwrap(), &map_path).unwrap();
        assert_eq!(map.get("logo.png"), Some(logo.as_str()));
        assert_eq!(map.get("fonts.woff"), Some(font.as_str()));
    }

    #[test]
    fn test_freeze_dir_missing_input() {
        let out = TempDir::new().unwrap();
        let result = freeze_dir(&out.path().join("nope"), out.path(), &FreezeConfig::default());
        assert!(result.is_err());
    }
}
