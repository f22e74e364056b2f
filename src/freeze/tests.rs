//! End-to-end freeze session tests.

use std::fs;
use std::path::{Path, PathBuf};

use sha1::{Digest, Sha1};
use tempfile::TempDir;

use super::*;
use crate::asset::{Asset, AssetKind, SessionId};
use crate::config::{FreezeConfig, MissingPolicy};
use crate::utils::path::absolutize;

const IMAGE: &[u8] = b"\x89PNG\r\n\x1a\nimage bytes";

/// Treat each line of an asset as a URL and freeze it.
fn freeze_lines(asset: Asset, freezer: &LinkFreezer<'_>, stream: &AssetStream) -> anyhow::Result<()> {
    let text = asset.text().unwrap_or_default();
    let mut rewritten = Vec::new();
    for url in text.lines() {
        rewritten.push(freezer.freeze_link(&asset, stream, url, None)?);
    }
    stream.push(asset.with_contents(rewritten.join("\n")));
    Ok(())
}

fn site(files: &[(&str, &[u8])]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = absolutize(dir.path());
    for (path, contents) in files {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }
    (dir, root)
}

fn page(root: &Path, path: &str, urls: &str) -> Asset {
    let path = root.join(path);
    let base = path.parent().unwrap().to_path_buf();
    Asset::new(path, base).with_contents(urls)
}

fn collect(run: impl Iterator<Item = Result<Asset, FreezeError>>) -> Vec<Asset> {
    run.collect::<Result<Vec<_>, _>>().unwrap()
}

fn map_of(asset: &Asset) -> FreezeMap {
    FreezeMap::from_json(asset.contents.as_deref().unwrap(), &asset.path).unwrap()
}

#[test]
fn test_freezes_to_sha1_name_keeping_query() {
    let (_dir, root) = site(&[("image.png", IMAGE)]);
    let config = FreezeConfig {
        nesting_level: 0,
        ..Default::default()
    };

    let out = collect(FreezeSession::new(config).run([page(&root, "index.txt", "image.png?v=2")], freeze_lines));

    let name = format!("{}.png", hex::encode(Sha1::digest(IMAGE)));
    assert_eq!(out.len(), 3);
    assert_eq!(out[0].path, PathBuf::from(&name));
    assert_eq!(out[0].contents.as_deref(), Some(IMAGE));
    assert_eq!(out[0].source_path, Some(root.join("image.png")));
    assert_eq!(out[1].text().unwrap(), format!("{name}?v=2"));
    assert!(matches!(out[2].kind, AssetKind::FreezeMap(_)));
}

#[test]
fn test_sharded_name() {
    let (_dir, root) = site(&[("image.png", IMAGE)]);
    let config = FreezeConfig {
        nesting_level: 2,
        ..Default::default()
    };

    let out = collect(FreezeSession::new(config).run([page(&root, "index.txt", "image.png")], freeze_lines));

    let digest = hex::encode(Sha1::digest(IMAGE));
    let expected = format!("{}/{}/{digest}.png", &digest[..1], &digest[1..2]);
    assert_eq!(out[0].path, PathBuf::from(&expected));
    assert_eq!(out[1].text().unwrap(), expected);
}

#[test]
fn test_same_content_distinct_sources() {
    let (_dir, root) = site(&[("a/x.png", IMAGE), ("b/y.png", IMAGE)]);
    let session = FreezeSession::new(FreezeConfig::default());

    let input = [page(&root, "a/one.txt", "x.png"), page(&root, "b/two.txt", "y.png")];
    let out = collect(session.run(input, freeze_lines));

    let frozen: Vec<_> = out.iter().filter(|a| a.is_frozen()).collect();
    assert_eq!(frozen.len(), 2);
    assert_eq!(frozen[0].path, frozen[1].path);

    let map = map_of(out.last().unwrap());
    assert_eq!(map.len(), 2);
    let x = root.join("a/x.png");
    let y = root.join("b/y.png");
    assert_eq!(map.get(&x.to_string_lossy()), map.get(&y.to_string_lossy()));
}

#[test]
fn test_map_emitted_once_and_last() {
    let (_dir, root) = site(&[("a.png", b"a"), ("b.png", b"b"), ("c.png", b"c")]);
    let session = FreezeSession::new(FreezeConfig::default());
    let id = session.id();

    let input = [
        page(&root, "one.txt", "a.png\nb.png"),
        page(&root, "two.txt", "c.png\nhttps://example.com/d.png"),
    ];
    let out = collect(session.run(input, freeze_lines));

    let maps: Vec<_> = out.iter().enumerate().filter(|(_, a)| a.is_freeze_map_of(id)).collect();
    assert_eq!(maps.len(), 1);
    assert_eq!(maps[0].0, out.len() - 1);

    let last = out.last().unwrap();
    assert_eq!(last.path, PathBuf::from("freeze-map.json"));
    assert_eq!(map_of(last).len(), 3);
    assert_eq!(out.iter().filter(|a| a.is_frozen()).count(), 3);
}

#[test]
fn test_frozen_assets_precede_referencing_asset() {
    let (_dir, root) = site(&[("a.png", b"a")]);
    let session = FreezeSession::new(FreezeConfig::default());

    let out = collect(session.run([page(&root, "one.txt", "a.png")], freeze_lines));
    assert!(out[0].is_frozen());
    assert_eq!(out[1].path, root.join("one.txt"));
}

#[test]
fn test_empty_input_still_emits_map() {
    let session = FreezeSession::new(FreezeConfig::default());
    let out = collect(session.run(Vec::new(), freeze_lines));

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].contents.as_deref(), Some(&b"{}"[..]));
}

#[test]
fn test_map_relative_to_base_dir() {
    let (_dir, root) = site(&[("a/img.png", IMAGE)]);
    let config = FreezeConfig {
        map_base_dir: Some(root.clone()),
        ..Default::default()
    };

    let out = collect(FreezeSession::new(config).run([page(&root, "index.txt", "a/img.png")], freeze_lines));

    let map = map_of(out.last().unwrap());
    let frozen = out[0].path.to_string_lossy().into_owned();
    assert_eq!(map.get("a/img.png"), Some(frozen.as_str()));
}

#[test]
fn test_missing_asset_keep_policy() {
    let (_dir, root) = site(&[]);
    let session = FreezeSession::new(FreezeConfig::default());

    let out = collect(session.run([page(&root, "index.txt", "gone.png?v=1")], freeze_lines));
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].text().unwrap(), "gone.png?v=1");
    assert!(map_of(&out[1]).is_empty());
}

#[test]
fn test_failed_asset_is_isolated() {
    let (_dir, root) = site(&[("a.png", b"a"), ("c.png", b"c")]);
    let config = FreezeConfig {
        on_missing: MissingPolicy::Error,
        ..Default::default()
    };

    let input = [
        page(&root, "good.txt", "a.png"),
        page(&root, "bad.txt", "c.png\nmissing.png"),
        page(&root, "after.txt", "a.png"),
    ];
    let results: Vec<_> = FreezeSession::new(config).run(input, freeze_lines).collect();

    assert_eq!(results.len(), 6);
    let err = results[2].as_ref().unwrap_err();
    assert!(err.is_missing_asset());
    assert!(matches!(err, FreezeError::Transform { path, .. } if *path == root.join("bad.txt")));

    let ok: Vec<_> = results.into_iter().filter_map(Result::ok).collect();
    assert_eq!(ok[2].path, ok[0].path);
    assert_eq!(ok[3].path, root.join("after.txt"));

    let map = map_of(ok.last().unwrap());
    assert_eq!(map.len(), 1);
    assert!(map.get(&root.join("c.png").to_string_lossy()).is_none());
}

#[test]
fn test_foreign_map_asset_untouched() {
    let foreign = Asset::freeze_map("other-map.json", SessionId::next()).with_contents("{\"x\": \"y\"}");
    let session = FreezeSession::new(FreezeConfig::default());
    let id = session.id();

    let out = collect(session.run([foreign.clone()], passthrough));
    assert_eq!(out[0], foreign);
    assert!(out[1].is_freeze_map_of(id));
}

#[test]
fn test_custom_classifier() {
    let (_dir, root) = site(&[("cdn/a.png", b"a")]);
    let session = FreezeSession::new(FreezeConfig::default());
    let cdn = |url: &str| url.starts_with("cdn/");

    let out = collect(session.run_with([page(&root, "index.txt", "cdn/a.png")], &cdn, freeze_lines));
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].text().unwrap(), "cdn/a.png");
}

/// Freeze a fixed link, moving the frozen asset under `static/`.
fn freeze_into_static(asset: Asset, freezer: &LinkFreezer<'_>, stream: &AssetStream) -> anyhow::Result<()> {
    let mut hook = |_: &Asset, _: &AssetStream, _: &str, frozen: &mut Asset| {
        frozen.path = Path::new("static").join(&frozen.path);
    };
    freezer.freeze_link(&asset, stream, "a.png", Some(&mut hook))?;
    stream.push(asset);
    Ok(())
}

#[test]
fn test_hook_runs_before_push() {
    let (_dir, root) = site(&[("a.png", b"a")]);
    let session = FreezeSession::new(FreezeConfig::default());

    let out = collect(session.run([page(&root, "index.txt", "")], freeze_into_static));

    assert!(out[0].path.starts_with("static"));
    let map = map_of(out.last().unwrap());
    let recorded = map.get(&root.join("a.png").to_string_lossy()).unwrap().to_string();
    assert!(recorded.starts_with("static"));
}

// ============================================================================
// Standalone resolution
// ============================================================================

fn serialized_map(path: PathBuf) -> Asset {
    Asset::freeze_map(path, SessionId::next()).with_contents(r#"{"/src/a/img.png": "ab/cd.png"}"#)
}

#[test]
fn test_standalone_rebases_values() {
    let root = PathBuf::from("/site");
    let config = FreezeConfig {
        map_base_dir: Some(root.clone()),
        ..Default::default()
    };
    let resolver = resolve_standalone(&config);

    let mut asset = serialized_map(root.join("dist/freeze-map.json"));
    resolver.resolve(&mut asset).unwrap();

    let map = map_of(&asset);
    assert_eq!(map.get("/src/a/img.png"), Some("dist/ab/cd.png"));
}

#[test]
fn test_standalone_is_idempotent() {
    let config = FreezeConfig {
        map_base_dir: Some(PathBuf::from("/site")),
        ..Default::default()
    };
    let resolver = resolve_standalone(&config);
    let input = serialized_map(PathBuf::from("/site/dist/freeze-map.json"));

    let mut first = input.clone();
    let mut second = input;
    resolver.resolve(&mut first).unwrap();
    resolver.resolve(&mut second).unwrap();
    assert_eq!(first.contents, second.contents);
}

#[test]
fn test_standalone_without_base_dir_is_identity() {
    let resolver = resolve_standalone(&FreezeConfig::default());
    let mut asset = serialized_map(PathBuf::from("/site/dist/freeze-map.json"));
    resolver.resolve(&mut asset).unwrap();
    assert_eq!(map_of(&asset).get("/src/a/img.png"), Some("ab/cd.png"));
}

#[test]
fn test_standalone_edge_inputs() {
    let config = FreezeConfig {
        map_base_dir: Some(PathBuf::from("/site")),
        ..Default::default()
    };
    let resolver = resolve_standalone(&config);

    let malformed = Asset::freeze_map("/site/map.json", SessionId::next()).with_contents("[1, 2]");
    let empty = Asset::freeze_map("/site/map.json", SessionId::next());
    let regular = Asset::new("/site/main.css", "/site").with_contents("not json");

    let results: Vec<_> = resolver.process([malformed, empty, regular.clone()]).collect();
    assert!(matches!(results[0], Err(FreezeError::MalformedMap { .. })));
    assert_eq!(results[1].as_ref().unwrap().contents.as_deref(), Some(&b"{}"[..]));
    assert_eq!(results[2].as_ref().unwrap(), &regular);
}
