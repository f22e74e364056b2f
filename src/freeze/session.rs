//! Freeze sessions.
//!
//! A session wires three consumers over one ordered asset sequence:
//!
//! ```text
//! input ─► main transform ─► AssetStream ─► collector ─► finalizer ─► output
//!              │                  ▲
//!              └── LinkFreezer ───┘ (frozen assets)
//! ```
//!
//! - **main**: the caller's [`MainTransform`]; after the last input the
//!   session's freeze map asset is queued behind everything else
//! - **collector**: records `source_path → path` for every frozen asset
//! - **finalizer**: fills in the freeze map asset's contents when it passes
//!
//! Each input asset is processed to completion and its stream drained
//! through collector and finalizer before the next one is admitted, so
//! every branch sees the same order and no state needs locking.

use std::collections::VecDeque;
use std::path::PathBuf;

use super::{
    AssetStream, ExternalUrl, FreezeError, FreezeMap, FreezeMapResolver, LinkFreezer, UrlClassifier,
};
use crate::asset::{Asset, AssetKind, SessionId};
use crate::config::FreezeConfig;
use crate::debug;
use crate::utils::plural_count;

// =============================================================================
// Main Transform
// =============================================================================

/// Per-asset processing supplied by the caller.
///
/// Typically scans the asset for URLs, freezes them through `freezer` and
/// pushes the rewritten asset into `stream`. Assets not pushed are dropped.
pub trait MainTransform {
    fn transform(
        &mut self,
        asset: Asset,
        freezer: &LinkFreezer<'_>,
        stream: &AssetStream,
    ) -> anyhow::Result<()>;
}

impl<F> MainTransform for F
where
    F: FnMut(Asset, &LinkFreezer<'_>, &AssetStream) -> anyhow::Result<()>,
{
    fn transform(
        &mut self,
        asset: Asset,
        freezer: &LinkFreezer<'_>,
        stream: &AssetStream,
    ) -> anyhow::Result<()> {
        self(asset, freezer, stream)
    }
}

/// Forward every asset unchanged.
pub fn passthrough(asset: Asset, _: &LinkFreezer<'_>, stream: &AssetStream) -> anyhow::Result<()> {
    stream.push(asset);
    Ok(())
}

// =============================================================================
// FreezeSession
// =============================================================================

/// State of one freezing run: configuration, accumulated freeze map and
/// the pending freeze map asset.
#[derive(Debug)]
pub struct FreezeSession {
    id: SessionId,
    config: FreezeConfig,
    freeze_map: FreezeMap,
    map_asset: Option<Asset>,
}

impl FreezeSession {
    pub fn new(config: FreezeConfig) -> Self {
        let id = SessionId::next();
        let map_asset = Asset::freeze_map(PathBuf::from(&config.map_file_name), id);
        Self {
            id,
            config,
            freeze_map: FreezeMap::new(),
            map_asset: Some(map_asset),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &FreezeConfig {
        &self.config
    }

    /// Entries collected so far, unresolved.
    pub fn freeze_map(&self) -> &FreezeMap {
        &self.freeze_map
    }

    pub fn resolver(&self) -> FreezeMapResolver<'_> {
        FreezeMapResolver::from_config(&self.config)
    }

    /// Collector: record frozen assets.
    fn collect(&mut self, asset: &Asset) {
        if let Some(source) = &asset.source_path {
            self.freeze_map.record(source, &asset.path);
        }
    }

    /// Finalizer: serialize the resolved map into this session's map asset.
    fn finalize(&self, asset: &mut Asset) -> Result<(), FreezeError> {
        if !asset.is_freeze_map_of(self.id) {
            return Ok(());
        }
        let resolved = self.resolver().resolve(Some(&self.freeze_map), None, false);
        debug!("freeze"; "{}: {}", self.id, plural_count(resolved.len(), "mapping"));
        asset.contents = Some(resolved.to_json()?);
        Ok(())
    }

    /// Run `transform` over `input` with the default [`ExternalUrl`] classifier.
    pub fn run<I, T>(self, input: I, transform: T) -> FreezeRun<'static, I::IntoIter, T>
    where
        I: IntoIterator<Item = Asset>,
        T: MainTransform,
    {
        self.run_with(input, &ExternalUrl, transform)
    }

    /// Run `transform` over `input`, classifying URLs with `classifier`.
    ///
    /// The returned iterator yields transformed and frozen assets in stream
    /// order, then exactly one freeze map asset. A failed transform yields
    /// [`FreezeError::Transform`] in place of that input's assets and the
    /// run goes on.
    pub fn run_with<'c, I, T>(
        self,
        input: I,
        classifier: &'c dyn UrlClassifier,
        transform: T,
    ) -> FreezeRun<'c, I::IntoIter, T>
    where
        I: IntoIterator<Item = Asset>,
        T: MainTransform,
    {
        FreezeRun {
            session: self,
            input: input.into_iter(),
            transform,
            classifier,
            stream: AssetStream::new(),
            ready: VecDeque::new(),
            finished: false,
        }
    }
}

// =============================================================================
// FreezeRun
// =============================================================================

/// Iterator driving a [`FreezeSession`] over its input.
pub struct FreezeRun<'c, I, T> {
    session: FreezeSession,
    input: I,
    transform: T,
    classifier: &'c dyn UrlClassifier,
    stream: AssetStream,
    ready: VecDeque<Result<Asset, FreezeError>>,
    finished: bool,
}

impl<I, T> FreezeRun<'_, I, T>
where
    I: Iterator<Item = Asset>,
    T: MainTransform,
{
    pub fn session(&self) -> &FreezeSession {
        &self.session
    }

    /// Main branch for one input asset.
    fn process(&mut self, asset: Asset) {
        let path = asset.path.clone();
        let freezer = LinkFreezer::new(&self.session.config, self.classifier);

        match self.transform.transform(asset, &freezer, &self.stream) {
            Ok(()) => self.forward(),
            Err(source) => {
                let dropped = self.stream.discard();
                debug!("freeze"; "{} failed, dropped {}", path.display(), plural_count(dropped, "staged asset"));
                self.ready.push_back(Err(FreezeError::Transform { path, source }));
            }
        }
    }

    /// Drain the stream through collector and finalizer.
    fn forward(&mut self) {
        while let Some(mut asset) = self.stream.pop() {
            self.session.collect(&asset);
            let item = self.session.finalize(&mut asset).map(|()| asset);
            self.ready.push_back(item);
        }
    }

    /// End of input: the freeze map goes last.
    fn finish(&mut self) {
        if let Some(map_asset) = self.session.map_asset.take() {
            self.stream.push(map_asset);
        }
        self.forward();
        self.finished = true;
    }
}

impl<I, T> Iterator for FreezeRun<'_, I, T>
where
    I: Iterator<Item = Asset>,
    T: MainTransform,
{
    type Item = Result<Asset, FreezeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.ready.pop_front() {
                return Some(item);
            }
            if self.finished {
                return None;
            }
            match self.input.next() {
                Some(asset) => self.process(asset),
                None => self.finish(),
            }
        }
    }
}

// =============================================================================
// Standalone Resolution
// =============================================================================

/// Re-resolves serialized freeze maps at a later stage, without a session.
///
/// The destination directory of each map is the directory of the map
/// asset's own path; source keys are left as recorded.
#[derive(Debug, Clone, Default)]
pub struct StandaloneResolver {
    base_dir: Option<PathBuf>,
}

/// Build a [`StandaloneResolver`] from `config`.
pub fn resolve_standalone(config: &FreezeConfig) -> StandaloneResolver {
    StandaloneResolver::new(config)
}

impl StandaloneResolver {
    pub fn new(config: &FreezeConfig) -> Self {
        Self {
            base_dir: config.map_base_dir.clone(),
        }
    }

    /// Rewrite a freeze map asset in place. Other assets are left alone.
    ///
    /// Missing contents count as an empty map.
    pub fn resolve(&self, asset: &mut Asset) -> Result<(), FreezeError> {
        if !matches!(asset.kind, AssetKind::FreezeMap(_)) {
            return Ok(());
        }

        let map = match asset.contents.as_deref() {
            Some(bytes) => FreezeMap::from_json(bytes, &asset.path)?,
            None => FreezeMap::new(),
        };
        let resolver = FreezeMapResolver::new(self.base_dir.as_deref());
        let resolved = resolver.resolve(Some(&map), asset.path.parent(), true);

        asset.contents = Some(resolved.to_json()?);
        Ok(())
    }

    /// Apply [`resolve`](Self::resolve) to each asset of `input`.
    pub fn process<I>(&self, input: I) -> impl Iterator<Item = Result<Asset, FreezeError>>
    where
        I: IntoIterator<Item = Asset>,
    {
        input
            .into_iter()
            .map(move |mut asset| self.resolve(&mut asset).map(|()| asset))
    }
}
