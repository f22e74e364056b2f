//! Ordered asset stream shared by the main transform and the freezer.
//!
//! The main transform forwards the assets it processed and the link
//! freezer injects newly frozen assets into the same stream. Pushed
//! assets are buffered in arrival order until the session drains them.

use crossbeam::channel::{self, Receiver, Sender};

use crate::asset::Asset;

/// Unbounded FIFO of assets produced while processing one input asset.
#[derive(Debug)]
pub struct AssetStream {
    tx: Sender<Asset>,
    rx: Receiver<Asset>,
}

impl Default for AssetStream {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetStream {
    pub fn new() -> Self {
        let (tx, rx) = channel::unbounded();
        Self { tx, rx }
    }

    /// Queue an asset downstream.
    pub fn push(&self, asset: Asset) {
        // Receiver lives as long as self, so the channel is never disconnected.
        self.tx.send(asset).ok();
    }

    /// Take the oldest queued asset.
    pub(crate) fn pop(&self) -> Option<Asset> {
        self.rx.try_recv().ok()
    }

    /// Drop everything queued, returning how many assets were discarded.
    pub(crate) fn discard(&self) -> usize {
        self.rx.try_iter().count()
    }

    /// Number of queued assets.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
