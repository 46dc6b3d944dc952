//! Cross-browser download triggering
//!
//! Handing a download URL to the hosting browser is not uniform: one
//! browser family silently drops navigation-triggered downloads, and only
//! saves the file when the request originates from an activated anchor
//! element with a `download` attribute. The trigger therefore probes the
//! host's capabilities once and commits to one of two strategies.
//!
//! Whether the browser actually saves the file is not observable here; the
//! trigger only guarantees it performed the correct technique for the host
//! it was given.

use std::sync::Arc;

/// Capability surface of the hosting browser environment
///
/// Implemented by the embedder against the real host. Both save techniques
/// are fire-and-forget: the native download pipeline takes over once the
/// URL is handed off, and no completion signal flows back.
pub trait SaveSurface: Send + Sync {
    /// Whether navigation into a new browsing context reliably triggers a
    /// file save on this host. Hosts that drop such downloads answer
    /// `false` and get the anchor technique instead.
    fn navigation_downloads_supported(&self) -> bool;

    /// Strategy A: open the URL in a new browsing context
    fn open_in_new_context(&self, url: &str);

    /// Strategy B: synthesize a temporary anchor with a `download`
    /// attribute, insert it, activate it, and remove it
    fn save_via_anchor(&self, url: &str);
}

/// The save technique the trigger committed to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveStrategy {
    /// Open the URL in a new browsing context
    NewContext,
    /// Activate a synthesized anchor element
    AnchorClick,
}

/// Triggers the platform-appropriate file-save action for a built URL
///
/// The capability probe runs once at construction, not per call and not
/// from user configuration, so every `trigger` dispatches the same way.
pub struct DownloadTrigger {
    surface: Arc<dyn SaveSurface>,
    strategy: SaveStrategy,
}

impl DownloadTrigger {
    /// Probe `surface` and commit to a save strategy
    pub fn new(surface: Arc<dyn SaveSurface>) -> Self {
        let strategy = if surface.navigation_downloads_supported() {
            SaveStrategy::NewContext
        } else {
            SaveStrategy::AnchorClick
        };
        tracing::debug!(?strategy, "selected download save strategy");
        Self { surface, strategy }
    }

    /// The strategy selected by the capability probe
    pub fn strategy(&self) -> SaveStrategy {
        self.strategy
    }

    /// Hand `url` to the browser's download pipeline
    ///
    /// Synchronous and infallible from the caller's view; the download
    /// itself is never awaited.
    pub fn trigger(&self, url: &str) {
        tracing::debug!(url, strategy = ?self.strategy, "triggering download");
        match self.strategy {
            SaveStrategy::NewContext => self.surface.open_in_new_context(url),
            SaveStrategy::AnchorClick => self.surface.save_via_anchor(url),
        }
    }
}
