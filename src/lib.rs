//! # folder-archive
//!
//! Client-side orchestration library for downloading folders as compressed
//! archives and expanding uploaded archives in place, with the actual
//! compression performed by a separate backend service reached over HTTP.
//!
//! ## Design Philosophy
//!
//! folder-archive is designed to be:
//! - **Deterministic** - request URLs are a pure function of their inputs
//!   plus the ambient anti-forgery cookie
//! - **Host-agnostic** - the browser surface, settings store, and
//!   context-menu registrar are traits the embedder implements
//! - **Library-first** - no UI of its own, purely a Rust crate for embedding
//!   in a file-browser frontend
//!
//! It does not compress or decompress bytes itself; it only produces correct
//! requests and correct menu state for a system that does.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use folder_archive::{
//!     CommandOrchestrator, DownloadTrigger, ExtractInvoker, NoCookies,
//!     RequestBuilder, SaveSurface, SelectionItem, SharedOptions,
//! };
//!
//! struct BrowserSurface;
//!
//! impl SaveSurface for BrowserSurface {
//!     fn navigation_downloads_supported(&self) -> bool { false }
//!     fn open_in_new_context(&self, _url: &str) { /* window.open */ }
//!     fn save_via_anchor(&self, _url: &str) { /* anchor click */ }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let builder = RequestBuilder::new("http://localhost:8888/", Arc::new(NoCookies))?;
//!     let options = SharedOptions::default();
//!     let orchestrator = CommandOrchestrator::new(
//!         builder.clone(),
//!         DownloadTrigger::new(Arc::new(BrowserSurface)),
//!         ExtractInvoker::new(builder),
//!         options,
//!     );
//!
//!     orchestrator.download_selected(&[SelectionItem::directory("data/reports")], None)?;
//!     orchestrator.extract_selected(&[SelectionItem::file("upload.tar.gz")]).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Archive formats, settings, and the shared option snapshot
pub mod config;
/// Error types
pub mod error;
/// Extract invocation against the backend
pub mod extract;
/// Command glue binding selection, settings, and effects
pub mod orchestrator;
/// Request URL construction
pub mod request;
/// Settings-driven menu reconciliation
pub mod reconciler;
/// Download save triggering
pub mod trigger;
/// Core shared types
pub mod types;
/// Archive-ness predicate for filenames
pub mod visibility;

// Re-export commonly used types
pub use config::{
    ALLOWED_ARCHIVE_EXTENSIONS, ArchiveFormat, ArchiveOptions, ArchiveSettings, SUBMENU_FORMATS,
    SharedOptions,
};
pub use error::{Error, Result};
pub use extract::ExtractInvoker;
pub use orchestrator::CommandOrchestrator;
pub use reconciler::{MenuRegistrar, SettingsReconciler, SettingsSource, format_menu_label};
pub use request::{CookieSource, MemoryCookies, NoCookies, RequestBuilder, XSRF_COOKIE_NAME};
pub use trigger::{DownloadTrigger, SaveStrategy, SaveSurface};
pub use types::{
    AffordanceState, EntryKind, Event, MenuDescriptor, MenuEntry, MenuHandle, MenuSlot,
    PendingRequest, SelectionItem,
};
