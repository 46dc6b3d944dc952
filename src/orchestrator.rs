//! Command glue between the file browser and the archive backend
//!
//! Thin orchestration only: resolve the effective format and option flags
//! from the latest settings snapshot, build the URL, and hand it to the
//! download trigger or the extract invoker. All policy lives in the
//! components this module wires together.

use crate::config::{ArchiveFormat, SharedOptions};
use crate::error::Result;
use crate::extract::ExtractInvoker;
use crate::request::RequestBuilder;
use crate::trigger::DownloadTrigger;
use crate::types::{EntryKind, Event, PendingRequest, SelectionItem};
use tokio::sync::broadcast;

/// Capacity of the notification channel
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Executes the archive commands for a selection
pub struct CommandOrchestrator {
    builder: RequestBuilder,
    trigger: DownloadTrigger,
    invoker: ExtractInvoker,
    options: SharedOptions,
    event_tx: broadcast::Sender<Event>,
}

impl CommandOrchestrator {
    /// Wire an orchestrator from its collaborators
    pub fn new(
        builder: RequestBuilder,
        trigger: DownloadTrigger,
        invoker: ExtractInvoker,
        options: SharedOptions,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            builder,
            trigger,
            invoker,
            options,
            event_tx,
        }
    }

    /// Subscribe to command notifications
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Download every selected directory as an archive
    ///
    /// Non-directory entries in the selection are skipped. `format_override`
    /// is validated unconditionally against the closed set; an invalid
    /// override is treated as "not provided" and the active default is used
    /// instead. The download path is synchronous end-to-end and never
    /// awaits the backend.
    pub fn download_selected(
        &self,
        items: &[SelectionItem],
        format_override: Option<&str>,
    ) -> Result<()> {
        let format = self.effective_format(format_override);
        for item in items {
            if item.kind != EntryKind::Directory {
                continue;
            }
            self.download_path(&item.path, format)?;
        }
        Ok(())
    }

    /// Download the browser's current folder as an archive, using the
    /// active default format
    pub fn download_current_folder(&self, path: &str) -> Result<()> {
        let format = self.effective_format(None);
        self.download_path(path, format)
    }

    /// Ask the backend to expand every selected archive in place
    ///
    /// Entries are processed in selection order; the first failure is
    /// propagated and stops the sequence (no retry, no rollback).
    pub async fn extract_selected(&self, items: &[SelectionItem]) -> Result<()> {
        for item in items {
            match self.invoker.extract(&item.path).await {
                Ok(()) => {
                    self.event_tx
                        .send(Event::ExtractCompleted {
                            path: item.path.clone(),
                        })
                        .ok();
                }
                Err(e) => {
                    let status = match &e {
                        crate::error::Error::RequestFailed { status, .. } => Some(*status),
                        _ => None,
                    };
                    self.event_tx
                        .send(Event::ExtractFailed {
                            path: item.path.clone(),
                            status,
                        })
                        .ok();
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Build and hand off one download
    fn download_path(&self, path: &str, format: ArchiveFormat) -> Result<()> {
        let snapshot = self.options.snapshot();
        let request = PendingRequest {
            url: self.builder.build_download_url(
                path,
                format,
                snapshot.follow_symlinks,
                snapshot.download_hidden,
            )?,
        };
        tracing::info!(path, format = %format, "downloading folder as archive");
        self.trigger.trigger(&request.url);
        Ok(())
    }

    /// Resolve the format to send: validated override, else the active
    /// default, with the unset sentinel substituted by `zip`
    fn effective_format(&self, format_override: Option<&str>) -> ArchiveFormat {
        if let Some(raw) = format_override {
            match raw.parse::<ArchiveFormat>() {
                Ok(format) => return format,
                Err(_) => {
                    tracing::warn!(format = raw, "ignoring unrecognized format override");
                }
            }
        }

        let default = self.options.snapshot().format;
        if default.is_unset() {
            ArchiveFormat::Zip
        } else {
            default
        }
    }
}
