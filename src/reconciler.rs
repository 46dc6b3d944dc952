//! Settings-driven menu reconciliation
//!
//! Owns the context-menu registrations for the archive affordance and swaps
//! them between "single default format" and "format submenu" as the
//! configured default changes. Registration lifecycle is an explicit state
//! machine with owned disposable handles, so "exactly one registration per
//! slot" is a checkable invariant rather than an emergent property of call
//! order.

use crate::config::{
    ALLOWED_ARCHIVE_EXTENSIONS, ArchiveFormat, ArchiveOptions, ArchiveSettings, SUBMENU_FORMATS,
    SharedOptions,
};
use crate::error::{Error, Result};
use crate::types::{AffordanceState, Event, MenuDescriptor, MenuEntry, MenuHandle, MenuSlot};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Capacity of the notification channel; events are informational, so a
/// lagging subscriber losing old ones is acceptable.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// The host's settings store
///
/// Change notifications are delivered by the host's own single-threaded
/// event dispatch calling [`SettingsReconciler::reconcile`]; this trait
/// only covers the initial load.
#[async_trait]
pub trait SettingsSource: Send + Sync {
    /// Load the archive settings document
    async fn load(&self) -> Result<ArchiveSettings>;
}

/// The host's context-menu registrar
///
/// `add_item` returns a disposable handle; passing it to `remove_item`
/// disposes the registration. The reconciler is the only owner of live
/// handles.
pub trait MenuRegistrar: Send + Sync {
    /// Register a context-menu item and return its disposable handle
    fn add_item(&self, descriptor: &MenuDescriptor) -> MenuHandle;
    /// Dispose a previously returned handle
    fn remove_item(&self, handle: MenuHandle);
}

/// Human-readable submenu label for a concrete format, e.g. `tar.gz`
/// becomes "tar gz Archive".
pub fn format_menu_label(format: ArchiveFormat) -> String {
    format!("{} Archive", format.as_str().replace('.', " "))
}

/// The two reconciled download-slot handles, always disposed and replaced
/// as a pair
struct SlotPair {
    folder: MenuHandle,
    current_folder: MenuHandle,
}

/// State machine reconciling settings changes into menu registrations
///
/// States: `Uninitialized` until the first successful settings resolution,
/// then `SingleCommand` or `Submenu` depending on whether a default format
/// is configured. A change that flips the affordance *kind* disposes both
/// slot handles before registering the replacement pair, as one
/// uninterrupted synchronous sequence, so no notification can observe a
/// torn intermediate state and the old and new entries are never visible
/// together.
pub struct SettingsReconciler {
    state: AffordanceState,
    options: SharedOptions,
    registrar: Arc<dyn MenuRegistrar>,
    slots: Option<SlotPair>,
    extract_entries: Vec<MenuHandle>,
    event_tx: broadcast::Sender<Event>,
}

impl SettingsReconciler {
    /// Create a reconciler in the `Uninitialized` state
    pub fn new(options: SharedOptions, registrar: Arc<dyn MenuRegistrar>) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: AffordanceState::Uninitialized,
            options,
            registrar,
            slots: None,
            extract_entries: Vec::new(),
            event_tx,
        }
    }

    /// Subscribe to reconciler notifications
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Current affordance state
    pub fn state(&self) -> AffordanceState {
        self.state
    }

    /// Perform the first settings resolution
    ///
    /// On success, commits the settings snapshot, registers the extract
    /// entries and the download slot pair, and transitions out of
    /// `Uninitialized`. On failure, commits the compiled-in fallbacks and
    /// stays `Uninitialized` (extract entries are still registered, since
    /// they do not depend on settings); the error is returned for
    /// user-visible reporting but the library remains functional.
    pub async fn initialize(&mut self, source: &dyn SettingsSource) -> Result<()> {
        self.register_extract_entries();

        match source.load().await {
            Ok(settings) => {
                self.options.replace(ArchiveOptions::from(&settings));
                self.apply_affordance(settings.format);
                tracing::info!(format = %settings.format, state = ?self.state, "archive settings loaded");
                Ok(())
            }
            Err(e) => {
                let reason = e.to_string();
                self.options.replace(ArchiveOptions::default());
                tracing::warn!(error = %reason, "settings load failed, using compiled-in defaults");
                self.event_tx
                    .send(Event::SettingsFallback {
                        reason: reason.clone(),
                    })
                    .ok();
                Err(Error::SettingsLoadFailed { reason })
            }
        }
    }

    /// Apply a settings-changed notification
    ///
    /// If the reported format differs from the active one and at least one
    /// side is the unset sentinel, the affordance kind changes: both slot
    /// handles are disposed, then the replacement pair is registered. If
    /// the format differs but neither side is the sentinel, only the
    /// stored snapshot changes; the affordance shape stays valid as-is.
    pub fn reconcile(&mut self, settings: &ArchiveSettings) {
        let old_format = self.options.snapshot().format;
        let new_format = settings.format;

        // Commit the new snapshot first; readers always see it whole.
        self.options.replace(ArchiveOptions::from(settings));

        if self.state == AffordanceState::Uninitialized {
            // A notification before any successful load acts as the first
            // resolution.
            self.apply_affordance(new_format);
            return;
        }

        if new_format == old_format {
            return;
        }

        if new_format.is_unset() || old_format.is_unset() {
            tracing::debug!(
                old = %old_format,
                new = %new_format,
                "affordance kind changed, swapping menu registrations"
            );
            self.dispose_slot_pair();
            self.apply_affordance(new_format);
        } else {
            tracing::debug!(old = %old_format, new = %new_format, "default format updated in place");
        }
    }

    /// Register the slot pair for `format` and record the new state
    fn apply_affordance(&mut self, format: ArchiveFormat) {
        debug_assert!(self.slots.is_none(), "slot pair must be disposed before re-registering");

        let (state, folder, current_folder) = if format.is_unset() {
            (
                AffordanceState::Submenu,
                MenuDescriptor {
                    slot: MenuSlot::FolderArchive,
                    label: "Download As".to_string(),
                    rank: 10,
                    suffix: None,
                    entry: MenuEntry::Submenu {
                        formats: SUBMENU_FORMATS.to_vec(),
                    },
                },
                MenuDescriptor {
                    slot: MenuSlot::CurrentFolderArchive,
                    label: "Download Current Folder As".to_string(),
                    rank: 3,
                    suffix: None,
                    entry: MenuEntry::Submenu {
                        formats: SUBMENU_FORMATS.to_vec(),
                    },
                },
            )
        } else {
            (
                AffordanceState::SingleCommand,
                MenuDescriptor {
                    slot: MenuSlot::FolderArchive,
                    label: "Download as an archive".to_string(),
                    rank: 10,
                    suffix: None,
                    entry: MenuEntry::Command { format: None },
                },
                MenuDescriptor {
                    slot: MenuSlot::CurrentFolderArchive,
                    label: "Download current folder as an archive".to_string(),
                    rank: 3,
                    suffix: None,
                    entry: MenuEntry::Command { format: None },
                },
            )
        };

        let folder = self.registrar.add_item(&folder);
        let current_folder = self.registrar.add_item(&current_folder);
        self.slots = Some(SlotPair {
            folder,
            current_folder,
        });
        self.state = state;
        self.event_tx.send(Event::AffordanceChanged { state }).ok();
    }

    /// Dispose both download-slot handles
    fn dispose_slot_pair(&mut self) {
        if let Some(pair) = self.slots.take() {
            self.registrar.remove_item(pair.folder);
            self.registrar.remove_item(pair.current_folder);
        }
    }

    /// Register one extract entry per allowed extension
    ///
    /// These do not depend on settings and live for the process lifetime,
    /// outside the reconciled slot pair.
    fn register_extract_entries(&mut self) {
        if !self.extract_entries.is_empty() {
            return;
        }
        for extension in ALLOWED_ARCHIVE_EXTENSIONS {
            let handle = self.registrar.add_item(&MenuDescriptor {
                slot: MenuSlot::ExtractArchive,
                label: "Extract Archive".to_string(),
                rank: 10,
                suffix: Some(extension.to_string()),
                entry: MenuEntry::Command { format: None },
            });
            self.extract_entries.push(handle);
        }
    }
}
