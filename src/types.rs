//! Core types shared across folder-archive

use crate::config::ArchiveFormat;
use serde::{Deserialize, Serialize};

/// Kind of a file-browser entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A directory entry
    Directory,
    /// A file entry
    File,
}

/// A selected entry in the file browser
///
/// Owned and supplied by the external file-browser collaborator; read-only
/// to this crate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionItem {
    /// Path of the entry relative to the browser root
    pub path: String,
    /// Whether the entry is a directory or a file
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl SelectionItem {
    /// Convenience constructor for a directory entry
    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
        }
    }

    /// Convenience constructor for a file entry
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
        }
    }
}

/// A fully built request, ready to hand to a network effect
///
/// Ephemeral: constructed and consumed within a single operation, never
/// persisted. Both backend operations are plain GETs with no body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingRequest {
    /// Absolute request URL
    pub url: String,
}

impl PendingRequest {
    /// HTTP method used for every request this crate issues
    pub const METHOD: &'static str = "GET";
}

/// Shape of the archive affordance currently exposed in the context menu
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AffordanceState {
    /// Settings have not been resolved yet (or failed to load)
    Uninitialized,
    /// A single entry bound directly to the default-format action
    SingleCommand,
    /// A submenu listing every curated format
    Submenu,
}

/// Logical context-menu slot owned by the reconciler
///
/// Each slot holds exactly one live registration at any time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MenuSlot {
    /// "Archive the selected folder" on directory entries
    FolderArchive,
    /// "Archive the current folder" on the browser background
    CurrentFolderArchive,
    /// "Extract archive" on entries with a matching suffix
    ExtractArchive,
}

/// What a registered menu item does when activated
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuEntry {
    /// A single command, optionally pinned to one format
    Command {
        /// Format the command is pinned to; `None` means the active default
        format: Option<ArchiveFormat>,
    },
    /// A submenu with one command per listed format
    Submenu {
        /// Formats listed in the submenu, in display order
        formats: Vec<ArchiveFormat>,
    },
}

/// Descriptor handed to the host's context-menu registrar
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuDescriptor {
    /// Logical slot this registration fills
    pub slot: MenuSlot,
    /// Label shown in the menu
    pub label: String,
    /// Ordering rank within the menu
    pub rank: u32,
    /// File suffix the entry is restricted to, if any (extract entries)
    pub suffix: Option<String>,
    /// What activating the item does
    pub entry: MenuEntry,
}

/// Opaque disposable handle for a context-menu registration
///
/// Returned by the host registrar; passing it back disposes the
/// registration. The reconciler owns every live handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MenuHandle(pub u64);

/// Notifications emitted for the hosting UI
///
/// Subscribers receive these over a broadcast channel; all of them are
/// informational and none requires a response.
#[derive(Clone, Debug)]
pub enum Event {
    /// Settings could not be loaded; compiled-in defaults are in effect
    SettingsFallback {
        /// Why the load failed
        reason: String,
    },
    /// The menu affordance switched shape
    AffordanceChanged {
        /// The newly active state
        state: AffordanceState,
    },
    /// An extract request completed successfully
    ExtractCompleted {
        /// Path of the extracted archive
        path: String,
    },
    /// An extract request failed
    ExtractFailed {
        /// Path of the archive that failed to extract
        path: String,
        /// Backend status code, when the failure was an HTTP error
        status: Option<u16>,
    },
}
