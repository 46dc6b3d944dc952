//! Archive format and settings types for folder-archive
//!
//! The format set is closed: it mirrors exactly what the backend's archive
//! writer accepts, so a value that parses here is guaranteed to be
//! understood on the other side of the wire.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

/// File suffixes for which the extract affordance is offered.
///
/// Compound suffixes (`.tar.gz` and friends) are listed alongside their
/// single-segment aliases because the visibility predicate tests both the
/// last one and the last two dot-separated segments of a filename.
pub const ALLOWED_ARCHIVE_EXTENSIONS: [&str; 9] = [
    ".zip", ".tgz", ".tar.gz", ".tbz", ".tbz2", ".tar.bz", ".tar.bz2", ".txz", ".tar.xz",
];

/// Curated formats offered in the per-action submenu.
///
/// A deliberate subset of the closed set: the aliases (`tgz`, `tbz`, ...)
/// produce byte-identical archives to their long forms, so the submenu only
/// lists one spelling of each compression family.
pub const SUBMENU_FORMATS: [ArchiveFormat; 4] = [
    ArchiveFormat::Zip,
    ArchiveFormat::TarBz2,
    ArchiveFormat::TarGz,
    ArchiveFormat::TarXz,
];

/// Archive format negotiated with the backend
///
/// Values come from a closed set plus the [`Unset`](ArchiveFormat::Unset)
/// sentinel, which means "let the user choose per action". Equality is by
/// exact wire-string identity; the sentinel serializes as the empty string,
/// which is what the settings store reports when no default is configured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArchiveFormat {
    /// `zip`
    #[serde(rename = "zip")]
    Zip,
    /// `tgz` (alias of `tar.gz`)
    #[serde(rename = "tgz")]
    Tgz,
    /// `tar.gz`
    #[serde(rename = "tar.gz")]
    TarGz,
    /// `tbz` (alias of `tar.bz2`)
    #[serde(rename = "tbz")]
    Tbz,
    /// `tbz2` (alias of `tar.bz2`)
    #[serde(rename = "tbz2")]
    Tbz2,
    /// `tar.bz`
    #[serde(rename = "tar.bz")]
    TarBz,
    /// `tar.bz2`
    #[serde(rename = "tar.bz2")]
    TarBz2,
    /// `txz` (alias of `tar.xz`)
    #[serde(rename = "txz")]
    Txz,
    /// `tar.xz`
    #[serde(rename = "tar.xz")]
    TarXz,
    /// No default format configured; the user picks per action
    #[serde(rename = "")]
    Unset,
}

impl ArchiveFormat {
    /// Wire string for this format (empty string for the sentinel)
    pub fn as_str(&self) -> &'static str {
        match self {
            ArchiveFormat::Zip => "zip",
            ArchiveFormat::Tgz => "tgz",
            ArchiveFormat::TarGz => "tar.gz",
            ArchiveFormat::Tbz => "tbz",
            ArchiveFormat::Tbz2 => "tbz2",
            ArchiveFormat::TarBz => "tar.bz",
            ArchiveFormat::TarBz2 => "tar.bz2",
            ArchiveFormat::Txz => "txz",
            ArchiveFormat::TarXz => "tar.xz",
            ArchiveFormat::Unset => "",
        }
    }

    /// Every concrete (non-sentinel) format in wire order
    pub fn concrete() -> [ArchiveFormat; 9] {
        [
            ArchiveFormat::Zip,
            ArchiveFormat::Tgz,
            ArchiveFormat::TarGz,
            ArchiveFormat::Tbz,
            ArchiveFormat::Tbz2,
            ArchiveFormat::TarBz,
            ArchiveFormat::TarBz2,
            ArchiveFormat::Txz,
            ArchiveFormat::TarXz,
        ]
    }

    /// Whether this is the "let the user choose" sentinel
    pub fn is_unset(&self) -> bool {
        matches!(self, ArchiveFormat::Unset)
    }

    /// The filename extension the backend appends for this format,
    /// including the leading dot. The sentinel has no extension.
    pub fn extension(&self) -> Option<String> {
        if self.is_unset() {
            None
        } else {
            Some(format!(".{}", self.as_str()))
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ArchiveFormat {
    type Err = Error;

    /// Parse a wire string into a concrete format.
    ///
    /// The empty-string sentinel is deliberately rejected here: `FromStr`
    /// is the validation gate for per-call overrides, and an empty override
    /// means "not provided", which callers express by falling back to the
    /// active default.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "zip" => Ok(ArchiveFormat::Zip),
            "tgz" => Ok(ArchiveFormat::Tgz),
            "tar.gz" => Ok(ArchiveFormat::TarGz),
            "tbz" => Ok(ArchiveFormat::Tbz),
            "tbz2" => Ok(ArchiveFormat::Tbz2),
            "tar.bz" => Ok(ArchiveFormat::TarBz),
            "tar.bz2" => Ok(ArchiveFormat::TarBz2),
            "txz" => Ok(ArchiveFormat::Txz),
            "tar.xz" => Ok(ArchiveFormat::TarXz),
            other => Err(Error::UnrecognizedFormat {
                format: other.to_string(),
            }),
        }
    }
}

/// Settings payload reported by the host's settings store
///
/// Missing fields deserialize to the compiled-in fallbacks, so a partial
/// settings document never fails the load.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArchiveSettings {
    /// Default archive format, or [`ArchiveFormat::Unset`] for a per-action
    /// submenu (default: `zip`)
    #[serde(default = "default_format")]
    pub format: ArchiveFormat,

    /// Whether the backend should follow symlinks while archiving
    /// (default: false)
    #[serde(default, rename = "followSymlinks")]
    pub follow_symlinks: bool,

    /// Whether hidden files are included in the archive (default: false)
    #[serde(default, rename = "downloadHidden")]
    pub download_hidden: bool,
}

fn default_format() -> ArchiveFormat {
    ArchiveFormat::Zip
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            format: default_format(),
            follow_symlinks: false,
            download_hidden: false,
        }
    }
}

impl ArchiveSettings {
    /// Parse a raw settings document as produced by the settings store
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Active option snapshot read at request time
///
/// Mutated only by the settings reconciler when a configuration-change
/// notification arrives; everything else reads it through
/// [`SharedOptions`]. The flags travel on the wire as `"true"`/`"false"`
/// strings, which the request builder renders from these booleans.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArchiveOptions {
    /// Default archive format (may be the sentinel)
    pub format: ArchiveFormat,
    /// Follow symlinks while archiving
    pub follow_symlinks: bool,
    /// Include hidden files in the archive
    pub download_hidden: bool,
}

impl Default for ArchiveOptions {
    /// Compiled-in fallbacks used when settings cannot be loaded at all
    fn default() -> Self {
        Self {
            format: ArchiveFormat::Zip,
            follow_symlinks: false,
            download_hidden: false,
        }
    }
}

impl From<&ArchiveSettings> for ArchiveOptions {
    fn from(settings: &ArchiveSettings) -> Self {
        Self {
            format: settings.format,
            follow_symlinks: settings.follow_symlinks,
            download_hidden: settings.download_hidden,
        }
    }
}

/// Shared handle to the active [`ArchiveOptions`] snapshot
///
/// The snapshot is always replaced as a whole, never field-by-field, so
/// readers can never observe a partial update. Writes happen only on the
/// reconciler's notification path.
#[derive(Clone, Debug, Default)]
pub struct SharedOptions(Arc<RwLock<ArchiveOptions>>);

impl SharedOptions {
    /// Create a shared snapshot initialized to the given options
    pub fn new(options: ArchiveOptions) -> Self {
        Self(Arc::new(RwLock::new(options)))
    }

    /// The most recently committed snapshot
    pub fn snapshot(&self) -> ArchiveOptions {
        match self.0.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Replace the snapshot wholesale
    pub fn replace(&self, options: ArchiveOptions) {
        match self.0.write() {
            Ok(mut guard) => *guard = options,
            Err(poisoned) => *poisoned.into_inner() = options,
        }
    }
}
