/*!
 * Paginated bucket listing
 *
 * A listing walks a server-paginated collection one page at a time. Each page
 * carries its entries, a truncation flag and whatever continuation markers the
 * server chose to return. The cursor types below describe where the next
 * request starts; [`driver::ListingDriver`] decides how to move between them.
 */

pub mod driver;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use driver::{DriverState, ListingDriver, ListingFailure};

/// Which listing API is being walked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingMode {
    /// ListObjects, one entry per key
    Objects,
    /// ListObjectVersions, one entry per version or delete marker
    Versions,
}

impl fmt::Display for ListingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingMode::Objects => write!(f, "objects"),
            ListingMode::Versions => write!(f, "versions"),
        }
    }
}

/// Version attributes of an entry returned by ListObjectVersions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDetail {
    /// Server version id; `None` for objects written before versioning was enabled
    pub version_id: Option<String>,
    pub is_latest: bool,
    pub is_delete_marker: bool,
}

/// One listed object or object version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    pub key: String,
    pub size: u64,
    pub version: Option<VersionDetail>,
}

impl EntryRecord {
    /// Entry from an unversioned listing
    pub fn object(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
            version: None,
        }
    }

    /// Regular object version
    pub fn version(
        key: impl Into<String>,
        size: u64,
        version_id: Option<String>,
        is_latest: bool,
    ) -> Self {
        Self {
            key: key.into(),
            size,
            version: Some(VersionDetail {
                version_id,
                is_latest,
                is_delete_marker: false,
            }),
        }
    }

    /// Delete marker; these never carry data
    pub fn delete_marker(key: impl Into<String>, version_id: Option<String>, is_latest: bool) -> Self {
        Self {
            key: key.into(),
            size: 0,
            version: Some(VersionDetail {
                version_id,
                is_latest,
                is_delete_marker: true,
            }),
        }
    }

    pub fn is_delete_marker(&self) -> bool {
        self.version.as_ref().is_some_and(|v| v.is_delete_marker)
    }

    /// Delete markers and superseded versions
    pub fn is_noncurrent(&self) -> bool {
        self.version
            .as_ref()
            .is_some_and(|v| v.is_delete_marker || !v.is_latest)
    }

    /// Token written to the key file.
    ///
    /// The bare key for object listings, `key?versionId=<id>` for version
    /// listings, with `null` standing in for a missing id.
    pub fn last_key_token(&self) -> String {
        match &self.version {
            None => self.key.clone(),
            Some(detail) => format!(
                "{}?versionId={}",
                self.key,
                detail.version_id.as_deref().unwrap_or("null")
            ),
        }
    }
}

/// One page of listing results
#[derive(Debug, Clone)]
pub struct Page<C> {
    pub entries: Vec<EntryRecord>,
    pub truncated: bool,
    /// Continuation markers exactly as the server returned them
    pub next: C,
}

/// Position in a listing
pub trait ListingCursor: Clone + fmt::Debug + fmt::Display + Default + Send + Sync + 'static {
    const MODE: ListingMode;

    /// True when the server supplied an explicit continuation marker
    fn has_marker(&self) -> bool;

    /// Cursor resuming after `last` when the server supplied none
    fn fallback(last: &EntryRecord) -> Self;
}

/// Cursor for ListObjects (v1)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectCursor {
    pub marker: Option<String>,
}

impl ObjectCursor {
    pub fn new(marker: Option<String>) -> Self {
        Self { marker }
    }
}

impl ListingCursor for ObjectCursor {
    const MODE: ListingMode = ListingMode::Objects;

    fn has_marker(&self) -> bool {
        self.marker.is_some()
    }

    fn fallback(last: &EntryRecord) -> Self {
        Self {
            marker: Some(last.last_key_token()),
        }
    }
}

impl fmt::Display for ObjectCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker={}", self.marker.as_deref().unwrap_or("<none>"))
    }
}

/// Cursor for ListObjectVersions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionCursor {
    pub key_marker: Option<String>,
    pub version_marker: Option<String>,
}

impl VersionCursor {
    pub fn new(key_marker: Option<String>, version_marker: Option<String>) -> Self {
        Self {
            key_marker,
            version_marker,
        }
    }
}

impl ListingCursor for VersionCursor {
    const MODE: ListingMode = ListingMode::Versions;

    fn has_marker(&self) -> bool {
        self.key_marker.is_some()
    }

    // Restarting at the key skips any remaining versions of that key, so the
    // driver warns whenever this path is taken.
    fn fallback(last: &EntryRecord) -> Self {
        Self {
            key_marker: Some(last.key.clone()),
            version_marker: None,
        }
    }
}

impl fmt::Display for VersionCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "key_marker={} version_marker={}",
            self.key_marker.as_deref().unwrap_or("<none>"),
            self.version_marker.as_deref().unwrap_or("<none>")
        )
    }
}

/// Source of listing pages
///
/// Implementations issue exactly one backend request per call and must not
/// retry on their own account beyond what the HTTP client already does.
#[async_trait]
pub trait PageSource<C: ListingCursor>: Send + Sync {
    /// Bucket being listed
    fn bucket(&self) -> &str;

    /// Fetch the page that starts at `cursor`
    async fn fetch(&self, cursor: &C) -> Result<Page<C>>;
}
