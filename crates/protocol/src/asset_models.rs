//! Asset models.
//!
//! An asset is one artifact produced by a pipeline stage: the title list, a
//! script, a narration track, a base image or a composed thumbnail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of artifact an [`Asset`] holds.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// Newline-joined list of every generated title.
    TitleList,
    /// Narration script for one title.
    Script,
    /// Text-to-speech rendering of a script.
    Audio,
    /// Generated base image for a thumbnail.
    Image,
    /// Base image with the title composited on top.
    Thumbnail,
}

impl AssetKind {
    /// Human-readable label used in logs and listings.
    pub fn label(self) -> &'static str {
        match self {
            AssetKind::TitleList => "Title List",
            AssetKind::Script => "Script",
            AssetKind::Audio => "Audio",
            AssetKind::Image => "Image",
            AssetKind::Thumbnail => "Thumbnail",
        }
    }
}

/// An immutable artifact produced during a run.
///
/// The payload is skipped during serialization; events and reports carry the
/// metadata only when they cross a serialization boundary.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Asset {
    /// Unique identifier for this asset.
    pub id: Uuid,

    /// What the payload contains.
    pub kind: AssetKind,

    /// Derived file name, e.g. `topic_1_Some_title_script.txt`.
    pub name: String,

    /// MIME type of the payload.
    pub mime_type: String,

    /// Raw payload bytes.
    #[serde(skip)]
    pub data: Vec<u8>,

    /// Remote location, present only when the upload succeeded.
    pub remote_url: Option<String>,

    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Asset {
    /// Create a new asset stamped with a fresh id and the current time.
    pub fn new(
        kind: AssetKind,
        name: impl Into<String>,
        mime_type: impl Into<String>,
        data: Vec<u8>,
        remote_url: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            name: name.into(),
            mime_type: mime_type.into(),
            data,
            remote_url,
            created_at: Utc::now(),
        }
    }

    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Whether the asset was mirrored to remote storage.
    pub fn is_uploaded(&self) -> bool {
        self.remote_url.is_some()
    }
}
