//! Uploaded media assets.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Image extensions accepted for upload.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Video extensions accepted for upload.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov"];

/// Broad media category of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Infer the media kind from a file extension (case-insensitive, no dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Image)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    /// Infer the media kind from a file name or path.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the bytes of an asset live.
#[derive(Clone)]
pub enum AssetSource {
    /// File on disk
    Path(PathBuf),
    /// In-memory buffer (e.g. an upload that was never written out)
    Bytes(Vec<u8>),
}

impl fmt::Debug for AssetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetSource::Path(p) => f.debug_tuple("Path").field(p).finish(),
            AssetSource::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
        }
    }
}

/// A user-supplied image or video. Read-only once created.
#[derive(Debug, Clone)]
pub struct MediaAsset {
    source: AssetSource,
    file_name: Option<String>,
}

impl MediaAsset {
    /// Asset backed by a file on disk.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string());
        Self {
            source: AssetSource::Path(path),
            file_name,
        }
    }

    /// Asset backed by an in-memory buffer.
    pub fn from_bytes(bytes: Vec<u8>, file_name: Option<String>) -> Self {
        Self {
            source: AssetSource::Bytes(bytes),
            file_name,
        }
    }

    pub fn source(&self) -> &AssetSource {
        &self.source
    }

    /// Original file name, if known.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Path on disk, if the asset is file-backed.
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            AssetSource::Path(p) => Some(p.as_path()),
            AssetSource::Bytes(_) => None,
        }
    }

    /// Media kind inferred from the file name.
    pub fn kind(&self) -> Option<MediaKind> {
        self.file_name.as_deref().and_then(MediaKind::from_path)
    }
}
