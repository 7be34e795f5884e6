//! Temporary per-frame image artifacts.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::error::MediaResult;
use crate::sampler::SampledFrame;

/// A process-unique temp directory holding one PNG per analysed frame.
///
/// The directory and every artifact in it are removed when this value is
/// dropped.
#[derive(Debug)]
pub struct FrameArtifacts {
    dir: TempDir,
}

impl FrameArtifacts {
    /// Create a fresh directory under the system temp dir.
    pub fn new() -> MediaResult<Self> {
        let dir = tempfile::Builder::new().prefix("vsuite-frames-").tempdir()?;
        Ok(Self { dir })
    }

    /// Create a fresh directory under `parent`.
    pub fn new_in(parent: impl AsRef<Path>) -> MediaResult<Self> {
        std::fs::create_dir_all(parent.as_ref())?;
        let dir = tempfile::Builder::new()
            .prefix("vsuite-frames-")
            .tempdir_in(parent)?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path the artifact for frame `number` is written to.
    pub fn frame_path(&self, number: u32) -> PathBuf {
        self.dir.path().join(format!("frame_{:03}.png", number))
    }

    /// Persist a sampled frame as PNG and return its path.
    pub fn persist(&self, frame: &SampledFrame) -> MediaResult<PathBuf> {
        let path = self.frame_path(frame.number);
        frame.pixels.save(&path)?;
        debug!(frame = frame.number, path = %path.display(), "Persisted frame artifact");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_persist_and_cleanup_on_drop() {
        let artifacts = FrameArtifacts::new().unwrap();
        let dir = artifacts.path().to_path_buf();
        let frame = SampledFrame {
            number: 3,
            source_index: 42,
            pixels: RgbImage::from_pixel(4, 4, Rgb([1, 2, 3])),
        };

        let path = artifacts.persist(&frame).unwrap();
        assert!(path.ends_with("frame_003.png"));
        assert!(path.exists());
        assert_eq!(image::open(&path).unwrap().to_rgb8(), frame.pixels);

        drop(artifacts);
        assert!(!dir.exists(), "artifact directory should be removed on drop");
    }

    #[test]
    fn test_directories_are_unique() {
        let a = FrameArtifacts::new().unwrap();
        let b = FrameArtifacts::new().unwrap();
        assert_ne!(a.path(), b.path());
    }
}
