//! FFmpeg CLI frame source.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::probe::{probe_video, VideoInfo};
use crate::sampler::{ChannelOrder, DecodedFrame, FrameSource};

/// Per-frame decode timeout.
const FRAME_TIMEOUT_SECS: u64 = 30;

/// Decodes single frames by seeking with `ffmpeg -ss` and reading raw RGB24.
pub struct FfmpegFrameSource {
    path: PathBuf,
    info: VideoInfo,
}

impl FfmpegFrameSource {
    /// Probe the container; fails with [`MediaError::VideoDecode`] if it
    /// cannot be opened.
    pub async fn open(path: impl AsRef<Path>) -> MediaResult<Self> {
        let path = path.as_ref();
        let info = probe_video(path).await.map_err(|e| match e {
            MediaError::FfprobeFailed { stderr, .. } => MediaError::video_decode(format!(
                "{}: {}",
                path.display(),
                stderr.unwrap_or_default().trim()
            )),
            MediaError::JsonParse(e) => {
                MediaError::video_decode(format!("{}: unreadable probe output: {}", path.display(), e))
            }
            other => other,
        })?;

        if info.width == 0 || info.height == 0 {
            return Err(MediaError::video_decode(format!(
                "{}: video stream has no dimensions",
                path.display()
            )));
        }

        debug!(
            path = %path.display(),
            frames = info.frame_count,
            fps = info.fps,
            width = info.width,
            height = info.height,
            "Opened video with FFmpeg"
        );

        Ok(Self {
            path: path.to_path_buf(),
            info,
        })
    }

    /// Timestamp of a frame index; falls back to 0 when fps is unknown.
    fn timestamp(&self, index: u64) -> f64 {
        if self.info.fps > 0.0 {
            index as f64 / self.info.fps
        } else {
            0.0
        }
    }
}

#[async_trait]
impl FrameSource for FfmpegFrameSource {
    fn frame_count(&self) -> u64 {
        self.info.frame_count
    }

    fn fps(&self) -> f64 {
        self.info.fps
    }

    async fn read_frame(&mut self, index: u64) -> MediaResult<DecodedFrame> {
        let cmd = FfmpegCommand::to_stdout(&self.path)
            .seek(self.timestamp(index))
            .single_frame()
            .no_audio()
            .raw_rgb24();

        let data = FfmpegRunner::new()
            .with_timeout(FRAME_TIMEOUT_SECS)
            .capture(&cmd)
            .await
            .map_err(|e| MediaError::frame_decode(index, e.to_string()))?;

        if data.is_empty() {
            return Err(MediaError::frame_decode(index, "no frame at this position"));
        }

        Ok(DecodedFrame {
            width: self.info.width,
            height: self.info.height,
            order: ChannelOrder::Rgb,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(fps: f64) -> FfmpegFrameSource {
        FfmpegFrameSource {
            path: PathBuf::from("clip.mp4"),
            info: VideoInfo {
                duration: 4.0,
                width: 640,
                height: 360,
                fps,
                frame_count: 100,
                codec: "h264".into(),
            },
        }
    }

    #[test]
    fn test_timestamp_from_index() {
        let src = source(25.0);
        assert!((src.timestamp(0) - 0.0).abs() < 1e-9);
        assert!((src.timestamp(50) - 2.0).abs() < 1e-9);
        assert_eq!(src.frame_count(), 100);
    }

    #[test]
    fn test_timestamp_without_fps() {
        assert_eq!(source(0.0).timestamp(42), 0.0);
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let err = FfmpegFrameSource::open("/no/such/clip.mp4").await.err().unwrap();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }
}
