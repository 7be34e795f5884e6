//! OpenCV `VideoCapture` frame source.

use async_trait::async_trait;
use opencv::core::Mat;
use opencv::prelude::{MatTraitConst, MatTraitConstManual, VideoCaptureTrait, VideoCaptureTraitConst};
use opencv::videoio::{VideoCapture, CAP_ANY, CAP_PROP_FPS, CAP_PROP_FRAME_COUNT, CAP_PROP_POS_FRAMES};
use std::path::Path;
use tracing::debug;

use crate::error::{MediaError, MediaResult};
use crate::sampler::{ChannelOrder, DecodedFrame, FrameSource};

/// Seeks with `CAP_PROP_POS_FRAMES`; frames arrive in OpenCV's BGR order.
pub struct OpenCvFrameSource {
    cap: VideoCapture,
    frame_count: u64,
    fps: f64,
}

impl OpenCvFrameSource {
    pub fn open(path: impl AsRef<Path>) -> MediaResult<Self> {
        let path = path.as_ref();
        let path_str = path
            .to_str()
            .ok_or_else(|| MediaError::video_decode(format!("non UTF-8 path: {}", path.display())))?;

        let cap = VideoCapture::from_file(path_str, CAP_ANY)
            .map_err(|e| MediaError::video_decode(format!("Failed to open video: {}", e)))?;

        if !cap.is_opened().unwrap_or(false) {
            return Err(MediaError::video_decode(format!(
                "Failed to open video: {}",
                path.display()
            )));
        }

        let frame_count = cap.get(CAP_PROP_FRAME_COUNT).unwrap_or(0.0).max(0.0) as u64;
        let fps = cap.get(CAP_PROP_FPS).unwrap_or(0.0).max(0.0);

        debug!(path = %path.display(), frame_count, fps, "Opened video with OpenCV");

        Ok(Self {
            cap,
            frame_count,
            fps,
        })
    }
}

#[async_trait]
impl FrameSource for OpenCvFrameSource {
    fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn fps(&self) -> f64 {
        self.fps
    }

    async fn read_frame(&mut self, index: u64) -> MediaResult<DecodedFrame> {
        self.cap
            .set(CAP_PROP_POS_FRAMES, index as f64)
            .map_err(|e| MediaError::frame_decode(index, format!("seek failed: {}", e)))?;

        let mut frame = Mat::default();
        let ok = self
            .cap
            .read(&mut frame)
            .map_err(|e| MediaError::frame_decode(index, e.to_string()))?;
        if !ok || frame.empty() {
            return Err(MediaError::frame_decode(index, "empty frame"));
        }

        let width = frame.cols() as u32;
        let height = frame.rows() as u32;
        let data = frame
            .data_bytes()
            .map_err(|e| MediaError::frame_decode(index, format!("Failed to get frame data: {}", e)))?
            .to_vec();

        Ok(DecodedFrame {
            width,
            height,
            order: ChannelOrder::Bgr,
            data,
        })
    }
}
