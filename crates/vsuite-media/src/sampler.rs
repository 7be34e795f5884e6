//! Evenly spaced frame sampling.
//!
//! A [`FrameSource`] exposes a decoder that can seek straight to a frame
//! index. [`sample_frames`] picks at most `requested` indices, decodes each
//! one, converts it to RGB and numbers the survivors 1..=N.

use async_trait::async_trait;
use image::RgbImage;
use std::path::Path;
use tracing::{debug, info, warn};
use vsuite_models::{ExtractionSummary, MediaKind};

use crate::error::{MediaError, MediaResult};

/// Channel order of a decoded frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgb,
    Bgr,
}

/// Packed 8-bit, 3-channel frame as it comes out of a decoder.
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    pub width: u32,
    pub height: u32,
    pub order: ChannelOrder,
    pub data: Vec<u8>,
}

impl DecodedFrame {
    /// Convert to an RGB image, swapping channels when the decoder is BGR.
    pub fn into_rgb(self) -> MediaResult<RgbImage> {
        let DecodedFrame {
            width,
            height,
            order,
            mut data,
        } = self;

        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(MediaError::internal(format!(
                "frame buffer is {} bytes, expected {} for {}x{}",
                data.len(),
                expected,
                width,
                height
            )));
        }

        if order == ChannelOrder::Bgr {
            for px in data.chunks_exact_mut(3) {
                px.swap(0, 2);
            }
        }

        RgbImage::from_raw(width, height, data)
            .ok_or_else(|| MediaError::internal("frame buffer does not match dimensions"))
    }
}

/// A video decoder that can seek directly to a frame index.
#[async_trait]
pub trait FrameSource: Send {
    /// Total number of frames reported by the container.
    fn frame_count(&self) -> u64;

    /// Frame rate; 0 when unknown.
    fn fps(&self) -> f64;

    /// Seek to `index` (0-based) and decode exactly one frame.
    async fn read_frame(&mut self, index: u64) -> MediaResult<DecodedFrame>;
}

/// One successfully decoded frame.
#[derive(Debug, Clone)]
pub struct SampledFrame {
    /// 1-based, contiguous over decoded frames
    pub number: u32,
    /// 0-based index in the source video
    pub source_index: u64,
    pub pixels: RgbImage,
}

/// Frame indices to decode for a video of `total` frames.
///
/// Every frame when `total <= requested`, otherwise `floor(i * total / requested)`
/// for `i` in `0..requested`. Since the step exceeds 1 in the second case, the
/// result is strictly increasing.
pub fn frame_indices(total: u64, requested: u32) -> Vec<u64> {
    let requested = requested as u64;
    if requested == 0 || total == 0 {
        return Vec::new();
    }
    if total <= requested {
        return (0..total).collect();
    }
    (0..requested)
        .map(|i| ((i as u128 * total as u128) / requested as u128) as u64)
        .collect()
}

/// Sample up to `requested` evenly spaced frames from `source`.
///
/// Frames that fail to decode are skipped; the summary counts only the
/// frames that were actually extracted.
pub async fn sample_frames(
    source: &mut dyn FrameSource,
    requested: u32,
) -> MediaResult<(Vec<SampledFrame>, ExtractionSummary)> {
    let total = source.frame_count();
    let fps = source.fps();
    let indices = frame_indices(total, requested);

    debug!(total, fps, requested, selected = indices.len(), "Sampling frames");

    let mut frames = Vec::with_capacity(indices.len());
    for index in indices {
        let decoded = match source.read_frame(index).await {
            Ok(frame) => frame,
            Err(e) => {
                warn!(index, "Skipping frame that failed to decode: {}", e);
                continue;
            }
        };

        match decoded.into_rgb() {
            Ok(pixels) => frames.push(SampledFrame {
                number: frames.len() as u32 + 1,
                source_index: index,
                pixels,
            }),
            Err(e) => warn!(index, "Skipping frame with bad buffer: {}", e),
        }
    }

    let summary = ExtractionSummary::new(frames.len() as u32, total, fps);
    info!("{}", summary);

    Ok((frames, summary))
}

/// Open a video with the best available backend.
///
/// Uses OpenCV when compiled with the `opencv` feature, FFmpeg otherwise.
pub async fn open_video(path: impl AsRef<Path>) -> MediaResult<Box<dyn FrameSource>> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        if MediaKind::from_extension(ext) == Some(MediaKind::Image) {
            return Err(MediaError::UnsupportedFormat(format!(
                "{} is an image, not a video",
                path.display()
            )));
        }
    }

    #[cfg(feature = "opencv")]
    let source: Box<dyn FrameSource> =
        Box::new(crate::opencv_source::OpenCvFrameSource::open(path)?);

    #[cfg(not(feature = "opencv"))]
    let source: Box<dyn FrameSource> =
        Box::new(crate::ffmpeg_source::FfmpegFrameSource::open(path).await?);

    Ok(source)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashSet;

    /// In-memory source producing solid-colour frames; selected indices fail.
    pub struct FakeSource {
        pub total: u64,
        pub fps: f64,
        pub order: ChannelOrder,
        pub failing: HashSet<u64>,
        pub reads: Vec<u64>,
    }

    impl FakeSource {
        pub fn new(total: u64, fps: f64) -> Self {
            Self {
                total,
                fps,
                order: ChannelOrder::Rgb,
                failing: HashSet::new(),
                reads: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl FrameSource for FakeSource {
        fn frame_count(&self) -> u64 {
            self.total
        }

        fn fps(&self) -> f64 {
            self.fps
        }

        async fn read_frame(&mut self, index: u64) -> MediaResult<DecodedFrame> {
            self.reads.push(index);
            if self.failing.contains(&index) || index >= self.total {
                return Err(MediaError::frame_decode(index, "seek failed"));
            }
            // Encode the index into the first channel so tests can check ordering
            let first = (index % 256) as u8;
            let data = [first, 10, 200].repeat(4);
            Ok(DecodedFrame {
                width: 2,
                height: 2,
                order: self.order,
                data,
            })
        }
    }
}
