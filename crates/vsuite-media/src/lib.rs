//! Media handling for the vision suite.
//!
//! This crate provides:
//! - Image encoding to normalized PNG data URIs
//! - FFprobe inspection and a type-safe FFmpeg command builder
//! - Evenly spaced frame sampling over pluggable frame sources
//!   (FFmpeg CLI by default, OpenCV behind the `opencv` feature)
//! - Scoped temp artifacts for sampled frames

pub mod artifact;
pub mod command;
pub mod encoder;
pub mod error;
pub mod ffmpeg_source;
#[cfg(feature = "opencv")]
pub mod opencv_source;
pub mod probe;
pub mod sampler;

pub use artifact::FrameArtifacts;
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use encoder::{encode_asset, encode_path};
pub use error::{MediaError, MediaResult};
pub use ffmpeg_source::FfmpegFrameSource;
#[cfg(feature = "opencv")]
pub use opencv_source::OpenCvFrameSource;
pub use probe::{probe_video, VideoInfo};
pub use sampler::{
    frame_indices, open_video, sample_frames, ChannelOrder, DecodedFrame, FrameSource,
    SampledFrame,
};
