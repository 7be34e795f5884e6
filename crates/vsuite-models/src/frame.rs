//! Frame sampling and per-frame analysis models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Describes one sampling run over a video.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExtractionSummary {
    /// Frames actually decoded
    pub frames_extracted: u32,
    /// Frames reported by the container
    pub total_frames: u64,
    /// `total_frames / fps`, or 0 when fps is 0
    pub duration_seconds: f64,
    pub fps: f64,
}

impl ExtractionSummary {
    pub fn new(frames_extracted: u32, total_frames: u64, fps: f64) -> Self {
        Self {
            frames_extracted,
            total_frames,
            duration_seconds: duration_seconds(total_frames, fps),
            fps,
        }
    }
}

/// Video duration derived from frame count and rate.
pub fn duration_seconds(total_frames: u64, fps: f64) -> f64 {
    if fps > 0.0 && fps.is_finite() {
        total_frames as f64 / fps
    } else {
        0.0
    }
}

impl fmt::Display for ExtractionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Extracted {} frames from video ({} total frames, {:.2}s duration, {:.2} fps)",
            self.frames_extracted, self.total_frames, self.duration_seconds, self.fps
        )
    }
}

/// Analysis of one sampled frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FrameAnalysis {
    /// 1-based position within the analysis set
    pub frame_number: u32,
    /// 0-based index of the frame in the source video
    pub source_index: u64,
    /// Model output, or the error text when the call failed
    pub analysis_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_count: Option<u32>,
    /// Set when the remote call for this frame failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Image artifact persisted for this frame
    pub artifact: PathBuf,
}

impl FrameAnalysis {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Ordered analyses for one video run, paged by 1-based frame number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FrameAnalysisSet {
    pub summary: ExtractionSummary,
    frames: Vec<FrameAnalysis>,
}

impl FrameAnalysisSet {
    /// Build a set, renumbering frames 1..=N in the given order.
    pub fn new(summary: ExtractionSummary, mut frames: Vec<FrameAnalysis>) -> Self {
        for (i, frame) in frames.iter_mut().enumerate() {
            frame.frame_number = i as u32 + 1;
        }
        Self { summary, frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[FrameAnalysis] {
        &self.frames
    }

    /// Look up a frame by its 1-based number.
    pub fn frame(&self, frame_number: u32) -> Result<&FrameAnalysis, FrameLookupError> {
        if self.frames.is_empty() {
            return Err(FrameLookupError::Empty);
        }
        if frame_number == 0 || frame_number as usize > self.frames.len() {
            return Err(FrameLookupError::OutOfRange {
                requested: frame_number,
                available: self.frames.len() as u32,
            });
        }
        Ok(&self.frames[frame_number as usize - 1])
    }

    /// Number of frames whose remote call failed.
    pub fn error_count(&self) -> usize {
        self.frames.iter().filter(|f| f.is_error()).count()
    }

    /// Human-readable report: summary followed by every frame in order.
    pub fn report(&self) -> String {
        let mut out = format!("## Video Analysis\n\n{}\n", self.summary);
        for frame in &self.frames {
            out.push_str(&format!(
                "\n### Frame {}\n\n{}\n",
                frame.frame_number, frame.analysis_text
            ));
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameLookupError {
    #[error("No frames have been analyzed yet")]
    Empty,

    #[error("Frame {requested} is out of range (valid frames: 1-{available})")]
    OutOfRange { requested: u32, available: u32 },
}
