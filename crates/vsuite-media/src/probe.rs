//! FFprobe video information.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::command::check_ffprobe;
use crate::error::{MediaError, MediaResult};

/// Video file information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoInfo {
    /// Duration in seconds
    pub duration: f64,
    /// Displayed width in pixels, after any rotation FFmpeg applies
    pub width: u32,
    /// Displayed height in pixels, after any rotation FFmpeg applies
    pub height: u32,
    /// Frame rate (fps), 0 when the container does not report one
    pub fps: f64,
    /// Number of video frames
    pub frame_count: u64,
    /// Video codec
    pub codec: String,
}

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    nb_frames: Option<String>,
    duration: Option<String>,
    #[serde(default)]
    side_data_list: Vec<FfprobeSideData>,
    #[serde(default)]
    tags: FfprobeTags,
}

#[derive(Debug, Deserialize)]
struct FfprobeSideData {
    rotation: Option<f64>,
}

/// Older FFmpeg builds report rotation as a `rotate` tag.
#[derive(Debug, Default, Deserialize)]
struct FfprobeTags {
    rotate: Option<String>,
}

impl FfprobeStream {
    /// Display rotation in degrees, normalized to 0..360.
    fn rotation(&self) -> i64 {
        let degrees = self
            .side_data_list
            .iter()
            .find_map(|d| d.rotation)
            .or_else(|| self.tags.rotate.as_ref().and_then(|r| r.trim().parse().ok()))
            .unwrap_or(0.0);
        (degrees.round() as i64).rem_euclid(360)
    }
}

/// Probe a video file for information.
pub async fn probe_video(path: impl AsRef<Path>) -> MediaResult<VideoInfo> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    check_ffprobe()?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::FfprobeFailed {
            message: "FFprobe failed".to_string(),
            stderr: Some(String::from_utf8_lossy(&output.stderr).to_string()),
        });
    }

    parse_probe_output(&output.stdout)
}

fn parse_probe_output(stdout: &[u8]) -> MediaResult<VideoInfo> {
    let probe: FfprobeOutput = serde_json::from_slice(stdout)?;

    let video_stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type == "video")
        .ok_or_else(|| MediaError::video_decode("No video stream found"))?;

    // Stream duration is more precise than the container's when present
    let duration = video_stream
        .duration
        .as_ref()
        .or(probe.format.duration.as_ref())
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    let fps = video_stream
        .avg_frame_rate
        .as_ref()
        .and_then(|r| parse_frame_rate(r))
        .or_else(|| {
            video_stream
                .r_frame_rate
                .as_ref()
                .and_then(|r| parse_frame_rate(r))
        })
        .unwrap_or(0.0);

    // WebM and some MOV files omit nb_frames
    let frame_count = video_stream
        .nb_frames
        .as_ref()
        .and_then(|n| n.parse::<u64>().ok())
        .unwrap_or_else(|| estimate_frame_count(duration, fps));

    // FFmpeg autorotates on decode, so quarter turns swap the output dimensions
    let (coded_width, coded_height) = (
        video_stream.width.unwrap_or(0),
        video_stream.height.unwrap_or(0),
    );
    let (width, height) = match video_stream.rotation() {
        90 | 270 => (coded_height, coded_width),
        _ => (coded_width, coded_height),
    };

    Ok(VideoInfo {
        duration,
        width,
        height,
        fps,
        frame_count,
        codec: video_stream.codec_name.clone().unwrap_or_default(),
    })
}

fn estimate_frame_count(duration: f64, fps: f64) -> u64 {
    if duration > 0.0 && fps > 0.0 {
        (duration * fps).round() as u64
    } else {
        0
    }
}

/// Parse frame rate string (e.g., "30/1" or "29.97").
fn parse_frame_rate(s: &str) -> Option<f64> {
    if let Some((num, den)) = s.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_rate() {
        assert!((parse_frame_rate("30/1").unwrap() - 30.0).abs() < 0.01);
        assert!((parse_frame_rate("30000/1001").unwrap() - 29.97).abs() < 0.01);
        assert!((parse_frame_rate("29.97").unwrap() - 29.97).abs() < 0.01);
        assert!(parse_frame_rate("0/0").is_none());
    }

    #[test]
    fn test_parse_probe_output_uses_nb_frames() {
        let json = br#"{
            "format": {"duration": "4.000000"},
            "streams": [
                {"codec_type": "audio", "codec_name": "aac"},
                {"codec_type": "video", "codec_name": "h264", "width": 640, "height": 360,
                 "avg_frame_rate": "25/1", "r_frame_rate": "25/1", "nb_frames": "100"}
            ]
        }"#;
        let info = parse_probe_output(json).unwrap();
        assert_eq!(info.frame_count, 100);
        assert_eq!(info.width, 640);
        assert!((info.fps - 25.0).abs() < 0.01);
        assert_eq!(info.codec, "h264");
    }

    #[test]
    fn test_parse_probe_output_estimates_missing_frame_count() {
        let json = br#"{
            "format": {"duration": "2.0"},
            "streams": [
                {"codec_type": "video", "codec_name": "vp9", "width": 320, "height": 240,
                 "avg_frame_rate": "0/0", "r_frame_rate": "30/1"}
            ]
        }"#;
        let info = parse_probe_output(json).unwrap();
        assert_eq!(info.frame_count, 60);
        assert!((info.fps - 30.0).abs() < 0.01);
    }

    #[test]
    fn test_parse_probe_output_swaps_dimensions_for_portrait_rotation() {
        let json = br#"{
            "format": {"duration": "2.0"},
            "streams": [
                {"codec_type": "video", "codec_name": "h264", "width": 1920, "height": 1080,
                 "avg_frame_rate": "30/1", "nb_frames": "60",
                 "side_data_list": [{"side_data_type": "Display Matrix", "rotation": -90}]}
            ]
        }"#;
        let info = parse_probe_output(json).unwrap();
        assert_eq!((info.width, info.height), (1080, 1920));
    }

    #[test]
    fn test_parse_probe_output_reads_legacy_rotate_tag() {
        let json = br#"{
            "format": {},
            "streams": [
                {"codec_type": "video", "width": 1280, "height": 720,
                 "avg_frame_rate": "25/1", "nb_frames": "10", "tags": {"rotate": "270"}}
            ]
        }"#;
        let info = parse_probe_output(json).unwrap();
        assert_eq!((info.width, info.height), (720, 1280));
    }

    #[test]
    fn test_parse_probe_output_keeps_dimensions_for_half_turn() {
        let json = br#"{
            "format": {},
            "streams": [
                {"codec_type": "video", "width": 640, "height": 360, "nb_frames": "5",
                 "side_data_list": [{"side_data_type": "Display Matrix", "rotation": 180}]}
            ]
        }"#;
        let info = parse_probe_output(json).unwrap();
        assert_eq!((info.width, info.height), (640, 360));
    }

    #[test]
    fn test_parse_probe_output_without_video_stream() {
        let json = br#"{"format": {}, "streams": [{"codec_type": "audio"}]}"#;
        let err = parse_probe_output(json).unwrap_err();
        assert!(matches!(err, MediaError::VideoDecode(_)));
    }
}
