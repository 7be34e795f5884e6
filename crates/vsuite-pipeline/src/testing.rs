//! Test doubles for the vision backend and frame sources.

use async_trait::async_trait;
use image::{Rgb, RgbImage};
use std::collections::HashSet;
use std::sync::Mutex;
use vsuite_media::{ChannelOrder, DecodedFrame, FrameSource, MediaError, MediaResult};
use vsuite_models::{CompletionRequest, CompletionResult, Credential, MediaAsset};
use vsuite_vision_client::{VisionBackend, VisionError, VisionResult, DEMO_MODE_TEXT};

type Reply = Box<dyn Fn(usize, &CompletionRequest) -> VisionResult<CompletionResult> + Send + Sync>;

/// Backend that answers from a closure and records every request.
pub struct StubBackend {
    reply: Reply,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl StubBackend {
    pub fn from_fn(
        f: impl Fn(usize, &CompletionRequest) -> VisionResult<CompletionResult> + Send + Sync + 'static,
    ) -> Self {
        Self {
            reply: Box::new(f),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn always(text: &'static str, tokens: u32) -> Self {
        Self::from_fn(move |_, _| Ok(CompletionResult::new(text, Some(tokens))))
    }

    pub fn status(status: u16) -> Self {
        Self::from_fn(move |_, _| {
            Err(VisionError::Status {
                status,
                body: "upstream failure".to_string(),
            })
        })
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl VisionBackend for StubBackend {
    async fn complete(
        &self,
        credential: Option<&Credential>,
        request: &CompletionRequest,
    ) -> VisionResult<CompletionResult> {
        if credential.is_none() {
            return Ok(CompletionResult::demo(DEMO_MODE_TEXT));
        }
        let n = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len() - 1
        };
        (self.reply)(n, request)
    }
}

/// In-memory video of solid-colour frames.
pub struct FakeVideo {
    pub total: u64,
    pub fps: f64,
    pub failing: HashSet<u64>,
}

impl FakeVideo {
    pub fn new(total: u64, fps: f64) -> Self {
        Self {
            total,
            fps,
            failing: HashSet::new(),
        }
    }
}

#[async_trait]
impl FrameSource for FakeVideo {
    fn frame_count(&self) -> u64 {
        self.total
    }

    fn fps(&self) -> f64 {
        self.fps
    }

    async fn read_frame(&mut self, index: u64) -> MediaResult<DecodedFrame> {
        if self.failing.contains(&index) {
            return Err(MediaError::frame_decode(index, "corrupt packet"));
        }
        Ok(DecodedFrame {
            width: 4,
            height: 4,
            order: ChannelOrder::Rgb,
            data: [(index % 256) as u8, 0, 0].repeat(16),
        })
    }
}

pub fn key() -> Credential {
    Credential::from_input(Some("test-key")).unwrap()
}

/// A small PNG held in memory.
pub fn png_asset() -> MediaAsset {
    let mut bytes = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([10, 120, 240])))
        .write_to(&mut bytes, image::ImageOutputFormat::Png)
        .unwrap();
    MediaAsset::from_bytes(bytes.into_inner(), Some("cat.png".to_string()))
}
