//! Per-frame video analysis.
//!
//! A run samples up to `requested` frames, writes each one to a temp PNG,
//! and asks the model to describe it. A frame whose remote call fails keeps
//! its error as its analysis text; the run carries on with the next frame.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Instrument;
use vsuite_media::{encode_path, open_video, sample_frames, FrameArtifacts, FrameSource, SampledFrame};
use vsuite_models::{
    CompletionRequest, Credential, FrameAnalysis, FrameAnalysisSet, FrameCount, FrameLookupError,
};
use vsuite_vision_client::VisionBackend;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::logging::RunLogger;
use crate::{complete_recorded, demo, error_text, metrics, MISSING_VIDEO_MESSAGE};

/// Result of [`FramePipeline::analyze_video`].
#[derive(Debug)]
pub enum VideoOutcome {
    /// Nothing to analyse; show this message
    Message(String),
    /// No credential; placeholder text
    Demo(String),
    /// The video could not be sampled; error text, no partial set
    Failed(String),
    Analyzed(VideoAnalysis),
}

impl VideoOutcome {
    /// Text to display as the run summary.
    pub fn summary_text(&self) -> String {
        match self {
            VideoOutcome::Message(text) | VideoOutcome::Demo(text) | VideoOutcome::Failed(text) => {
                text.clone()
            }
            VideoOutcome::Analyzed(analysis) => analysis.set().summary.to_string(),
        }
    }
}

/// Frame analyses plus the temp directory holding their artifacts.
///
/// Dropping this removes every artifact.
#[derive(Debug)]
pub struct VideoAnalysis {
    set: FrameAnalysisSet,
    artifacts: FrameArtifacts,
}

impl VideoAnalysis {
    pub fn set(&self) -> &FrameAnalysisSet {
        &self.set
    }

    pub fn report(&self) -> String {
        self.set.report()
    }

    pub fn frame(&self, frame_number: u32) -> Result<&FrameAnalysis, FrameLookupError> {
        self.set.frame(frame_number)
    }

    pub fn artifacts_dir(&self) -> &Path {
        self.artifacts.path()
    }
}

/// Samples a video and analyses each frame independently.
#[derive(Clone)]
pub struct FramePipeline {
    backend: Arc<dyn VisionBackend>,
    config: PipelineConfig,
}

impl FramePipeline {
    pub fn new(backend: Arc<dyn VisionBackend>, config: PipelineConfig) -> Self {
        Self { backend, config }
    }

    /// Analyse the video at `video`.
    ///
    /// The missing-video and demo checks run before any decoding.
    pub async fn analyze_video(
        &self,
        video: Option<&Path>,
        requested: FrameCount,
        credential: Option<&Credential>,
    ) -> VideoOutcome {
        let Some(path) = video else {
            return VideoOutcome::Message(MISSING_VIDEO_MESSAGE.to_string());
        };
        let Some(credential) = credential else {
            metrics::record_video_run("demo");
            return VideoOutcome::Demo(demo::video(requested));
        };

        let mut source = match open_video(path).await {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!(path = %path.display(), "Failed to open video: {}", e);
                metrics::record_video_run("failed");
                return VideoOutcome::Failed(error_text(&e));
            }
        };

        match self.analyze_source(source.as_mut(), requested, credential).await {
            Ok(analysis) => VideoOutcome::Analyzed(analysis),
            Err(e) => VideoOutcome::Failed(error_text(&e)),
        }
    }

    /// Analyse frames from an already opened source.
    pub async fn analyze_source(
        &self,
        source: &mut dyn FrameSource,
        requested: FrameCount,
        credential: &Credential,
    ) -> PipelineResult<VideoAnalysis> {
        let logger = RunLogger::new("video_analysis");
        let span = logger.create_span();

        let result = self
            .run(source, requested, credential, &logger)
            .instrument(span)
            .await;

        match &result {
            Ok(analysis) => {
                let set = analysis.set();
                metrics::record_frames_analyzed(set.len() as u64, set.error_count() as u64);
                metrics::record_video_run("analyzed");
                logger.log_completion(&format!(
                    "{} frames analysed, {} failed",
                    set.len(),
                    set.error_count()
                ));
            }
            Err(e) => {
                metrics::record_video_run("failed");
                logger.log_error(&e.to_string());
            }
        }
        result
    }

    async fn run(
        &self,
        source: &mut dyn FrameSource,
        requested: FrameCount,
        credential: &Credential,
        logger: &RunLogger,
    ) -> PipelineResult<VideoAnalysis> {
        logger.log_start(&format!(
            "{} frames at {:.2} fps, requested {}",
            source.frame_count(),
            source.fps(),
            requested
        ));

        let artifacts = match &self.config.work_dir {
            Some(dir) => FrameArtifacts::new_in(dir)?,
            None => FrameArtifacts::new()?,
        };

        let (frames, summary) = sample_frames(source, requested.get()).await?;
        if frames.is_empty() {
            return Err(PipelineError::NoFrames);
        }
        logger.log_progress(&summary.to_string());

        let mut analyses = Vec::with_capacity(frames.len());
        for frame in &frames {
            let analysis = self.analyze_frame(frame, &artifacts, credential).await;
            if let Some(err) = &analysis.error {
                logger.log_warning(&format!("frame {} failed: {}", frame.number, err));
            }
            analyses.push(analysis);
        }

        Ok(VideoAnalysis {
            set: FrameAnalysisSet::new(summary, analyses),
            artifacts,
        })
    }

    async fn analyze_frame(
        &self,
        frame: &SampledFrame,
        artifacts: &FrameArtifacts,
        credential: &Credential,
    ) -> FrameAnalysis {
        let mut analysis = FrameAnalysis {
            frame_number: frame.number,
            source_index: frame.source_index,
            analysis_text: String::new(),
            token_count: None,
            error: None,
            artifact: artifacts.frame_path(frame.number),
        };

        match self.describe(frame, artifacts, credential).await {
            Ok((artifact, text, tokens)) => {
                analysis.artifact = artifact;
                analysis.analysis_text = text;
                analysis.token_count = tokens;
            }
            Err(e) => {
                analysis.analysis_text = error_text(&e);
                analysis.error = Some(e.to_string());
            }
        }
        analysis
    }

    async fn describe(
        &self,
        frame: &SampledFrame,
        artifacts: &FrameArtifacts,
        credential: &Credential,
    ) -> PipelineResult<(PathBuf, String, Option<u32>)> {
        let artifact = artifacts.persist(frame)?;
        let image = encode_path(&artifact)?;
        let request = CompletionRequest::new(self.config.frame_instruction.as_str(), image)
            .with_max_tokens(self.config.frame_max_tokens);

        let result = complete_recorded(self.backend.as_ref(), "describe_frame", Some(credential), &request)
            .await?;
        Ok((artifact, result.text, result.token_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{key, FakeVideo, StubBackend};
    use vsuite_models::CompletionResult;
    use vsuite_vision_client::VisionError;

    fn pipeline(backend: Arc<StubBackend>) -> FramePipeline {
        FramePipeline::new(backend, PipelineConfig::default())
    }

    #[tokio::test]
    async fn test_every_sampled_frame_is_analysed() {
        let backend = Arc::new(StubBackend::always("ok", 5));
        let mut video = FakeVideo::new(100, 25.0);

        let analysis = pipeline(backend.clone())
            .analyze_source(&mut video, FrameCount::new(10).unwrap(), &key())
            .await
            .unwrap();
        let set = analysis.set();

        assert_eq!(set.len(), 10);
        let numbers: Vec<u32> = set.frames().iter().map(|f| f.frame_number).collect();
        assert_eq!(numbers, (1..=10).collect::<Vec<_>>());
        assert!(set.frames().iter().all(|f| f.analysis_text == "ok"));
        assert!(set.frames().iter().all(|f| f.token_count == Some(5)));
        assert!((set.summary.duration_seconds - 4.0).abs() < 1e-9);
        assert_eq!(backend.call_count(), 10);

        let requests = backend.requests.lock().unwrap();
        assert!(requests.iter().all(|r| r.instruction == "Describe this frame in detail."));
        assert!(requests.iter().all(|r| r.max_tokens == 500));
    }

    #[tokio::test]
    async fn test_short_video_yields_every_frame() {
        let backend = Arc::new(StubBackend::always("ok", 1));
        let mut video = FakeVideo::new(5, 30.0);

        let analysis = pipeline(backend)
            .analyze_source(&mut video, FrameCount::new(10).unwrap(), &key())
            .await
            .unwrap();

        assert_eq!(analysis.set().len(), 5);
        let indices: Vec<u64> = analysis.set().frames().iter().map(|f| f.source_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(analysis.frame(5).unwrap().frame_number, 5);
    }

    #[tokio::test]
    async fn test_failed_frame_call_is_captured() {
        let backend = Arc::new(StubBackend::from_fn(|n, _| {
            if n == 1 {
                Err(VisionError::Status {
                    status: 500,
                    body: "overloaded".into(),
                })
            } else {
                Ok(CompletionResult::new(format!("frame {}", n), None))
            }
        }));
        let mut video = FakeVideo::new(3, 1.0);

        let analysis = pipeline(backend)
            .analyze_source(&mut video, FrameCount::new(3).unwrap(), &key())
            .await
            .unwrap();
        let set = analysis.set();

        assert_eq!(set.len(), 3);
        assert_eq!(set.error_count(), 1);
        let failed = set.frame(2).unwrap();
        assert!(failed.analysis_text.starts_with("Error: "));
        assert!(failed.analysis_text.contains("500"));
        assert_eq!(set.frame(3).unwrap().analysis_text, "frame 2");
        assert!(analysis.report().contains("### Frame 2"));
    }

    #[tokio::test]
    async fn test_artifacts_removed_with_analysis() {
        let backend = Arc::new(StubBackend::always("ok", 1));
        let mut video = FakeVideo::new(4, 2.0);

        let analysis = pipeline(backend)
            .analyze_source(&mut video, FrameCount::new(2).unwrap(), &key())
            .await
            .unwrap();
        let artifact = analysis.frame(1).unwrap().artifact.clone();
        let dir = analysis.artifacts_dir().to_path_buf();
        assert!(artifact.exists());
        assert!(artifact.starts_with(&dir));

        drop(analysis);
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_undecodable_video_reports_no_frames() {
        let backend = Arc::new(StubBackend::always("ok", 1));
        let mut video = FakeVideo::new(2, 1.0);
        video.failing.extend([0, 1]);

        let err = pipeline(backend.clone())
            .analyze_source(&mut video, FrameCount::default(), &key())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::NoFrames));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_container_reports_no_frames() {
        let backend = Arc::new(StubBackend::always("ok", 1));
        let mut video = FakeVideo::new(0, 25.0);

        let err = pipeline(backend.clone())
            .analyze_source(&mut video, FrameCount::default(), &key())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::NoFrames));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_video_and_demo_short_circuit() {
        let backend = Arc::new(StubBackend::always("ok", 1));
        let pipeline = pipeline(backend.clone());

        match pipeline.analyze_video(None, FrameCount::default(), Some(&key())).await {
            VideoOutcome::Message(text) => assert_eq!(text, "Please upload a video."),
            other => panic!("unexpected outcome: {other:?}"),
        }

        // A path that does not exist proves no decoding happens in demo mode
        let outcome = pipeline
            .analyze_video(Some(Path::new("/no/such/video.mp4")), FrameCount::default(), None)
            .await;
        match outcome {
            VideoOutcome::Demo(text) => assert!(text.contains("Demo Mode")),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unopenable_video_fails_without_partial_set() {
        let backend = Arc::new(StubBackend::always("ok", 1));
        let outcome = pipeline(backend.clone())
            .analyze_video(Some(Path::new("/no/such/video.mp4")), FrameCount::default(), Some(&key()))
            .await;

        match outcome {
            VideoOutcome::Failed(text) => assert!(text.starts_with("Error: ")),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_artifacts_honour_work_dir() {
        let work = tempfile::TempDir::new().unwrap();
        let config = PipelineConfig {
            work_dir: Some(work.path().to_path_buf()),
            ..PipelineConfig::default()
        };
        let backend = Arc::new(StubBackend::always("ok", 1));
        let mut video = FakeVideo::new(1, 1.0);

        let analysis = FramePipeline::new(backend, config)
            .analyze_source(&mut video, FrameCount::default(), &key())
            .await
            .unwrap();
        assert!(analysis.artifacts_dir().starts_with(work.path()));
    }
}
