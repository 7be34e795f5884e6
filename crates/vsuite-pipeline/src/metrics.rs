//! Pipeline metrics.

use metrics::{counter, histogram};

pub mod names {
    pub const VISION_CALLS_TOTAL: &str = "vsuite_vision_calls_total";
    pub const VISION_CALL_DURATION: &str = "vsuite_vision_call_duration_seconds";
    pub const FRAMES_ANALYZED_TOTAL: &str = "vsuite_frames_analyzed_total";
    pub const VIDEO_RUNS_TOTAL: &str = "vsuite_video_runs_total";
}

/// Record one remote vision call. `outcome` is `ok`, `demo` or an error kind.
pub fn record_vision_call(task: &'static str, outcome: &str, duration_secs: f64) {
    counter!(
        names::VISION_CALLS_TOTAL,
        "task" => task,
        "outcome" => outcome.to_string()
    )
    .increment(1);
    histogram!(names::VISION_CALL_DURATION, "task" => task).record(duration_secs);
}

pub fn record_frames_analyzed(count: u64, failed: u64) {
    counter!(names::FRAMES_ANALYZED_TOTAL, "status" => "ok").increment(count.saturating_sub(failed));
    counter!(names::FRAMES_ANALYZED_TOTAL, "status" => "error").increment(failed);
}

pub fn record_video_run(outcome: &'static str) {
    counter!(names::VIDEO_RUNS_TOTAL, "outcome" => outcome).increment(1);
}
