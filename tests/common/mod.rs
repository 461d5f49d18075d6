#![allow(dead_code)]

use std::convert::Infallible;
use std::time::Duration;

use scenetrack_rs::tracker::FixedColor;
use scenetrack_rs::{
    AnalysisConfig, DetailClassifier, DetectionSource, FrameSource, IouTracker, Orchestrator,
    RawDetection, Rect, TrackerConfig,
};

#[derive(Debug, thiserror::Error)]
#[error("stub adapter failure")]
pub struct StubError;

/// Frame source whose frame handle is simply the current timestamp.
pub struct ScriptedSource {
    pub position: f64,
    pub duration: f64,
    pub seeks: Vec<f64>,
    fail_on_seek: Option<usize>,
}

impl ScriptedSource {
    pub fn new(duration: f64) -> Self {
        Self {
            position: 0.0,
            duration,
            seeks: Vec::new(),
            fail_on_seek: None,
        }
    }

    /// Fail the given 1-based seek; the attempt is still recorded.
    pub fn failing_on_seek(mut self, seek: usize) -> Self {
        self.fail_on_seek = Some(seek);
        self
    }
}

impl FrameSource for ScriptedSource {
    type Frame = f64;
    type Error = StubError;

    async fn seek(&mut self, timestamp: f64) -> Result<(), Self::Error> {
        self.seeks.push(timestamp);
        if self.fail_on_seek == Some(self.seeks.len()) {
            return Err(StubError);
        }
        self.position = timestamp;
        Ok(())
    }

    fn frame(&self) -> &f64 {
        &self.position
    }

    fn duration(&self) -> f64 {
        self.duration
    }
}

/// Detector producing detections as a pure function of the frame time.
pub struct ScriptedDetector {
    script: fn(f64) -> Vec<RawDetection>,
    on_call: Option<Box<dyn FnMut(usize)>>,
    fail_on_call: Option<usize>,
    pub calls: usize,
}

impl ScriptedDetector {
    pub fn new(script: fn(f64) -> Vec<RawDetection>) -> Self {
        Self {
            script,
            on_call: None,
            fail_on_call: None,
            calls: 0,
        }
    }

    /// Run `hook` with the 1-based call number after each detection.
    pub fn on_call(mut self, hook: impl FnMut(usize) + 'static) -> Self {
        self.on_call = Some(Box::new(hook));
        self
    }

    pub fn failing_on_call(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }
}

impl DetectionSource<f64> for ScriptedDetector {
    type Error = StubError;

    async fn detect(&mut self, frame: &f64) -> Result<Vec<RawDetection>, Self::Error> {
        self.calls += 1;
        if self.fail_on_call == Some(self.calls) {
            return Err(StubError);
        }
        if let Some(hook) = self.on_call.as_mut() {
            hook(self.calls);
        }
        Ok((self.script)(*frame))
    }
}

/// Classifier answering every query with the same text.
pub struct FixedClassifier {
    pub reply: Option<String>,
    pub queries: Vec<Rect>,
}

impl FixedClassifier {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            queries: Vec::new(),
        }
    }
}

impl DetailClassifier<f64> for FixedClassifier {
    type Error = Infallible;

    async fn classify(&mut self, _frame: &f64, bbox: Rect) -> Result<Option<String>, Self::Error> {
        self.queries.push(bbox);
        Ok(self.reply.clone())
    }
}

/// Classifier that declines every region until it fails on the given call.
pub struct FailingClassifier {
    fail_on_call: usize,
    pub calls: usize,
}

impl FailingClassifier {
    pub fn on_call(call: usize) -> Self {
        Self {
            fail_on_call: call,
            calls: 0,
        }
    }
}

impl DetailClassifier<f64> for FailingClassifier {
    type Error = StubError;

    async fn classify(&mut self, _frame: &f64, _bbox: Rect) -> Result<Option<String>, Self::Error> {
        self.calls += 1;
        if self.calls == self.fail_on_call {
            return Err(StubError);
        }
        Ok(None)
    }
}

/// One car drifting right by 10 px per second.
pub fn moving_car(t: f64) -> Vec<RawDetection> {
    vec![RawDetection::new(
        Rect::new((t * 10.0) as f32, 0.0, 40.0, 40.0),
        "car",
        0.9,
    )]
}

/// A car, a pedestrian and an object outside the taxonomy.
pub fn street_scene(t: f64) -> Vec<RawDetection> {
    let dx = (t * 10.0) as f32;
    vec![
        RawDetection::new(Rect::new(dx, 0.0, 40.0, 40.0), "car", 0.9),
        RawDetection::new(Rect::new(200.0 - dx, 50.0, 20.0, 60.0), "person", 0.8),
        RawDetection::new(Rect::new(300.0, 300.0, 30.0, 30.0), "potted plant", 0.95),
    ]
}

pub fn fast_config() -> AnalysisConfig {
    AnalysisConfig {
        pause_poll_interval_ms: 5,
        ..AnalysisConfig::default()
    }
}

pub fn orchestrator() -> Orchestrator {
    let tracker = IouTracker::with_colors(TrackerConfig::default(), FixedColor::default());
    Orchestrator::with_tracker(tracker, fast_config())
}

pub fn short_pause() -> Duration {
    Duration::from_millis(30)
}
