//! Traits for the frame source, detector and secondary classifier adapters.

use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tracker::Rect;

/// Detector output before schema mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    /// Bounding box in TLWH pixel coordinates
    pub bbox: Rect,
    /// Detector class name, e.g. `"car"`
    pub class: String,
    /// Confidence in [0, 1]
    pub score: f32,
}

impl RawDetection {
    pub fn new(bbox: Rect, class: impl Into<String>, score: f32) -> Self {
        Self {
            bbox,
            class: class.into(),
            score,
        }
    }

    /// Reject non-finite or negative-sized boxes and out-of-range scores.
    pub fn validate(&self) -> Result<()> {
        if !self.bbox.is_well_formed() {
            return Err(Error::invalid_detection(format!(
                "malformed bbox {:?}",
                self.bbox.to_tlwh()
            )));
        }
        if !(0.0..=1.0).contains(&self.score) {
            return Err(Error::invalid_detection(format!(
                "score {} outside [0, 1]",
                self.score
            )));
        }
        Ok(())
    }
}

/// Media addressable by timestamp.
#[allow(async_fn_in_trait)]
pub trait FrameSource {
    /// Handle passed to the detector and classifier.
    type Frame;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Resolve once the source is positioned at `timestamp` seconds.
    async fn seek(&mut self, timestamp: f64) -> std::result::Result<(), Self::Error>;

    /// Frame at the current position.
    fn frame(&self) -> &Self::Frame;

    /// Total duration in seconds.
    fn duration(&self) -> f64;
}

/// Object detector.
///
/// Must be callable repeatedly without per-call state visible to the pipeline.
#[allow(async_fn_in_trait)]
pub trait DetectionSource<F> {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn detect(&mut self, frame: &F) -> std::result::Result<Vec<RawDetection>, Self::Error>;
}

/// Fine-grained classifier run on a track's crop.
#[allow(async_fn_in_trait)]
pub trait DetailClassifier<F> {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Top class name for the region, if any.
    async fn classify(
        &mut self,
        frame: &F,
        bbox: Rect,
    ) -> std::result::Result<Option<String>, Self::Error>;

    /// Like [`DetailClassifier::classify`], but regions narrower or shorter
    /// than `min_size` pixels yield `None` without invoking the model.
    async fn classify_region(
        &mut self,
        frame: &F,
        bbox: Rect,
        min_size: f32,
    ) -> std::result::Result<Option<String>, Self::Error> {
        if bbox.width < min_size || bbox.height < min_size {
            return Ok(None);
        }
        self.classify(frame, bbox).await
    }
}

/// Classifier stand-in for pipelines without a refinement stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClassifier;

impl<F> DetailClassifier<F> for NoClassifier {
    type Error = Infallible;

    async fn classify(
        &mut self,
        _frame: &F,
        _bbox: Rect,
    ) -> std::result::Result<Option<String>, Self::Error> {
        Ok(None)
    }
}

/// First term of a comma-separated model class name
/// (`"sports car, sport car"` -> `"sports car"`).
pub fn top_label(class_name: &str) -> &str {
    class_name.split(',').next().unwrap_or_default().trim()
}
