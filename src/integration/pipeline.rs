//! TrackerPipeline for live, frame-by-frame detection and tracking.

use crate::config::AnalysisConfig;
use crate::error::{AdapterStage, Error, Result};
use crate::schema::filter_detections;
use crate::tracker::{IouTracker, Track};

use super::DetectionSource;

/// Bundles a detector with the schema filtering stage.
///
/// The tracker is borrowed per call rather than owned, so the same
/// instance can be shared with the offline orchestrator; the `&mut`
/// borrow keeps the two drivers from interleaving updates.
pub struct TrackerPipeline<D> {
    detector: D,
    min_confidence: f32,
}

impl<D> TrackerPipeline<D> {
    pub fn new(detector: D, min_confidence: f32) -> Self {
        Self {
            detector,
            min_confidence,
        }
    }

    /// Create a pipeline with the default confidence gate.
    pub fn with_default_config(detector: D) -> Self {
        Self::new(detector, AnalysisConfig::default().min_confidence)
    }

    /// Detect, filter and update `tracker` for one frame.
    pub async fn process_frame<'t, F>(
        &mut self,
        tracker: &'t mut IouTracker,
        frame: &F,
        timestamp: f64,
    ) -> Result<&'t [Track]>
    where
        D: DetectionSource<F>,
    {
        let raw = self
            .detector
            .detect(frame)
            .await
            .map_err(|e| Error::adapter(AdapterStage::Detect, e))?;
        let detections = filter_detections(raw, self.min_confidence);
        Ok(tracker.update(&detections, timestamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::RawDetection;
    use crate::tracker::{FixedColor, Rect, TrackerConfig};

    struct MockDetector {
        detections: Vec<RawDetection>,
    }

    impl DetectionSource<()> for MockDetector {
        type Error = std::convert::Infallible;

        async fn detect(&mut self, _frame: &()) -> std::result::Result<Vec<RawDetection>, Self::Error> {
            Ok(self.detections.clone())
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("model crashed")]
    struct Crash;

    struct FailingDetector;

    impl DetectionSource<()> for FailingDetector {
        type Error = Crash;

        async fn detect(&mut self, _frame: &()) -> std::result::Result<Vec<RawDetection>, Self::Error> {
            Err(Crash)
        }
    }

    #[tokio::test]
    async fn test_tracker_pipeline() {
        let detector = MockDetector {
            detections: vec![
                RawDetection::new(Rect::new(10.0, 20.0, 40.0, 60.0), "car", 0.9),
                RawDetection::new(Rect::new(100.0, 20.0, 40.0, 60.0), "bench", 0.9),
                RawDetection::new(Rect::new(200.0, 20.0, 40.0, 60.0), "person", 0.3),
            ],
        };
        let mut tracker = IouTracker::with_colors(TrackerConfig::default(), FixedColor::default());
        let mut pipeline = TrackerPipeline::with_default_config(detector);

        let tracks = pipeline.process_frame(&mut tracker, &(), 0.0).await.unwrap();
        assert_eq!(tracks.len(), 1);
        let id = tracks[0].id;

        let tracks = pipeline.process_frame(&mut tracker, &(), 0.1).await.unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, id);
    }

    #[tokio::test]
    async fn test_detector_failure_is_adapter_error() {
        let mut tracker = IouTracker::new(TrackerConfig::default());
        let mut pipeline = TrackerPipeline::with_default_config(FailingDetector);
        let err = pipeline.process_frame(&mut tracker, &(), 0.0).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Adapter {
                stage: AdapterStage::Detect,
                ..
            }
        ));
    }
}
