//! Contracts for the external collaborators of the pipeline.
//!
//! The frame source, the object detector and the secondary classifier are
//! consumed only through the traits in this module. [`TrackerPipeline`]
//! drives detection and tracking for a single live frame.

mod detector;
mod pipeline;

pub use detector::{
    DetailClassifier, DetectionSource, FrameSource, NoClassifier, RawDetection, top_label,
};
pub use pipeline::TrackerPipeline;
