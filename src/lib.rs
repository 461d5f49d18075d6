//! Identity-persistent tracking of per-frame object detections.
//!
//! Detections from an external detector are mapped onto a fixed label
//! taxonomy, associated across frames by an IoU tracker, optionally
//! refined by a secondary classifier, and collected into a replayable
//! analysis session.

pub mod analysis;
pub mod config;
pub mod error;
pub mod integration;
pub mod schema;
pub mod signal;
pub mod tracker;

pub use analysis::{
    AnalysisHandle, AnalysisMode, AnalysisSession, FrameRecord, Orchestrator, RunOutcome,
    SummaryTable, TimeRange, TrackSnapshot, TrackSummary,
};
pub use config::{AnalysisConfig, PipelineConfig};
pub use error::{AdapterStage, Error, Result};
pub use integration::{
    DetailClassifier, DetectionSource, FrameSource, NoClassifier, RawDetection,
    TrackerPipeline,
};
pub use schema::{SchemaLabel, map_coco_to_schema, refine_schema_label};
pub use signal::{SignalColor, SignalReading, classify_signal};
pub use tracker::{ColorTag, Detection, IouTracker, Rect, Track, TrackerConfig};
