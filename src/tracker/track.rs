//! Single persistent object track.

use crate::schema::SchemaLabel;
use crate::tracker::color::ColorTag;
use crate::tracker::matching::Detection;
use crate::tracker::rect::Rect;

/// Persistent identity for a sequence of same-label detections.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Unique within the owning tracker's lifetime, never reused
    pub id: u64,
    /// Latest matched bounding box (TLWH)
    pub bbox: Rect,
    /// Current label, possibly narrowed by refinement
    pub label: SchemaLabel,
    /// Label assigned by the schema mapper at spawn; used for association
    pub detected_label: SchemaLabel,
    /// Confidence of the latest matched detection
    pub score: f32,
    /// Highest confidence seen so far
    pub max_score: f32,
    /// Timestamp (seconds) of the detection that spawned the track
    pub first_seen_at: f64,
    /// Consecutive updates without a match
    pub missed_frames: u32,
    pub color: ColorTag,
    /// Set once the secondary classifier has been consulted
    pub refined: bool,
}

impl Track {
    pub(crate) fn spawn(id: u64, detection: &Detection, timestamp: f64, color: ColorTag) -> Self {
        Self {
            id,
            bbox: detection.bbox,
            label: detection.label,
            detected_label: detection.label,
            score: detection.score,
            max_score: detection.score,
            first_seen_at: timestamp,
            missed_frames: 0,
            color,
            refined: false,
        }
    }

    pub(crate) fn mark_missed(&mut self) {
        self.missed_frames += 1;
    }

    pub(crate) fn update(&mut self, detection: &Detection) {
        self.bbox = detection.bbox;
        self.score = detection.score;
        self.max_score = self.max_score.max(detection.score);
        self.missed_frames = 0;
    }

    /// Whether the secondary classifier should be consulted for this track.
    pub fn needs_refinement(&self, confidence_gate: f32) -> bool {
        !self.refined && self.label.needs_refinement() && self.score > confidence_gate
    }

    pub(crate) fn apply_refinement(&mut self, label: SchemaLabel) {
        self.label = label;
        self.refined = true;
    }
}
