//! Greedy IoU multi-object tracker.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::schema::SchemaLabel;
use crate::tracker::color::{ColorAssigner, RandomHue};
use crate::tracker::matching::{self, AssignmentResult, Detection};
use crate::tracker::rect::{Rect, iou_batch};
use crate::tracker::track::Track;

/// Configuration for the IouTracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Minimum IoU (exclusive) for a same-label pair to be associated
    pub iou_threshold: f32,
    /// A track is dropped once its missed-frame count exceeds this
    pub max_missed_frames: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            iou_threshold: 0.3,
            max_missed_frames: 5,
        }
    }
}

/// Tracker holding the live track set and a per-instance id counter.
///
/// Not thread-safe; exactly one driver should call [`IouTracker::update`]
/// at a time.
pub struct IouTracker {
    tracks: Vec<Track>,
    next_id: u64,
    config: TrackerConfig,
    colors: Box<dyn ColorAssigner>,
}

impl IouTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self::with_colors(config, RandomHue::from_entropy())
    }

    pub fn with_colors<C: ColorAssigner + 'static>(config: TrackerConfig, colors: C) -> Self {
        Self {
            tracks: Vec::new(),
            next_id: 1,
            config,
            colors: Box::new(colors),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Live tracks, ordered by id.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn update(&mut self, detections: &[Detection], timestamp: f64) -> &[Track] {
        // Step 1: Same-label candidates above threshold, best IoU first
        let track_rects: Vec<Rect> = self.tracks.iter().map(|t| t.bbox).collect();
        let det_rects: Vec<Rect> = detections.iter().map(|d| d.bbox).collect();
        let ious = iou_batch(&track_rects, &det_rects);

        let track_labels: Vec<SchemaLabel> = self.tracks.iter().map(|t| t.detected_label).collect();
        let det_labels: Vec<SchemaLabel> = detections.iter().map(|d| d.label).collect();
        let pairs = matching::candidates(
            &ious,
            &track_labels,
            &det_labels,
            self.config.iou_threshold,
        );

        // Step 2: Greedy assignment
        let AssignmentResult {
            matches,
            unmatched_tracks,
            unmatched_detections,
        } = matching::greedy_assignment(&pairs, self.tracks.len(), detections.len());

        for (itrack, idet) in matches {
            self.tracks[itrack].update(&detections[idet]);
        }
        for itrack in unmatched_tracks {
            self.tracks[itrack].mark_missed();
        }

        // Step 3: Init new tracks
        for idet in unmatched_detections {
            let id = self.next_id;
            self.next_id += 1;
            let color = self.colors.assign();
            trace!(id, label = %detections[idet].label, "spawned track");
            self.tracks
                .push(Track::spawn(id, &detections[idet], timestamp, color));
        }

        // Step 4: Prune
        let max_missed = self.config.max_missed_frames;
        self.tracks.retain(|t| t.missed_frames <= max_missed);

        &self.tracks
    }

    /// Overwrite a track's label and mark it refined. Returns false if the
    /// id is not live.
    pub(crate) fn apply_refinement(&mut self, id: u64, label: SchemaLabel) -> bool {
        match self.tracks.iter_mut().find(|t| t.id == id) {
            Some(track) => {
                track.apply_refinement(label);
                true
            }
            None => false,
        }
    }

    /// Drop all tracks and restart the id space.
    pub fn reset(&mut self) {
        self.tracks.clear();
        self.next_id = 1;
    }
}

impl std::fmt::Debug for IouTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IouTracker")
            .field("tracks", &self.tracks)
            .field("next_id", &self.next_id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
