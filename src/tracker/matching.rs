//! Matching utilities for label-aware IoU association.

use std::cmp::Ordering;

use ndarray::Array2;

use crate::schema::SchemaLabel;
use crate::tracker::rect::Rect;

/// Detection input for the tracker, already mapped onto the taxonomy.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Bounding box in TLWH format
    pub bbox: Rect,
    pub label: SchemaLabel,
    /// Detection confidence score
    pub score: f32,
}

impl Detection {
    pub fn new(bbox: Rect, label: SchemaLabel, score: f32) -> Self {
        Self { bbox, label, score }
    }
}

/// A (track, detection) pair eligible for association.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub track: usize,
    pub detection: usize,
    pub iou: f32,
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentResult {
    pub matches: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

/// Collect same-label pairs whose IoU exceeds `thresh`, best first.
///
/// Equal IoUs are ordered by track index, then detection index. Track
/// indices follow id order, so ties prefer the oldest track.
pub fn candidates(
    ious: &Array2<f32>,
    track_labels: &[SchemaLabel],
    det_labels: &[SchemaLabel],
    thresh: f32,
) -> Vec<Candidate> {
    let mut pairs = Vec::new();
    for ((track, detection), &iou) in ious.indexed_iter() {
        if track_labels[track] == det_labels[detection] && iou > thresh {
            pairs.push(Candidate {
                track,
                detection,
                iou,
            });
        }
    }

    pairs.sort_by(|a, b| {
        b.iou
            .partial_cmp(&a.iou)
            .unwrap_or(Ordering::Equal)
            .then(a.track.cmp(&b.track))
            .then(a.detection.cmp(&b.detection))
    });
    pairs
}

/// Greedily accept candidates in order, consuming each track and detection once.
pub fn greedy_assignment(
    candidates: &[Candidate],
    num_tracks: usize,
    num_detections: usize,
) -> AssignmentResult {
    let mut track_used = vec![false; num_tracks];
    let mut det_used = vec![false; num_detections];
    let mut matches = Vec::new();

    for c in candidates {
        if track_used[c.track] || det_used[c.detection] {
            continue;
        }
        track_used[c.track] = true;
        det_used[c.detection] = true;
        matches.push((c.track, c.detection));
    }

    let unmatched_tracks = track_used
        .iter()
        .enumerate()
        .filter_map(|(i, &u)| if u { None } else { Some(i) })
        .collect();
    let unmatched_detections = det_used
        .iter()
        .enumerate()
        .filter_map(|(i, &u)| if u { None } else { Some(i) })
        .collect();

    AssignmentResult {
        matches,
        unmatched_tracks,
        unmatched_detections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::rect::iou_batch;

    #[test]
    fn test_candidates_require_same_label() {
        let tracks = [Rect::new(0.0, 0.0, 10.0, 10.0)];
        let dets = [Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(1.0, 1.0, 10.0, 10.0)];
        let ious = iou_batch(&tracks, &dets);
        let pairs = candidates(
            &ious,
            &[SchemaLabel::Vehicle],
            &[SchemaLabel::Truck, SchemaLabel::Vehicle],
            0.3,
        );
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].detection, 1);
    }

    #[test]
    fn test_candidates_tie_prefers_lowest_track() {
        let tracks = [Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(0.0, 0.0, 10.0, 10.0)];
        let dets = [Rect::new(0.0, 0.0, 10.0, 10.0)];
        let ious = iou_batch(&tracks, &dets);
        let labels = [SchemaLabel::Pedestrian; 2];
        let pairs = candidates(&ious, &labels, &[SchemaLabel::Pedestrian], 0.3);

        let result = greedy_assignment(&pairs, 2, 1);
        assert_eq!(result.matches, vec![(0, 0)]);
        assert_eq!(result.unmatched_tracks, vec![1]);
        assert!(result.unmatched_detections.is_empty());
    }

    #[test]
    fn test_greedy_takes_best_iou_first() {
        let pairs = [
            Candidate { track: 0, detection: 1, iou: 0.9 },
            Candidate { track: 0, detection: 0, iou: 0.5 },
            Candidate { track: 1, detection: 1, iou: 0.4 },
        ];
        let result = greedy_assignment(&pairs, 2, 2);
        assert_eq!(result.matches, vec![(0, 1)]);
        assert_eq!(result.unmatched_tracks, vec![1]);
        assert_eq!(result.unmatched_detections, vec![0]);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let pairs = candidates(
            &Array2::from_elem((1, 1), 0.3),
            &[SchemaLabel::Bus],
            &[SchemaLabel::Bus],
            0.3,
        );
        assert!(pairs.is_empty());
    }
}
