use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::session::{FrameRecord, TrackSnapshot};
use crate::schema::SchemaLabel;
use crate::tracker::{ColorTag, Track};

/// Session-wide view of one track id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSummary {
    pub id: u64,
    /// Latest label observed
    pub label: SchemaLabel,
    pub color_tag: ColorTag,
    /// Earliest first-seen time observed
    pub first_seen_at: f64,
    /// Highest max score observed
    pub max_score: f32,
}

impl TrackSummary {
    fn merge(&mut self, label: SchemaLabel, first_seen_at: f64, max_score: f32) {
        self.label = label;
        self.first_seen_at = self.first_seen_at.min(first_seen_at);
        self.max_score = self.max_score.max(max_score);
    }
}

/// Reduction of track snapshots keyed by id. Derived data: it can always be
/// rebuilt from the frames it was fed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryTable {
    entries: BTreeMap<u64, TrackSummary>,
}

impl SummaryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_frames(frames: &[FrameRecord]) -> Self {
        let mut table = Self::new();
        for frame in frames {
            table.observe_frame(frame);
        }
        table
    }

    pub fn observe_frame(&mut self, frame: &FrameRecord) {
        for snapshot in &frame.tracks {
            self.observe(snapshot);
        }
    }

    pub fn observe(&mut self, snapshot: &TrackSnapshot) {
        self.upsert(
            snapshot.id,
            snapshot.label,
            &snapshot.color_tag,
            snapshot.first_seen_at,
            snapshot.max_score,
        );
    }

    /// Fold live tracks in directly, without building a frame record.
    pub fn observe_tracks(&mut self, tracks: &[Track]) {
        for track in tracks {
            self.upsert(
                track.id,
                track.label,
                &track.color,
                track.first_seen_at,
                track.max_score,
            );
        }
    }

    fn upsert(
        &mut self,
        id: u64,
        label: SchemaLabel,
        color_tag: &ColorTag,
        first_seen_at: f64,
        max_score: f32,
    ) {
        self.entries
            .entry(id)
            .and_modify(|s| s.merge(label, first_seen_at, max_score))
            .or_insert_with(|| TrackSummary {
                id,
                label,
                color_tag: color_tag.clone(),
                first_seen_at,
                max_score,
            });
    }

    pub fn get(&self, id: u64) -> Option<&TrackSummary> {
        self.entries.get(&id)
    }

    /// Summaries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &TrackSummary> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::Rect;

    fn snapshot(id: u64, label: SchemaLabel, first_seen_at: f64, max_score: f32) -> TrackSnapshot {
        TrackSnapshot {
            id,
            bbox: Rect::new(0.0, 0.0, 10.0, 10.0),
            label,
            score: max_score,
            max_score,
            first_seen_at,
            color_tag: ColorTag("#00FF00".into()),
            refined: false,
        }
    }

    #[test]
    fn test_reduction() {
        let frames = vec![
            FrameRecord {
                timestamp: 0.0,
                tracks: vec![snapshot(1, SchemaLabel::Vehicle, 0.0, 0.7)],
            },
            FrameRecord {
                timestamp: 0.1,
                tracks: vec![
                    snapshot(1, SchemaLabel::Van, 0.0, 0.9),
                    snapshot(2, SchemaLabel::Pedestrian, 0.1, 0.6),
                ],
            },
            FrameRecord {
                timestamp: 0.2,
                tracks: vec![snapshot(1, SchemaLabel::Van, 0.0, 0.8)],
            },
        ];
        let table = SummaryTable::from_frames(&frames);
        assert_eq!(table.len(), 2);

        let first = table.get(1).unwrap();
        assert_eq!(first.label, SchemaLabel::Van);
        assert_eq!(first.max_score, 0.9);
        assert_eq!(first.first_seen_at, 0.0);

        let ids: Vec<u64> = table.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_keeps_earliest_first_seen() {
        let mut table = SummaryTable::new();
        table.observe(&snapshot(3, SchemaLabel::Bus, 2.0, 0.5));
        table.observe(&snapshot(3, SchemaLabel::Bus, 1.5, 0.4));
        let summary = table.get(3).unwrap();
        assert_eq!(summary.first_seen_at, 1.5);
        assert_eq!(summary.max_score, 0.5);
    }
}
