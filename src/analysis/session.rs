use serde::{Deserialize, Serialize};

use crate::analysis::mode::AnalysisMode;
use crate::analysis::summary::SummaryTable;
use crate::error::{Error, Result};
use crate::schema::SchemaLabel;
use crate::tracker::{ColorTag, Rect, Track};

/// Guards the sample count against `(end - start) / step` landing a hair
/// above an integer.
const SAMPLE_EPSILON: f64 = 1e-9;

/// Half-open time range `[start, end)` in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64) -> Result<Self> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    /// The whole media, `[0, duration)`.
    pub fn full(duration: f64) -> Result<Self> {
        Self::new(0.0, duration)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.start.is_finite() && self.end.is_finite()) {
            return Err(Error::InvalidRange(format!(
                "bounds must be finite, got ({}, {})",
                self.start, self.end
            )));
        }
        if self.start < 0.0 || self.end <= self.start {
            return Err(Error::InvalidRange(format!(
                "expected 0 <= start < end, got ({}, {})",
                self.start, self.end
            )));
        }
        Ok(())
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Number of samples `start + i * step` that fall before `end`.
    pub fn sample_count(&self, step: f64) -> usize {
        if step <= 0.0 || self.end <= self.start {
            return 0;
        }
        (self.duration() / step - SAMPLE_EPSILON).ceil().max(0.0) as usize
    }

    pub fn sample_at(&self, index: usize, step: f64) -> f64 {
        self.start + index as f64 * step
    }

    /// Percentage of the range covered at sample time `t`.
    pub fn progress_at(&self, t: f64) -> u8 {
        if self.end <= self.start {
            return 100;
        }
        (100.0 * (t - self.start) / self.duration())
            .round()
            .clamp(0.0, 100.0) as u8
    }
}

/// Value copy of a [`Track`] at one sample time, as stored in session files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSnapshot {
    pub id: u64,
    pub bbox: Rect,
    pub label: SchemaLabel,
    pub score: f32,
    pub max_score: f32,
    pub first_seen_at: f64,
    pub color_tag: ColorTag,
    pub refined: bool,
}

impl From<&Track> for TrackSnapshot {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id,
            bbox: track.bbox,
            label: track.label,
            score: track.score,
            max_score: track.max_score,
            first_seen_at: track.first_seen_at,
            color_tag: track.color.clone(),
            refined: track.refined,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub timestamp: f64,
    pub tracks: Vec<TrackSnapshot>,
}

impl FrameRecord {
    pub fn from_tracks(timestamp: f64, tracks: &[Track]) -> Self {
        Self {
            timestamp,
            tracks: tracks.iter().map(TrackSnapshot::from).collect(),
        }
    }
}

/// Ordered frame records of one analysed range.
///
/// Mode and progress are plain values written by the orchestrator as it
/// steps, so a copy taken once the session is Done stays Done.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    range: TimeRange,
    step: f64,
    frames: Vec<FrameRecord>,
    mode: AnalysisMode,
    progress_percent: u8,
}

impl AnalysisSession {
    /// Empty session about to be analysed.
    pub(crate) fn new(range: TimeRange, step: f64) -> Self {
        Self {
            range,
            step,
            frames: Vec::new(),
            mode: AnalysisMode::Analyzing,
            progress_percent: 0,
        }
    }

    /// Empty, idle session.
    pub(crate) fn idle() -> Self {
        Self {
            mode: AnalysisMode::Idle,
            ..Self::new(TimeRange { start: 0.0, end: 0.0 }, 0.0)
        }
    }

    /// Completed session rebuilt from recorded frames.
    ///
    /// The range spans the first to the last timestamp and the step is the
    /// spacing of the first two frames (0 for fewer than two frames).
    pub fn from_frames(frames: Vec<FrameRecord>) -> Self {
        let start = frames.first().map_or(0.0, |f| f.timestamp);
        let end = frames.last().map_or(start, |f| f.timestamp);
        let step = match frames.as_slice() {
            [a, b, ..] => b.timestamp - a.timestamp,
            _ => 0.0,
        };

        Self {
            range: TimeRange { start, end },
            step,
            frames,
            mode: AnalysisMode::Done,
            progress_percent: 100,
        }
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    pub fn progress_percent(&self) -> u8 {
        self.progress_percent
    }

    /// Recorded frame closest to `t`, if one lies within `tolerance` seconds.
    pub fn frame_near(&self, t: f64, tolerance: f64) -> Option<&FrameRecord> {
        self.frames
            .iter()
            .map(|f| (f, (f.timestamp - t).abs()))
            .filter(|&(_, distance)| distance < tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(f, _)| f)
    }

    /// Track summaries reduced from every recorded frame.
    pub fn summaries(&self) -> SummaryTable {
        SummaryTable::from_frames(&self.frames)
    }

    pub(crate) fn push(&mut self, record: FrameRecord) {
        self.frames.push(record);
    }

    pub(crate) fn clear(&mut self) {
        self.frames.clear();
    }

    pub(crate) fn set_status(&mut self, mode: AnalysisMode, progress_percent: u8) {
        self.mode = mode;
        self.progress_percent = progress_percent.min(100);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(timestamp: f64) -> FrameRecord {
        FrameRecord {
            timestamp,
            tracks: Vec::new(),
        }
    }

    #[test]
    fn test_time_range_validation() {
        assert!(TimeRange::new(0.0, 1.0).is_ok());
        assert!(TimeRange::new(1.0, 1.0).is_err());
        assert!(TimeRange::new(-1.0, 1.0).is_err());
        assert!(TimeRange::new(0.0, f64::NAN).is_err());
        assert!(TimeRange::full(0.0).is_err());
    }

    #[test]
    fn test_sample_count() {
        let range = TimeRange::new(0.0, 1.0).unwrap();
        assert_eq!(range.sample_count(0.5), 2);
        assert_eq!(range.sample_count(0.1), 10);
        assert_eq!(range.sample_count(0.3), 4);
        assert_eq!(range.sample_count(2.0), 1);
        assert!((range.sample_at(3, 0.1) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_progress_at() {
        let range = TimeRange::new(2.0, 4.0).unwrap();
        assert_eq!(range.progress_at(2.0), 0);
        assert_eq!(range.progress_at(3.0), 50);
        assert_eq!(range.progress_at(3.98), 99);
        assert_eq!(range.progress_at(5.0), 100);
    }

    #[test]
    fn test_from_frames_is_done() {
        let session = AnalysisSession::from_frames(vec![record(1.0), record(1.5), record(2.0)]);
        assert_eq!(session.mode(), AnalysisMode::Done);
        assert_eq!(session.progress_percent(), 100);
        assert_eq!(session.range(), TimeRange { start: 1.0, end: 2.0 });
        assert_eq!(session.step(), 0.5);
    }

    #[test]
    fn test_frame_near() {
        let session = AnalysisSession::from_frames(vec![record(0.0), record(0.5), record(1.0)]);
        assert_eq!(session.frame_near(0.45, 0.2).map(|f| f.timestamp), Some(0.5));
        assert_eq!(session.frame_near(0.9, 0.2).map(|f| f.timestamp), Some(1.0));
        assert!(session.frame_near(0.25, 0.2).is_none());
        assert!(AnalysisSession::from_frames(Vec::new()).frame_near(0.0, 0.2).is_none());
    }
}
