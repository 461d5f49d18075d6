//! Stepped, pausable analysis loop over a frame source.

use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::analysis::mode::{AnalysisHandle, AnalysisMode};
use crate::analysis::session::{AnalysisSession, FrameRecord, TimeRange};
use crate::analysis::summary::SummaryTable;
use crate::config::{AnalysisConfig, PipelineConfig};
use crate::error::{AdapterStage, Error, Result};
use crate::integration::{DetailClassifier, DetectionSource, FrameSource, TrackerPipeline};
use crate::schema::{SchemaLabel, filter_detections, refine_schema_label};
use crate::tracker::{IouTracker, Rect, Track};

/// How a call to [`Orchestrator::run`] ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every sample was analysed; the session is Done.
    Completed { frames: usize },
    /// Cancelled through the handle; partial results were discarded.
    Cancelled,
}

/// Owns the tracker and the session, and drives both across a time range.
///
/// The tracker is shared with the live-detection path through
/// [`Orchestrator::live_step`]; since both take `&mut self`, the two
/// drivers can never interleave updates.
pub struct Orchestrator {
    tracker: IouTracker,
    config: AnalysisConfig,
    session: AnalysisSession,
    summaries: SummaryTable,
    handle: AnalysisHandle,
}

impl Orchestrator {
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_tracker(IouTracker::new(config.tracker), config.analysis)
    }

    pub fn with_tracker(tracker: IouTracker, config: AnalysisConfig) -> Self {
        Self {
            tracker,
            config,
            session: AnalysisSession::idle(),
            summaries: SummaryTable::new(),
            handle: AnalysisHandle::default(),
        }
    }

    /// Shared control handle, usable from other tasks while a run is in
    /// flight. Its mode is the live one; the session's mode only follows
    /// it as the loop steps.
    pub fn handle(&self) -> AnalysisHandle {
        self.handle.clone()
    }

    pub fn mode(&self) -> AnalysisMode {
        self.handle.mode()
    }

    pub fn progress_percent(&self) -> u8 {
        self.handle.progress_percent()
    }

    /// Current session. Cloning it takes a snapshot that later starts,
    /// resets and discards do not touch.
    pub fn session(&self) -> &AnalysisSession {
        &self.session
    }

    pub fn summaries(&self) -> &SummaryTable {
        &self.summaries
    }

    pub fn tracker(&self) -> &IouTracker {
        &self.tracker
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn pause(&self) -> bool {
        self.handle.pause()
    }

    pub fn resume(&self) -> bool {
        self.handle.resume()
    }

    pub fn cancel(&self) -> bool {
        self.handle.cancel()
    }

    /// Prepare a fresh analysis of `range`. Only valid from Idle or Done.
    pub fn start(&mut self, range: TimeRange, step: f64) -> Result<()> {
        let mode = self.handle.mode();
        if mode.is_active() {
            return Err(Error::InvalidState {
                operation: "start",
                mode,
            });
        }
        range.validate()?;
        if !(step.is_finite() && step > 0.0) {
            return Err(Error::InvalidRange(format!("step must be positive, got {step}")));
        }

        self.tracker.reset();
        self.summaries.clear();
        self.session = AnalysisSession::new(range, step);
        self.set_status(AnalysisMode::Analyzing, 0);

        info!(
            start = range.start,
            end = range.end,
            step,
            samples = range.sample_count(step),
            "analysis started"
        );
        Ok(())
    }

    /// Drive the started analysis to completion, cancellation or failure.
    ///
    /// Pause and cancel requests made through the handle are honoured at
    /// the top of each iteration. An adapter failure aborts the run: the
    /// partial session is discarded, the mode returns to Idle and the error
    /// is returned.
    pub async fn run<S, D, C>(
        &mut self,
        source: &mut S,
        detector: &mut D,
        classifier: &mut C,
    ) -> Result<RunOutcome>
    where
        S: FrameSource,
        D: DetectionSource<S::Frame>,
        C: DetailClassifier<S::Frame>,
    {
        let mode = self.handle.mode();
        if !mode.is_active() {
            return Err(Error::InvalidState {
                operation: "run",
                mode,
            });
        }

        let range = self.session.range();
        let step = self.session.step();
        let total = range.sample_count(step);
        let poll = self.config.pause_poll_interval();

        let mut index = 0;
        loop {
            if !self.wait_while_paused(poll).await {
                self.discard();
                info!(analysed = index, "analysis cancelled");
                return Ok(RunOutcome::Cancelled);
            }
            if index >= total {
                break;
            }

            let t = range.sample_at(index, step);
            if let Err(e) = self.analyze_sample(t, source, detector, classifier).await {
                warn!(timestamp = t, "analysis aborted: {e}");
                self.discard();
                return Err(e);
            }
            index += 1;
        }

        if let Err(e) = source.seek(range.start).await {
            warn!(timestamp = range.start, "failed to rewind frame source: {e}");
        }
        self.set_status(AnalysisMode::Done, 100);

        let frames = self.session.frames().len();
        info!(frames, tracks = self.summaries.len(), "analysis complete");
        Ok(RunOutcome::Completed { frames })
    }

    /// [`Orchestrator::start`] followed by [`Orchestrator::run`].
    pub async fn analyze<S, D, C>(
        &mut self,
        range: TimeRange,
        step: f64,
        source: &mut S,
        detector: &mut D,
        classifier: &mut C,
    ) -> Result<RunOutcome>
    where
        S: FrameSource,
        D: DetectionSource<S::Frame>,
        C: DetailClassifier<S::Frame>,
    {
        self.start(range, step)?;
        self.run(source, detector, classifier).await
    }

    /// Analyse the whole source with the configured step.
    pub async fn analyze_full<S, D, C>(
        &mut self,
        source: &mut S,
        detector: &mut D,
        classifier: &mut C,
    ) -> Result<RunOutcome>
    where
        S: FrameSource,
        D: DetectionSource<S::Frame>,
        C: DetailClassifier<S::Frame>,
    {
        let range = TimeRange::full(source.duration())?;
        let step = self.config.step;
        self.analyze(range, step, source, detector, classifier).await
    }

    /// Replace the session wholesale, e.g. with one read from disk.
    pub fn load(&mut self, session: AnalysisSession) -> Result<()> {
        let mode = self.handle.mode();
        if mode.is_active() {
            return Err(Error::InvalidState {
                operation: "load",
                mode,
            });
        }

        self.tracker.reset();
        self.summaries = SummaryTable::from_frames(session.frames());
        self.session = session;
        self.set_status(AnalysisMode::Done, 100);

        info!(
            frames = self.session.frames().len(),
            tracks = self.summaries.len(),
            "analysis session loaded"
        );
        Ok(())
    }

    /// Drop any session and return to Idle, as for a new media source.
    pub fn reset(&mut self) {
        self.handle.set_mode(AnalysisMode::Idle);
        self.handle.set_progress(0);
        self.tracker.reset();
        self.summaries.clear();
        self.session = AnalysisSession::idle();
    }

    /// React to a playback seek.
    ///
    /// With a completed session the recorded frame nearest `t` is returned.
    /// Otherwise the jump breaks track continuity and the tracker is reset.
    pub fn seek(&mut self, t: f64) -> Option<&FrameRecord> {
        match self.handle.mode() {
            AnalysisMode::Done => self.session.frame_near(t, self.config.playback_tolerance),
            AnalysisMode::Idle => {
                self.tracker.reset();
                None
            }
            AnalysisMode::Analyzing | AnalysisMode::Paused => None,
        }
    }

    /// Run live detection on one frame while no analysis owns the tracker.
    ///
    /// Returns `None` without touching the tracker unless the mode is Idle.
    pub async fn live_step<D, F>(
        &mut self,
        pipeline: &mut TrackerPipeline<D>,
        frame: &F,
        timestamp: f64,
    ) -> Result<Option<&[Track]>>
    where
        D: DetectionSource<F>,
    {
        let mode = self.handle.mode();
        if mode != AnalysisMode::Idle {
            trace!(%mode, "live detection skipped");
            return Ok(None);
        }

        let tracks = pipeline
            .process_frame(&mut self.tracker, frame, timestamp)
            .await?;
        self.summaries.observe_tracks(tracks);
        Ok(Some(tracks))
    }

    /// Returns false once the loop should stop (cancelled).
    async fn wait_while_paused(&mut self, poll: Duration) -> bool {
        loop {
            let mode = self.handle.mode();
            if !mode.is_active() {
                return false;
            }
            self.session.set_status(mode, self.session.progress_percent());
            if mode == AnalysisMode::Analyzing {
                return true;
            }
            tokio::time::sleep(poll).await;
        }
    }

    async fn analyze_sample<S, D, C>(
        &mut self,
        t: f64,
        source: &mut S,
        detector: &mut D,
        classifier: &mut C,
    ) -> Result<()>
    where
        S: FrameSource,
        D: DetectionSource<S::Frame>,
        C: DetailClassifier<S::Frame>,
    {
        source
            .seek(t)
            .await
            .map_err(|e| Error::adapter(AdapterStage::Seek, e))?;
        let frame = source.frame();

        let raw = detector
            .detect(frame)
            .await
            .map_err(|e| Error::adapter(AdapterStage::Detect, e))?;
        let detections = filter_detections(raw, self.config.min_confidence);
        self.tracker.update(&detections, t);

        self.refine_tracks(frame, classifier).await?;

        let record = FrameRecord::from_tracks(t, self.tracker.tracks());
        self.summaries.observe_frame(&record);
        debug!(timestamp = t, tracks = record.tracks.len(), "analysed frame");
        self.session.push(record);
        // Mode stays whatever the handle says; a pause may have landed
        // while this sample was in flight.
        let progress = self.session.range().progress_at(t);
        self.handle.set_progress(progress);
        self.session.set_status(self.session.mode(), progress);
        Ok(())
    }

    /// Consult the secondary classifier once for each qualifying track.
    ///
    /// A track is only marked refined when the classifier produced a label;
    /// regions it declines (e.g. too small) are retried on later frames.
    async fn refine_tracks<F, C>(&mut self, frame: &F, classifier: &mut C) -> Result<()>
    where
        C: DetailClassifier<F>,
    {
        let pending: Vec<(u64, Rect, SchemaLabel)> = self
            .tracker
            .tracks()
            .iter()
            .filter(|t| t.needs_refinement(self.config.refinement_gate))
            .map(|t| (t.id, t.bbox, t.label))
            .collect();

        for (id, bbox, label) in pending {
            let detail = classifier
                .classify_region(frame, bbox, self.config.min_classify_size)
                .await
                .map_err(|e| Error::adapter(AdapterStage::Classify, e))?;
            let Some(detail) = detail else {
                continue;
            };

            let refined = refine_schema_label(label, Some(&detail));
            debug!(id, from = %label, to = %refined, detail = %detail, "refined track");
            self.tracker.apply_refinement(id, refined);
        }
        Ok(())
    }

    /// Write mode and progress to both the handle and the session.
    fn set_status(&mut self, mode: AnalysisMode, progress_percent: u8) {
        self.handle.set_mode(mode);
        self.handle.set_progress(progress_percent);
        self.session.set_status(mode, progress_percent);
    }

    fn discard(&mut self) {
        self.set_status(AnalysisMode::Idle, 0);
        self.session.clear();
        self.summaries.clear();
        self.tracker.reset();
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("mode", &self.handle.mode())
            .field("progress", &self.handle.progress_percent())
            .field("frames", &self.session.frames().len())
            .field("tracker", &self.tracker)
            .finish_non_exhaustive()
    }
}
