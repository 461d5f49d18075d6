use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

/// Lifecycle of an analysis session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum AnalysisMode {
    #[default]
    Idle = 0,
    Analyzing = 1,
    Paused = 2,
    Done = 3,
}

impl AnalysisMode {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Analyzing,
            2 => Self::Paused,
            3 => Self::Done,
            _ => Self::Idle,
        }
    }

    /// True while a loop owns the session (running or paused).
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Analyzing | Self::Paused)
    }
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Analyzing => "analyzing",
            Self::Paused => "paused",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Default)]
struct Shared {
    mode: AtomicU8,
    progress: AtomicU8,
}

/// Shared mode flag and progress of one orchestrator.
///
/// Clones observe and control the same state, so pause/resume/cancel may
/// be issued from another task while the analysis loop is running. The
/// loop only reacts at the top of each iteration.
#[derive(Debug, Clone, Default)]
pub struct AnalysisHandle {
    inner: Arc<Shared>,
}

impl AnalysisHandle {
    pub fn mode(&self) -> AnalysisMode {
        AnalysisMode::from_u8(self.inner.mode.load(Ordering::SeqCst))
    }

    pub fn progress_percent(&self) -> u8 {
        self.inner.progress.load(Ordering::SeqCst)
    }

    /// Analyzing -> Paused. Returns false (no-op) from any other mode.
    pub fn pause(&self) -> bool {
        self.transition(AnalysisMode::Analyzing, AnalysisMode::Paused)
    }

    /// Paused -> Analyzing. Returns false (no-op) from any other mode.
    pub fn resume(&self) -> bool {
        self.transition(AnalysisMode::Paused, AnalysisMode::Analyzing)
    }

    /// Analyzing/Paused -> Idle. Returns false (no-op) otherwise.
    pub fn cancel(&self) -> bool {
        self.inner
            .mode
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |raw| {
                AnalysisMode::from_u8(raw)
                    .is_active()
                    .then_some(AnalysisMode::Idle as u8)
            })
            .is_ok()
    }

    pub(crate) fn set_mode(&self, mode: AnalysisMode) {
        self.inner.mode.store(mode as u8, Ordering::SeqCst);
    }

    pub(crate) fn set_progress(&self, percent: u8) {
        self.inner.progress.store(percent.min(100), Ordering::SeqCst);
    }

    fn transition(&self, from: AnalysisMode, to: AnalysisMode) -> bool {
        self.inner
            .mode
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}
