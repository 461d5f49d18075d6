//! Offline analysis: a stepped, pausable loop over a time range of a frame
//! source, producing a replayable session of per-frame track snapshots.

mod codec;
mod mode;
mod orchestrator;
mod session;
mod summary;

pub use codec::{deserialize_session, load_session, save_session, serialize_session};
pub use mode::{AnalysisHandle, AnalysisMode};
pub use orchestrator::{Orchestrator, RunOutcome};
pub use session::{AnalysisSession, FrameRecord, TimeRange, TrackSnapshot};
pub use summary::{SummaryTable, TrackSummary};
