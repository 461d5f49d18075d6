//! YAML encoding of analysis sessions.
//!
//! A session file is a sequence of frame records:
//!
//! ```yaml
//! - timestamp: 0.0
//!   tracks:
//!   - id: 1
//!     bbox: [0.0, 0.0, 10.0, 10.0]
//!     label: Vehicle
//!     score: 0.9
//!     maxScore: 0.9
//!     firstSeenAt: 0.0
//!     colorTag: hsl(120.0, 100%, 50%)
//!     refined: false
//! ```

use std::fs;
use std::path::Path;

use serde_yaml::Value;
use tracing::info;

use crate::analysis::session::{AnalysisSession, FrameRecord};
use crate::error::{Error, Result};

pub fn serialize_session(session: &AnalysisSession) -> Result<String> {
    Ok(serde_yaml::to_string(session.frames())?)
}

/// Rebuild a completed session from its YAML form.
///
/// Fails with [`Error::Format`] unless the root is a sequence of
/// frame-shaped records; no partial session is returned.
pub fn deserialize_session(text: &str) -> Result<AnalysisSession> {
    let root: Value = serde_yaml::from_str(text).map_err(|e| Error::format(e.to_string()))?;
    if !root.is_sequence() {
        return Err(Error::format("root must be a sequence of frame records"));
    }
    let frames: Vec<FrameRecord> =
        serde_yaml::from_value(root).map_err(|e| Error::format(e.to_string()))?;
    Ok(AnalysisSession::from_frames(frames))
}

pub fn save_session<P: AsRef<Path>>(session: &AnalysisSession, path: P) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, serialize_session(session)?)?;
    info!(path = %path.display(), frames = session.frames().len(), "saved analysis session");
    Ok(())
}

pub fn load_session<P: AsRef<Path>>(path: P) -> Result<AnalysisSession> {
    let path = path.as_ref();
    let session = deserialize_session(&fs::read_to_string(path)?)?;
    info!(path = %path.display(), frames = session.frames().len(), "loaded analysis session");
    Ok(session)
}
