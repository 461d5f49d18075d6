//! Pipeline configuration, loadable from YAML.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tracker::TrackerConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Seconds between analysed samples
    pub step: f64,
    /// Raw detections below this score are dropped before schema mapping
    pub min_confidence: f32,
    /// Tracks must score above this before the secondary classifier runs
    pub refinement_gate: f32,
    /// How often a paused analysis re-checks its mode
    pub pause_poll_interval_ms: u64,
    /// Max distance (seconds) between a playback time and a recorded frame
    pub playback_tolerance: f64,
    /// Regions smaller than this (either side, pixels) are not classified
    pub min_classify_size: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            step: 0.1,
            min_confidence: 0.5,
            refinement_gate: 0.6,
            pause_poll_interval_ms: 200,
            playback_tolerance: 0.2,
            min_classify_size: 20.0,
        }
    }
}

impl AnalysisConfig {
    pub fn pause_poll_interval(&self) -> Duration {
        Duration::from_millis(self.pause_poll_interval_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub tracker: TrackerConfig,
    pub analysis: AnalysisConfig,
}

impl PipelineConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let config: PipelineConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let unit = 0.0..=1.0;
        if !unit.contains(&self.tracker.iou_threshold) {
            return Err(Error::config("tracker.iou_threshold must be in [0, 1]"));
        }
        if !(self.analysis.step.is_finite() && self.analysis.step > 0.0) {
            return Err(Error::config("analysis.step must be a positive number"));
        }
        if !unit.contains(&self.analysis.min_confidence) {
            return Err(Error::config("analysis.min_confidence must be in [0, 1]"));
        }
        if !unit.contains(&self.analysis.refinement_gate) {
            return Err(Error::config("analysis.refinement_gate must be in [0, 1]"));
        }
        if self.analysis.pause_poll_interval_ms == 0 {
            return Err(Error::config("analysis.pause_poll_interval_ms must be positive"));
        }
        if !(self.analysis.playback_tolerance.is_finite() && self.analysis.playback_tolerance >= 0.0) {
            return Err(Error::config("analysis.playback_tolerance must be non-negative"));
        }
        if !(self.analysis.min_classify_size.is_finite() && self.analysis.min_classify_size >= 0.0) {
            return Err(Error::config("analysis.min_classify_size must be non-negative"));
        }
        Ok(())
    }
}
