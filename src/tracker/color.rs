//! Display color assignment for new tracks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Opaque display color attached to a track, e.g. `hsl(212.4, 100%, 50%)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorTag(pub String);

impl ColorTag {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ColorTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strategy producing the color of every newly spawned track.
pub trait ColorAssigner: Send {
    fn assign(&mut self) -> ColorTag;
}

/// Fully saturated color with a uniformly random hue.
#[derive(Debug, Clone)]
pub struct RandomHue {
    rng: StdRng,
}

impl RandomHue {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence of hues for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomHue {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl ColorAssigner for RandomHue {
    fn assign(&mut self) -> ColorTag {
        let hue: f32 = self.rng.gen_range(0.0..360.0);
        ColorTag(format!("hsl({hue:.1}, 100%, 50%)"))
    }
}

/// Same color for every track.
#[derive(Debug, Clone)]
pub struct FixedColor(pub ColorTag);

impl Default for FixedColor {
    fn default() -> Self {
        Self(ColorTag("#00FF00".to_string()))
    }
}

impl ColorAssigner for FixedColor {
    fn assign(&mut self) -> ColorTag {
        self.0.clone()
    }
}
