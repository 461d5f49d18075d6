//! Signal-light state from the color distribution of a cropped region.
//!
//! The lamp housing is split into overlapping vertical zones: the top half
//! can only vote red, the middle band (30%..70%) yellow and the bottom half
//! green. Each sufficiently bright pixel is tested against the channel
//! dominance rule of every zone it falls in; the zone with the most votes
//! wins if it reaches [`MIN_LIT_PIXELS`].

use image::RgbImage;
use image::imageops;
use serde::{Deserialize, Serialize};

use crate::tracker::Rect;

/// Pixels with all channels below this are treated as unlit housing.
const DARKNESS_THRESHOLD: u8 = 50;
/// Winning zone needs at least this many votes.
pub const MIN_LIT_PIXELS: u32 = 10;

const CHANNEL_FLOOR: f32 = 100.0;
const RED_DOMINANCE: f32 = 1.2;
const GREEN_DOMINANCE: f32 = 1.1;
const YELLOW_MAX_BLUE: f32 = 100.0;
const YELLOW_MAX_RG_GAP: f32 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalColor {
    Red,
    Yellow,
    Green,
    Unknown,
}

impl SignalColor {
    /// Display color for overlays; `None` for `Unknown`.
    pub fn hex(&self) -> Option<&'static str> {
        match self {
            Self::Red => Some("#FF0000"),
            Self::Yellow => Some("#FFD700"),
            Self::Green => Some("#00FF00"),
            Self::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalReading {
    pub color: SignalColor,
    pub confidence: f32,
}

impl SignalReading {
    fn unknown() -> Self {
        Self {
            color: SignalColor::Unknown,
            confidence: 0.0,
        }
    }
}

/// Classify the signal light inside `bbox` of `frame`.
///
/// Confidence is the winning vote count divided by a third of the region area.
pub fn classify_signal(frame: &RgbImage, bbox: Rect) -> SignalReading {
    if !bbox.is_well_formed() {
        return SignalReading::unknown();
    }
    // Clip to the frame's top-left corner; the far edges stay put.
    let left = bbox.x.max(0.0).round();
    let top = bbox.y.max(0.0).round();
    let right = (bbox.x + bbox.width).round();
    let bottom = (bbox.y + bbox.height).round();
    let x = left as u32;
    let y = top as u32;
    let w = (right - left).max(0.0) as u32;
    let h = (bottom - top).max(0.0) as u32;
    if w == 0 || h == 0 {
        return SignalReading::unknown();
    }

    let region = imageops::crop_imm(frame, x, y, w, h).to_image();
    let (w, h) = region.dimensions();
    if w == 0 || h == 0 {
        return SignalReading::unknown();
    }

    let mut red = 0u32;
    let mut yellow = 0u32;
    let mut green = 0u32;

    for (_, row, pixel) in region.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        if r < DARKNESS_THRESHOLD && g < DARKNESS_THRESHOLD && b < DARKNESS_THRESHOLD {
            continue;
        }
        let (r, g, b) = (r as f32, g as f32, b as f32);
        let py = row as f32 / h as f32;

        if py < 0.5 && r > CHANNEL_FLOOR && r > g * RED_DOMINANCE && r > b * RED_DOMINANCE {
            red += 1;
        }
        if (0.3..=0.7).contains(&py)
            && r > CHANNEL_FLOOR
            && g > CHANNEL_FLOOR
            && b < YELLOW_MAX_BLUE
            && (r - g).abs() < YELLOW_MAX_RG_GAP
        {
            yellow += 1;
        }
        if py > 0.5 && g > CHANNEL_FLOOR && g > r * GREEN_DOMINANCE {
            green += 1;
        }
    }

    let max = red.max(yellow).max(green);
    if max < MIN_LIT_PIXELS {
        return SignalReading::unknown();
    }

    // Ties resolve top to bottom.
    let color = if red == max {
        SignalColor::Red
    } else if yellow == max {
        SignalColor::Yellow
    } else {
        SignalColor::Green
    };

    SignalReading {
        color,
        confidence: max as f32 / ((w * h) as f32 / 3.0),
    }
}
