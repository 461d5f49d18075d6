use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Closed set of labels the pipeline is allowed to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SchemaLabel {
    Animal,
    Cyclist,
    #[serde(rename = "Golf-Cart")]
    GolfCart,
    Motorcycle,
    Pedestrian,
    Van,
    Truck,
    Vehicle,
    #[serde(rename = "Emergency-Vehicle")]
    EmergencyVehicle,
    Scooter,
    Bus,
    /// Reserved for downstream ambiguity; never produced by the mapper
    Unknown,
}

impl SchemaLabel {
    pub const ALL: [SchemaLabel; 12] = [
        Self::Animal,
        Self::Cyclist,
        Self::GolfCart,
        Self::Motorcycle,
        Self::Pedestrian,
        Self::Van,
        Self::Truck,
        Self::Vehicle,
        Self::EmergencyVehicle,
        Self::Scooter,
        Self::Bus,
        Self::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Animal => "Animal",
            Self::Cyclist => "Cyclist",
            Self::GolfCart => "Golf-Cart",
            Self::Motorcycle => "Motorcycle",
            Self::Pedestrian => "Pedestrian",
            Self::Van => "Van",
            Self::Truck => "Truck",
            Self::Vehicle => "Vehicle",
            Self::EmergencyVehicle => "Emergency-Vehicle",
            Self::Scooter => "Scooter",
            Self::Bus => "Bus",
            Self::Unknown => "Unknown",
        }
    }

    /// Coarse labels the secondary classifier may narrow down.
    pub fn needs_refinement(&self) -> bool {
        matches!(
            self,
            Self::Vehicle | Self::Truck | Self::Motorcycle | Self::Scooter
        )
    }
}

impl std::fmt::Display for SchemaLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::format(format!("unknown schema label '{s}'")))
    }
}
