use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical measurement modality. The heading doubles as configuration
/// section name and wire tag, so it must never change once released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    Gravity,
    Magnetism,
    Thermal,
}

impl SensorKind {
    pub const ALL: [SensorKind; 3] = [
        SensorKind::Gravity,
        SensorKind::Magnetism,
        SensorKind::Thermal,
    ];

    pub fn heading(&self) -> &'static str {
        match self {
            SensorKind::Gravity => "gravity",
            SensorKind::Magnetism => "magnetism",
            SensorKind::Thermal => "thermal",
        }
    }

    pub fn from_heading(heading: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.heading() == heading.trim())
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Spec,
    Params,
    Results,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Spec => "spec",
            MessageKind::Params => "params",
            MessageKind::Results => "results",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
