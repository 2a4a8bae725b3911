//! Per-sensor wire schemas.
//!
//! Every field is declared here explicitly; field names are the lowercase
//! identifiers other processes depend on. Matrix payloads always travel with
//! their row count.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoxelisationMessage {
    pub xresolution: u32,
    pub yresolution: u32,
    pub zresolution: u32,
    pub supersample: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseSpecMessage {
    pub inversegammaalpha: f64,
    pub inversegammabeta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GravSpecMessage {
    pub numlocations: u64,
    #[serde(with = "serde_bytes")]
    pub locations: Vec<u8>,
    pub voxelisation: VoxelisationMessage,
    pub noise: NoiseSpecMessage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagSpecMessage {
    pub numlocations: u64,
    #[serde(with = "serde_bytes")]
    pub locations: Vec<u8>,
    pub voxelisation: VoxelisationMessage,
    pub noise: NoiseSpecMessage,
    pub magneticfield: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalSpecMessage {
    pub numlocations: u64,
    #[serde(with = "serde_bytes")]
    pub locations: Vec<u8>,
    pub voxelisation: VoxelisationMessage,
    pub noise: NoiseSpecMessage,
    pub surfacetemperature: f64,
    pub lowerboundary: f64,
    pub lowerboundaryisheatflow: bool,
}

/// Runtime parameters shared by every sensor that has no extra simulation
/// knobs beyond whether raw readings are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorParamsMessage {
    pub returnsensordata: bool,
}

pub type GravParamsMessage = SensorParamsMessage;
pub type MagParamsMessage = SensorParamsMessage;
pub type ThermalParamsMessage = SensorParamsMessage;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorResultsMessage {
    pub likelihood: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numreadings: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_bytes")]
    pub readings: Option<Vec<u8>>,
}

pub type GravResultsMessage = SensorResultsMessage;
pub type MagResultsMessage = SensorResultsMessage;
pub type ThermalResultsMessage = SensorResultsMessage;
