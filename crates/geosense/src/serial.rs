//! Wire transport of sensor values between coordinator and workers.
//!
//! Each domain value maps onto its schema in `geosense_proto::messages`
//! field by field; the envelope adds sensor/message tags and a version.

mod gravity;
mod magnetism;
mod thermal;

use geosense_proto::messages::{NoiseSpecMessage, SensorResultsMessage, VoxelisationMessage};
use geosense_proto::{
    decode_matrix, decode_message, decode_vector, encode_matrix, encode_message, encode_vector,
    MessageKind, SensorKind, WireError,
};
use nalgebra::{DMatrix, DVector};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::{NoiseSpec, Voxelisation, LOCATION_COLUMNS};

pub trait WireMessage: Sized {
    const SENSOR: SensorKind;
    const MESSAGE: MessageKind;
    type Message: Serialize + DeserializeOwned;

    /// Fails when the value has no valid wire form, such as a location
    /// table without three columns.
    fn to_message(&self) -> Result<Self::Message, WireError>;

    /// Builds the whole value or fails; never a partially decoded one.
    fn from_message(message: Self::Message) -> Result<Self, WireError>;
}

pub fn serialise<T: WireMessage>(value: &T) -> Result<Vec<u8>, WireError> {
    encode_message(T::SENSOR, T::MESSAGE, &value.to_message()?)
}

pub fn unserialise<T: WireMessage>(bytes: &[u8]) -> Result<T, WireError> {
    let message = decode_message::<T::Message>(bytes, T::SENSOR, T::MESSAGE)?;
    T::from_message(message)
}

pub(crate) fn voxelisation_message(voxelisation: &Voxelisation) -> VoxelisationMessage {
    VoxelisationMessage {
        xresolution: voxelisation.x_resolution,
        yresolution: voxelisation.y_resolution,
        zresolution: voxelisation.z_resolution,
        supersample: voxelisation.supersample,
    }
}

pub(crate) fn voxelisation_from_message(message: &VoxelisationMessage) -> Voxelisation {
    Voxelisation {
        x_resolution: message.xresolution,
        y_resolution: message.yresolution,
        z_resolution: message.zresolution,
        supersample: message.supersample,
    }
}

pub(crate) fn noise_message(noise: &NoiseSpec) -> NoiseSpecMessage {
    NoiseSpecMessage {
        inversegammaalpha: noise.inverse_gamma_alpha,
        inversegammabeta: noise.inverse_gamma_beta,
    }
}

pub(crate) fn noise_from_message(message: &NoiseSpecMessage) -> NoiseSpec {
    NoiseSpec {
        inverse_gamma_alpha: message.inversegammaalpha,
        inverse_gamma_beta: message.inversegammabeta,
    }
}

pub(crate) fn locations_message(locations: &DMatrix<f64>) -> Result<(u64, Vec<u8>), WireError> {
    if locations.ncols() != LOCATION_COLUMNS {
        return Err(WireError::encode(format!(
            "locations must have {LOCATION_COLUMNS} columns, found {}",
            locations.ncols()
        )));
    }
    Ok((locations.nrows() as u64, encode_matrix(locations)))
}

pub(crate) fn locations_from_message(
    numlocations: u64,
    bytes: &[u8],
) -> Result<DMatrix<f64>, WireError> {
    let rows = usize::try_from(numlocations)
        .map_err(|_| WireError::malformed(format!("numlocations {numlocations} out of range")))?;
    Ok(decode_matrix(bytes, rows, LOCATION_COLUMNS)?)
}

/// Readings are optional on the wire: empty readings are omitted entirely.
pub(crate) fn results_message(likelihood: f64, readings: &DVector<f64>) -> SensorResultsMessage {
    if readings.is_empty() {
        return SensorResultsMessage {
            likelihood,
            numreadings: None,
            readings: None,
        };
    }
    SensorResultsMessage {
        likelihood,
        numreadings: Some(readings.len() as u64),
        readings: Some(encode_vector(readings)),
    }
}

pub(crate) fn readings_from_message(
    message: &SensorResultsMessage,
) -> Result<DVector<f64>, WireError> {
    match (message.numreadings, message.readings.as_deref()) {
        (Some(count), Some(bytes)) => {
            let len = usize::try_from(count)
                .map_err(|_| WireError::malformed(format!("numreadings {count} out of range")))?;
            Ok(decode_vector(bytes, len)?)
        }
        (None, None) => Ok(DVector::zeros(0)),
        (Some(_), None) => Err(WireError::malformed("numreadings present without readings")),
        (None, Some(_)) => Err(WireError::malformed("readings present without numreadings")),
    }
}
