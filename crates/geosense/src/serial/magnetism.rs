use geosense_proto::messages::{MagParamsMessage, MagResultsMessage, MagSpecMessage};
use geosense_proto::{MessageKind, SensorKind, WireError};

use super::{
    locations_from_message, locations_message, noise_from_message, noise_message,
    readings_from_message, results_message, voxelisation_from_message, voxelisation_message,
    WireMessage,
};
use crate::sensors::magnetism::{MagParams, MagResults, MagSpec};

impl WireMessage for MagSpec {
    const SENSOR: SensorKind = SensorKind::Magnetism;
    const MESSAGE: MessageKind = MessageKind::Spec;
    type Message = MagSpecMessage;

    fn to_message(&self) -> Result<MagSpecMessage, WireError> {
        let (numlocations, locations) = locations_message(&self.locations)?;
        Ok(MagSpecMessage {
            numlocations,
            locations,
            voxelisation: voxelisation_message(&self.voxelisation),
            noise: noise_message(&self.noise),
            magneticfield: self.background_field,
        })
    }

    fn from_message(message: MagSpecMessage) -> Result<Self, WireError> {
        Ok(Self {
            locations: locations_from_message(message.numlocations, &message.locations)?,
            voxelisation: voxelisation_from_message(&message.voxelisation),
            noise: noise_from_message(&message.noise),
            background_field: message.magneticfield,
        })
    }
}

impl WireMessage for MagParams {
    const SENSOR: SensorKind = SensorKind::Magnetism;
    const MESSAGE: MessageKind = MessageKind::Params;
    type Message = MagParamsMessage;

    fn to_message(&self) -> Result<MagParamsMessage, WireError> {
        Ok(MagParamsMessage {
            returnsensordata: self.return_sensor_data,
        })
    }

    fn from_message(message: MagParamsMessage) -> Result<Self, WireError> {
        Ok(Self {
            return_sensor_data: message.returnsensordata,
        })
    }
}

impl WireMessage for MagResults {
    const SENSOR: SensorKind = SensorKind::Magnetism;
    const MESSAGE: MessageKind = MessageKind::Results;
    type Message = MagResultsMessage;

    fn to_message(&self) -> Result<MagResultsMessage, WireError> {
        Ok(results_message(self.likelihood, &self.readings))
    }

    fn from_message(message: MagResultsMessage) -> Result<Self, WireError> {
        Ok(Self {
            readings: readings_from_message(&message)?,
            likelihood: message.likelihood,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serial::{serialise, unserialise};
    use crate::sensors::gravity::GravSpec;
    use crate::types::{locations_from_rows, NoiseSpec, Voxelisation};

    fn spec() -> MagSpec {
        MagSpec {
            locations: locations_from_rows(&[[0.5, 0.5, 1.0]]),
            voxelisation: Voxelisation::new([4, 4, 4], 0),
            noise: NoiseSpec::new(1.0, 3.0),
            background_field: [1.0e-5, -2.5e-5, 4.0e-5],
        }
    }

    #[test]
    fn background_field_is_carried_bitwise() {
        let bytes = serialise(&spec()).expect("encode");
        let decoded = unserialise::<MagSpec>(&bytes).expect("decode");
        for (left, right) in decoded.background_field.iter().zip(spec().background_field) {
            assert_eq!(left.to_bits(), right.to_bits());
        }
        assert_eq!(decoded, spec());
    }

    #[test]
    fn magnetism_spec_is_not_a_gravity_spec() {
        let bytes = serialise(&spec()).expect("encode");
        assert!(unserialise::<GravSpec>(&bytes).is_err());
    }
}
