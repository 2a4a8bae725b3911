use geosense_proto::messages::{GravParamsMessage, GravResultsMessage, GravSpecMessage};
use geosense_proto::{MessageKind, SensorKind, WireError};

use super::{
    locations_from_message, locations_message, noise_from_message, noise_message,
    readings_from_message, results_message, voxelisation_from_message, voxelisation_message,
    WireMessage,
};
use crate::sensors::gravity::{GravParams, GravResults, GravSpec};

impl WireMessage for GravSpec {
    const SENSOR: SensorKind = SensorKind::Gravity;
    const MESSAGE: MessageKind = MessageKind::Spec;
    type Message = GravSpecMessage;

    fn to_message(&self) -> Result<GravSpecMessage, WireError> {
        let (numlocations, locations) = locations_message(&self.locations)?;
        Ok(GravSpecMessage {
            numlocations,
            locations,
            voxelisation: voxelisation_message(&self.voxelisation),
            noise: noise_message(&self.noise),
        })
    }

    fn from_message(message: GravSpecMessage) -> Result<Self, WireError> {
        Ok(Self {
            locations: locations_from_message(message.numlocations, &message.locations)?,
            voxelisation: voxelisation_from_message(&message.voxelisation),
            noise: noise_from_message(&message.noise),
        })
    }
}

impl WireMessage for GravParams {
    const SENSOR: SensorKind = SensorKind::Gravity;
    const MESSAGE: MessageKind = MessageKind::Params;
    type Message = GravParamsMessage;

    fn to_message(&self) -> Result<GravParamsMessage, WireError> {
        Ok(GravParamsMessage {
            returnsensordata: self.return_sensor_data,
        })
    }

    fn from_message(message: GravParamsMessage) -> Result<Self, WireError> {
        Ok(Self {
            return_sensor_data: message.returnsensordata,
        })
    }
}

impl WireMessage for GravResults {
    const SENSOR: SensorKind = SensorKind::Gravity;
    const MESSAGE: MessageKind = MessageKind::Results;
    type Message = GravResultsMessage;

    fn to_message(&self) -> Result<GravResultsMessage, WireError> {
        Ok(results_message(self.likelihood, &self.readings))
    }

    fn from_message(message: GravResultsMessage) -> Result<Self, WireError> {
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
    use crate::types::{locations_from_rows, NoiseSpec, Voxelisation};
    use nalgebra::{DMatrix, DVector};

    #[test]
    fn grav_spec_survives_the_wire() {
        let spec = GravSpec {
            locations: locations_from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]),
            voxelisation: Voxelisation::new([10, 11, 12], 3),
            noise: NoiseSpec::new(0.5, 0.75),
        };
        let bytes = serialise(&spec).expect("encode");
        assert_eq!(unserialise::<GravSpec>(&bytes).expect("decode"), spec);
    }

    #[test]
    fn grav_results_without_readings_survive_the_wire() {
        let results = GravResults {
            likelihood: -104.25,
            readings: DVector::zeros(0),
        };
        let bytes = serialise(&results).expect("encode");
        assert_eq!(unserialise::<GravResults>(&bytes).expect("decode"), results);
    }

    #[test]
    fn spec_with_two_column_locations_refuses_to_serialise() {
        for rows in [1, 0] {
            let spec = GravSpec {
                locations: DMatrix::zeros(rows, 2),
                voxelisation: Voxelisation::new([10, 10, 10], 0),
                noise: NoiseSpec::new(1.0, 1.0),
            };
            let err = serialise(&spec).expect_err("two columns");
            assert!(matches!(err, WireError::Encode { .. }), "{err:?}");
        }
    }

    #[test]
    fn params_bytes_do_not_decode_as_results() {
        let bytes = serialise(&GravParams {
            return_sensor_data: true,
        })
        .expect("encode");
        let err = unserialise::<GravResults>(&bytes).expect_err("wrong message tag");
        assert!(err.is_malformed_payload());
    }
}
