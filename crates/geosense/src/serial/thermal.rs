use geosense_proto::messages::{ThermalParamsMessage, ThermalResultsMessage, ThermalSpecMessage};
use geosense_proto::{MessageKind, SensorKind, WireError};

use super::{
    locations_from_message, locations_message, noise_from_message, noise_message,
    readings_from_message, results_message, voxelisation_from_message, voxelisation_message,
    WireMessage,
};
use crate::sensors::thermal::{ThermalParams, ThermalResults, ThermalSpec};

impl WireMessage for ThermalSpec {
    const SENSOR: SensorKind = SensorKind::Thermal;
    const MESSAGE: MessageKind = MessageKind::Spec;
    type Message = ThermalSpecMessage;

    fn to_message(&self) -> Result<ThermalSpecMessage, WireError> {
        let (numlocations, locations) = locations_message(&self.locations)?;
        Ok(ThermalSpecMessage {
            numlocations,
            locations,
            voxelisation: voxelisation_message(&self.voxelisation),
            noise: noise_message(&self.noise),
            surfacetemperature: self.surface_temperature,
            lowerboundary: self.lower_boundary,
            lowerboundaryisheatflow: self.lower_boundary_is_heat_flow,
        })
    }

    fn from_message(message: ThermalSpecMessage) -> Result<Self, WireError> {
        Ok(Self {
            locations: locations_from_message(message.numlocations, &message.locations)?,
            voxelisation: voxelisation_from_message(&message.voxelisation),
            noise: noise_from_message(&message.noise),
            surface_temperature: message.surfacetemperature,
            lower_boundary: message.lowerboundary,
            lower_boundary_is_heat_flow: message.lowerboundaryisheatflow,
        })
    }
}

impl WireMessage for ThermalParams {
    const SENSOR: SensorKind = SensorKind::Thermal;
    const MESSAGE: MessageKind = MessageKind::Params;
    type Message = ThermalParamsMessage;

    fn to_message(&self) -> Result<ThermalParamsMessage, WireError> {
        Ok(ThermalParamsMessage {
            returnsensordata: self.return_sensor_data,
        })
    }

    fn from_message(message: ThermalParamsMessage) -> Result<Self, WireError> {
        Ok(Self {
            return_sensor_data: message.returnsensordata,
        })
    }
}

impl WireMessage for ThermalResults {
    const SENSOR: SensorKind = SensorKind::Thermal;
    const MESSAGE: MessageKind = MessageKind::Results;
    type Message = ThermalResultsMessage;

    fn to_message(&self) -> Result<ThermalResultsMessage, WireError> {
        Ok(results_message(self.likelihood, &self.readings))
    }

    fn from_message(message: ThermalResultsMessage) -> Result<Self, WireError> {
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
    use nalgebra::DVector;

    #[test]
    fn thermal_results_keep_readings_order() {
        let results = ThermalResults {
            likelihood: -0.125,
            readings: DVector::from_vec(vec![300.0, 301.5, 299.25]),
        };
        let bytes = serialise(&results).expect("encode");
        assert_eq!(unserialise::<ThermalResults>(&bytes).expect("decode"), results);
    }

    #[test]
    fn empty_thermal_spec_survives_the_wire() {
        let spec = ThermalSpec::default();
        let bytes = serialise(&spec).expect("encode");
        let decoded = unserialise::<ThermalSpec>(&bytes).expect("decode");
        assert_eq!(decoded.locations.shape(), (0, 3));
        assert_eq!(decoded, spec);
    }
}
