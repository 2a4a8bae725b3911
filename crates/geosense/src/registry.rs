use std::collections::BTreeMap;

use geosense_proto::{open_envelope, SensorKind};
use tracing::debug;

use crate::config::ConfigSchema;
use crate::error::{ConfigError, SensorError};
use crate::property::PropertyMask;
use crate::sensor::{
    EnabledSensors, ModelContract, SensorContract, SensorParams, SensorResults, SensorSpec,
};
use crate::sensors::{Gravity, Magnetism, Thermal};
use crate::world::WorldSpec;

/// Every sensor contract compiled into this crate.
pub fn builtin_contracts() -> Vec<Box<dyn SensorContract>> {
    vec![
        Box::new(ModelContract::new(Gravity)),
        Box::new(ModelContract::new(Magnetism)),
        Box::new(ModelContract::new(Thermal)),
    ]
}

/// Options of all builtin sensors plus the `[world]` section.
pub fn builtin_schema() -> Result<ConfigSchema, ConfigError> {
    SensorRegistry::new(EnabledSensors::none()).schema()
}

/// Contracts keyed by sensor kind, with the set of sensors enabled for this
/// run. Built once and only read afterwards.
pub struct SensorRegistry {
    contracts: BTreeMap<SensorKind, Box<dyn SensorContract>>,
    enabled: EnabledSensors,
}

impl SensorRegistry {
    pub fn new(enabled: EnabledSensors) -> Self {
        Self::with_contracts(builtin_contracts(), enabled)
    }

    pub fn with_contracts(
        contracts: impl IntoIterator<Item = Box<dyn SensorContract>>,
        enabled: EnabledSensors,
    ) -> Self {
        let contracts = contracts
            .into_iter()
            .map(|contract| (contract.kind(), contract))
            .collect();
        Self { contracts, enabled }
    }

    pub fn enabled(&self) -> &EnabledSensors {
        &self.enabled
    }

    pub fn contract_for(&self, kind: SensorKind) -> Result<&dyn SensorContract, SensorError> {
        self.contracts
            .get(&kind)
            .map(|contract| contract.as_ref())
            .ok_or(SensorError::UnknownSensorType { kind })
    }

    pub fn contracts(&self) -> impl Iterator<Item = &dyn SensorContract> {
        self.contracts.values().map(|contract| contract.as_ref())
    }

    /// Runs `f` for each enabled sensor in kind order, stopping at the first
    /// error. An enabled sensor without a contract is an error.
    pub fn for_each_enabled<F, E>(&self, mut f: F) -> Result<(), E>
    where
        F: FnMut(&dyn SensorContract) -> Result<(), E>,
        E: From<SensorError>,
    {
        for kind in self.enabled.iter() {
            let contract = self.contract_for(kind)?;
            f(contract)?;
        }
        Ok(())
    }

    pub fn schema(&self) -> Result<ConfigSchema, ConfigError> {
        let mut schema = ConfigSchema::new();
        WorldSpec::declare_options(&mut schema)?;
        for contract in self.contracts() {
            contract.declare_options(&mut schema)?;
        }
        debug!(options = schema.len(), "composed config schema");
        Ok(schema)
    }

    pub fn activated_properties(&self) -> Result<PropertyMask, SensorError> {
        let mut mask = PropertyMask::new();
        self.for_each_enabled(|contract| {
            mask.enable_all(&contract.activated_properties());
            Ok::<(), SensorError>(())
        })?;
        Ok(mask)
    }

    pub fn decode_spec(&self, bytes: &[u8]) -> Result<SensorSpec, SensorError> {
        let envelope = open_envelope(bytes)?;
        self.contract_for(envelope.sensor)?.decode_spec(bytes)
    }

    pub fn decode_params(&self, bytes: &[u8]) -> Result<SensorParams, SensorError> {
        let envelope = open_envelope(bytes)?;
        self.contract_for(envelope.sensor)?.decode_params(bytes)
    }

    pub fn decode_results(&self, bytes: &[u8]) -> Result<SensorResults, SensorError> {
        let envelope = open_envelope(bytes)?;
        self.contract_for(envelope.sensor)?.decode_results(bytes)
    }
}
