//! Parse, validate and re-emit every enabled sensor in one pass.

use std::collections::BTreeMap;

use geosense_proto::SensorKind;
use tracing::{debug, info};

use crate::config::{ConfigValues, EmitPlan};
use crate::error::SensorError;
use crate::registry::SensorRegistry;
use crate::sensor::{SensorParams, SensorPrior, SensorResults, SensorSpec};
use crate::table::TableStore;
use crate::validate::ValidationSummary;
use crate::world::WorldSpec;

#[derive(Debug, Clone, PartialEq)]
pub struct SensorInput {
    pub spec: SensorSpec,
    pub params: SensorParams,
    pub results: SensorResults,
    pub prior: SensorPrior,
}

/// Parsed inputs of the enabled sensors only; disabled sensors never appear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorInputs {
    inputs: BTreeMap<SensorKind, SensorInput>,
}

impl SensorInputs {
    pub fn load(
        registry: &SensorRegistry,
        config: &ConfigValues,
        tables: &dyn TableStore,
    ) -> Result<Self, SensorError> {
        let enabled = registry.enabled();
        let mut inputs = BTreeMap::new();
        registry.for_each_enabled(|contract| {
            let input = SensorInput {
                spec: contract.parse_spec(config, enabled, tables)?,
                params: contract.parse_params(config, enabled)?,
                results: contract.parse_results(config, enabled, tables)?,
                prior: contract.declare_prior(config, enabled),
            };
            debug!(sensor = contract.heading(), "loaded sensor input");
            inputs.insert(contract.kind(), input);
            Ok::<(), SensorError>(())
        })?;
        info!(sensors = inputs.len(), "sensor inputs loaded");
        Ok(Self { inputs })
    }

    pub fn get(&self, kind: SensorKind) -> Option<&SensorInput> {
        self.inputs.get(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SensorKind, &SensorInput)> {
        self.inputs.iter().map(|(kind, input)| (*kind, input))
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Validates every loaded sensor; one failing sensor does not stop the
    /// others from being checked.
    pub fn validate(
        &self,
        registry: &SensorRegistry,
        world: &WorldSpec,
    ) -> Result<ValidationSummary, SensorError> {
        let mut summary = ValidationSummary::default();
        for (kind, input) in self.iter() {
            let report = registry
                .contract_for(kind)?
                .validate(world, &input.spec, &input.results)?;
            summary.push(report);
        }
        if !summary.is_valid() {
            info!(
                failures = summary.diagnostics().count(),
                "sensor input validation failed"
            );
        }
        Ok(summary)
    }

    /// Each sensor's tables land at `{prefix}{heading}_<table>.csv`.
    pub fn describe(
        &self,
        registry: &SensorRegistry,
        prefix: &str,
    ) -> Result<EmitPlan, SensorError> {
        let enabled = registry.enabled();
        let mut plan = EmitPlan::new();
        for (kind, input) in self.iter() {
            let contract = registry.contract_for(kind)?;
            let sensor_prefix = format!("{prefix}{}_", contract.heading());
            plan.merge(contract.describe_spec(&sensor_prefix, &input.spec, enabled)?);
            plan.merge(contract.describe_params(&sensor_prefix, &input.params)?);
            plan.merge(contract.describe_results(&sensor_prefix, &input.results, enabled)?);
        }
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptionValue;
    use crate::sensor::EnabledSensors;
    use crate::table::MemoryTableStore;
    use crate::types::locations_from_rows;
    use nalgebra::DMatrix;

    fn gravity_config() -> ConfigValues {
        ConfigValues::new()
            .with("gravity", "enabled", OptionValue::Bool(true))
            .with("gravity", "sensorLocations", OptionValue::Path("g_locs.csv".into()))
            .with("gravity", "sensorReadings", OptionValue::Path("g_obs.csv".into()))
            .with("gravity", "gridResolution", OptionValue::UIntVec3([10, 10, 10]))
            .with("gravity", "supersample", OptionValue::UInt(0))
            .with("gravity", "noiseAlpha", OptionValue::Real(1.0))
            .with("gravity", "noiseBeta", OptionValue::Real(1.0))
    }

    fn gravity_tables() -> MemoryTableStore {
        let tables = MemoryTableStore::new();
        tables.insert("g_locs.csv", locations_from_rows(&[[10.0, 10.0, 0.0]]));
        tables.insert("g_obs.csv", DMatrix::from_column_slice(1, 1, &[1.5]));
        tables
    }

    #[test]
    fn only_enabled_sensors_are_loaded() {
        let config = gravity_config();
        let registry = SensorRegistry::new(EnabledSensors::from_config(&config));
        let inputs = SensorInputs::load(&registry, &config, &gravity_tables()).expect("load");

        assert_eq!(inputs.len(), 1);
        assert!(inputs.get(SensorKind::Gravity).is_some());
        assert!(inputs.get(SensorKind::Magnetism).is_none());

        let world = WorldSpec::new((0.0, 100.0), (0.0, 100.0), (-10.0, 0.0));
        let summary = inputs.validate(&registry, &world).expect("validate");
        assert!(summary.is_valid());
        assert_eq!(summary.reports.len(), 1);
    }

    #[test]
    fn describe_prefixes_tables_per_sensor() {
        let config = gravity_config();
        let registry = SensorRegistry::new(EnabledSensors::from_config(&config));
        let inputs = SensorInputs::load(&registry, &config, &gravity_tables()).expect("load");

        let plan = inputs.describe(&registry, "run7/").expect("describe");
        let paths: Vec<&str> = plan.tables.iter().map(|write| write.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "run7/gravity_sensorLocations.csv",
                "run7/gravity_sensorReadings.csv"
            ]
        );
        assert_eq!(
            plan.options.get("gravity.enabled"),
            Some(&OptionValue::Bool(true))
        );
    }

    #[test]
    fn missing_table_surfaces_as_config_error() {
        let config = gravity_config();
        let registry = SensorRegistry::new(EnabledSensors::from_config(&config));
        let err = SensorInputs::load(&registry, &config, &MemoryTableStore::new())
            .expect_err("no tables");
        assert!(matches!(err, SensorError::Config(_)));
    }
}
