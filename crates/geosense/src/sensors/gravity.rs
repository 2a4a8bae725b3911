use std::collections::BTreeSet;

use geosense_proto::SensorKind;
use nalgebra::{DMatrix, DVector};
use tracing::debug;

use super::survey::{
    declare_survey_options, describe_disabled, describe_readings, describe_survey,
    parse_readings, parse_survey,
};
use crate::config::{ConfigSchema, ConfigValues, EmitPlan};
use crate::error::ConfigError;
use crate::property::RockProperty;
use crate::sensor::{EnabledSensors, SensorModel};
use crate::table::TableStore;
use crate::types::{empty_locations, empty_readings, NoiseSpec, Voxelisation};
use crate::validate::{validate_survey, SurveyView, ValidationReport};
use crate::world::WorldSpec;

#[derive(Debug, Clone, PartialEq)]
pub struct GravSpec {
    pub locations: DMatrix<f64>,
    pub voxelisation: Voxelisation,
    pub noise: NoiseSpec,
}

impl Default for GravSpec {
    fn default() -> Self {
        Self {
            locations: empty_locations(),
            voxelisation: Voxelisation::default(),
            noise: NoiseSpec::default(),
        }
    }
}

impl GravSpec {
    pub fn survey(&self) -> SurveyView<'_> {
        SurveyView {
            locations: &self.locations,
            voxelisation: &self.voxelisation,
            noise: &self.noise,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GravParams {
    pub return_sensor_data: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GravResults {
    pub likelihood: f64,
    pub readings: DVector<f64>,
}

impl Default for GravResults {
    fn default() -> Self {
        Self {
            likelihood: 0.0,
            readings: empty_readings(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GravParamsPrior;

#[derive(Debug, Clone, Copy, Default)]
pub struct Gravity;

impl SensorModel for Gravity {
    const KIND: SensorKind = SensorKind::Gravity;

    type Spec = GravSpec;
    type Params = GravParams;
    type Results = GravResults;
    type Prior = GravParamsPrior;

    fn declare_options(&self, schema: &mut ConfigSchema) -> Result<(), ConfigError> {
        declare_survey_options(schema, self.heading())
    }

    fn parse_spec(
        &self,
        config: &ConfigValues,
        enabled: &EnabledSensors,
        tables: &dyn TableStore,
    ) -> Result<GravSpec, ConfigError> {
        if !enabled.contains(Self::KIND) {
            debug!(sensor = self.heading(), "sensor disabled, using empty spec");
            return Ok(GravSpec::default());
        }
        let survey = parse_survey(config, self.heading(), tables)?;
        Ok(GravSpec {
            locations: survey.locations,
            voxelisation: survey.voxelisation,
            noise: survey.noise,
        })
    }

    fn parse_params(
        &self,
        _config: &ConfigValues,
        _enabled: &EnabledSensors,
    ) -> Result<GravParams, ConfigError> {
        Ok(GravParams::default())
    }

    fn parse_results(
        &self,
        config: &ConfigValues,
        enabled: &EnabledSensors,
        tables: &dyn TableStore,
    ) -> Result<GravResults, ConfigError> {
        if !enabled.contains(Self::KIND) {
            return Ok(GravResults::default());
        }
        Ok(GravResults {
            likelihood: 0.0,
            readings: parse_readings(config, self.heading(), tables)?,
        })
    }

    fn describe_spec(
        &self,
        prefix: &str,
        spec: &GravSpec,
        enabled: &EnabledSensors,
    ) -> EmitPlan {
        if !enabled.contains(Self::KIND) {
            return describe_disabled(self.heading());
        }
        describe_survey(prefix, self.heading(), spec.survey())
    }

    fn describe_params(&self, _prefix: &str, _params: &GravParams) -> EmitPlan {
        EmitPlan::new()
    }

    fn describe_results(
        &self,
        prefix: &str,
        results: &GravResults,
        enabled: &EnabledSensors,
    ) -> EmitPlan {
        if !enabled.contains(Self::KIND) {
            return EmitPlan::new();
        }
        describe_readings(prefix, self.heading(), &results.readings)
    }

    fn activated_properties(&self) -> BTreeSet<RockProperty> {
        BTreeSet::from([RockProperty::Density])
    }

    fn declare_prior(&self, _config: &ConfigValues, _enabled: &EnabledSensors) -> GravParamsPrior {
        GravParamsPrior
    }

    fn validate(
        &self,
        world: &WorldSpec,
        spec: &GravSpec,
        results: &GravResults,
    ) -> ValidationReport {
        let mut report = ValidationReport::new(Self::KIND);
        validate_survey(&mut report, world, spec.survey(), &results.readings);
        report
    }
}
