use std::collections::BTreeSet;

use geosense_proto::SensorKind;
use nalgebra::{DMatrix, DVector};
use tracing::debug;

use super::survey::{
    declare_survey_options, describe_disabled, describe_readings, describe_survey,
    parse_readings, parse_survey,
};
use crate::config::{option_key, ConfigSchema, ConfigValues, EmitPlan, OptionKind, OptionValue};
use crate::error::ConfigError;
use crate::property::RockProperty;
use crate::sensor::{EnabledSensors, SensorModel};
use crate::table::TableStore;
use crate::types::{empty_locations, empty_readings, NoiseSpec, Voxelisation};
use crate::validate::{validate_survey, CheckId, SurveyView, ValidationReport};
use crate::world::WorldSpec;

pub const OPTION_MAGNETIC_FIELD: &str = "magneticField";

#[derive(Debug, Clone, PartialEq)]
pub struct MagSpec {
    pub locations: DMatrix<f64>,
    pub voxelisation: Voxelisation,
    pub noise: NoiseSpec,
    /// Constant ambient field the induced anomaly is computed against.
    pub background_field: [f64; 3],
}

impl Default for MagSpec {
    fn default() -> Self {
        Self {
            locations: empty_locations(),
            voxelisation: Voxelisation::default(),
            noise: NoiseSpec::default(),
            background_field: [0.0; 3],
        }
    }
}

impl MagSpec {
    pub fn survey(&self) -> SurveyView<'_> {
        SurveyView {
            locations: &self.locations,
            voxelisation: &self.voxelisation,
            noise: &self.noise,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MagParams {
    pub return_sensor_data: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MagResults {
    pub likelihood: f64,
    pub readings: DVector<f64>,
}

impl Default for MagResults {
    fn default() -> Self {
        Self {
            likelihood: 0.0,
            readings: empty_readings(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MagParamsPrior;

#[derive(Debug, Clone, Copy, Default)]
pub struct Magnetism;

impl SensorModel for Magnetism {
    const KIND: SensorKind = SensorKind::Magnetism;

    type Spec = MagSpec;
    type Params = MagParams;
    type Results = MagResults;
    type Prior = MagParamsPrior;

    fn declare_options(&self, schema: &mut ConfigSchema) -> Result<(), ConfigError> {
        declare_survey_options(schema, self.heading())?;
        schema.declare(
            self.heading(),
            OPTION_MAGNETIC_FIELD,
            OptionKind::RealVec3,
            "magnetic field of location",
        )
    }

    fn parse_spec(
        &self,
        config: &ConfigValues,
        enabled: &EnabledSensors,
        tables: &dyn TableStore,
    ) -> Result<MagSpec, ConfigError> {
        if !enabled.contains(Self::KIND) {
            debug!(sensor = self.heading(), "sensor disabled, using empty spec");
            return Ok(MagSpec::default());
        }
        let background_field =
            config.require_real_vec3(&option_key(self.heading(), OPTION_MAGNETIC_FIELD))?;
        let survey = parse_survey(config, self.heading(), tables)?;
        Ok(MagSpec {
            locations: survey.locations,
            voxelisation: survey.voxelisation,
            noise: survey.noise,
            background_field,
        })
    }

    // Magnetism has no runtime parameters yet.
    fn parse_params(
        &self,
        _config: &ConfigValues,
        _enabled: &EnabledSensors,
    ) -> Result<MagParams, ConfigError> {
        Ok(MagParams::default())
    }

    fn parse_results(
        &self,
        config: &ConfigValues,
        enabled: &EnabledSensors,
        tables: &dyn TableStore,
    ) -> Result<MagResults, ConfigError> {
        if !enabled.contains(Self::KIND) {
            return Ok(MagResults::default());
        }
        Ok(MagResults {
            likelihood: 0.0,
            readings: parse_readings(config, self.heading(), tables)?,
        })
    }

    fn describe_spec(
        &self,
        prefix: &str,
        spec: &MagSpec,
        enabled: &EnabledSensors,
    ) -> EmitPlan {
        if !enabled.contains(Self::KIND) {
            return describe_disabled(self.heading());
        }
        describe_survey(prefix, self.heading(), spec.survey()).option(
            self.heading(),
            OPTION_MAGNETIC_FIELD,
            OptionValue::RealVec3(spec.background_field),
        )
    }

    fn describe_params(&self, _prefix: &str, _params: &MagParams) -> EmitPlan {
        EmitPlan::new()
    }

    fn describe_results(
        &self,
        prefix: &str,
        results: &MagResults,
        enabled: &EnabledSensors,
    ) -> EmitPlan {
        if !enabled.contains(Self::KIND) {
            return EmitPlan::new();
        }
        describe_readings(prefix, self.heading(), &results.readings)
    }

    fn activated_properties(&self) -> BTreeSet<RockProperty> {
        BTreeSet::from([RockProperty::LogSusceptibility])
    }

    fn declare_prior(&self, _config: &ConfigValues, _enabled: &EnabledSensors) -> MagParamsPrior {
        MagParamsPrior
    }

    fn validate(
        &self,
        world: &WorldSpec,
        spec: &MagSpec,
        results: &MagResults,
    ) -> ValidationReport {
        let mut report = ValidationReport::new(Self::KIND);
        validate_survey(&mut report, world, spec.survey(), &results.readings);
        let field = spec.background_field;
        report.check(
            field.iter().all(|component| component.is_finite()),
            CheckId::BackgroundField,
            || {
                format!(
                    "magnetism background field must be finite, found ({}, {}, {})",
                    field[0], field[1], field[2]
                )
            },
        );
        report
    }
}
