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

pub const OPTION_SURFACE_TEMPERATURE: &str = "surfaceTemperature";
pub const OPTION_LOWER_BOUNDARY: &str = "lowerBoundary";
pub const OPTION_LOWER_BOUNDARY_IS_HEAT_FLOW: &str = "lowerBoundaryIsHeatFlow";

#[derive(Debug, Clone, PartialEq)]
pub struct ThermalSpec {
    pub locations: DMatrix<f64>,
    pub voxelisation: Voxelisation,
    pub noise: NoiseSpec,
    pub surface_temperature: f64,
    /// Temperature at the base of the model, or the basal heat flow when
    /// `lower_boundary_is_heat_flow` is set.
    pub lower_boundary: f64,
    pub lower_boundary_is_heat_flow: bool,
}

impl Default for ThermalSpec {
    fn default() -> Self {
        Self {
            locations: empty_locations(),
            voxelisation: Voxelisation::default(),
            noise: NoiseSpec::default(),
            surface_temperature: 0.0,
            lower_boundary: 0.0,
            lower_boundary_is_heat_flow: false,
        }
    }
}

impl ThermalSpec {
    pub fn survey(&self) -> SurveyView<'_> {
        SurveyView {
            locations: &self.locations,
            voxelisation: &self.voxelisation,
            noise: &self.noise,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThermalParams {
    pub return_sensor_data: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThermalResults {
    pub likelihood: f64,
    pub readings: DVector<f64>,
}

impl Default for ThermalResults {
    fn default() -> Self {
        Self {
            likelihood: 0.0,
            readings: empty_readings(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThermalParamsPrior;

#[derive(Debug, Clone, Copy, Default)]
pub struct Thermal;

impl SensorModel for Thermal {
    const KIND: SensorKind = SensorKind::Thermal;

    type Spec = ThermalSpec;
    type Params = ThermalParams;
    type Results = ThermalResults;
    type Prior = ThermalParamsPrior;

    fn declare_options(&self, schema: &mut ConfigSchema) -> Result<(), ConfigError> {
        let heading = self.heading();
        declare_survey_options(schema, heading)?;
        schema.declare(
            heading,
            OPTION_SURFACE_TEMPERATURE,
            OptionKind::Real,
            "temperature at the surface",
        )?;
        schema.declare(
            heading,
            OPTION_LOWER_BOUNDARY,
            OptionKind::Real,
            "temperature or heat flow at the lower boundary",
        )?;
        schema.declare(
            heading,
            OPTION_LOWER_BOUNDARY_IS_HEAT_FLOW,
            OptionKind::Bool,
            "interpret the lower boundary as heat flow instead of temperature",
        )
    }

    fn parse_spec(
        &self,
        config: &ConfigValues,
        enabled: &EnabledSensors,
        tables: &dyn TableStore,
    ) -> Result<ThermalSpec, ConfigError> {
        if !enabled.contains(Self::KIND) {
            debug!(sensor = self.heading(), "sensor disabled, using empty spec");
            return Ok(ThermalSpec::default());
        }
        let key = |name: &str| option_key(self.heading(), name);
        let surface_temperature = config.require_real(&key(OPTION_SURFACE_TEMPERATURE))?;
        let lower_boundary = config.require_real(&key(OPTION_LOWER_BOUNDARY))?;
        let lower_boundary_is_heat_flow =
            config.require_bool(&key(OPTION_LOWER_BOUNDARY_IS_HEAT_FLOW))?;
        let survey = parse_survey(config, self.heading(), tables)?;
        Ok(ThermalSpec {
            locations: survey.locations,
            voxelisation: survey.voxelisation,
            noise: survey.noise,
            surface_temperature,
            lower_boundary,
            lower_boundary_is_heat_flow,
        })
    }

    fn parse_params(
        &self,
        _config: &ConfigValues,
        _enabled: &EnabledSensors,
    ) -> Result<ThermalParams, ConfigError> {
        Ok(ThermalParams::default())
    }

    fn parse_results(
        &self,
        config: &ConfigValues,
        enabled: &EnabledSensors,
        tables: &dyn TableStore,
    ) -> Result<ThermalResults, ConfigError> {
        if !enabled.contains(Self::KIND) {
            return Ok(ThermalResults::default());
        }
        Ok(ThermalResults {
            likelihood: 0.0,
            readings: parse_readings(config, self.heading(), tables)?,
        })
    }

    fn describe_spec(
        &self,
        prefix: &str,
        spec: &ThermalSpec,
        enabled: &EnabledSensors,
    ) -> EmitPlan {
        if !enabled.contains(Self::KIND) {
            return describe_disabled(self.heading());
        }
        let heading = self.heading();
        describe_survey(prefix, heading, spec.survey())
            .option(
                heading,
                OPTION_SURFACE_TEMPERATURE,
                OptionValue::Real(spec.surface_temperature),
            )
            .option(
                heading,
                OPTION_LOWER_BOUNDARY,
                OptionValue::Real(spec.lower_boundary),
            )
            .option(
                heading,
                OPTION_LOWER_BOUNDARY_IS_HEAT_FLOW,
                OptionValue::Bool(spec.lower_boundary_is_heat_flow),
            )
    }

    fn describe_params(&self, _prefix: &str, _params: &ThermalParams) -> EmitPlan {
        EmitPlan::new()
    }

    fn describe_results(
        &self,
        prefix: &str,
        results: &ThermalResults,
        enabled: &EnabledSensors,
    ) -> EmitPlan {
        if !enabled.contains(Self::KIND) {
            return EmitPlan::new();
        }
        describe_readings(prefix, self.heading(), &results.readings)
    }

    fn activated_properties(&self) -> BTreeSet<RockProperty> {
        BTreeSet::from([
            RockProperty::ThermalConductivity,
            RockProperty::ThermalProductivity,
        ])
    }

    fn declare_prior(
        &self,
        _config: &ConfigValues,
        _enabled: &EnabledSensors,
    ) -> ThermalParamsPrior {
        ThermalParamsPrior
    }

    fn validate(
        &self,
        world: &WorldSpec,
        spec: &ThermalSpec,
        results: &ThermalResults,
    ) -> ValidationReport {
        let mut report = ValidationReport::new(Self::KIND);
        validate_survey(&mut report, world, spec.survey(), &results.readings);
        report.check(
            spec.surface_temperature.is_finite(),
            CheckId::SurfaceTemperature,
            || {
                format!(
                    "thermal surface temperature must be finite, found {}",
                    spec.surface_temperature
                )
            },
        );
        let boundary_ok = if spec.lower_boundary_is_heat_flow {
            spec.lower_boundary.is_finite() && spec.lower_boundary >= 0.0
        } else {
            spec.lower_boundary.is_finite()
        };
        report.check(boundary_ok, CheckId::LowerBoundary, || {
            if spec.lower_boundary_is_heat_flow {
                format!(
                    "thermal lower boundary heat flow must be finite and non-negative, found {}",
                    spec.lower_boundary
                )
            } else {
                format!(
                    "thermal lower boundary temperature must be finite, found {}",
                    spec.lower_boundary
                )
            }
        });
        report
    }
}
