//! Options and parsing shared by every location-based sensor.

use nalgebra::DVector;
use tracing::debug;

use crate::config::{option_key, ConfigSchema, ConfigValues, EmitPlan, OptionKind, OptionValue};
use crate::error::ConfigError;
use crate::sensor::OPTION_ENABLED;
use crate::table::TableStore;
use crate::types::{NoiseSpec, Voxelisation, LOCATION_COLUMNS};
use crate::validate::SurveyView;

pub const OPTION_SENSOR_LOCATIONS: &str = "sensorLocations";
pub const OPTION_SENSOR_READINGS: &str = "sensorReadings";
pub const OPTION_GRID_RESOLUTION: &str = "gridResolution";
pub const OPTION_NOISE_ALPHA: &str = "noiseAlpha";
pub const OPTION_NOISE_BETA: &str = "noiseBeta";
pub const OPTION_SUPERSAMPLE: &str = "supersample";

pub const LOCATIONS_FILE_NAME: &str = "sensorLocations.csv";
pub const READINGS_FILE_NAME: &str = "sensorReadings.csv";

pub fn declare_survey_options(schema: &mut ConfigSchema, heading: &str) -> Result<(), ConfigError> {
    schema.declare(heading, OPTION_ENABLED, OptionKind::Bool, "enable sensor")?;
    schema.declare(heading, OPTION_SENSOR_LOCATIONS, OptionKind::Path, "sensor locations")?;
    schema.declare(heading, OPTION_SENSOR_READINGS, OptionKind::Path, "sensor readings")?;
    schema.declare(
        heading,
        OPTION_GRID_RESOLUTION,
        OptionKind::UIntVec3,
        "grid points per cube side",
    )?;
    schema.declare(heading, OPTION_NOISE_ALPHA, OptionKind::Real, "noise NIG alpha variable")?;
    schema.declare(heading, OPTION_NOISE_BETA, OptionKind::Real, "noise NIG beta variable")?;
    schema.declare(heading, OPTION_SUPERSAMPLE, OptionKind::UInt, "supersampling exponent")
}

#[derive(Debug, Clone, PartialEq)]
pub struct Survey {
    pub locations: nalgebra::DMatrix<f64>,
    pub voxelisation: Voxelisation,
    pub noise: NoiseSpec,
}

/// Scalar options are read before the location table so a missing option
/// is reported without touching the filesystem.
pub fn parse_survey(
    config: &ConfigValues,
    heading: &str,
    tables: &dyn TableStore,
) -> Result<Survey, ConfigError> {
    let key = |name: &str| option_key(heading, name);

    let resolution = config.require_uint_vec3(&key(OPTION_GRID_RESOLUTION))?;
    let supersample = config.require_uint(&key(OPTION_SUPERSAMPLE))?;
    let noise = NoiseSpec::new(
        config.require_real(&key(OPTION_NOISE_ALPHA))?,
        config.require_real(&key(OPTION_NOISE_BETA))?,
    );
    let locations_path = config.require_path(&key(OPTION_SENSOR_LOCATIONS))?;
    let locations = tables.read_matrix(locations_path, LOCATION_COLUMNS)?;
    debug!(
        sensor = heading,
        path = locations_path,
        locations = locations.nrows(),
        "parsed survey"
    );

    Ok(Survey {
        locations,
        voxelisation: Voxelisation::new(resolution, supersample),
        noise,
    })
}

pub fn describe_survey(prefix: &str, heading: &str, survey: SurveyView<'_>) -> EmitPlan {
    let locations_path = format!("{prefix}{LOCATIONS_FILE_NAME}");
    EmitPlan::new()
        .option(heading, OPTION_ENABLED, OptionValue::Bool(true))
        .option(
            heading,
            OPTION_SENSOR_LOCATIONS,
            OptionValue::Path(locations_path.clone()),
        )
        .option(
            heading,
            OPTION_GRID_RESOLUTION,
            OptionValue::UIntVec3(survey.voxelisation.resolution()),
        )
        .option(
            heading,
            OPTION_SUPERSAMPLE,
            OptionValue::UInt(survey.voxelisation.supersample),
        )
        .option(
            heading,
            OPTION_NOISE_ALPHA,
            OptionValue::Real(survey.noise.inverse_gamma_alpha),
        )
        .option(
            heading,
            OPTION_NOISE_BETA,
            OptionValue::Real(survey.noise.inverse_gamma_beta),
        )
        .table(locations_path, survey.locations.clone())
}

/// A disabled sensor re-emits only its flag, so the rendered config keeps
/// it disabled.
pub fn describe_disabled(heading: &str) -> EmitPlan {
    EmitPlan::new().option(heading, OPTION_ENABLED, OptionValue::Bool(false))
}

pub fn parse_readings(
    config: &ConfigValues,
    heading: &str,
    tables: &dyn TableStore,
) -> Result<DVector<f64>, ConfigError> {
    let path = config.require_path(&option_key(heading, OPTION_SENSOR_READINGS))?;
    let readings = tables.read_vector(path)?;
    debug!(sensor = heading, path, readings = readings.len(), "parsed readings");
    Ok(readings)
}

pub fn describe_readings(prefix: &str, heading: &str, readings: &DVector<f64>) -> EmitPlan {
    let readings_path = format!("{prefix}{READINGS_FILE_NAME}");
    EmitPlan::new()
        .option(
            heading,
            OPTION_SENSOR_READINGS,
            OptionValue::Path(readings_path.clone()),
        )
        .column(readings_path, readings)
}
