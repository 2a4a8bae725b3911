pub mod config;
pub mod error;
pub mod pipeline;
pub mod property;
pub mod registry;
pub mod sensor;
pub mod sensors;
pub mod serial;
pub mod table;
pub mod types;
pub mod validate;
pub mod world;

pub use config::{option_key, ConfigSchema, ConfigValues, EmitPlan, OptionKind, OptionValue};
pub use error::{ConfigError, SensorError};
pub use pipeline::{SensorInput, SensorInputs};
pub use property::{PropertyMask, RockProperty};
pub use registry::{builtin_contracts, builtin_schema, SensorRegistry};
pub use sensor::{
    EnabledSensors, ModelContract, SensorContract, SensorModel, SensorParams, SensorPrior,
    SensorResults, SensorSpec, SensorVariant,
};
pub use sensors::{
    GravParams, GravParamsPrior, GravResults, GravSpec, Gravity, MagParams, MagParamsPrior,
    MagResults, MagSpec, Magnetism, Thermal, ThermalParams, ThermalParamsPrior, ThermalResults,
    ThermalSpec,
};
pub use serial::{serialise, unserialise, WireMessage};
pub use table::{CsvTableStore, MemoryTableStore, TableStore};
pub use types::{NoiseSpec, Voxelisation, LOCATION_COLUMNS};
pub use validate::{CheckId, Diagnostic, ValidationReport, ValidationSummary};
pub use world::WorldSpec;

pub use geosense_proto::{MessageKind, SensorKind, WireError};
