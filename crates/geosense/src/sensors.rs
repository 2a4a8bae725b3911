pub mod gravity;
pub mod magnetism;
pub mod survey;
pub mod thermal;

pub use gravity::{GravParams, GravParamsPrior, GravResults, GravSpec, Gravity};
pub use magnetism::{MagParams, MagParamsPrior, MagResults, MagSpec, Magnetism};
pub use thermal::{Thermal, ThermalParams, ThermalParamsPrior, ThermalResults, ThermalSpec};
