//! Configuration surface: typed `<heading>.<name>` options read from and
//! written back to TOML.

mod emit;
mod schema;
mod values;

pub use emit::{EmitPlan, TableWrite};
pub use schema::{option_key, ConfigSchema, OptionKind, OptionSpec};
pub use values::{ConfigValues, OptionValue};
