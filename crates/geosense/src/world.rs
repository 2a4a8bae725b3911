use serde::{Deserialize, Serialize};

use crate::config::{option_key, ConfigSchema, ConfigValues, OptionKind};
use crate::error::ConfigError;

pub const WORLD_HEADING: &str = "world";
pub const OPTION_X_BOUNDS: &str = "xBounds";
pub const OPTION_Y_BOUNDS: &str = "yBounds";
pub const OPTION_Z_BOUNDS: &str = "zBounds";

/// Axis-aligned bounding box of the modelled region, `(min, max)` per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldSpec {
    pub x_bounds: (f64, f64),
    pub y_bounds: (f64, f64),
    pub z_bounds: (f64, f64),
}

impl WorldSpec {
    pub fn new(x_bounds: (f64, f64), y_bounds: (f64, f64), z_bounds: (f64, f64)) -> Self {
        Self {
            x_bounds,
            y_bounds,
            z_bounds,
        }
    }

    /// Horizontal containment only. Survey heights are left
    /// unconstrained. NaN coordinates are never contained.
    pub fn contains_xy(&self, x: f64, y: f64) -> bool {
        (self.x_bounds.0..=self.x_bounds.1).contains(&x)
            && (self.y_bounds.0..=self.y_bounds.1).contains(&y)
    }

    pub fn declare_options(schema: &mut ConfigSchema) -> Result<(), ConfigError> {
        for (name, description) in [
            (OPTION_X_BOUNDS, "world x extent (min, max)"),
            (OPTION_Y_BOUNDS, "world y extent (min, max)"),
            (OPTION_Z_BOUNDS, "world z extent (min, max)"),
        ] {
            schema.declare(WORLD_HEADING, name, OptionKind::RealPair, description)?;
        }
        Ok(())
    }

    pub fn from_config(values: &ConfigValues) -> Result<Self, ConfigError> {
        let bounds = |name: &str| -> Result<(f64, f64), ConfigError> {
            let key = option_key(WORLD_HEADING, name);
            let [min, max] = values.require_real_pair(&key)?;
            if !(min < max) {
                return Err(ConfigError::invalid(
                    key,
                    format!("min must be below max, found ({min}, {max})"),
                ));
            }
            Ok((min, max))
        };
        Ok(Self {
            x_bounds: bounds(OPTION_X_BOUNDS)?,
            y_bounds: bounds(OPTION_Y_BOUNDS)?,
            z_bounds: bounds(OPTION_Z_BOUNDS)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive_and_ignore_height() {
        let world = WorldSpec::new((0.0, 100.0), (0.0, 100.0), (0.0, 10.0));
        assert!(world.contains_xy(0.0, 100.0));
        assert!(world.contains_xy(50.0, 50.0));
        assert!(!world.contains_xy(200.0, 10.0));
        assert!(!world.contains_xy(10.0, -0.5));
        assert!(!world.contains_xy(f64::NAN, 10.0));
    }

    #[test]
    fn world_parses_from_config_section() {
        let mut schema = ConfigSchema::new();
        WorldSpec::declare_options(&mut schema).expect("declare");
        let values = ConfigValues::from_toml_str(
            &schema,
            "[world]\nxBounds = [0.0, 100.0]\nyBounds = \"-5 5\"\nzBounds = [-20, 0]\n",
        )
        .expect("parse");

        let world = WorldSpec::from_config(&values).expect("world");
        assert_eq!(world.x_bounds, (0.0, 100.0));
        assert_eq!(world.y_bounds, (-5.0, 5.0));
        assert_eq!(world.z_bounds, (-20.0, 0.0));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let mut schema = ConfigSchema::new();
        WorldSpec::declare_options(&mut schema).expect("declare");
        let values = ConfigValues::from_toml_str(
            &schema,
            "[world]\nxBounds = [10, 0]\nyBounds = [0, 1]\nzBounds = [0, 1]\n",
        )
        .expect("parse");
        let err = WorldSpec::from_config(&values).expect_err("inverted");
        assert!(err.to_string().contains("world.xBounds"));
    }
}
