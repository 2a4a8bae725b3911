#![allow(dead_code)]

use std::path::Path;

use geosense::{ConfigError, TableStore, WorldSpec};
use nalgebra::DMatrix;

pub const GRAVITY_SECTION: &str = r#"
[world]
xBounds = [0.0, 100.0]
yBounds = [0.0, 100.0]
zBounds = [-50.0, 0.0]

[gravity]
enabled = true
sensorLocations = "grav_locations.csv"
sensorReadings = "grav_readings.csv"
gridResolution = [10, 10, 10]
supersample = 1
noiseAlpha = 1.0
noiseBeta = 1.0
"#;

pub const MAGNETISM_SECTION: &str = r#"
[magnetism]
enabled = true
sensorLocations = "mag_locations.csv"
sensorReadings = "mag_readings.csv"
gridResolution = "8 8 4"
supersample = 0
noiseAlpha = 2.0
noiseBeta = 0.5
magneticField = [0.0, 21000.0, -43000.0]
"#;

pub const THERMAL_SECTION: &str = r#"
[thermal]
enabled = true
sensorLocations = "thermal_locations.csv"
sensorReadings = "thermal_readings.csv"
gridResolution = [6, 6, 12]
supersample = 2
noiseAlpha = 3.0
noiseBeta = 1.5
surfaceTemperature = 288.15
lowerBoundary = 0.065
lowerBoundaryIsHeatFlow = true
"#;

pub const THERMAL_DISABLED_SECTION: &str = r#"
[thermal]
enabled = false
sensorLocations = "missing/thermal_locations.csv"
"#;

pub fn world() -> WorldSpec {
    WorldSpec::new((0.0, 100.0), (0.0, 100.0), (-50.0, 0.0))
}

pub fn write_file(root: &Path, name: &str, content: &str) {
    std::fs::write(root.join(name), content).expect("write fixture");
}

pub fn write_gravity_tables(root: &Path) {
    write_file(root, "grav_locations.csv", "# x,y,z\n10,10,0\n20.5,30,-1.25\n");
    write_file(root, "grav_readings.csv", "0.125\n-3.5e-4\n");
}

pub fn write_magnetism_tables(root: &Path) {
    write_file(root, "mag_locations.csv", "50,50,2\n");
    write_file(root, "mag_readings.csv", "48000.5\n");
}

pub fn write_thermal_tables(root: &Path) {
    write_file(root, "thermal_locations.csv", "5,95,-300\n60,40,-1200.5\n");
    write_file(root, "thermal_readings.csv", "301.25\n315.0\n");
}

/// Fails the test if any table is touched.
pub struct PanickingTableStore;

impl TableStore for PanickingTableStore {
    fn read_matrix(&self, path: &str, _cols: usize) -> Result<DMatrix<f64>, ConfigError> {
        panic!("unexpected table read: {path}");
    }

    fn write_matrix(&self, path: &str, _matrix: &DMatrix<f64>) -> Result<(), ConfigError> {
        panic!("unexpected table write: {path}");
    }
}
