use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

pub const LOCATION_COLUMNS: usize = 3;

/// Forward-model grid resolution plus the supersampling exponent used for
/// sub-cell integration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voxelisation {
    pub x_resolution: u32,
    pub y_resolution: u32,
    pub z_resolution: u32,
    pub supersample: u32,
}

impl Voxelisation {
    pub fn new(resolution: [u32; 3], supersample: u32) -> Self {
        Self {
            x_resolution: resolution[0],
            y_resolution: resolution[1],
            z_resolution: resolution[2],
            supersample,
        }
    }

    pub fn resolution(&self) -> [u32; 3] {
        [self.x_resolution, self.y_resolution, self.z_resolution]
    }
}

/// Inverse-gamma prior on the noise variance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NoiseSpec {
    pub inverse_gamma_alpha: f64,
    pub inverse_gamma_beta: f64,
}

impl NoiseSpec {
    pub fn new(inverse_gamma_alpha: f64, inverse_gamma_beta: f64) -> Self {
        Self {
            inverse_gamma_alpha,
            inverse_gamma_beta,
        }
    }
}

pub fn empty_locations() -> DMatrix<f64> {
    DMatrix::zeros(0, LOCATION_COLUMNS)
}

pub fn empty_readings() -> DVector<f64> {
    DVector::zeros(0)
}

/// Builds a location matrix from `[x, y, z]` rows.
pub fn locations_from_rows(rows: &[[f64; 3]]) -> DMatrix<f64> {
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    DMatrix::from_row_slice(rows.len(), LOCATION_COLUMNS, &flat)
}
