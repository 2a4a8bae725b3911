//! Input checks shared by every location-based sensor.
//!
//! Every check runs regardless of earlier failures so a user sees all
//! problems at once. Each failure is logged and kept as a [`Diagnostic`].

use std::fmt;

use geosense_proto::SensorKind;
use nalgebra::{DMatrix, DVector};
use tracing::error;

use crate::types::{NoiseSpec, Voxelisation, LOCATION_COLUMNS};
use crate::world::WorldSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckId {
    NoLocations,
    LocationColumns,
    /// 1-based row of the offending location.
    LocationOutOfBounds { location: usize },
    Voxelisation,
    Noise,
    ReadingCount,
    BackgroundField,
    SurfaceTemperature,
    LowerBoundary,
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckId::NoLocations => f.write_str("no_locations"),
            CheckId::LocationColumns => f.write_str("location_columns"),
            CheckId::LocationOutOfBounds { location } => {
                write!(f, "location_out_of_bounds[{location}]")
            }
            CheckId::Voxelisation => f.write_str("voxelisation"),
            CheckId::Noise => f.write_str("noise"),
            CheckId::ReadingCount => f.write_str("reading_count"),
            CheckId::BackgroundField => f.write_str("background_field"),
            CheckId::SurfaceTemperature => f.write_str("surface_temperature"),
            CheckId::LowerBoundary => f.write_str("lower_boundary"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub check: CheckId,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub sensor: SensorKind,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn new(sensor: SensorKind) -> Self {
        Self {
            sensor,
            diagnostics: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn fail(&mut self, check: CheckId, message: String) {
        error!(sensor = %self.sensor, check = %check, "input: {message}");
        self.diagnostics.push(Diagnostic { check, message });
    }

    /// Records a failure when `passed` is false and returns `passed`.
    pub fn check(
        &mut self,
        passed: bool,
        check: CheckId,
        message: impl FnOnce() -> String,
    ) -> bool {
        if !passed {
            self.fail(check, message());
        }
        passed
    }

    pub fn failed_checks(&self) -> Vec<CheckId> {
        self.diagnostics.iter().map(|diagnostic| diagnostic.check).collect()
    }

    pub fn has_failed(&self, check: CheckId) -> bool {
        self.diagnostics.iter().any(|diagnostic| diagnostic.check == check)
    }
}

/// Reports for every validated sensor; passes only if all of them pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationSummary {
    pub reports: Vec<ValidationReport>,
}

impl ValidationSummary {
    pub fn push(&mut self, report: ValidationReport) {
        self.reports.push(report);
    }

    pub fn is_valid(&self) -> bool {
        self.reports.iter().all(ValidationReport::is_valid)
    }

    pub fn report(&self, sensor: SensorKind) -> Option<&ValidationReport> {
        self.reports.iter().find(|report| report.sensor == sensor)
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = (SensorKind, &Diagnostic)> {
        self.reports.iter().flat_map(|report| {
            report
                .diagnostics
                .iter()
                .map(move |diagnostic| (report.sensor, diagnostic))
        })
    }
}

/// Borrowed view of the fields every located sensor spec carries.
#[derive(Debug, Clone, Copy)]
pub struct SurveyView<'a> {
    pub locations: &'a DMatrix<f64>,
    pub voxelisation: &'a Voxelisation,
    pub noise: &'a NoiseSpec,
}

pub fn validate_survey(
    report: &mut ValidationReport,
    world: &WorldSpec,
    survey: SurveyView<'_>,
    readings: &DVector<f64>,
) {
    let heading = report.sensor.heading();
    let locations = survey.locations;

    report.check(locations.nrows() > 0, CheckId::NoLocations, || {
        format!("no {heading} locations specified. Disable the sensor if it is not used.")
    });
    report.check(locations.ncols() == LOCATION_COLUMNS, CheckId::LocationColumns, || {
        format!(
            "locations in {heading} must have three columns (x, y, z), found {}",
            locations.ncols()
        )
    });
    if locations.ncols() >= 2 {
        for (row, location) in locations.row_iter().enumerate() {
            report.check(
                world.contains_xy(location[0], location[1]),
                CheckId::LocationOutOfBounds { location: row + 1 },
                || format!("{heading} location {} is out of world bounds", row + 1),
            );
        }
    }

    let voxelisation = survey.voxelisation;
    report.check(
        voxelisation.resolution().iter().all(|resolution| *resolution > 0),
        CheckId::Voxelisation,
        || {
            format!(
                "{heading} voxelisation (x, y, z) must be greater than 0, found ({}, {}, {})",
                voxelisation.x_resolution, voxelisation.y_resolution, voxelisation.z_resolution
            )
        },
    );

    let noise = survey.noise;
    report.check(
        noise.inverse_gamma_alpha > 0.0 && noise.inverse_gamma_beta > 0.0,
        CheckId::Noise,
        || {
            format!(
                "{heading} noise parameters must be greater than 0, found alpha={} beta={}",
                noise.inverse_gamma_alpha, noise.inverse_gamma_beta
            )
        },
    );

    report.check(readings.len() == locations.nrows(), CheckId::ReadingCount, || {
        format!(
            "different number of readings for {heading} results ({}) to locations specified ({}). \
             Remove or add more locations.",
            readings.len(),
            locations.nrows()
        )
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::locations_from_rows;

    fn world() -> WorldSpec {
        WorldSpec::new((0.0, 100.0), (0.0, 100.0), (-50.0, 0.0))
    }

    fn run(
        locations: &DMatrix<f64>,
        voxelisation: Voxelisation,
        noise: NoiseSpec,
        readings: usize,
    ) -> ValidationReport {
        let mut report = ValidationReport::new(SensorKind::Gravity);
        validate_survey(
            &mut report,
            &world(),
            SurveyView {
                locations,
                voxelisation: &voxelisation,
                noise: &noise,
            },
            &DVector::zeros(readings),
        );
        report
    }

    #[test]
    fn valid_survey_has_no_diagnostics() {
        let locations = locations_from_rows(&[[10.0, 10.0, 0.0], [90.0, 90.0, 500.0]]);
        let report = run(
            &locations,
            Voxelisation::new([10, 10, 10], 0),
            NoiseSpec::new(1.0, 1.0),
            2,
        );
        assert!(report.is_valid(), "{report:?}");
    }

    #[test]
    fn every_failing_check_is_reported() {
        let locations = DMatrix::zeros(0, 2);
        let report = run(
            &locations,
            Voxelisation::new([0, 10, 10], 0),
            NoiseSpec::new(1.0, -1.0),
            4,
        );
        assert_eq!(
            report.failed_checks(),
            vec![
                CheckId::NoLocations,
                CheckId::LocationColumns,
                CheckId::Voxelisation,
                CheckId::Noise,
                CheckId::ReadingCount,
            ]
        );
    }

    #[test]
    fn beta_is_checked_as_well_as_alpha() {
        let locations = locations_from_rows(&[[1.0, 1.0, 1.0]]);
        let report = run(
            &locations,
            Voxelisation::new([1, 1, 1], 0),
            NoiseSpec::new(1.0, 0.0),
            1,
        );
        assert_eq!(report.failed_checks(), vec![CheckId::Noise]);
    }

    #[test]
    fn nan_noise_fails() {
        let locations = locations_from_rows(&[[1.0, 1.0, 1.0]]);
        let report = run(
            &locations,
            Voxelisation::new([1, 1, 1], 0),
            NoiseSpec::new(f64::NAN, 1.0),
            1,
        );
        assert!(report.has_failed(CheckId::Noise));
    }

    #[test]
    fn each_out_of_bounds_location_is_itemised() {
        let locations =
            locations_from_rows(&[[-1.0, 10.0, 0.0], [10.0, 10.0, 0.0], [10.0, 101.0, 0.0]]);
        let report = run(
            &locations,
            Voxelisation::new([1, 1, 1], 0),
            NoiseSpec::new(1.0, 1.0),
            3,
        );
        assert_eq!(
            report.failed_checks(),
            vec![
                CheckId::LocationOutOfBounds { location: 1 },
                CheckId::LocationOutOfBounds { location: 3 },
            ]
        );
        assert_eq!(
            report.diagnostics[1].message,
            "gravity location 3 is out of world bounds"
        );
    }

    #[test]
    fn summary_aggregates_reports() {
        let mut summary = ValidationSummary::default();
        summary.push(ValidationReport::new(SensorKind::Gravity));
        let mut failing = ValidationReport::new(SensorKind::Thermal);
        failing.fail(CheckId::SurfaceTemperature, "bad".to_string());
        summary.push(failing);

        assert!(!summary.is_valid());
        assert_eq!(summary.diagnostics().count(), 1);
        assert!(summary
            .report(SensorKind::Gravity)
            .is_some_and(ValidationReport::is_valid));
    }
}
