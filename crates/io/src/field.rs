//! Gridded field with time and coordinate metadata.

use chrono::NaiveDateTime;
use tcseed_bandpass::TimeGrid;

use crate::error::IoError;

// ---------------------------------------------------------------------------
// GridMetadata
// ---------------------------------------------------------------------------

/// Latitude and longitude axes of a regular grid.
///
/// Row `i` of any field on this grid sits at `lats[i]`, column `j` at
/// `lons[j]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMetadata {
    lats: Vec<f64>,
    lons: Vec<f64>,
}

impl GridMetadata {
    /// Creates grid metadata from 1-D coordinate axes.
    pub fn new(lats: Vec<f64>, lons: Vec<f64>) -> Self {
        Self { lats, lons }
    }

    /// Latitude of each row.
    pub fn lats(&self) -> &[f64] {
        &self.lats
    }

    /// Longitude of each column.
    pub fn lons(&self) -> &[f64] {
        &self.lons
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.lats.len()
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.lons.len()
    }

    /// Checks that a `(rows, cols)` field fits this grid.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::DimensionMismatch`] naming the first axis that
    /// disagrees.
    pub fn check_shape(&self, rows: usize, cols: usize) -> Result<(), IoError> {
        if rows != self.n_rows() {
            return Err(IoError::DimensionMismatch {
                name: "latitude".into(),
                expected: self.n_rows(),
                got: rows,
            });
        }
        if cols != self.n_cols() {
            return Err(IoError::DimensionMismatch {
                name: "longitude".into(),
                expected: self.n_cols(),
                got: cols,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// GriddedField
// ---------------------------------------------------------------------------

/// A single scalar variable on a `(time, lat, lon)` grid.
///
/// Construction validates that the time axis matches the data and is
/// strictly increasing, and that the coordinate axes match the spatial
/// shape.
#[derive(Debug, Clone)]
pub struct GriddedField {
    name: String,
    times: Vec<NaiveDateTime>,
    grid: GridMetadata,
    data: TimeGrid,
}

impl GriddedField {
    /// Creates a new `GriddedField` after validating its axes.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::DimensionMismatch`] if `times`, latitudes or
    /// longitudes disagree with the data shape, and [`IoError::InvalidTime`]
    /// if `times` is not strictly increasing.
    pub fn new(
        name: impl Into<String>,
        times: Vec<NaiveDateTime>,
        grid: GridMetadata,
        data: TimeGrid,
    ) -> Result<Self, IoError> {
        let (nt, ny, nx) = data.shape();
        if times.len() != nt {
            return Err(IoError::DimensionMismatch {
                name: "time".into(),
                expected: nt,
                got: times.len(),
            });
        }
        grid.check_shape(ny, nx)?;

        if let Some(pos) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(IoError::InvalidTime {
                reason: format!(
                    "time axis not strictly increasing at step {}: {} then {}",
                    pos + 1,
                    times[pos],
                    times[pos + 1]
                ),
            });
        }

        Ok(Self {
            name: name.into(),
            times,
            grid,
            data,
        })
    }

    /// Variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Timestamp of each time step.
    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    /// Coordinate axes.
    pub fn grid(&self) -> &GridMetadata {
        &self.grid
    }

    /// The `(time, lat, lon)` values.
    pub fn data(&self) -> &TimeGrid {
        &self.data
    }

    /// Number of time steps.
    pub fn n_times(&self) -> usize {
        self.times.len()
    }

    /// Splits the field into its parts.
    pub fn into_parts(self) -> (String, Vec<NaiveDateTime>, GridMetadata, TimeGrid) {
        (self.name, self.times, self.grid, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn hours(n: usize) -> Vec<NaiveDateTime> {
        let base = NaiveDate::from_ymd_opt(2016, 6, 7)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid date");
        (0..n)
            .map(|h| base + chrono::TimeDelta::hours(h as i64))
            .collect()
    }

    #[test]
    fn valid_field() {
        let grid = GridMetadata::new(vec![10.0, 0.0], vec![100.0, 101.0, 102.0]);
        let field = GriddedField::new("vo", hours(4), grid, TimeGrid::constant((4, 2, 3), 0.0))
            .expect("valid field");
        assert_eq!(field.name(), "vo");
        assert_eq!(field.n_times(), 4);
        assert_eq!(field.grid().n_rows(), 2);
        assert_eq!(field.grid().n_cols(), 3);
    }

    #[test]
    fn time_length_mismatch() {
        let grid = GridMetadata::new(vec![0.0], vec![0.0]);
        let err = GriddedField::new("vo", hours(3), grid, TimeGrid::constant((4, 1, 1), 0.0))
            .unwrap_err();
        assert!(matches!(
            err,
            IoError::DimensionMismatch { ref name, expected: 4, got: 3 } if name == "time"
        ));
    }

    #[test]
    fn coordinate_mismatch() {
        let grid = GridMetadata::new(vec![0.0, 1.0], vec![0.0]);
        let err = GriddedField::new("vo", hours(2), grid, TimeGrid::constant((2, 2, 2), 0.0))
            .unwrap_err();
        assert!(matches!(
            err,
            IoError::DimensionMismatch { ref name, expected: 1, got: 2 } if name == "longitude"
        ));
    }

    #[test]
    fn non_increasing_time_rejected() {
        let mut times = hours(3);
        times.swap(1, 2);
        let grid = GridMetadata::new(vec![0.0], vec![0.0]);
        let err =
            GriddedField::new("vo", times, grid, TimeGrid::constant((3, 1, 1), 0.0)).unwrap_err();
        assert!(matches!(err, IoError::InvalidTime { .. }));
    }
}
