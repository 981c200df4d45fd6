//! Low-level Parquet column building.

use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, RecordBatch, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use tcseed_bandpass::VarianceMap;

use crate::error::IoError;
use crate::field::GridMetadata;

/// Builds the Arrow schema for variance output.
///
/// The `row`, `col`, `lat` and `lon` columns are always present. The value
/// column is named `value_name` and is nullable; missing cells are null.
pub(crate) fn build_schema(value_name: &str) -> Schema {
    Schema::new(vec![
        Field::new("row", DataType::UInt32, false),
        Field::new("col", DataType::UInt32, false),
        Field::new("lat", DataType::Float64, false),
        Field::new("lon", DataType::Float64, false),
        Field::new(value_name, DataType::Float64, true),
    ])
}

/// Converts a [`VarianceMap`] into one long-format Arrow [`RecordBatch`],
/// one row per cell in row-major order.
pub(crate) fn variance_to_record_batch(
    map: &VarianceMap,
    grid: &GridMetadata,
    schema: &Schema,
) -> Result<RecordBatch, IoError> {
    let (ny, nx) = map.shape();
    let n = ny * nx;

    let mut rows = Vec::with_capacity(n);
    let mut cols = Vec::with_capacity(n);
    let mut lats = Vec::with_capacity(n);
    let mut lons = Vec::with_capacity(n);
    let mut values = Vec::with_capacity(n);
    for i in 0..ny {
        for j in 0..nx {
            rows.push(i as u32);
            cols.push(j as u32);
            lats.push(grid.lats()[i]);
            lons.push(grid.lons()[j]);
            values.push(map.get(i, j));
        }
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(UInt32Array::from(rows)),
        Arc::new(UInt32Array::from(cols)),
        Arc::new(Float64Array::from(lats)),
        Arc::new(Float64Array::from(lons)),
        Arc::new(Float64Array::from(values)),
    ];

    RecordBatch::try_new(Arc::new(schema.clone()), columns).map_err(|e| IoError::Parquet {
        reason: e.to_string(),
    })
}

/// Writes a sequence of [`RecordBatch`]es to a Parquet file at `path`.
///
/// # Errors
///
/// Returns [`IoError::Parquet`] if file creation, batch writing, or file
/// finalisation fails.
pub(crate) fn write_batches(
    path: &Path,
    batches: &[RecordBatch],
    schema: &Schema,
    props: WriterProperties,
) -> Result<(), IoError> {
    let file = std::fs::File::create(path).map_err(|e| IoError::Parquet {
        reason: e.to_string(),
    })?;
    let mut writer = ArrowWriter::try_new(file, Arc::new(schema.clone()), Some(props))?;

    for batch in batches {
        writer.write(batch)?;
    }

    writer.close()?;
    Ok(())
}
