use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use crate::config::DisplayConfig;
use crate::data::IntensityMatrix;
use crate::error::{Result, VitaraError};
use crate::trial::TrialDescriptor;

pub const PIXEL_COLUMN: &str = "pixel";
pub const VERTICAL_COLUMN: &str = "vertical";

// ---------------------------------------------------------------------------
// Parquet export
// ---------------------------------------------------------------------------

/// Write `matrix` as a wide parquet table: one row per pixel, a `pixel`
/// column, an optional `vertical` axis column, then one column per position
/// label.
///
/// Calibration-derived axes (vertical unit, per-position delay) and display
/// settings travel as schema metadata so a renderer needs nothing else.
pub fn write_parquet(
    path: &Path,
    matrix: &IntensityMatrix,
    trial: Option<&TrialDescriptor>,
    display: Option<&DisplayConfig>,
) -> Result<()> {
    let batch = to_record_batch(matrix, trial, display)?;

    let file = std::fs::File::create(path).map_err(|e| VitaraError::io(path, e))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;

    log::info!(
        "Wrote {} pixels x {} positions to {}",
        matrix.pixels(),
        matrix.positions(),
        path.display()
    );
    Ok(())
}

/// Build the record batch written by [`write_parquet`].
pub fn to_record_batch(
    matrix: &IntensityMatrix,
    trial: Option<&TrialDescriptor>,
    display: Option<&DisplayConfig>,
) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(matrix.positions() + 2);
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(matrix.positions() + 2);
    let mut metadata = HashMap::new();

    fields.push(Field::new(PIXEL_COLUMN, DataType::Int64, false));
    columns.push(Arc::new(Int64Array::from_iter_values(
        0..matrix.pixels() as i64,
    )));

    if let Some(trial) = trial {
        fields.push(Field::new(VERTICAL_COLUMN, DataType::Float64, false));
        columns.push(Arc::new(Float64Array::from(
            trial.vertical_axis(matrix.pixels())?,
        )));

        metadata.insert("vertical_units".to_string(), trial.vertical_label().to_string());
        metadata.insert("cmap".to_string(), trial.cmap().to_string());
        let times = trial.time_axis(matrix.positions())?;
        for (label, time) in matrix.labels().iter().zip(times) {
            metadata.insert(format!("time_fs.{label}"), time.to_string());
        }
    }

    for (position, label) in matrix.labels().iter().enumerate() {
        let values = matrix.column(position).unwrap_or_default();
        fields.push(Field::new(label.as_str(), DataType::Float64, false));
        columns.push(Arc::new(Float64Array::from(values)));
    }

    if let Some(display) = display {
        for (key, value) in display.to_string_map()? {
            metadata.insert(format!("display.{key}"), value);
        }
    }

    log::debug!(
        "Export schema has {} columns and {} metadata entries",
        fields.len(),
        metadata.len()
    );

    let schema = Arc::new(Schema::new(fields).with_metadata(metadata));
    Ok(RecordBatch::try_new(schema, columns)?)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::SpectrumMatrix;
    use crate::units::VerticalUnitKind;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    fn matrix() -> IntensityMatrix {
        let raw = SpectrumMatrix::from_traces(&[vec![1.0, 2.0], vec![4.0, 8.0]]).unwrap();
        IntensityMatrix::from_raw(raw, vec!["p0".into(), "p1".into()]).unwrap()
    }

    #[test]
    fn test_record_batch_layout() {
        let trial = TrialDescriptor::builder("run")
            .step_size_mm(0.003)
            .min_wavelength_nm(500.0)
            .vertical_units(VerticalUnitKind::Wavelength)
            .build()
            .unwrap();
        let batch = to_record_batch(&matrix(), Some(&trial), None).unwrap();
        let schema = batch.schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, vec!["pixel", "vertical", "p0", "p1"]);
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(schema.metadata()["vertical_units"], "Wavelength (nm)");
        assert_eq!(schema.metadata()["time_fs.p0"], "0");

        let p1 = batch
            .column(3)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(p1.values().to_vec(), vec![0.5, 1.0]);
    }

    #[test]
    fn test_parquet_round_trip() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let tmpdir = tempfile::tempdir()?;
        let path = tmpdir.path().join("out.parquet");
        let display = DisplayConfig::from_yaml_str("display:\n  font.size: 11\n")?;

        write_parquet(&path, &matrix(), None, Some(&display))?;

        let file = std::fs::File::open(&path)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
        let schema = builder.schema().clone();
        assert_eq!(schema.metadata()["display.font.size"], "11");
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, vec!["pixel", "p0", "p1"]);

        let rows: usize = builder
            .build()?
            .map(|b| b.map(|b| b.num_rows()))
            .sum::<std::result::Result<usize, _>>()?;
        assert_eq!(rows, 2);
        Ok(())
    }
}
