use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use super::filter::DerivedView;
use super::model::{Column, Measurement, Penguin};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("unsupported export format: .{0}")]
    UnsupportedExtension(String),

    #[error("writing export file")]
    Io(#[from] std::io::Error),

    #[error("writing CSV")]
    Csv(#[from] csv::Error),

    #[error("writing JSON")]
    Json(#[from] serde_json::Error),

    #[error("building record batch")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("writing parquet")]
    Parquet(#[from] parquet::errors::ParquetError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Parquet,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Parquet];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Parquet => "parquet",
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "parquet" | "pq" => Ok(ExportFormat::Parquet),
            other => Err(ExportError::UnsupportedExtension(other.to_string())),
        }
    }
}

/// Write the visible records to `path`, format chosen by extension.
pub fn export_view(view: &DerivedView, path: &Path) -> Result<(), ExportError> {
    let format = ExportFormat::from_path(path)?;
    let file = std::fs::File::create(path)?;
    match format {
        ExportFormat::Csv => write_csv(view, file),
        ExportFormat::Json => write_json(view, file),
        ExportFormat::Parquet => write_parquet(view, file),
    }?;
    log::info!("Exported {} penguins to {}", view.len(), path.display());
    Ok(())
}

/// CSV in the palmerpenguins layout, `NA` for missing values.
///
/// Measurements are written at full precision, unlike the table cells.
pub fn write_csv<W: Write>(view: &DerivedView, out: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(Column::ALL.iter().map(|c| c.name()))?;
    for penguin in view.iter() {
        writer.write_record(Column::ALL.iter().map(|c| match c {
            Column::Measurement(m) => m
                .value(penguin)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "NA".to_string()),
            other => other.cell(penguin),
        }))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(view: &DerivedView, out: W) -> Result<(), ExportError> {
    let records: Vec<&Penguin> = view.iter().collect();
    serde_json::to_writer_pretty(out, &records)?;
    Ok(())
}

pub fn write_parquet<W: Write + Send>(view: &DerivedView, out: W) -> Result<(), ExportError> {
    let strings = |f: fn(&Penguin) -> Option<&'static str>| -> ArrayRef {
        Arc::new(view.iter().map(f).collect::<StringArray>())
    };
    let floats = |m: Measurement| -> ArrayRef {
        Arc::new(view.iter().map(|p| m.value(p)).collect::<Float64Array>())
    };

    let mut fields = vec![
        Field::new("species", DataType::Utf8, false),
        Field::new("island", DataType::Utf8, false),
    ];
    fields.extend(
        Measurement::ALL
            .iter()
            .map(|m| Field::new(m.column_name(), DataType::Float64, true)),
    );
    fields.push(Field::new("sex", DataType::Utf8, true));
    fields.push(Field::new("year", DataType::Int32, false));
    let schema = Arc::new(Schema::new(fields));

    let mut columns = vec![
        strings(|p| Some(p.species.as_str())),
        strings(|p| Some(p.island.as_str())),
    ];
    columns.extend(Measurement::ALL.iter().map(|m| floats(*m)));
    columns.push(strings(|p| p.sex.map(|s| s.as_str())));
    columns.push(Arc::new(view.iter().map(|p| Some(p.year)).collect::<Int32Array>()));

    let batch = RecordBatch::try_new(schema.clone(), columns)?;
    let mut writer = ArrowWriter::try_new(out, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}
