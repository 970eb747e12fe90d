use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Category, Column, Measurement, Penguin, PenguinDataset, Sex};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("cannot read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON")]
    Json(#[from] serde_json::Error),

    #[error("malformed parquet file")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("reading parquet record batch")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("expected a top-level JSON array of records")]
    NotRecords,

    #[error("missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}, column '{column}': invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },
}

type Result<T> = std::result::Result<T, LoadError>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a penguin dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – palmerpenguins layout, `NA` for missing values
/// * `.json`    – `[{ "species": "Adelie", "island": "Dream", ... }, ...]`
/// * `.parquet` – one column per field, nulls for missing values
pub fn load_file(path: &Path) -> Result<PenguinDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    match ext.as_str() {
        "csv" => load_csv(std::fs::File::open(path).map_err(io_err)?),
        "json" => load_json(&std::fs::read_to_string(path).map_err(io_err)?),
        "parquet" | "pq" => load_parquet(std::fs::File::open(path).map_err(io_err)?),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Cells: one format-independent field value
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Missing,
    Text(String),
    Number(f64),
}

impl Cell {
    /// `NA` and blank strings are missing values.
    fn text(s: &str) -> Cell {
        let s = s.trim();
        if s.is_empty() || s == "NA" {
            Cell::Missing
        } else {
            Cell::Text(s.to_string())
        }
    }

    fn describe(&self) -> String {
        match self {
            Cell::Missing => "NA".to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
        }
    }
}

fn invalid(row: usize, column: &'static str, cell: &Cell) -> LoadError {
    LoadError::InvalidValue {
        row,
        column,
        value: cell.describe(),
    }
}

fn category<T: Category>(row: usize, column: &'static str, cell: Cell) -> Result<T> {
    match &cell {
        Cell::Text(s) => s.parse().map_err(|_| invalid(row, column, &cell)),
        _ => Err(invalid(row, column, &cell)),
    }
}

fn optional_category<T: Category>(row: usize, column: &'static str, cell: Cell) -> Result<Option<T>> {
    match cell {
        Cell::Missing => Ok(None),
        cell => category(row, column, cell).map(Some),
    }
}

fn measurement(row: usize, column: &'static str, cell: Cell) -> Result<Option<f64>> {
    match &cell {
        Cell::Missing => Ok(None),
        Cell::Number(n) if n.is_nan() => Ok(None),
        Cell::Number(n) => Ok(Some(*n)),
        Cell::Text(s) => s
            .parse::<f64>()
            .map(Some)
            .map_err(|_| invalid(row, column, &cell)),
    }
}

fn year(row: usize, cell: Cell) -> Result<i32> {
    let parsed = match &cell {
        Cell::Number(n) if n.fract() == 0.0 => Some(*n as i32),
        Cell::Text(s) => s.parse::<i32>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| invalid(row, "year", &cell))
}

/// Assemble one penguin from a per-column cell lookup.
fn build_penguin(row: usize, mut cell: impl FnMut(Column) -> Result<Cell>) -> Result<Penguin> {
    let mut m = |which: Measurement| -> Result<Option<f64>> {
        measurement(row, which.column_name(), cell(Column::Measurement(which))?)
    };
    let bill_length_mm = m(Measurement::BillLength)?;
    let bill_depth_mm = m(Measurement::BillDepth)?;
    let flipper_length_mm = m(Measurement::FlipperLength)?;
    let body_mass_g = m(Measurement::BodyMass)?;

    Ok(Penguin {
        species: category(row, "species", cell(Column::Species)?)?,
        island: category(row, "island", cell(Column::Island)?)?,
        bill_length_mm,
        bill_depth_mm,
        flipper_length_mm,
        body_mass_g,
        sex: optional_category::<Sex>(row, "sex", cell(Column::Sex)?)?,
        year: year(row, cell(Column::Year)?)?,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with the palmerpenguins column names. Extra
/// columns (such as R's unnamed row index) are ignored.
pub fn load_csv<R: Read>(input: R) -> Result<PenguinDataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: HashMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_string(), i))
        .collect();

    let positions: HashMap<Column, usize> = Column::ALL
        .iter()
        .map(|col| {
            headers
                .get(col.name())
                .map(|&i| (*col, i))
                .ok_or(LoadError::MissingColumn(col.name()))
        })
        .collect::<Result<_>>()?;

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let penguin = build_penguin(row, |col| {
            Ok(record
                .get(positions[&col])
                .map(Cell::text)
                .unwrap_or(Cell::Missing))
        })?;
        records.push(penguin);
    }

    Ok(PenguinDataset::new(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "species": "Adelie", "island": "Torgersen", "bill_length_mm": 39.1,
///     "bill_depth_mm": 18.7, "flipper_length_mm": 181, "body_mass_g": 3750,
///     "sex": "male", "year": 2007 },
///   ...
/// ]
/// ```
///
/// Absent keys and `null` are missing values.
pub fn load_json(text: &str) -> Result<PenguinDataset> {
    let root: JsonValue = serde_json::from_str(text)?;
    let rows = root.as_array().ok_or(LoadError::NotRecords)?;

    let records = rows
        .iter()
        .enumerate()
        .map(|(row, value)| {
            let obj = value.as_object().ok_or(LoadError::NotRecords)?;
            build_penguin(row, |col| Ok(obj.get(col.name()).map(json_cell).unwrap_or(Cell::Missing)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(PenguinDataset::new(records))
}

fn json_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::Null => Cell::Missing,
        JsonValue::String(s) => Cell::text(s),
        JsonValue::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Missing),
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load penguins from Parquet.
///
/// Category columns are utf8; measurement and year columns may be any of
/// Float64/Float32/Int64/Int32. Works with files written by **Pandas**
/// (`df.to_parquet()`), **Polars** and the dashboard's own export.
pub fn load_parquet(file: std::fs::File) -> Result<PenguinDataset> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();
    for batch in reader {
        let batch = batch?;
        let schema = batch.schema();

        let columns: HashMap<Column, ArrayRef> = Column::ALL
            .iter()
            .map(|col| {
                schema
                    .index_of(col.name())
                    .map(|i| (*col, batch.column(i).clone()))
                    .map_err(|_| LoadError::MissingColumn(col.name()))
            })
            .collect::<Result<_>>()?;

        let offset = records.len();
        for row in 0..batch.num_rows() {
            let penguin = build_penguin(offset + row, |col| {
                arrow_cell(&columns[&col], row, col).map_err(|e| match e {
                    LoadError::InvalidValue { column, value, .. } => LoadError::InvalidValue {
                        row: offset + row,
                        column,
                        value,
                    },
                    other => other,
                })
            })?;
            records.push(penguin);
        }
    }

    Ok(PenguinDataset::new(records))
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &ArrayRef, row: usize, column: Column) -> Result<Cell> {
    if col.is_null(row) {
        return Ok(Cell::Missing);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => col.as_string_opt::<i32>().map(|s| Cell::text(s.value(row))),
        DataType::LargeUtf8 => col.as_string_opt::<i64>().map(|s| Cell::text(s.value(row))),
        DataType::Float64 => col
            .as_primitive_opt::<Float64Type>()
            .map(|a| Cell::Number(a.value(row))),
        DataType::Float32 => col
            .as_primitive_opt::<Float32Type>()
            .map(|a| Cell::Number(a.value(row) as f64)),
        DataType::Int64 => col
            .as_primitive_opt::<Int64Type>()
            .map(|a| Cell::Number(a.value(row) as f64)),
        DataType::Int32 => col
            .as_primitive_opt::<Int32Type>()
            .map(|a| Cell::Number(a.value(row) as f64)),
        _ => None,
    };
    cell.ok_or_else(|| LoadError::InvalidValue {
        row,
        column: column.name(),
        value: format!("{:?}", col.data_type()),
    })
}
