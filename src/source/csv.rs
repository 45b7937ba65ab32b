//! CSV observation source

use super::{ColumnMapping, TabularSource};
use crate::error::{MonitorError, Result};
use crate::observation::Observation;
use polars::prelude::*;
use std::io::Cursor;
use std::sync::Arc;
use tracing::{debug, warn};

/// CSV reader that maps header-keyed columns onto observations
#[derive(Debug, Clone)]
pub struct CsvSource {
    mapping: ColumnMapping,
    delimiter: u8,
    infer_schema_length: usize,
}

impl Default for CsvSource {
    fn default() -> Self {
        Self::new(ColumnMapping::default())
    }
}

impl CsvSource {
    /// Create a CSV source with the given column mapping
    pub fn new(mapping: ColumnMapping) -> Self {
        Self {
            mapping,
            delimiter: b',',
            infer_schema_length: 100,
        }
    }

    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set how many rows polars inspects to infer column types
    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = rows;
        self
    }

    /// Column mapping in use
    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    /// Parse CSV text that is already in memory
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Vec<Observation>> {
        let parse_opts = CsvParseOptions::default().with_separator(self.delimiter);
        let overwrite = self.numeric_overwrite(&header_names(bytes, self.delimiter));

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(self.infer_schema_length))
            .with_schema_overwrite(overwrite)
            .with_parse_options(parse_opts)
            .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
            .finish()
            .map_err(|e| MonitorError::ParseError(e.to_string()))?;

        self.observations_from_frame(&df)
    }

    /// Float64 overrides for the mapped numeric columns present in `header`.
    ///
    /// Only names found in the header are included, so polars never falls back
    /// to matching the overrides by position.
    fn numeric_overwrite(&self, header: &[String]) -> Option<SchemaRef> {
        let m = &self.mapping;
        let schema: Schema = header
            .iter()
            .filter(|name| {
                **name == m.expected || **name == m.accuracy || m.inputs.contains(*name)
            })
            .map(|name| Field::new(name.as_str().into(), DataType::Float64))
            .collect();

        if schema.is_empty() {
            None
        } else {
            Some(Arc::new(schema))
        }
    }

    /// Build one observation per row of `df`
    pub fn observations_from_frame(&self, df: &DataFrame) -> Result<Vec<Observation>> {
        let m = &self.mapping;
        let n_rows = df.height();

        let timestamps = string_column(df, &m.timestamp)?;
        let expected = float_column(df, &m.expected)?;
        let accuracy = float_column(df, &m.accuracy)?;

        if expected.is_none() {
            warn!(column = %m.expected, "Expected output column not found");
        }

        let input_names: Vec<String> = if m.inputs.is_empty() {
            df.get_columns()
                .iter()
                .filter(|c| !m.is_reserved(c.name().as_str()) && is_numeric(c.dtype()))
                .map(|c| c.name().to_string())
                .collect()
        } else {
            m.inputs.clone()
        };

        // absent columns stay in place as all-missing so feature positions never shift
        let mut inputs = Vec::with_capacity(input_names.len());
        for name in &input_names {
            match float_column(df, name)? {
                Some(values) => inputs.push(values),
                None => {
                    warn!(column = %name, "Input column not found");
                    inputs.push(vec![None; n_rows]);
                }
            }
        }

        debug!(rows = n_rows, inputs = ?input_names, "Mapping CSV columns");

        let observations = (0..n_rows)
            .map(|i| Observation {
                timestamp: timestamps.as_ref().and_then(|c| c[i].clone()),
                inputs: inputs.iter().map(|c| c[i].unwrap_or(f64::NAN)).collect(),
                expected: expected.as_ref().and_then(|c| c[i]),
                accuracy: accuracy.as_ref().and_then(|c| c[i]),
            })
            .collect();

        Ok(observations)
    }
}

impl TabularSource for CsvSource {
    fn read(&self, location: &str) -> Result<Vec<Observation>> {
        let bytes = std::fs::read(location)?;
        self.parse_bytes(&bytes)
    }
}

/// Column names from the first line, with surrounding quotes removed
fn header_names(bytes: &[u8], delimiter: u8) -> Vec<String> {
    let line = bytes.split(|&b| b == b'\n').next().unwrap_or_default();
    let line = line.strip_suffix(b"\r").unwrap_or(line);

    line.split(|&b| b == delimiter)
        .map(|field| {
            let name = String::from_utf8_lossy(field);
            name.trim().trim_matches('"').to_string()
        })
        .collect()
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::Int16
            | DataType::Int8
            | DataType::UInt64
            | DataType::UInt32
            | DataType::UInt16
            | DataType::UInt8
    )
}

/// Column cast to f64. Unparseable cells become `None`; an absent column is `None` overall.
fn float_column(df: &DataFrame, name: &str) -> Result<Option<Vec<Option<f64>>>> {
    let Ok(column) = df.column(name) else {
        return Ok(None);
    };
    let series = column.as_materialized_series().cast(&DataType::Float64)?;
    let values: Vec<Option<f64>> = series.f64()?.into_iter().collect();
    Ok(Some(values))
}

fn string_column(df: &DataFrame, name: &str) -> Result<Option<Vec<Option<String>>>> {
    let Ok(column) = df.column(name) else {
        return Ok(None);
    };
    let series = column.as_materialized_series().cast(&DataType::String)?;
    let values: Vec<Option<String>> = series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(Some(values))
}
