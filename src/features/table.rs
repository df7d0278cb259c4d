//! In-memory feature table.
//!
//! Column-major storage of named numeric columns, one row per entity. This
//! is the dataset handed to the engine; the engine only asks it for its
//! column count.

use crate::error::DataError;
use crate::ga::SeedData;
use std::io;

/// Named numeric columns of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
    n_rows: usize,
}

impl FeatureTable {
    /// Builds a table from column names and column-major data.
    pub fn new(names: Vec<String>, columns: Vec<Vec<f64>>) -> Result<Self, DataError> {
        if names.len() != columns.len() {
            return Err(DataError::Shape(format!(
                "{} column names for {} columns",
                names.len(),
                columns.len()
            )));
        }
        let n_rows = columns.first().map_or(0, Vec::len);
        if let Some((i, c)) = columns.iter().enumerate().find(|(_, c)| c.len() != n_rows) {
            return Err(DataError::Shape(format!(
                "column `{}` has {} rows, expected {n_rows}",
                names[i],
                c.len()
            )));
        }
        Ok(Self {
            names,
            columns,
            n_rows,
        })
    }

    /// Builds a table from row-major data.
    pub fn from_rows(names: Vec<String>, rows: &[Vec<f64>]) -> Result<Self, DataError> {
        let n_cols = names.len();
        let mut columns = vec![Vec::with_capacity(rows.len()); n_cols];
        for (r, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(DataError::Shape(format!(
                    "row {r} has {} values, expected {n_cols}",
                    row.len()
                )));
            }
            for (col, &v) in columns.iter_mut().zip(row) {
                col.push(v);
            }
        }
        Self::new(names, columns)
    }

    /// Reads a delimited table with a header row of column names.
    pub fn from_csv_reader<R: io::Read>(reader: R, delimiter: u8) -> Result<Self, DataError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let names: Vec<String> = rdr.headers()?.iter().map(str::to_owned).collect();

        let mut rows = Vec::new();
        for (r, record) in rdr.records().enumerate() {
            let record = record?;
            let row = record
                .iter()
                .zip(&names)
                .map(|(cell, name)| {
                    cell.parse::<f64>().map_err(|_| DataError::Parse {
                        row: r,
                        column: name.clone(),
                        value: cell.to_owned(),
                    })
                })
                .collect::<Result<Vec<f64>, DataError>>()?;
            rows.push(row);
        }
        Self::from_rows(names, &rows)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, index: usize) -> &[f64] {
        &self.columns[index]
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Rescales every column to `[0, 1]` with min-max normalization.
    ///
    /// Constant columns become all zeros.
    pub fn normalize_min_max(&mut self) {
        for col in &mut self.columns {
            let (min, max) = col
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                });
            let range = max - min;
            for v in col.iter_mut() {
                *v = if range > 0.0 { (*v - min) / range } else { 0.0 };
            }
        }
    }

    /// Indices of the columns a genotype selects.
    pub fn selected_indices(genes: &[bool]) -> Vec<usize> {
        genes
            .iter()
            .enumerate()
            .filter_map(|(i, &g)| g.then_some(i))
            .collect()
    }

    /// Names of the columns a genotype selects.
    pub fn selected_names(&self, genes: &[bool]) -> Vec<&str> {
        genes
            .iter()
            .zip(&self.names)
            .filter_map(|(&g, name)| g.then_some(name.as_str()))
            .collect()
    }
}

impl SeedData for FeatureTable {
    fn column_count(&self) -> usize {
        self.n_columns()
    }
}
