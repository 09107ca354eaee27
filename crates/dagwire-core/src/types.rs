//! Lightweight value/column types used by the bounded batch backend.
//!
//! Columnar and deliberately simple: a `RowBatch` is a list of equally long
//! named columns. Serializable so sources can be loaded from JSON files.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::{DataType, Field};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    Str(String),
    Bin(Vec<u8>),
}

impl Scalar {
    /// Logical type of the value; `None` for `Null`, which fits any type.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Scalar::Null => None,
            Scalar::Bool(_) => Some(DataType::Boolean),
            Scalar::I64(_) => Some(DataType::Int64),
            Scalar::F64(_) => Some(DataType::Float64),
            Scalar::Str(_) => Some(DataType::Utf8),
            Scalar::Bin(_) => Some(DataType::Binary),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Scalar>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Scalar>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Every value must have `field`'s type; nulls only where it is nullable.
    pub fn conforms_to(&self, field: &Field) -> Result<()> {
        for (row, value) in self.values.iter().enumerate() {
            match value.data_type() {
                None if !field.nullable => {
                    return Err(Error::Schema(format!(
                        "column '{}' is not nullable but row {row} is null",
                        self.name
                    )))
                }
                Some(actual) if actual != field.data_type => {
                    return Err(Error::Schema(format!(
                        "column '{}' is declared {:?} but row {row} holds {:?}",
                        self.name, field.data_type, actual
                    )))
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RowBatch {
    pub columns: Vec<Column>,
}

impl RowBatch {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Keep the first `n` rows.
    pub fn truncate(&mut self, n: usize) {
        for col in &mut self.columns {
            col.values.truncate(n);
        }
    }

    /// Keep `columns` in the given order.
    pub fn select(&self, columns: &[String]) -> Result<RowBatch> {
        let cols = columns
            .iter()
            .map(|name| {
                self.column(name)
                    .cloned()
                    .ok_or_else(|| Error::Schema(format!("column '{name}' not found")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(RowBatch { columns: cols })
    }

    /// Keep rows whose mask entry is true. `mask.len()` must equal `num_rows()`.
    pub fn filter_rows(&self, mask: &[bool]) -> Result<RowBatch> {
        if mask.len() != self.num_rows() {
            return Err(Error::Invariant(format!(
                "filter mask has {} entries for {} rows",
                mask.len(),
                self.num_rows()
            )));
        }
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                values: c
                    .values
                    .iter()
                    .zip(mask)
                    .filter(|(_, keep)| **keep)
                    .map(|(v, _)| v.clone())
                    .collect(),
            })
            .collect();
        Ok(RowBatch { columns })
    }

    /// Append the rows of `other`, matching columns by name.
    ///
    /// Both batches must carry the same column set; order follows `self`.
    pub fn append(&mut self, other: &RowBatch) -> Result<()> {
        if self.columns.is_empty() {
            self.columns = other.columns.clone();
            return Ok(());
        }
        if other.columns.len() != self.columns.len() {
            return Err(Error::Schema(format!(
                "cannot append batch with {} columns to batch with {}",
                other.columns.len(),
                self.columns.len()
            )));
        }
        for col in &mut self.columns {
            let src = other.column(&col.name).ok_or_else(|| {
                Error::Schema(format!("column '{}' missing from appended batch", col.name))
            })?;
            col.values.extend(src.values.iter().cloned());
        }
        Ok(())
    }
}
