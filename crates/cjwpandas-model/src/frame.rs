use std::ops::Range;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::column::{ColumnData, Series};
use crate::label::{Label, RowIndex};

/// Errors that can occur when assembling a frame or one of its columns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("column '{column}' has {len} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        len: usize,
        expected: usize,
    },
    #[error("index has {len} labels, expected {expected}")]
    IndexLengthMismatch { len: usize, expected: usize },
    #[error("row {row} has category code {code}, but there are only {categories} categories")]
    CategoryCodeOutOfRange {
        row: usize,
        code: u32,
        categories: usize,
    },
    #[error("timestamp {0} cannot be represented in nanoseconds")]
    TimestampOutOfRange(NaiveDateTime),
}

/// An ordered set of named columns sharing one row count.
#[derive(Clone, Debug, PartialEq)]
pub struct DataFrame {
    index: RowIndex,
    columns: Vec<Series>,
}

impl DataFrame {
    /// Build a frame with the default `0..N` index.
    ///
    /// A frame without columns has zero rows.
    pub fn new(columns: Vec<Series>) -> Result<Self, FrameError> {
        let rows = columns.first().map(Series::len).unwrap_or(0);
        Self::check_lengths(&columns, rows)?;
        Ok(Self {
            index: RowIndex::default_for_len(rows),
            columns,
        })
    }

    /// Build a frame with `rows` rows and no columns.
    pub fn with_rows(rows: usize) -> Self {
        Self {
            index: RowIndex::default_for_len(rows),
            columns: Vec::new(),
        }
    }

    fn check_lengths(columns: &[Series], expected: usize) -> Result<(), FrameError> {
        for series in columns {
            if series.len() != expected {
                return Err(FrameError::LengthMismatch {
                    column: series.name.to_string(),
                    len: series.len(),
                    expected,
                });
            }
        }
        Ok(())
    }

    /// Replace the row index. The new index must address every row.
    pub fn with_index(mut self, index: RowIndex) -> Result<Self, FrameError> {
        if index.len() != self.len() {
            return Err(FrameError::IndexLengthMismatch {
                len: index.len(),
                expected: self.len(),
            });
        }
        self.index = index;
        Ok(self)
    }

    pub fn reset_index(mut self) -> Self {
        self.index = RowIndex::default_for_len(self.len());
        self
    }

    /// Rows `range`, keeping their original positions as the index.
    ///
    /// Slicing from any row but the first yields a non-default index, as it
    /// does in the host runtime. Panics if `range` is out of bounds.
    pub fn slice(&self, range: Range<usize>) -> Self {
        let index = match &self.index {
            RowIndex::Range { start, step, .. } => RowIndex::Range {
                start: start + step * range.start as i64,
                stop: start + step * range.end as i64,
                step: *step,
            },
            RowIndex::Labels(labels) => RowIndex::Labels(labels[range.clone()].to_vec()),
        };
        let columns = self
            .columns
            .iter()
            .map(|s| Series {
                name: s.name.clone(),
                data: s.data.slice(range.clone()),
            })
            .collect();
        Self { index, columns }
    }

    /// Rename columns positionally; `names` must have one label per column.
    pub fn with_column_names(mut self, names: Vec<Label>) -> Self {
        debug_assert_eq!(names.len(), self.columns.len());
        for (series, name) in self.columns.iter_mut().zip(names) {
            series.name = name;
        }
        self
    }

    pub fn index(&self) -> &RowIndex {
        &self.index
    }

    pub fn columns(&self) -> &[Series] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnData> {
        self.columns
            .iter()
            .find(|s| matches!(&s.name, Label::Str(n) if n == name))
            .map(|s| &s.data)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}
