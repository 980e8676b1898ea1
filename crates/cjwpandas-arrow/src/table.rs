use std::collections::BTreeSet;
use std::sync::Arc;

use arrow_array::{Array, ArrayRef, RecordBatch, RecordBatchOptions};
use arrow_schema::{DataType, SchemaRef};

use crate::error::{ConvertError, ConvertResult};

/// One logical column stored as a sequence of same-typed Arrow arrays.
#[derive(Clone, Debug)]
pub struct ChunkedArray {
    data_type: DataType,
    chunks: Vec<ArrayRef>,
}

impl ChunkedArray {
    /// Every chunk must have type `data_type`. Zero chunks is an empty column.
    pub fn try_new(data_type: DataType, chunks: Vec<ArrayRef>) -> ConvertResult<Self> {
        if let Some(chunk) = chunks.iter().find(|c| c.data_type() != &data_type) {
            return Err(ConvertError::ChunkTypeMismatch {
                expected: data_type,
                actual: chunk.data_type().clone(),
            });
        }
        Ok(Self { data_type, chunks })
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    pub fn chunks(&self) -> &[ArrayRef] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.iter().map(|c| c.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn null_count(&self) -> usize {
        self.chunks.iter().map(|c| c.null_count()).sum()
    }
}

impl From<ArrayRef> for ChunkedArray {
    fn from(array: ArrayRef) -> Self {
        Self {
            data_type: array.data_type().clone(),
            chunks: vec![array],
        }
    }
}

// Chunk boundaries are part of equality.
impl PartialEq for ChunkedArray {
    fn eq(&self, other: &Self) -> bool {
        self.data_type == other.data_type
            && self.chunks.len() == other.chunks.len()
            && self
                .chunks
                .iter()
                .zip(&other.chunks)
                .all(|(a, b)| a.to_data() == b.to_data())
    }
}

/// A columnar table: a schema plus one [`ChunkedArray`] per field.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrowTable {
    schema: SchemaRef,
    columns: Vec<ChunkedArray>,
    rows: usize,
}

impl ArrowTable {
    pub fn try_new(schema: SchemaRef, columns: Vec<ChunkedArray>) -> ConvertResult<Self> {
        let rows = columns.first().map(ChunkedArray::len).unwrap_or(0);
        Self::try_new_with_rows(schema, columns, rows)
    }

    /// Like [`ArrowTable::try_new`], but keeps `rows` for tables without columns.
    pub fn try_new_with_rows(
        schema: SchemaRef,
        columns: Vec<ChunkedArray>,
        rows: usize,
    ) -> ConvertResult<Self> {
        if schema.fields().len() != columns.len() {
            return Err(ConvertError::SchemaMismatch {
                fields: schema.fields().len(),
                columns: columns.len(),
            });
        }
        for (field, column) in schema.fields().iter().zip(&columns) {
            if field.data_type() != column.data_type() {
                return Err(ConvertError::ChunkTypeMismatch {
                    expected: field.data_type().clone(),
                    actual: column.data_type().clone(),
                });
            }
            if column.len() != rows {
                return Err(ConvertError::LengthMismatch {
                    column: field.name().clone(),
                    len: column.len(),
                    expected: rows,
                });
            }
        }
        Ok(Self {
            schema,
            columns,
            rows,
        })
    }

    /// Gather record batches into one table, one chunk per batch.
    pub fn from_record_batches(schema: SchemaRef, batches: &[RecordBatch]) -> ConvertResult<Self> {
        let rows = batches.iter().map(RecordBatch::num_rows).sum();
        let columns = schema
            .fields()
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let chunks = batches
                    .iter()
                    .map(|batch| {
                        batch.columns().get(i).cloned().ok_or(ConvertError::SchemaMismatch {
                            fields: schema.fields().len(),
                            columns: batch.num_columns(),
                        })
                    })
                    .collect::<ConvertResult<Vec<_>>>()?;
                ChunkedArray::try_new(field.data_type().clone(), chunks)
            })
            .collect::<ConvertResult<Vec<_>>>()?;
        Self::try_new_with_rows(schema, columns, rows)
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[ChunkedArray] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&ChunkedArray> {
        self.columns.get(index)
    }

    pub fn column_by_name(&self, name: &str) -> Option<&ChunkedArray> {
        let (index, _) = self.schema.column_with_name(name)?;
        self.columns.get(index)
    }

    /// Split the table into record batches.
    ///
    /// Columns may be chunked differently; batches break at every chunk
    /// boundary of any column, slicing the other columns to match.
    pub fn to_record_batches(&self) -> ConvertResult<Vec<RecordBatch>> {
        let mut boundaries = BTreeSet::from([0, self.rows]);
        for column in &self.columns {
            let mut offset = 0;
            for chunk in column.chunks() {
                offset += chunk.len();
                boundaries.insert(offset);
            }
        }

        // Per column: (chunk index, row offset of that chunk).
        let mut cursors = vec![(0usize, 0usize); self.columns.len()];
        let mut batches = Vec::with_capacity(boundaries.len());
        let boundaries: Vec<usize> = boundaries.into_iter().collect();
        for window in boundaries.windows(2) {
            let (start, end) = (window[0], window[1]);
            if start == end {
                continue;
            }

            let mut arrays = Vec::with_capacity(self.columns.len());
            for (column, (chunk_idx, chunk_start)) in self.columns.iter().zip(cursors.iter_mut()) {
                let chunks = column.chunks();
                while *chunk_start + chunks[*chunk_idx].len() <= start {
                    *chunk_start += chunks[*chunk_idx].len();
                    *chunk_idx += 1;
                }
                arrays.push(chunks[*chunk_idx].slice(start - *chunk_start, end - start));
            }

            let options = RecordBatchOptions::new().with_row_count(Some(end - start));
            batches.push(RecordBatch::try_new_with_options(
                Arc::clone(&self.schema),
                arrays,
                &options,
            )?);
        }
        Ok(batches)
    }
}

impl From<RecordBatch> for ArrowTable {
    fn from(batch: RecordBatch) -> Self {
        Self {
            schema: batch.schema(),
            rows: batch.num_rows(),
            columns: batch
                .columns()
                .iter()
                .cloned()
                .map(ChunkedArray::from)
                .collect(),
        }
    }
}
