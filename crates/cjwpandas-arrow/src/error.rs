use arrow_schema::{ArrowError, DataType};
use cjwpandas_model::FrameError;

pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors raised while converting between frames and Arrow.
///
/// Converters assume their input already passed
/// [`cjwpandas_model::validate_dataframe`]; these errors report the
/// preconditions they trip over rather than a full validation.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Arrow(#[from] ArrowError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("dtype {0} has no Arrow representation")]
    UnsupportedDtype(String),

    #[error("Arrow type {0} has no column representation")]
    UnsupportedArrowType(DataType),

    #[error("column name {0:?} is not text")]
    InvalidColumnName(String),

    #[error("row {row} holds a value that is not a str")]
    NonTextValue { row: usize },

    #[error("categories must be str, but category {index} is not")]
    NonTextCategory { index: usize },

    #[error("day {0} is outside the Date32 range")]
    DateOutOfRange(i64),

    #[error("timestamp {value} ({unit}) overflows nanoseconds")]
    TimestampOverflow { value: i64, unit: &'static str },

    #[error("chunk has type {actual}, expected {expected}")]
    ChunkTypeMismatch { expected: DataType, actual: DataType },

    #[error("column '{column}' has {len} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        len: usize,
        expected: usize,
    },

    #[error("schema has {fields} fields but table has {columns} columns")]
    SchemaMismatch { fields: usize, columns: usize },
}
