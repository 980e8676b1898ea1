//! In-memory table model shared by the cjwpandas converters.
//!
//! A [`DataFrame`] is an ordered list of named [`Series`] with a common row
//! count. Columns store one of a fixed set of dtypes; [`ColumnType`] is the
//! closed set of semantic types that may cross into the columnar format, and
//! [`validate_dataframe`] decides whether a frame qualifies.

#![forbid(unsafe_code)]

mod bitmap;
mod column;
mod dtype;
mod frame;
mod label;
mod settings;
mod validate;

pub use crate::column::{Categorical, Categories, ColumnData, Scalar, Series};
pub use crate::dtype::{ColumnType, Dtype, PeriodFreq};
pub use crate::frame::{DataFrame, FrameError};
pub use crate::label::{Label, RowIndex};
pub use crate::settings::{Settings, DEFAULT_MAX_BYTES_PER_COLUMN_NAME};
pub use crate::validate::{validate_dataframe, ValidationError};
