//! Conversion between [`cjwpandas_model::DataFrame`]s and Arrow tables.
//!
//! Frames go out as single-chunk tables:
//! - [`pandas_dataframe_to_arrow_table`]
//! - [`pandas_series_to_arrow_array`]
//!
//! Tables come back as frames with the default row index:
//! - [`arrow_table_to_pandas_dataframe`]
//! - [`arrow_chunked_array_to_pandas_series`]
//!
//! Frame → table conversion expects a frame that passed
//! [`cjwpandas_model::validate_dataframe`].

#![forbid(unsafe_code)]

mod error;
mod from_arrow;
mod ipc;
mod table;
mod to_arrow;

pub use error::{ConvertError, ConvertResult};
pub use from_arrow::{arrow_chunked_array_to_pandas_series, arrow_table_to_pandas_dataframe};
pub use ipc::{read_arrow_table_ipc, write_arrow_table_ipc};
pub use table::{ArrowTable, ChunkedArray};
pub use to_arrow::{
    pandas_dataframe_to_arrow_table, pandas_series_to_arrow_array, MAX_UINT8_DICTIONARY_LEN,
};
