//! Frame → Arrow.
use std::sync::Arc;

use arrow_array::builder::StringBuilder;
use arrow_array::types::{
    ArrowPrimitiveType, Float16Type, Float32Type, Float64Type, Int32Type, UInt8Type,
};
use arrow_array::{
    Array, ArrayRef, Date32Array, DictionaryArray, Int16Array, Int32Array, Int64Array, Int8Array,
    PrimitiveArray, StringArray, TimestampNanosecondArray, UInt16Array, UInt32Array, UInt64Array,
    UInt8Array,
};
use arrow_schema::{ArrowError, Field, Schema};
use cjwpandas_model::{Categorical, Categories, ColumnData, DataFrame, PeriodFreq, Scalar};
use half::f16;

use crate::error::{ConvertError, ConvertResult};
use crate::table::{ArrowTable, ChunkedArray};

/// Largest category count that still fits 8-bit dictionary keys.
pub const MAX_UINT8_DICTIONARY_LEN: usize = 256;

/// Convert a validated frame into an Arrow table, one single-chunk column per
/// series, in order.
///
/// Frames that fail [`cjwpandas_model::validate_dataframe`] are outside this
/// function's contract; some of them produce errors, others convert anyway.
pub fn pandas_dataframe_to_arrow_table(df: &DataFrame) -> ConvertResult<ArrowTable> {
    let mut fields = Vec::with_capacity(df.column_count());
    let mut columns = Vec::with_capacity(df.column_count());
    for series in df.columns() {
        let name = series
            .name
            .to_text()
            .ok_or_else(|| ConvertError::InvalidColumnName(series.name.to_string()))?;
        let array = pandas_series_to_arrow_array(&series.data)?;
        fields.push(Field::new(name, array.data_type().clone(), true));
        columns.push(ChunkedArray::from(array));
    }
    ArrowTable::try_new_with_rows(Arc::new(Schema::new(fields)), columns, df.len())
}

/// Convert one column into an Arrow array.
///
/// | column                     | array                                  |
/// |----------------------------|----------------------------------------|
/// | `int*` / `uint*`           | same-width integer array, no nulls     |
/// | `float*`                   | same-width float array, NaN → null     |
/// | `period[D]`                | `Date32`                               |
/// | `datetime64[ns]`           | `Timestamp(Nanosecond, None)`          |
/// | `object`                   | `Utf8`                                 |
/// | `category`                 | `Dictionary(UInt8 or Int32, Utf8)`     |
///
/// Up to [`MAX_UINT8_DICTIONARY_LEN`] categories use `UInt8` keys. Readers
/// that expect pandas' `Int8` keys for small dictionaries see a different key
/// type; the decoded values are the same.
pub fn pandas_series_to_arrow_array(data: &ColumnData) -> ConvertResult<ArrayRef> {
    let array: ArrayRef = match data {
        ColumnData::Int8(v) => Arc::new(Int8Array::from(v.clone())),
        ColumnData::Int16(v) => Arc::new(Int16Array::from(v.clone())),
        ColumnData::Int32(v) => Arc::new(Int32Array::from(v.clone())),
        ColumnData::Int64(v) => Arc::new(Int64Array::from(v.clone())),
        ColumnData::UInt8(v) => Arc::new(UInt8Array::from(v.clone())),
        ColumnData::UInt16(v) => Arc::new(UInt16Array::from(v.clone())),
        ColumnData::UInt32(v) => Arc::new(UInt32Array::from(v.clone())),
        ColumnData::UInt64(v) => Arc::new(UInt64Array::from(v.clone())),
        ColumnData::Float16(v) => Arc::new(nan_as_null::<Float16Type>(v, f16::is_nan)),
        ColumnData::Float32(v) => Arc::new(nan_as_null::<Float32Type>(v, f32::is_nan)),
        ColumnData::Float64(v) => Arc::new(nan_as_null::<Float64Type>(v, f64::is_nan)),
        ColumnData::Object(values) => Arc::new(text_array(values)?),
        ColumnData::Categorical(categorical) => dictionary_array(categorical)?,
        ColumnData::Period {
            freq: PeriodFreq::Day,
            ordinals,
        } => Arc::new(date_array(ordinals)?),
        ColumnData::Datetime { tz: None, nanos } => {
            Arc::new(TimestampNanosecondArray::from(nanos.clone()))
        }
        ColumnData::Period { .. } | ColumnData::Datetime { .. } | ColumnData::Opaque { .. } => {
            return Err(ConvertError::UnsupportedDtype(data.dtype().to_string()))
        }
    };
    Ok(array)
}

fn nan_as_null<T: ArrowPrimitiveType>(
    values: &[T::Native],
    is_nan: fn(T::Native) -> bool,
) -> PrimitiveArray<T> {
    values
        .iter()
        .map(|v| (!is_nan(*v)).then_some(*v))
        .collect()
}

fn date_array(ordinals: &[Option<i64>]) -> ConvertResult<Date32Array> {
    ordinals
        .iter()
        .map(|day| {
            day.map(|d| i32::try_from(d).map_err(|_| ConvertError::DateOutOfRange(d)))
                .transpose()
        })
        .collect()
}

fn text_array(values: &[Option<Scalar>]) -> ConvertResult<StringArray> {
    let bytes = values
        .iter()
        .flatten()
        .filter_map(Scalar::as_str)
        .map(str::len)
        .sum();
    let mut builder = StringBuilder::with_capacity(values.len(), bytes);
    for (row, value) in values.iter().enumerate() {
        match value {
            None => builder.append_null(),
            Some(Scalar::Str(s)) => builder.append_value(s),
            Some(_) => return Err(ConvertError::NonTextValue { row }),
        }
    }
    Ok(builder.finish())
}

/// Dictionary-encode a categorical column.
///
/// The dictionary is the category list in its declared order. Keys are
/// 8-bit when every category index fits, 32-bit otherwise. Null rows become
/// null keys, never dictionary entries.
fn dictionary_array(categorical: &Categorical) -> ConvertResult<ArrayRef> {
    let Categories::Object(categories) = categorical.categories() else {
        return Err(ConvertError::UnsupportedDtype(format!(
            "category[{}]",
            categorical.categories().dtype()
        )));
    };
    let dictionary = categories
        .iter()
        .enumerate()
        .map(|(index, c)| c.as_str().map(Some).ok_or(ConvertError::NonTextCategory { index }))
        .collect::<ConvertResult<StringArray>>()?;
    let dictionary: ArrayRef = Arc::new(dictionary);

    let codes = categorical.codes();
    if categories.len() <= MAX_UINT8_DICTIONARY_LEN {
        let keys: UInt8Array = codes.iter().map(|c| c.map(|c| c as u8)).collect();
        Ok(Arc::new(DictionaryArray::<UInt8Type>::try_new(
            keys, dictionary,
        )?))
    } else {
        // Codes index into `categories`, so they fit once its length does.
        i32::try_from(categories.len()).map_err(|_| ArrowError::DictionaryKeyOverflowError)?;
        let keys: Int32Array = codes.iter().map(|c| c.map(|c| c as i32)).collect();
        Ok(Arc::new(DictionaryArray::<Int32Type>::try_new(
            keys, dictionary,
        )?))
    }
}
