//! Arrow → frame.
use std::collections::HashMap;

use arrow_array::cast::AsArray;
use arrow_array::types::{
    ArrowDictionaryKeyType, ArrowPrimitiveType, Date32Type, Date64Type, Float16Type, Float32Type,
    Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, TimestampMicrosecondType,
    TimestampMillisecondType, TimestampNanosecondType, TimestampSecondType, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use arrow_array::{Array, ArrayRef, OffsetSizeTrait, PrimitiveArray};
use arrow_schema::{DataType, TimeUnit};
use cjwpandas_model::{
    Categorical, Categories, ColumnData, DataFrame, PeriodFreq, Scalar, Series,
};
use half::f16;

use crate::error::{ConvertError, ConvertResult};
use crate::table::{ArrowTable, ChunkedArray};

const MILLISECONDS_PER_DAY: i64 = 86_400_000;

/// Convert an Arrow table into a frame with the default row index.
pub fn arrow_table_to_pandas_dataframe(table: &ArrowTable) -> ConvertResult<DataFrame> {
    if table.num_columns() == 0 {
        return Ok(DataFrame::with_rows(table.num_rows()));
    }
    let columns = table
        .schema()
        .fields()
        .iter()
        .zip(table.columns())
        .map(|(field, column)| {
            Ok(Series::new(
                field.name().as_str(),
                arrow_chunked_array_to_pandas_series(column)?,
            ))
        })
        .collect::<ConvertResult<Vec<_>>>()?;
    Ok(DataFrame::new(columns)?)
}

/// Convert a chunked Arrow column into column data.
///
/// Chunks are concatenated. Integer columns holding any null are widened to
/// `float64` with NaN nulls, since integer columns cannot hold nulls.
/// Dictionary columns become categoricals whose categories are the
/// dictionary values in order; when chunks carry different dictionaries,
/// later chunks append their new values.
pub fn arrow_chunked_array_to_pandas_series(array: &ChunkedArray) -> ConvertResult<ColumnData> {
    let data = match array.data_type() {
        DataType::Int8 => integer_column::<Int8Type>(array, ColumnData::Int8, f64::from),
        DataType::Int16 => integer_column::<Int16Type>(array, ColumnData::Int16, f64::from),
        DataType::Int32 => integer_column::<Int32Type>(array, ColumnData::Int32, f64::from),
        DataType::Int64 => integer_column::<Int64Type>(array, ColumnData::Int64, |v| v as f64),
        DataType::UInt8 => integer_column::<UInt8Type>(array, ColumnData::UInt8, f64::from),
        DataType::UInt16 => integer_column::<UInt16Type>(array, ColumnData::UInt16, f64::from),
        DataType::UInt32 => integer_column::<UInt32Type>(array, ColumnData::UInt32, f64::from),
        DataType::UInt64 => integer_column::<UInt64Type>(array, ColumnData::UInt64, |v| v as f64),
        DataType::Float16 => ColumnData::Float16(float_values::<Float16Type>(array, f16::NAN)),
        DataType::Float32 => ColumnData::Float32(float_values::<Float32Type>(array, f32::NAN)),
        DataType::Float64 => ColumnData::Float64(float_values::<Float64Type>(array, f64::NAN)),
        DataType::Date32 => ColumnData::Period {
            freq: PeriodFreq::Day,
            ordinals: array
                .chunks()
                .iter()
                .flat_map(|c| c.as_primitive::<Date32Type>().iter())
                .map(|v| v.map(i64::from))
                .collect(),
        },
        DataType::Date64 => ColumnData::Period {
            freq: PeriodFreq::Day,
            ordinals: array
                .chunks()
                .iter()
                .flat_map(|c| c.as_primitive::<Date64Type>().iter())
                .map(|v| v.map(|ms| ms.div_euclid(MILLISECONDS_PER_DAY)))
                .collect(),
        },
        DataType::Timestamp(unit, None) => ColumnData::Datetime {
            tz: None,
            nanos: timestamp_nanos(array, *unit)?,
        },
        DataType::Utf8 => text_column::<i32>(array),
        DataType::LargeUtf8 => text_column::<i64>(array),
        DataType::Dictionary(_, value_type)
            if matches!(value_type.as_ref(), DataType::Utf8 | DataType::LargeUtf8) =>
        {
            categorical_column(array)?
        }
        other => return Err(ConvertError::UnsupportedArrowType(other.clone())),
    };
    Ok(data)
}

fn integer_column<T: ArrowPrimitiveType>(
    array: &ChunkedArray,
    wrap: fn(Vec<T::Native>) -> ColumnData,
    widen: fn(T::Native) -> f64,
) -> ColumnData {
    if array.null_count() == 0 {
        return wrap(
            array
                .chunks()
                .iter()
                .flat_map(|c| c.as_primitive::<T>().values().iter().copied())
                .collect(),
        );
    }

    log::debug!(
        "widening {} column with {} nulls to float64",
        array.data_type(),
        array.null_count()
    );
    ColumnData::Float64(
        array
            .chunks()
            .iter()
            .flat_map(|c| c.as_primitive::<T>().iter())
            .map(|v| v.map_or(f64::NAN, widen))
            .collect(),
    )
}

fn float_values<T: ArrowPrimitiveType>(array: &ChunkedArray, nan: T::Native) -> Vec<T::Native> {
    array
        .chunks()
        .iter()
        .flat_map(|c| c.as_primitive::<T>().iter())
        .map(|v| v.unwrap_or(nan))
        .collect()
}

fn timestamp_nanos(array: &ChunkedArray, unit: TimeUnit) -> ConvertResult<Vec<Option<i64>>> {
    let (scale, unit_name) = match unit {
        TimeUnit::Second => (1_000_000_000, "s"),
        TimeUnit::Millisecond => (1_000_000, "ms"),
        TimeUnit::Microsecond => (1_000, "us"),
        TimeUnit::Nanosecond => (1, "ns"),
    };

    fn scaled<T: ArrowPrimitiveType<Native = i64>>(
        chunk: &ArrayRef,
        scale: i64,
        unit: &'static str,
        out: &mut Vec<Option<i64>>,
    ) -> ConvertResult<()> {
        let chunk: &PrimitiveArray<T> = chunk.as_primitive::<T>();
        for value in chunk.iter() {
            let nanos = value
                .map(|v| {
                    v.checked_mul(scale)
                        .ok_or(ConvertError::TimestampOverflow { value: v, unit })
                })
                .transpose()?;
            out.push(nanos);
        }
        Ok(())
    }

    let mut nanos = Vec::with_capacity(array.len());
    for chunk in array.chunks() {
        match unit {
            TimeUnit::Second => scaled::<TimestampSecondType>(chunk, scale, unit_name, &mut nanos)?,
            TimeUnit::Millisecond => {
                scaled::<TimestampMillisecondType>(chunk, scale, unit_name, &mut nanos)?
            }
            TimeUnit::Microsecond => {
                scaled::<TimestampMicrosecondType>(chunk, scale, unit_name, &mut nanos)?
            }
            TimeUnit::Nanosecond => {
                scaled::<TimestampNanosecondType>(chunk, scale, unit_name, &mut nanos)?
            }
        }
    }
    Ok(nanos)
}

fn text_column<O: OffsetSizeTrait>(array: &ChunkedArray) -> ColumnData {
    ColumnData::Object(
        array
            .chunks()
            .iter()
            .flat_map(|c| c.as_string::<O>().iter())
            .map(|v| v.map(|s| Scalar::Str(s.to_string())))
            .collect(),
    )
}

fn dictionary_strings(values: &ArrayRef) -> ConvertResult<Vec<Option<&str>>> {
    match values.data_type() {
        DataType::Utf8 => Ok(values.as_string::<i32>().iter().collect()),
        DataType::LargeUtf8 => Ok(values.as_string::<i64>().iter().collect()),
        other => Err(ConvertError::UnsupportedArrowType(other.clone())),
    }
}

/// Translate one dictionary chunk's keys into column-wide codes.
///
/// Null keys, negative keys and keys past the dictionary all become nulls, so
/// chunks with an empty dictionary decode as all-null rows.
fn remap_keys<K>(chunk: &ArrayRef, remap: &[Option<u32>], codes: &mut Vec<Option<u32>>)
where
    K: ArrowDictionaryKeyType,
    K::Native: TryInto<usize>,
{
    let keys = chunk.as_dictionary::<K>().keys();
    codes.extend(keys.iter().map(|key| {
        key.and_then(|k| TryInto::<usize>::try_into(k).ok())
            .and_then(|k| remap.get(k).copied().flatten())
    }));
}

fn categorical_column(array: &ChunkedArray) -> ConvertResult<ColumnData> {
    let mut categories: Vec<String> = Vec::new();
    let mut lookup: HashMap<String, u32> = HashMap::new();
    let mut codes: Vec<Option<u32>> = Vec::with_capacity(array.len());

    for chunk in array.chunks() {
        let dictionary = chunk.as_any_dictionary();

        // Chunk-local key -> column-wide code. A null dictionary value maps
        // to a null row.
        let remap: Vec<Option<u32>> = dictionary_strings(dictionary.values())?
            .into_iter()
            .map(|value| {
                value.map(|s| {
                    *lookup.entry(s.to_string()).or_insert_with(|| {
                        categories.push(s.to_string());
                        (categories.len() - 1) as u32
                    })
                })
            })
            .collect();

        let DataType::Dictionary(key_type, _) = chunk.data_type() else {
            return Err(ConvertError::UnsupportedArrowType(chunk.data_type().clone()));
        };
        match key_type.as_ref() {
            DataType::Int8 => remap_keys::<Int8Type>(chunk, &remap, &mut codes),
            DataType::Int16 => remap_keys::<Int16Type>(chunk, &remap, &mut codes),
            DataType::Int32 => remap_keys::<Int32Type>(chunk, &remap, &mut codes),
            DataType::Int64 => remap_keys::<Int64Type>(chunk, &remap, &mut codes),
            DataType::UInt8 => remap_keys::<UInt8Type>(chunk, &remap, &mut codes),
            DataType::UInt16 => remap_keys::<UInt16Type>(chunk, &remap, &mut codes),
            DataType::UInt32 => remap_keys::<UInt32Type>(chunk, &remap, &mut codes),
            DataType::UInt64 => remap_keys::<UInt64Type>(chunk, &remap, &mut codes),
            other => return Err(ConvertError::UnsupportedArrowType(other.clone())),
        }
    }

    if array.chunks().len() > 1 {
        log::debug!(
            "unified {} dictionary chunks into {} categories",
            array.chunks().len(),
            categories.len()
        );
    }

    let categories = Categories::Object(categories.into_iter().map(Scalar::Str).collect());
    Ok(ColumnData::Categorical(Categorical::try_new(
        categories, codes,
    )?))
}
