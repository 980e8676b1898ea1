use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::ops::Range;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use half::f16;

use crate::dtype::{ColumnType, Dtype, PeriodFreq};
use crate::frame::FrameError;
use crate::label::Label;

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// A single value stored in an `object` column or an object category list.
#[derive(Clone, Debug)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Str(a), Scalar::Str(b)) => a == b,
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            (Scalar::Float(a), Scalar::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => f.write_str(s),
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

/// The declared category list of a categorical column.
///
/// Only `Object` lists of strings are valid; numeric lists exist because
/// hosts produce them (e.g. categorizing an all-NaN float column).
#[derive(Clone, Debug)]
pub enum Categories {
    Object(Vec<Scalar>),
    Int64(Vec<i64>),
    Float64(Vec<f64>),
}

impl Categories {
    pub fn len(&self) -> usize {
        match self {
            Categories::Object(v) => v.len(),
            Categories::Int64(v) => v.len(),
            Categories::Float64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> Dtype {
        match self {
            Categories::Object(_) => Dtype::Object,
            Categories::Int64(_) => Dtype::Int64,
            Categories::Float64(_) => Dtype::Float64,
        }
    }

    /// The text of category `index`, when it is a string.
    pub fn get_str(&self, index: usize) -> Option<&str> {
        match self {
            Categories::Object(v) => v.get(index).and_then(Scalar::as_str),
            Categories::Int64(_) | Categories::Float64(_) => None,
        }
    }

    /// Human-readable rendering of category `index` for messages.
    pub fn display_at(&self, index: usize) -> String {
        match self {
            Categories::Object(v) => v.get(index).map(ToString::to_string),
            Categories::Int64(v) => v.get(index).map(ToString::to_string),
            Categories::Float64(v) => v.get(index).map(ToString::to_string),
        }
        .unwrap_or_default()
    }
}

impl PartialEq for Categories {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Categories::Object(a), Categories::Object(b)) => a == b,
            (Categories::Int64(a), Categories::Int64(b)) => a == b,
            (Categories::Float64(a), Categories::Float64(b)) => slices_eq_nan(a, b, f64::is_nan),
            _ => false,
        }
    }
}

/// A categorical column: a category list plus one optional code per row.
///
/// A `None` code is a null row. Nulls never occupy a slot in the category
/// list, so code `0` always means the first category.
#[derive(Clone, Debug, PartialEq)]
pub struct Categorical {
    categories: Categories,
    codes: Vec<Option<u32>>,
}

impl Categorical {
    /// Build from an explicit category list and codes.
    ///
    /// Every code must index into `categories`.
    pub fn try_new(categories: Categories, codes: Vec<Option<u32>>) -> Result<Self, FrameError> {
        let len = categories.len();
        if let Some((row, code)) = codes
            .iter()
            .enumerate()
            .find_map(|(row, code)| code.filter(|c| *c as usize >= len).map(|c| (row, c)))
        {
            return Err(FrameError::CategoryCodeOutOfRange {
                row,
                code,
                categories: len,
            });
        }
        Ok(Self { categories, codes })
    }

    /// Categorize text values; categories are the distinct values in
    /// lexical order.
    pub fn from_values<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        let values: Vec<Option<&str>> = values.into_iter().collect();
        let distinct: BTreeSet<&str> = values.iter().flatten().copied().collect();
        let categories: Vec<String> = distinct.into_iter().map(str::to_string).collect();
        Self::with_categories(categories, values)
    }

    /// Categorize text values against a declared category list.
    ///
    /// Values missing from `categories` become nulls. Declared categories that
    /// no value references are kept.
    pub fn with_categories<'a>(
        categories: Vec<String>,
        values: impl IntoIterator<Item = Option<&'a str>>,
    ) -> Self {
        let lookup: HashMap<&str, u32> = categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i as u32))
            .collect();
        let codes = values
            .into_iter()
            .map(|v| v.and_then(|v| lookup.get(v).copied()))
            .collect();
        Self {
            categories: Categories::Object(categories.into_iter().map(Scalar::Str).collect()),
            codes,
        }
    }

    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    pub fn codes(&self) -> &[Option<u32>] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// The text value at `row`, or `None` for a null row.
    pub fn get_str(&self, row: usize) -> Option<&str> {
        let code = (*self.codes.get(row)?)?;
        self.categories.get_str(code as usize)
    }

    /// Drop categories no row references, renumbering codes to match.
    pub fn remove_unused_categories(&self) -> Self {
        let mut used = vec![false; self.categories.len()];
        for code in self.codes.iter().flatten() {
            used[*code as usize] = true;
        }

        let mut remap: Vec<Option<u32>> = Vec::with_capacity(used.len());
        let mut next = 0u32;
        for is_used in &used {
            if *is_used {
                remap.push(Some(next));
                next += 1;
            } else {
                remap.push(None);
            }
        }

        fn keep<T: Clone>(values: &[T], used: &[bool]) -> Vec<T> {
            values
                .iter()
                .zip(used)
                .filter_map(|(v, u)| u.then(|| v.clone()))
                .collect()
        }

        let categories = match &self.categories {
            Categories::Object(v) => Categories::Object(keep(v, &used)),
            Categories::Int64(v) => Categories::Int64(keep(v, &used)),
            Categories::Float64(v) => Categories::Float64(keep(v, &used)),
        };
        let codes = self
            .codes
            .iter()
            .map(|code| code.and_then(|c| remap[c as usize]))
            .collect();
        Self { categories, codes }
    }

    fn slice(&self, range: Range<usize>) -> Self {
        Self {
            categories: self.categories.clone(),
            codes: self.codes[range].to_vec(),
        }
    }
}

/// Storage for one column.
///
/// Integer columns have no nulls. Float columns use NaN as their null marker.
/// Every other variant stores an explicit `Option` per row.
#[derive(Clone, Debug)]
pub enum ColumnData {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Float16(Vec<f16>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Object(Vec<Option<Scalar>>),
    Categorical(Categorical),
    /// Period ordinals. For `PeriodFreq::Day` these are days since 1970-01-01.
    Period {
        freq: PeriodFreq,
        ordinals: Vec<Option<i64>>,
    },
    /// Nanoseconds since the Unix epoch.
    Datetime {
        tz: Option<String>,
        nanos: Vec<Option<i64>>,
    },
    /// A column whose host dtype we cannot represent; only its name and
    /// length are kept.
    Opaque { dtype: String, len: usize },
}

impl ColumnData {
    /// An `object` column of strings.
    pub fn text<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        ColumnData::Object(
            values
                .into_iter()
                .map(|v| v.map(|s| Scalar::Str(s.to_string())))
                .collect(),
        )
    }

    /// A `period[D]` column from calendar dates.
    pub fn period_days_from_dates(dates: impl IntoIterator<Item = Option<NaiveDate>>) -> Self {
        ColumnData::Period {
            freq: PeriodFreq::Day,
            ordinals: dates
                .into_iter()
                .map(|d| d.map(|d| i64::from(d.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE))
                .collect(),
        }
    }

    /// A naive `datetime64[ns]` column.
    pub fn datetimes_from_naive(
        values: impl IntoIterator<Item = Option<NaiveDateTime>>,
    ) -> Result<Self, FrameError> {
        let nanos = values
            .into_iter()
            .map(|v| match v {
                None => Ok(None),
                Some(dt) => dt
                    .and_utc()
                    .timestamp_nanos_opt()
                    .map(Some)
                    .ok_or(FrameError::TimestampOutOfRange(dt)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ColumnData::Datetime { tz: None, nanos })
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int8(v) => v.len(),
            ColumnData::Int16(v) => v.len(),
            ColumnData::Int32(v) => v.len(),
            ColumnData::Int64(v) => v.len(),
            ColumnData::UInt8(v) => v.len(),
            ColumnData::UInt16(v) => v.len(),
            ColumnData::UInt32(v) => v.len(),
            ColumnData::UInt64(v) => v.len(),
            ColumnData::Float16(v) => v.len(),
            ColumnData::Float32(v) => v.len(),
            ColumnData::Float64(v) => v.len(),
            ColumnData::Object(v) => v.len(),
            ColumnData::Categorical(c) => c.len(),
            ColumnData::Period { ordinals, .. } => ordinals.len(),
            ColumnData::Datetime { nanos, .. } => nanos.len(),
            ColumnData::Opaque { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> Dtype {
        match self {
            ColumnData::Int8(_) => Dtype::Int8,
            ColumnData::Int16(_) => Dtype::Int16,
            ColumnData::Int32(_) => Dtype::Int32,
            ColumnData::Int64(_) => Dtype::Int64,
            ColumnData::UInt8(_) => Dtype::UInt8,
            ColumnData::UInt16(_) => Dtype::UInt16,
            ColumnData::UInt32(_) => Dtype::UInt32,
            ColumnData::UInt64(_) => Dtype::UInt64,
            ColumnData::Float16(_) => Dtype::Float16,
            ColumnData::Float32(_) => Dtype::Float32,
            ColumnData::Float64(_) => Dtype::Float64,
            ColumnData::Object(_) => Dtype::Object,
            ColumnData::Categorical(_) => Dtype::Category,
            ColumnData::Period { freq, .. } => Dtype::Period(*freq),
            ColumnData::Datetime { tz, .. } => Dtype::Datetime64 { tz: tz.clone() },
            ColumnData::Opaque { dtype, .. } => Dtype::Other(dtype.clone()),
        }
    }

    /// The supported semantic type of this column, if it has one.
    pub fn column_type(&self) -> Option<ColumnType> {
        ColumnType::from_dtype(&self.dtype())
    }

    pub fn null_count(&self) -> usize {
        match self {
            ColumnData::Int8(_)
            | ColumnData::Int16(_)
            | ColumnData::Int32(_)
            | ColumnData::Int64(_)
            | ColumnData::UInt8(_)
            | ColumnData::UInt16(_)
            | ColumnData::UInt32(_)
            | ColumnData::UInt64(_)
            | ColumnData::Opaque { .. } => 0,
            ColumnData::Float16(v) => v.iter().filter(|x| x.is_nan()).count(),
            ColumnData::Float32(v) => v.iter().filter(|x| x.is_nan()).count(),
            ColumnData::Float64(v) => v.iter().filter(|x| x.is_nan()).count(),
            ColumnData::Object(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Categorical(c) => c.codes().iter().filter(|x| x.is_none()).count(),
            ColumnData::Period { ordinals, .. } => ordinals.iter().filter(|x| x.is_none()).count(),
            ColumnData::Datetime { nanos, .. } => nanos.iter().filter(|x| x.is_none()).count(),
        }
    }

    /// Rows `range` of this column. Panics if `range` is out of bounds.
    pub fn slice(&self, range: Range<usize>) -> Self {
        match self {
            ColumnData::Int8(v) => ColumnData::Int8(v[range].to_vec()),
            ColumnData::Int16(v) => ColumnData::Int16(v[range].to_vec()),
            ColumnData::Int32(v) => ColumnData::Int32(v[range].to_vec()),
            ColumnData::Int64(v) => ColumnData::Int64(v[range].to_vec()),
            ColumnData::UInt8(v) => ColumnData::UInt8(v[range].to_vec()),
            ColumnData::UInt16(v) => ColumnData::UInt16(v[range].to_vec()),
            ColumnData::UInt32(v) => ColumnData::UInt32(v[range].to_vec()),
            ColumnData::UInt64(v) => ColumnData::UInt64(v[range].to_vec()),
            ColumnData::Float16(v) => ColumnData::Float16(v[range].to_vec()),
            ColumnData::Float32(v) => ColumnData::Float32(v[range].to_vec()),
            ColumnData::Float64(v) => ColumnData::Float64(v[range].to_vec()),
            ColumnData::Object(v) => ColumnData::Object(v[range].to_vec()),
            ColumnData::Categorical(c) => ColumnData::Categorical(c.slice(range)),
            ColumnData::Period { freq, ordinals } => ColumnData::Period {
                freq: *freq,
                ordinals: ordinals[range].to_vec(),
            },
            ColumnData::Datetime { tz, nanos } => ColumnData::Datetime {
                tz: tz.clone(),
                nanos: nanos[range].to_vec(),
            },
            ColumnData::Opaque { dtype, len } => {
                assert!(range.end <= *len, "slice out of bounds");
                ColumnData::Opaque {
                    dtype: dtype.clone(),
                    len: range.len(),
                }
            }
        }
    }
}

fn slices_eq_nan<T: PartialEq + Copy>(a: &[T], b: &[T], is_nan: fn(T) -> bool) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| x == y || (is_nan(*x) && is_nan(*y)))
}

// Float nulls are NaN, so equality has to treat NaN == NaN.
impl PartialEq for ColumnData {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ColumnData::Int8(a), ColumnData::Int8(b)) => a == b,
            (ColumnData::Int16(a), ColumnData::Int16(b)) => a == b,
            (ColumnData::Int32(a), ColumnData::Int32(b)) => a == b,
            (ColumnData::Int64(a), ColumnData::Int64(b)) => a == b,
            (ColumnData::UInt8(a), ColumnData::UInt8(b)) => a == b,
            (ColumnData::UInt16(a), ColumnData::UInt16(b)) => a == b,
            (ColumnData::UInt32(a), ColumnData::UInt32(b)) => a == b,
            (ColumnData::UInt64(a), ColumnData::UInt64(b)) => a == b,
            (ColumnData::Float16(a), ColumnData::Float16(b)) => slices_eq_nan(a, b, f16::is_nan),
            (ColumnData::Float32(a), ColumnData::Float32(b)) => slices_eq_nan(a, b, f32::is_nan),
            (ColumnData::Float64(a), ColumnData::Float64(b)) => slices_eq_nan(a, b, f64::is_nan),
            (ColumnData::Object(a), ColumnData::Object(b)) => a == b,
            (ColumnData::Categorical(a), ColumnData::Categorical(b)) => a == b,
            (
                ColumnData::Period {
                    freq: fa,
                    ordinals: a,
                },
                ColumnData::Period {
                    freq: fb,
                    ordinals: b,
                },
            ) => fa == fb && a == b,
            (
                ColumnData::Datetime { tz: ta, nanos: a },
                ColumnData::Datetime { tz: tb, nanos: b },
            ) => ta == tb && a == b,
            (
                ColumnData::Opaque { dtype: da, len: la },
                ColumnData::Opaque { dtype: db, len: lb },
            ) => da == db && la == lb,
            _ => false,
        }
    }
}

/// A named column.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub name: Label,
    pub data: ColumnData,
}

impl Series {
    pub fn new(name: impl Into<Label>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dtype(&self) -> Dtype {
        self.data.dtype()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn from_values_sorts_categories_and_keeps_nulls_out_of_band() {
        let cat = Categorical::from_values([Some("b"), None, Some("a"), Some("b")]);
        assert_eq!(
            cat.categories(),
            &Categories::Object(vec![Scalar::from("a"), Scalar::from("b")])
        );
        assert_eq!(cat.codes(), &[Some(1), None, Some(0), Some(1)]);
        assert_eq!(cat.get_str(2), Some("a"));
        assert_eq!(cat.get_str(1), None);
    }

    #[test]
    fn with_categories_nulls_out_values_outside_the_list() {
        let cat = Categorical::with_categories(
            vec!["a".to_string(), "b".to_string()],
            [Some("a"), Some("z")],
        );
        assert_eq!(cat.codes(), &[Some(0), None]);
    }

    #[test]
    fn remove_unused_categories_renumbers_codes() {
        let cat = Categorical::with_categories(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            [Some("c"), None, Some("a")],
        );
        let trimmed = cat.remove_unused_categories();
        assert_eq!(
            trimmed.categories(),
            &Categories::Object(vec![Scalar::from("a"), Scalar::from("c")])
        );
        assert_eq!(trimmed.codes(), &[Some(1), None, Some(0)]);
    }

    #[test]
    fn try_new_rejects_codes_past_the_category_list() {
        let err = Categorical::try_new(Categories::Object(vec![Scalar::from("a")]), vec![Some(1)])
            .unwrap_err();
        assert_eq!(
            err,
            FrameError::CategoryCodeOutOfRange {
                row: 0,
                code: 1,
                categories: 1
            }
        );
    }

    #[test]
    fn float_equality_treats_nan_as_null() {
        assert_eq!(
            ColumnData::Float64(vec![1.0, f64::NAN]),
            ColumnData::Float64(vec![1.0, f64::NAN])
        );
        assert_ne!(
            ColumnData::Float64(vec![1.0, f64::NAN]),
            ColumnData::Float32(vec![1.0, f32::NAN])
        );
        assert_eq!(ColumnData::Float64(vec![1.0, f64::NAN]).null_count(), 1);
    }

    #[test]
    fn dates_become_day_ordinals_since_epoch() {
        let data = ColumnData::period_days_from_dates([
            NaiveDate::from_ymd_opt(1970, 1, 1),
            NaiveDate::from_ymd_opt(2021, 4, 5),
            None,
        ]);
        assert_eq!(
            data,
            ColumnData::Period {
                freq: PeriodFreq::Day,
                ordinals: vec![Some(0), Some(18_722), None],
            }
        );
    }

    #[test]
    fn datetimes_out_of_nanosecond_range_are_rejected() {
        let far = NaiveDate::from_ymd_opt(3000, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        assert_eq!(
            ColumnData::datetimes_from_naive([Some(far)]),
            Err(FrameError::TimestampOutOfRange(far))
        );
    }
}
