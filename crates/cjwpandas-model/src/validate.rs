//! Schema checks a [`DataFrame`] must pass before it may be converted.
//!
//! Checks run in a fixed order and stop at the first failure:
//! row index, column-name types, each column name, column-name uniqueness,
//! then for each column in turn: dtype, string values, categories, infinity.
use std::collections::HashSet;

use thiserror::Error;

use crate::bitmap::BitVec;
use crate::column::{Categorical, Categories, ColumnData, Scalar, Series};
use crate::frame::DataFrame;
use crate::label::Label;
use crate::settings::Settings;

/// Why a frame was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("must use the default RangeIndex; try reset_index() before returning the table")]
    NonDefaultIndex,
    #[error("column names must have dtype=object, and all column names must be str")]
    ColumnNamesNotText,
    #[error("column names must all be str")]
    ColumnNamesMixed,
    #[error("column name must not be empty")]
    EmptyColumnName,
    #[error("column name {name:?} must not contain ASCII control characters")]
    ColumnNameControlCharacter { name: String },
    #[error("column name {name:?} must not contain Unicode surrogates")]
    ColumnNameSurrogate { name: String },
    #[error("column name '{name}' must contain {max_bytes} bytes or fewer")]
    ColumnNameTooLong { name: String, max_bytes: usize },
    #[error("column name '{name}' must not appear more than once")]
    DuplicateColumnName { name: String },
    #[error("unsupported dtype {dtype} in column '{column}'")]
    UnsupportedDtype { dtype: String, column: String },
    #[error("column '{column}' values must all be str")]
    ValuesNotStr { column: String },
    #[error("column '{column}' categories must have dtype=object")]
    CategoriesNotObject { column: String },
    #[error("column '{column}' has unused category '{category}'; remove unused categories")]
    UnusedCategory { column: String, category: String },
    #[error("invalid value {value} in column '{column}', row {row} (infinity is not supported)")]
    Infinity {
        value: String,
        column: String,
        row: usize,
    },
}

/// Check that `df` satisfies every invariant the columnar converter relies on.
///
/// Only the first violation is reported.
pub fn validate_dataframe(df: &DataFrame, settings: &Settings) -> Result<(), ValidationError> {
    let result = check_dataframe(df, settings);
    if let Err(err) = &result {
        log::debug!("dataframe failed validation: {err}");
    }
    result
}

fn check_dataframe(df: &DataFrame, settings: &Settings) -> Result<(), ValidationError> {
    if !df.index().is_default_range() {
        return Err(ValidationError::NonDefaultIndex);
    }

    let names: Vec<&Label> = df.columns().iter().map(|s| &s.name).collect();
    check_column_name_types(&names)?;

    let mut texts = Vec::with_capacity(names.len());
    for name in &names {
        texts.push(validate_column_name(name, settings)?);
    }

    let mut seen = HashSet::with_capacity(texts.len());
    for text in &texts {
        if !seen.insert(text.as_str()) {
            return Err(ValidationError::DuplicateColumnName { name: text.clone() });
        }
    }

    for (series, name) in df.columns().iter().zip(&texts) {
        validate_series(series, name)?;
    }

    Ok(())
}

fn check_column_name_types(names: &[&Label]) -> Result<(), ValidationError> {
    let text_count = names.iter().filter(|n| n.is_text()).count();
    if text_count == names.len() {
        Ok(())
    } else if text_count == 0 {
        Err(ValidationError::ColumnNamesNotText)
    } else {
        Err(ValidationError::ColumnNamesMixed)
    }
}

/// Validate one text column name and return it as a `String`.
fn validate_column_name(name: &Label, settings: &Settings) -> Result<String, ValidationError> {
    let text = match name {
        Label::Str(s) => {
            if s.is_empty() {
                return Err(ValidationError::EmptyColumnName);
            }
            if s.chars().any(|c| c.is_ascii_control()) {
                return Err(ValidationError::ColumnNameControlCharacter { name: s.clone() });
            }
            s.clone()
        }
        Label::Utf16(units) => {
            if units.is_empty() {
                return Err(ValidationError::EmptyColumnName);
            }
            if units
                .iter()
                .any(|u| u8::try_from(*u).is_ok_and(|b| b.is_ascii_control()))
            {
                return Err(ValidationError::ColumnNameControlCharacter {
                    name: name.to_string(),
                });
            }
            String::from_utf16(units).map_err(|_| ValidationError::ColumnNameSurrogate {
                name: name.to_string(),
            })?
        }
        Label::Int(_) => return Err(ValidationError::ColumnNamesMixed),
    };

    if text.len() > settings.max_bytes_per_column_name {
        return Err(ValidationError::ColumnNameTooLong {
            name: text,
            max_bytes: settings.max_bytes_per_column_name,
        });
    }
    Ok(text)
}

fn validate_series(series: &Series, column: &str) -> Result<(), ValidationError> {
    if series.data.column_type().is_none() {
        return Err(ValidationError::UnsupportedDtype {
            dtype: series.dtype().to_string(),
            column: column.to_string(),
        });
    }

    match &series.data {
        ColumnData::Object(values) => {
            if values.iter().flatten().any(|v| !matches!(v, Scalar::Str(_))) {
                return Err(ValidationError::ValuesNotStr {
                    column: column.to_string(),
                });
            }
        }
        ColumnData::Categorical(categorical) => validate_categorical(categorical, column)?,
        ColumnData::Float16(values) => {
            check_finite(values.iter().map(|v| v.to_f64()), column)?;
        }
        ColumnData::Float32(values) => {
            check_finite(values.iter().map(|v| f64::from(*v)), column)?;
        }
        ColumnData::Float64(values) => check_finite(values.iter().copied(), column)?,
        _ => {}
    }

    Ok(())
}

fn validate_categorical(categorical: &Categorical, column: &str) -> Result<(), ValidationError> {
    let categories = categorical.categories();
    let all_str = match categories {
        Categories::Object(values) => values.iter().all(|v| matches!(v, Scalar::Str(_))),
        Categories::Int64(values) => values.is_empty(),
        Categories::Float64(values) => values.is_empty(),
    };
    if !all_str {
        return Err(ValidationError::ValuesNotStr {
            column: column.to_string(),
        });
    }

    if !matches!(categories, Categories::Object(_)) {
        return Err(ValidationError::CategoriesNotObject {
            column: column.to_string(),
        });
    }

    // Null rows carry no code, so they can never mark a category as used.
    let mut used = BitVec::with_len_all_false(categories.len());
    for code in categorical.codes().iter().flatten() {
        used.insert(*code as usize);
        if used.count_ones() == used.len() {
            break;
        }
    }

    if !used.all_true() {
        if let Some(index) = used.first_zero() {
            return Err(ValidationError::UnusedCategory {
                column: column.to_string(),
                category: categories.display_at(index),
            });
        }
    }

    Ok(())
}

fn check_finite(values: impl Iterator<Item = f64>, column: &str) -> Result<(), ValidationError> {
    for (row, value) in values.enumerate() {
        if value.is_infinite() {
            return Err(ValidationError::Infinity {
                value: value.to_string(),
                column: column.to_string(),
                row,
            });
        }
    }
    Ok(())
}
