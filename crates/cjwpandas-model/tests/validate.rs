use cjwpandas_model::{
    validate_dataframe, Categorical, Categories, ColumnData, DataFrame, Label, PeriodFreq, Scalar,
    Series, Settings, ValidationError,
};
use pretty_assertions::assert_eq;

fn frame(columns: Vec<Series>) -> DataFrame {
    DataFrame::new(columns).expect("columns share a row count")
}

fn validate(df: &DataFrame) -> Result<(), ValidationError> {
    validate_dataframe(df, &Settings::default())
}

#[track_caller]
fn assert_rejected(df: &DataFrame, needle: &str) {
    match validate(df) {
        Ok(()) => panic!("expected validation to fail with {needle:?}"),
        Err(err) => {
            let message = err.to_string();
            assert!(
                message.contains(needle),
                "expected {needle:?} in {message:?}"
            );
        }
    }
}

fn categorical(categories: &[&str], values: &[Option<&str>]) -> ColumnData {
    ColumnData::Categorical(Categorical::with_categories(
        categories.iter().map(|c| c.to_string()).collect(),
        values.iter().copied(),
    ))
}

#[test]
fn plain_integer_frame_is_valid() {
    let df = frame(vec![Series::new("A", ColumnData::Int64(vec![1, 2, 3]))]);
    assert_eq!(validate(&df), Ok(()));
}

#[test]
fn sliced_frame_needs_default_index() {
    let df = frame(vec![Series::new("A", ColumnData::Int64(vec![1, 2]))]).slice(1..2);
    assert_eq!(validate(&df), Err(ValidationError::NonDefaultIndex));
    assert_rejected(&df, "must use the default RangeIndex");
}

#[test]
fn index_is_checked_before_column_names() {
    let df = frame(vec![
        Series::new("A", ColumnData::Int64(vec![1, 2])),
        Series::new("A", ColumnData::Int64(vec![1, 2])),
    ])
    .slice(1..2);
    assert_rejected(&df, "must use the default RangeIndex");
}

#[test]
fn object_values_must_be_str() {
    let df = frame(vec![Series::new(
        "foo",
        ColumnData::Object(vec![Some(Scalar::from("a")), Some(Scalar::Int(1))]),
    )]);
    assert_rejected(&df, "must all be str");
}

#[test]
fn object_nulls_are_allowed() {
    let df = frame(vec![Series::new("foo", ColumnData::text([Some("a"), None]))]);
    assert_eq!(validate(&df), Ok(()));
}

#[test]
fn empty_numeric_categories_need_object_dtype() {
    // Categorizing an all-NaN float column yields an empty float64 category list.
    let categorical = Categorical::try_new(Categories::Float64(Vec::new()), vec![None]).unwrap();
    let df = frame(vec![Series::new("foo", ColumnData::Categorical(categorical))]);
    assert_rejected(&df, "must have dtype=object");
}

#[test]
fn categories_must_be_str() {
    let categorical = Categorical::try_new(
        Categories::Object(vec![Scalar::Int(1), Scalar::from("a")]),
        vec![Some(1), Some(0)],
    )
    .unwrap();
    let df = frame(vec![Series::new("foo", ColumnData::Categorical(categorical))]);
    assert_rejected(&df, "must all be str");
}

#[test]
fn numeric_categories_are_not_str() {
    let categorical =
        Categorical::try_new(Categories::Int64(vec![1, 2]), vec![Some(0), Some(1)]).unwrap();
    let df = frame(vec![Series::new("foo", ColumnData::Categorical(categorical))]);
    assert_rejected(&df, "must all be str");
}

#[test]
fn categories_are_checked_even_without_rows() {
    let categorical = Categorical::try_new(
        Categories::Object(vec![Scalar::Float(1.5)]),
        Vec::new(),
    )
    .unwrap();
    let df = frame(vec![Series::new("foo", ColumnData::Categorical(categorical))]);
    assert_rejected(&df, "must all be str");
}

#[test]
fn unused_category_is_named() {
    let df = frame(vec![Series::new(
        "foo",
        categorical(&["a", "b"], &[Some("a"), Some("a")]),
    )]);
    assert_eq!(
        validate(&df),
        Err(ValidationError::UnusedCategory {
            column: "foo".to_string(),
            category: "b".to_string(),
        })
    );
    assert_rejected(&df, "unused category 'b'");
}

#[test]
fn null_is_not_a_category() {
    let df = frame(vec![Series::new(
        "foo",
        categorical(&["a", "b"], &[Some("a"), None]),
    )]);
    assert_rejected(&df, "unused category 'b'");
}

#[test]
fn first_category_can_be_unused() {
    let df = frame(vec![Series::new(
        "foo",
        categorical(&["a", "b"], &[Some("b"), None]),
    )]);
    assert_rejected(&df, "unused category 'a'");
}

#[test]
fn removing_unused_categories_makes_column_valid() {
    let ColumnData::Categorical(cat) = categorical(&["a", "b", "c"], &[Some("c"), Some("a")]) else {
        unreachable!()
    };
    let df = frame(vec![Series::new(
        "foo",
        ColumnData::Categorical(cat.remove_unused_categories()),
    )]);
    assert_eq!(validate(&df), Ok(()));
}

#[test]
fn empty_categorical_is_valid() {
    let df = frame(vec![Series::new(
        "A",
        ColumnData::Categorical(Categorical::from_values([])),
    )]);
    assert_eq!(validate(&df), Ok(()));
}

#[test]
fn column_names_must_be_unique() {
    let df = frame(vec![
        Series::new("A", ColumnData::Int64(vec![1])),
        Series::new("B", ColumnData::Int64(vec![2])),
    ])
    .with_column_names(vec![Label::from("A"), Label::from("A")]);
    assert_rejected(&df, "must not appear more than once");
}

#[test]
fn utf16_and_utf8_spellings_of_one_name_collide() {
    let df = frame(vec![
        Series::new("A", ColumnData::Int64(vec![1])),
        Series::new(Label::Utf16("A".encode_utf16().collect()), ColumnData::Int64(vec![2])),
    ]);
    assert_rejected(&df, "must not appear more than once");
}

#[test]
fn column_name_must_not_be_empty() {
    let df = frame(vec![
        Series::new("", ColumnData::Int64(vec![1])),
        Series::new("B", ColumnData::Int64(vec![2])),
    ]);
    assert_rejected(&df, "must not be empty");
}

#[test]
fn empty_names_are_reported_before_duplicates() {
    let df = frame(vec![
        Series::new("", ColumnData::Int64(vec![1])),
        Series::new("", ColumnData::Int64(vec![2])),
    ]);
    assert_eq!(validate(&df), Err(ValidationError::EmptyColumnName));
}

#[test]
fn period_day_is_supported() {
    let df = frame(vec![Series::new(
        "A",
        ColumnData::period_days_from_dates([
            chrono::NaiveDate::from_ymd_opt(2020, 1, 1),
            chrono::NaiveDate::from_ymd_opt(2021, 3, 9),
            None,
        ]),
    )]);
    assert_eq!(validate(&df), Ok(()));
}

#[test]
fn period_month_is_unsupported() {
    let df = frame(vec![Series::new(
        "A",
        ColumnData::Period {
            freq: PeriodFreq::Month,
            ordinals: vec![Some(600), Some(614), None],
        },
    )]);
    assert_rejected(&df, "unsupported dtype period[M] in column 'A'");
}

#[test]
fn interval_is_unsupported() {
    let df = frame(vec![Series::new(
        "A",
        ColumnData::Opaque {
            dtype: "interval[int64, right]".to_string(),
            len: 1,
        },
    )]);
    assert_rejected(&df, "unsupported dtype");
}

#[test]
fn naive_datetime_is_supported() {
    let ts = chrono::NaiveDate::from_ymd_opt(2019, 4, 23)
        .and_then(|d| d.and_hms_opt(12, 34, 0))
        .unwrap();
    let df = frame(vec![Series::new(
        "A",
        ColumnData::datetimes_from_naive([Some(ts)]).unwrap(),
    )]);
    assert_eq!(validate(&df), Ok(()));
}

#[test]
fn zoned_datetime_is_unsupported() {
    let df = frame(vec![Series::new(
        "A",
        ColumnData::Datetime {
            tz: Some("UTC-05:00".to_string()),
            nanos: vec![Some(1_556_040_840_000_000_000)],
        },
    )]);
    assert_rejected(&df, "unsupported dtype datetime64[ns, UTC-05:00] in column 'A'");
}

#[test]
fn nullable_int_is_unsupported() {
    let df = frame(vec![Series::new(
        "A",
        ColumnData::Opaque {
            dtype: "Int64".to_string(),
            len: 2,
        },
    )]);
    assert_rejected(&df, "unsupported dtype Int64");
}

#[test]
fn complex_is_unsupported() {
    let df = frame(vec![Series::new(
        "A",
        ColumnData::Opaque {
            dtype: "complex128".to_string(),
            len: 3,
        },
    )]);
    assert_rejected(&df, "unsupported dtype complex128");
}

#[test]
fn infinity_is_not_supported() {
    let df = frame(vec![Series::new(
        "A",
        ColumnData::Float64(vec![1.0, f64::NEG_INFINITY, f64::INFINITY, f64::NAN]),
    )]);
    assert_rejected(
        &df,
        "invalid value -inf in column 'A', row 1 (infinity is not supported)",
    );
}

#[test]
fn float32_infinity_names_the_row() {
    let df = frame(vec![
        Series::new("A", ColumnData::Int8(vec![1, 2])),
        Series::new("B", ColumnData::Float32(vec![f32::INFINITY, 1.0])),
    ]);
    assert_rejected(&df, "invalid value inf in column 'B', row 0");
}

#[test]
fn float16_infinity_is_rejected() {
    let df = frame(vec![Series::new(
        "A",
        ColumnData::Float16(vec![half::f16::ONE, half::f16::NEG_INFINITY]),
    )]);
    assert_rejected(&df, "invalid value -inf in column 'A', row 1");
}

#[test]
fn columns_are_checked_in_order() {
    let df = frame(vec![
        Series::new(
            "A",
            ColumnData::Opaque {
                dtype: "complex128".to_string(),
                len: 1,
            },
        ),
        Series::new("B", ColumnData::Float64(vec![f64::INFINITY])),
    ]);
    assert_rejected(&df, "unsupported dtype complex128 in column 'A'");
}

#[test]
fn non_text_column_names_are_rejected() {
    let df = frame(vec![Series::new(Label::Int(1), ColumnData::Int64(vec![1]))]);
    assert_rejected(&df, "column names");
}

#[test]
fn mixed_column_names_are_rejected() {
    let df = frame(vec![
        Series::new("A", ColumnData::Int64(vec![1])),
        Series::new(Label::Int(2), ColumnData::Int64(vec![2])),
    ]);
    assert_rejected(&df, "column names");
}

#[test]
fn column_names_reject_control_characters() {
    let df = frame(vec![Series::new("A\x01", ColumnData::Int64(vec![1]))]);
    assert_rejected(&df, "ASCII control characters");
}

#[test]
fn column_names_reject_surrogates() {
    let mut units: Vec<u16> = "A ".encode_utf16().collect();
    units.push(0xD800);
    units.extend(" B".encode_utf16());
    let df = frame(vec![Series::new(Label::Utf16(units), ColumnData::Int64(vec![1]))]);
    assert_rejected(&df, "Unicode surrogates");
}

#[test]
fn column_name_length_follows_settings() {
    let df = frame(vec![Series::new("01234567890", ColumnData::Int64(vec![1]))]);
    let settings = Settings {
        max_bytes_per_column_name: 10,
    };
    let err = validate_dataframe(&df, &settings).unwrap_err();
    assert!(err.to_string().contains("must contain 10 bytes or fewer"));

    // The default limit is far above eleven bytes.
    assert_eq!(validate(&df), Ok(()));
}
