use std::fmt;

/// Calendar granularity of a period column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PeriodFreq {
    Day,
    Week,
    Month,
    Quarter,
    Year,
    Hour,
}

impl PeriodFreq {
    pub fn as_str(self) -> &'static str {
        match self {
            PeriodFreq::Day => "D",
            PeriodFreq::Week => "W-SUN",
            PeriodFreq::Month => "M",
            PeriodFreq::Quarter => "Q-DEC",
            PeriodFreq::Year => "Y-DEC",
            PeriodFreq::Hour => "h",
        }
    }
}

/// The dtype a host declares for a column.
///
/// This is deliberately wider than what the library supports: validation
/// has to be able to name an unsupported dtype in its error message.
/// [`ColumnType`] is the closed set that conversion works with.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Dtype {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float16,
    Float32,
    Float64,
    Object,
    Category,
    Period(PeriodFreq),
    /// Nanosecond timestamps, optionally zoned.
    Datetime64 { tz: Option<String> },
    /// A host dtype with no counterpart here (nullable integers, intervals,
    /// complex numbers, ...), carried by name.
    Other(String),
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dtype::Int8 => f.write_str("int8"),
            Dtype::Int16 => f.write_str("int16"),
            Dtype::Int32 => f.write_str("int32"),
            Dtype::Int64 => f.write_str("int64"),
            Dtype::UInt8 => f.write_str("uint8"),
            Dtype::UInt16 => f.write_str("uint16"),
            Dtype::UInt32 => f.write_str("uint32"),
            Dtype::UInt64 => f.write_str("uint64"),
            Dtype::Float16 => f.write_str("float16"),
            Dtype::Float32 => f.write_str("float32"),
            Dtype::Float64 => f.write_str("float64"),
            Dtype::Object => f.write_str("object"),
            Dtype::Category => f.write_str("category"),
            Dtype::Period(freq) => write!(f, "period[{}]", freq.as_str()),
            Dtype::Datetime64 { tz: None } => f.write_str("datetime64[ns]"),
            Dtype::Datetime64 { tz: Some(tz) } => write!(f, "datetime64[ns, {tz}]"),
            Dtype::Other(name) => f.write_str(name),
        }
    }
}

/// The semantic column types that can cross into the columnar format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float16,
    Float32,
    Float64,
    Text,
    /// Day-granularity calendar date.
    Date,
    /// Timezone-less timestamp, nanosecond resolution.
    Timestamp,
    Category,
}

impl ColumnType {
    /// Map a declared dtype onto the supported set; `None` means unsupported.
    pub fn from_dtype(dtype: &Dtype) -> Option<ColumnType> {
        let column_type = match dtype {
            Dtype::Int8 => ColumnType::Int8,
            Dtype::Int16 => ColumnType::Int16,
            Dtype::Int32 => ColumnType::Int32,
            Dtype::Int64 => ColumnType::Int64,
            Dtype::UInt8 => ColumnType::UInt8,
            Dtype::UInt16 => ColumnType::UInt16,
            Dtype::UInt32 => ColumnType::UInt32,
            Dtype::UInt64 => ColumnType::UInt64,
            Dtype::Float16 => ColumnType::Float16,
            Dtype::Float32 => ColumnType::Float32,
            Dtype::Float64 => ColumnType::Float64,
            Dtype::Object => ColumnType::Text,
            Dtype::Category => ColumnType::Category,
            Dtype::Period(PeriodFreq::Day) => ColumnType::Date,
            Dtype::Datetime64 { tz: None } => ColumnType::Timestamp,
            Dtype::Period(_) | Dtype::Datetime64 { tz: Some(_) } | Dtype::Other(_) => return None,
        };
        Some(column_type)
    }

    pub fn is_float(self) -> bool {
        matches!(
            self,
            ColumnType::Float16 | ColumnType::Float32 | ColumnType::Float64
        )
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            ColumnType::Int8
                | ColumnType::Int16
                | ColumnType::Int32
                | ColumnType::Int64
                | ColumnType::UInt8
                | ColumnType::UInt16
                | ColumnType::UInt32
                | ColumnType::UInt64
        )
    }
}
