use std::fmt;

/// A column (or row) label.
///
/// Hosts hand us labels in whatever form their runtime uses. Most are plain
/// UTF-8 strings, but a UTF-16 host may pass a name containing unpaired
/// surrogates, and a frame built from positional data may carry integer labels.
/// Only text labels are valid column names; see [`crate::validate_dataframe`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Label {
    Str(String),
    /// UTF-16 code units, possibly ill-formed.
    Utf16(Vec<u16>),
    Int(i64),
}

impl Label {
    pub fn is_text(&self) -> bool {
        matches!(self, Label::Str(_) | Label::Utf16(_))
    }

    /// Well-formed text content, if any.
    ///
    /// Returns `None` for integer labels and for UTF-16 labels containing an
    /// unpaired surrogate.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Label::Str(s) => Some(s.clone()),
            Label::Utf16(units) => String::from_utf16(units).ok(),
            Label::Int(_) => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Str(s) => f.write_str(s),
            Label::Utf16(units) => f.write_str(&String::from_utf16_lossy(units)),
            Label::Int(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Label::Str(value.to_string())
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Label::Str(value)
    }
}

impl From<i64> for Label {
    fn from(value: i64) -> Self {
        Label::Int(value)
    }
}

/// Row addressing for a [`crate::DataFrame`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowIndex {
    /// `start, start + step, ...` up to (excluding) `stop`.
    Range { start: i64, stop: i64, step: i64 },
    Labels(Vec<Label>),
}

impl RowIndex {
    /// The dense `0..len` index every valid frame uses.
    pub fn default_for_len(len: usize) -> Self {
        RowIndex::Range {
            start: 0,
            stop: len as i64,
            step: 1,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RowIndex::Range { start, stop, step } => {
                // Widened so extreme bounds cannot overflow.
                let (start, stop, step) =
                    (i128::from(*start), i128::from(*stop), i128::from(*step));
                let len = if step > 0 && stop > start {
                    (stop - start + step - 1) / step
                } else if step < 0 && start > stop {
                    (start - stop - step - 1) / -step
                } else {
                    0
                };
                usize::try_from(len).unwrap_or(usize::MAX)
            }
            RowIndex::Labels(labels) => labels.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this is exactly `0..len` with step 1.
    ///
    /// An explicit label list is never the default, even when its labels
    /// happen to be `0, 1, 2, ...`.
    pub fn is_default_range(&self) -> bool {
        match self {
            RowIndex::Range { start, step, .. } => *start == 0 && *step == 1,
            RowIndex::Labels(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_len_survives_extreme_bounds() {
        assert_eq!(
            RowIndex::Range {
                start: i64::MIN,
                stop: i64::MAX,
                step: i64::MAX
            }
            .len(),
            3
        );
        assert_eq!(
            RowIndex::Range {
                start: i64::MAX,
                stop: i64::MIN,
                step: i64::MIN
            }
            .len(),
            2
        );
        assert!(!RowIndex::Range {
            start: i64::MIN,
            stop: i64::MAX,
            step: 1
        }
        .is_empty());
    }

    #[test]
    fn range_len_handles_steps() {
        assert_eq!(RowIndex::default_for_len(3).len(), 3);
        assert_eq!(
            RowIndex::Range {
                start: 0,
                stop: 5,
                step: 2
            }
            .len(),
            3
        );
        assert_eq!(
            RowIndex::Range {
                start: 5,
                stop: 0,
                step: -2
            }
            .len(),
            3
        );
        assert_eq!(
            RowIndex::Range {
                start: 3,
                stop: 1,
                step: 1
            }
            .len(),
            0
        );
    }

    #[test]
    fn only_zero_based_unit_step_range_is_default() {
        assert!(RowIndex::default_for_len(0).is_default_range());
        assert!(!RowIndex::Range {
            start: 1,
            stop: 3,
            step: 1
        }
        .is_default_range());
        assert!(!RowIndex::Labels(vec![Label::Int(0), Label::Int(1)]).is_default_range());
    }

    #[test]
    fn utf16_label_with_lone_surrogate_has_no_text() {
        let label = Label::Utf16(vec![0x41, 0xD800, 0x42]);
        assert!(label.is_text());
        assert_eq!(label.to_text(), None);
        assert_eq!(label.to_string(), "A\u{FFFD}B");
    }
}
