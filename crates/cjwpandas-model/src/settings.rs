use serde::{Deserialize, Serialize};

/// Column-name byte limit the host uses when it supplies no settings.
pub const DEFAULT_MAX_BYTES_PER_COLUMN_NAME: usize = 120;

/// Host limits applied by [`crate::validate_dataframe`].
///
/// Field names follow the host's settings module, so a host can pass its
/// own settings object through serde unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Maximum UTF-8 length of a column name, in bytes.
    #[serde(rename = "MAX_BYTES_PER_COLUMN_NAME")]
    pub max_bytes_per_column_name: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_bytes_per_column_name: DEFAULT_MAX_BYTES_PER_COLUMN_NAME,
        }
    }
}
