use std::env;
use std::path::PathBuf;

pub const DATA_FILE_ENV: &str = "SECULAR_FORUM_DATA_FILE";
pub const DEFAULT_DATA_FILE: &str = "data/outlooks.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataConfig {
    pub data_file: PathBuf,
}

impl DataConfig {
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
        }
    }

    /// Reads `SECULAR_FORUM_DATA_FILE`, falling back to `data/outlooks.csv`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_file = lookup(DATA_FILE_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());
        Self::new(data_file)
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_FILE)
    }
}
