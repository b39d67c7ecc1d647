use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use secular_forum_core::{DataConfig, OutlookLoader};

pub const BIND_ENV: &str = "SECULAR_FORUM_BIND";
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

#[derive(Clone)]
pub struct AppState {
    loader: Arc<OutlookLoader>,
}

impl AppState {
    pub fn new(loader: OutlookLoader) -> Self {
        Self {
            loader: Arc::new(loader),
        }
    }

    pub fn loader(&self) -> &OutlookLoader {
        &self.loader
    }

    pub fn shared_loader(&self) -> Arc<OutlookLoader> {
        Arc::clone(&self.loader)
    }
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub bind: SocketAddr,
    pub data: DataConfig,
}

impl ApiSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw_bind = lookup(BIND_ENV).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = raw_bind
            .trim()
            .parse::<SocketAddr>()
            .with_context(|| format!("{BIND_ENV} must be a socket address, got '{raw_bind}'"))?;

        Ok(Self {
            bind,
            data: DataConfig::from_lookup(lookup),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use secular_forum_core::config::{DATA_FILE_ENV, DEFAULT_DATA_FILE};

    use super::*;

    #[test]
    fn defaults_to_port_8000_and_default_data_file() {
        let settings = ApiSettings::from_lookup(|_| None).unwrap();
        assert_eq!(settings.bind, DEFAULT_BIND.parse::<SocketAddr>().unwrap());
        assert_eq!(settings.data.data_file, PathBuf::from(DEFAULT_DATA_FILE));
    }

    #[test]
    fn reads_bind_and_data_file_overrides() {
        let settings = ApiSettings::from_lookup(|key| match key {
            BIND_ENV => Some("127.0.0.1:9100".to_string()),
            DATA_FILE_ENV => Some("/srv/outlooks.csv".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(settings.bind.port(), 9100);
        assert_eq!(settings.data.data_file, PathBuf::from("/srv/outlooks.csv"));
    }

    #[test]
    fn rejects_invalid_bind_address() {
        let err = ApiSettings::from_lookup(|key| (key == BIND_ENV).then(|| "nope".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(BIND_ENV));
    }
}
