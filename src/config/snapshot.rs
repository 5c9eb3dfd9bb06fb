//! Atomic publication of configuration snapshots.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use super::Config;
use crate::error::LabelError;

/// Where a configuration was loaded from, so it can be reloaded.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub primary: PathBuf,
    pub fallback: Option<PathBuf>,
}

impl ConfigSource {
    pub fn load(&self) -> Result<Config, LabelError> {
        match &self.fallback {
            Some(fallback) => Config::load_with_fallback(&self.primary, fallback),
            None => Config::load(&self.primary),
        }
    }
}

/// Owner of the current configuration snapshot.
///
/// Readers take an `Arc<Config>` and keep using it for the whole request;
/// [`publish`](Self::publish) replaces the snapshot in one step, so a
/// reader sees either the old or the new configuration, never a mix.
#[derive(Debug)]
pub struct ConfigHandle {
    current: RwLock<Arc<Config>>,
    source: Option<ConfigSource>,
}

impl ConfigHandle {
    pub fn new(config: Config) -> Self {
        Self {
            current: RwLock::new(Arc::new(config)),
            source: None,
        }
    }

    /// Load from `source` and remember it for [`reload`](Self::reload).
    pub fn from_source(source: ConfigSource) -> Result<Self, LabelError> {
        let config = source.load()?;
        Ok(Self {
            current: RwLock::new(Arc::new(config)),
            source: Some(source),
        })
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<Config> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the current snapshot.
    pub fn publish(&self, config: Config) -> Arc<Config> {
        let next = Arc::new(config);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = next.clone();
        next
    }

    /// Re-read the configuration file and publish it. On failure the
    /// previous snapshot stays in place.
    pub fn reload(&self) -> Result<Arc<Config>, LabelError> {
        let source = self.source.as_ref().ok_or_else(|| {
            LabelError::ConfigurationIncomplete("configuration was not loaded from a file".into())
        })?;
        match source.load() {
            Ok(config) => {
                log::info!("reloaded config from {}", source.primary.display());
                Ok(self.publish(config))
            }
            Err(e) => {
                log::error!("Error reloading config: {}", e);
                Err(e)
            }
        }
    }
}
