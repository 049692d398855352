//! Application state shared across handlers

use std::path::PathBuf;

use crate::export::ArtifactStore;
use crate::training::{default_dataset_path, Trainer, TrainingConfig};

use super::ServerConfig;

/// Application state shared across handlers
#[derive(Debug)]
pub struct AppState {
    pub config: ServerConfig,
    pub store: ArtifactStore,
    pub trainer: Trainer,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self::with_training_config(config, TrainingConfig::default())
    }

    pub fn with_training_config(config: ServerConfig, training: TrainingConfig) -> Self {
        Self {
            store: ArtifactStore::new(&config.models_dir),
            trainer: Trainer::new(training),
            config,
        }
    }

    /// Where uploads land and where train/evaluate read from by default
    pub fn dataset_path(&self) -> PathBuf {
        default_dataset_path(&self.config.data_dir)
    }
}
