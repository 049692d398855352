//! Model persistence
//!
//! A trained model is stored as a pair of JSON artifacts: the fitted
//! coefficients and the feature schema they were fit against.

mod store;

pub use store::{
    ArtifactStore, ModelArtifact, ModelMetadata, TrainedArtifacts, META_FILE, MODEL_FILE,
};
