//! Startup state: the artifacts every request shares.
//!
//! Artifacts are loaded exactly once. If any of them fails to load, the
//! service still starts but stays [`ServiceState::Degraded`] and refuses every
//! request with [`InferenceError::ServerNotReady`].
//!
//! ```text
//! ServiceConfig ──► ServiceState::load ──┬──► Ready(Arc<Artifacts>)
//!                                        │      ├─ predictor: Arc<dyn Predictor>
//!                                        │      ├─ means: ImputationMeans
//!                                        │      └─ bounds: OutlierBounds
//!                                        └──► Degraded { reason }
//! ```

use crate::config::ServiceConfig;
use crate::error::{InferenceError, Result};
use blend_model::{ForestModel, Predictor};
use blend_processing::{ImputationMeans, OutlierBounds};
use std::sync::Arc;
use tracing::{error, info};

/// Immutable artifacts loaded at startup.
#[derive(Debug)]
pub struct Artifacts {
    pub predictor: Arc<dyn Predictor>,
    pub means: ImputationMeans,
    pub bounds: OutlierBounds,
}

impl Artifacts {
    pub fn new(
        predictor: Arc<dyn Predictor>,
        means: ImputationMeans,
        bounds: OutlierBounds,
    ) -> Self {
        Self {
            predictor,
            means,
            bounds,
        }
    }

    /// Load the model, bounds and means named by `config`.
    pub fn load(config: &ServiceConfig) -> Result<Self> {
        let predictor = ForestModel::load(&config.model_path)?;
        let bounds = OutlierBounds::from_json_file(&config.bounds_path)?;
        let means = ImputationMeans::from_json_file(&config.means_path)?;

        info!(
            "Artifacts loaded: {} bounds, {} means",
            bounds.len(),
            means.len()
        );
        Ok(Self::new(Arc::new(predictor), means, bounds))
    }
}

/// Whether the service can answer requests.
#[derive(Debug, Clone)]
pub enum ServiceState {
    Ready(Arc<Artifacts>),
    Degraded { reason: String },
}

impl ServiceState {
    /// Load artifacts, degrading instead of failing when any is unusable.
    pub fn load(config: &ServiceConfig) -> Self {
        match Artifacts::load(config) {
            Ok(artifacts) => Self::Ready(Arc::new(artifacts)),
            Err(e) => {
                error!("Failed to load startup artifacts: {}", e);
                Self::Degraded {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn ready(artifacts: Artifacts) -> Self {
        Self::Ready(Arc::new(artifacts))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Shared artifacts, or `ServerNotReady` when degraded.
    pub fn artifacts(&self) -> Result<&Arc<Artifacts>> {
        match self {
            Self::Ready(artifacts) => Ok(artifacts),
            Self::Degraded { reason } => Err(InferenceError::ServerNotReady {
                reason: reason.clone(),
            }),
        }
    }
}

static_assertions::assert_impl_all!(Artifacts: Send, Sync);
static_assertions::assert_impl_all!(ServiceState: Send, Sync);
