//! Batch inference for fuel blend properties.
//!
//! Loads the model, outlier bounds and imputation means once at startup, then
//! turns raw blend record sets into `BlendProperty1..BlendProperty10`
//! predictions.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use blend_service::{InferenceService, ServiceConfig};
//!
//! let service = InferenceService::from_config(ServiceConfig::default());
//! let csv_out = service.run_csv(b"ID,Component1_fraction,...\n1,0.2,...\n")?;
//! ```
//!
//! # Pipeline
//!
//! ```text
//! CSV ──► extract ID ──► impute ──► cap ──► engineer ──► predict ──► [ID?, BlendProperty1..10] ──► CSV
//! ```
//!
//! If any artifact fails to load the service starts degraded and every
//! request fails with [`InferenceError::ServerNotReady`].

pub mod config;
pub mod error;
pub mod io;
pub mod service;
pub mod state;
pub mod types;

pub use config::{ConfigValidationError, ServiceConfig, ServiceConfigBuilder};
pub use error::{InferenceError, Result};
pub use service::InferenceService;
pub use state::{Artifacts, ServiceState};
pub use types::{PredictionOutput, RunSummary};
