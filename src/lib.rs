//! BioFlow Rust Library
//!
//! Fachada de aplicación sobre el motor (`bio-core`) y el catálogo de
//! bioprocesos (`bio-units`):
//! - `config` carga la configuración del proceso (`.env` + entorno).
//! - `errors` agrupa los errores de la aplicación.
//! - `scenarios` evalúa lotes de escenarios en paralelo.

pub mod config;
pub mod errors;
pub mod scenarios;

pub use bio_core::{FlowEngine, OverrideDocument, PipelineError, PipelineResult};
pub use config::{AppConfig, CONFIG};
pub use errors::AppError;
pub use scenarios::{run_batch, run_named, RunOutcome};
