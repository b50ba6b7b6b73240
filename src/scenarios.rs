//! Evaluación de varios escenarios independientes contra el mismo catálogo.
//!
//! Cada corrida es dueña de su propio estado; la definición y el baseline se
//! comparten por referencia. Los resultados salen en el orden de entrada.

use bio_core::{FlowEngine, OverrideDocument, PipelineError, PipelineResult};
use log::{debug, info};
use rayon::prelude::*;

use crate::config::CONFIG;
use crate::errors::AppError;

pub type RunOutcome = Result<PipelineResult, PipelineError>;

/// Corre cada lista de overrides de `batch` con `engine`.
/// Con `parallel_runs == 1` corre en secuencia, si no en un pool rayon de ese
/// tamaño.
pub fn run_batch(engine: FlowEngine<'_>,
                 batch: &[Vec<OverrideDocument>],
                 parallel_runs: usize)
                 -> Result<Vec<RunOutcome>, AppError> {
    debug!("evaluando {} escenarios (parallel_runs={parallel_runs})", batch.len());
    if parallel_runs <= 1 || batch.len() <= 1 {
        return Ok(batch.iter().map(|overrides| engine.run(overrides)).collect());
    }
    let pool = rayon::ThreadPoolBuilder::new().num_threads(parallel_runs)
                                              .build()
                                              .map_err(|e| AppError::Config(e.to_string()))?;
    Ok(pool.install(|| batch.par_iter().map(|overrides| engine.run(overrides)).collect()))
}

/// Compone y corre escenarios con nombre del catálogo, usando `CONFIG`.
/// Un nombre desconocido falla antes de correr nada.
pub fn run_named(batch: &[Vec<&str>]) -> Result<Vec<RunOutcome>, AppError> {
    let documents = batch.iter()
                         .map(|names| bio_units::compose(names))
                         .collect::<Result<Vec<_>, _>>()?;
    let engine = bio_units::engine()?.with_journal(CONFIG.record_journal);
    let outcomes = run_batch(engine, &documents, CONFIG.parallel_runs)?;
    let failed = outcomes.iter().filter(|o| o.is_err()).count();
    info!("{} escenarios evaluados, {failed} abortados", outcomes.len());
    Ok(outcomes)
}
