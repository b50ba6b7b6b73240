//! `FlowEngine`: punto de entrada para correr una definición.

use log::warn;

use super::{FlowDefinition, RunCtx};
use crate::baseline::BaselineStore;
use crate::errors::{FlowError, PipelineError};
use crate::event::{EventStore, InMemoryEventStore};
use crate::model::{PipelineResult, ResolvedConfig, StageId};
use crate::overrides::{OverrideDocument, OverrideStack};

/// Motor de resolución determinista.
///
/// No guarda estado de corridas: sólo referencias al baseline y a la
/// definición, ambos inmutables. Es `Copy` y puede compartirse entre hilos.
#[derive(Debug, Clone, Copy)]
pub struct FlowEngine<'a> {
    baseline: &'a BaselineStore,
    definition: &'a FlowDefinition,
    record_journal: bool,
}

impl<'a> FlowEngine<'a> {
    pub fn new(baseline: &'a BaselineStore, definition: &'a FlowDefinition) -> Self {
        Self { baseline,
               definition,
               record_journal: true }
    }

    /// Si `false`, los `PipelineResult` no cargan el journal.
    pub fn with_journal(mut self, record: bool) -> Self {
        self.record_journal = record;
        self
    }

    pub fn baseline(&self) -> &'a BaselineStore {
        self.baseline
    }

    pub fn definition(&self) -> &'a FlowDefinition {
        self.definition
    }

    /// Corre la secuencia completa con `overrides` aplicados en orden.
    pub fn run(&self, overrides: &[OverrideDocument]) -> Result<PipelineResult, PipelineError> {
        let mut store = InMemoryEventStore::default();
        self.run_with_store(overrides, &mut store)
    }

    /// Como `run`, pero registrando el journal en `store` (se conserva
    /// también cuando la corrida aborta).
    pub fn run_with_store<E>(&self, overrides: &[OverrideDocument], store: &mut E) -> Result<PipelineResult, PipelineError>
        where E: EventStore
    {
        self.context(overrides, store).run_to_completion()
    }

    /// Crea una corrida avanzable stage a stage.
    pub fn context<'r, E>(&self, overrides: &[OverrideDocument], store: &'r mut E) -> RunCtx<'r, E>
        where E: EventStore,
              'a: 'r
    {
        let stack = OverrideStack::with_layers(overrides.to_vec());
        let unmatched = stack.unmatched_keys(self.definition.stages());
        if !unmatched.is_empty() {
            warn!("{} override key(s) ignored: {}", unmatched.len(), unmatched.join(", "));
        }
        RunCtx::new(self.definition, self.baseline, stack, store, self.record_journal)
    }

    /// Claves de override que no corresponden a ningún stage de la
    /// secuencia (formato `documento:clave`).
    pub fn unmatched_override_keys(&self, overrides: &[OverrideDocument]) -> Vec<String> {
        OverrideStack::with_layers(overrides.to_vec()).unmatched_keys(self.definition.stages())
    }

    /// Configuración resuelta de un stage, sin construir nada.
    pub fn resolve_config(&self, stage: &StageId, overrides: &[OverrideDocument]) -> Result<ResolvedConfig, FlowError> {
        let baseline = self.baseline.get_baseline(stage)?;
        OverrideStack::with_layers(overrides.to_vec()).resolve(stage, baseline)
    }
}
