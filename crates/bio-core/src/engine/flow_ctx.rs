//! Corrida en curso.

use log::{debug, error, info};
use uuid::Uuid;

use super::FlowDefinition;
use crate::baseline::BaselineStore;
use crate::errors::{FlowError, PipelineError};
use crate::event::{EventStore, RunEventKind};
use crate::model::plan::run_fingerprint;
use crate::model::{propagate, HandoffState, PipelineResult, StageId, UnitPlan, Variant};
use crate::overrides::OverrideStack;
use crate::routing::RouteDecision;
use crate::unit::StageStatus;

/// Fallo de un stage, con la variante si ya se había resuelto.
struct StageFault {
    variant: Option<Variant>,
    error: FlowError,
}

impl StageFault {
    fn before_routing(error: FlowError) -> Self {
        Self { variant: None, error }
    }

    fn after_routing(variant: &Variant) -> impl FnOnce(FlowError) -> Self + '_ {
        move |error| Self { variant: Some(variant.clone()),
                            error }
    }
}

/// Contexto de ejecución de una corrida.
///
/// Recorre la secuencia fija de stages en orden: baseline -> merge ->
/// routing -> build -> propagate. Cada corrida es dueña de su configuración
/// resuelta, su handoff y sus planes; sólo comparte (por referencia) el
/// baseline y la definición.
pub struct RunCtx<'r, E: EventStore> {
    definition: &'r FlowDefinition,
    baseline: &'r BaselineStore,
    stack: OverrideStack,
    store: &'r mut E,
    record_journal: bool,
    run_id: Uuid,
    cursor: usize,
    handoff: HandoffState,
    plans: Vec<UnitPlan>,
    routes: Vec<RouteDecision>,
    statuses: Vec<StageStatus>,
    failure: Option<PipelineError>,
}

impl<'r, E: EventStore> RunCtx<'r, E> {
    pub(crate) fn new(definition: &'r FlowDefinition,
                      baseline: &'r BaselineStore,
                      stack: OverrideStack,
                      store: &'r mut E,
                      record_journal: bool)
                      -> Self {
        let run_id = Uuid::new_v4();
        store.append_kind(run_id,
                          RunEventKind::RunInitialized { definition_hash: definition.definition_hash().to_string(),
                                                         stage_count: definition.len() });
        info!("run {} started: {} stage(s), {} override layer(s)",
              run_id,
              definition.len(),
              stack.layers().len());
        Self { definition,
               baseline,
               stack,
               store,
               record_journal,
               run_id,
               cursor: 0,
               handoff: HandoffState::new(),
               plans: Vec::with_capacity(definition.len()),
               routes: Vec::with_capacity(definition.len()),
               statuses: vec![StageStatus::Pending; definition.len()],
               failure: None }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Índice del próximo stage a procesar.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_complete(&self) -> bool {
        self.failure.is_none() && self.cursor >= self.definition.len()
    }

    pub fn status(&self, index: usize) -> Option<StageStatus> {
        self.statuses.get(index).copied()
    }

    /// Handoff acumulado hasta el último stage construido.
    pub fn handoff(&self) -> &HandoffState {
        &self.handoff
    }

    pub fn plans(&self) -> &[UnitPlan] {
        &self.plans
    }

    /// Procesa el siguiente stage. `Ok(false)` cuando ya no quedan stages.
    /// Tras un fallo, cada llamada devuelve el mismo error.
    pub fn step(&mut self) -> Result<bool, PipelineError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        if self.cursor >= self.definition.len() {
            return Ok(false);
        }

        let index = self.cursor;
        let stage = self.definition.stages()[index].clone();
        match self.advance(index, &stage) {
            Ok(()) => {
                self.cursor += 1;
                Ok(true)
            }
            Err(fault) => {
                self.statuses[index] = StageStatus::Failed;
                self.store.append_kind(self.run_id,
                                       RunEventKind::StageFailed { index,
                                                                   stage: stage.to_string(),
                                                                   error: fault.error.clone() });
                let err = PipelineError { index,
                                          stage: stage.to_string(),
                                          variant: fault.variant.map(|v| v.to_string()),
                                          error: fault.error };
                error!("run {} aborted: {}", self.run_id, err);
                self.failure = Some(err.clone());
                Err(err)
            }
        }
    }

    fn advance(&mut self, index: usize, stage: &StageId) -> Result<(), StageFault> {
        let baseline = self.baseline
                           .get_baseline(stage)
                           .map_err(StageFault::before_routing)?;
        let config = self.stack
                         .resolve(stage, baseline)
                         .map_err(StageFault::before_routing)?;
        let decision = self.definition
                           .resolve_variant(stage, &config, &self.handoff)
                           .map_err(StageFault::before_routing)?;
        self.statuses[index] = StageStatus::Routed;
        self.store.append_kind(self.run_id,
                               RunEventKind::StageResolved { index,
                                                             stage: stage.to_string(),
                                                             variant: decision.variant.to_string(),
                                                             reason: decision.reason.clone() });

        let variant = decision.variant.clone();
        let plan = self.definition
                       .build(stage, &variant, &config, &self.handoff)
                       .map_err(StageFault::after_routing(&variant))?;
        let next = propagate(&plan, &self.handoff).map_err(StageFault::after_routing(&variant))?;
        debug!("stage #{} '{}' built as '{}' ({} handoff signal(s))",
               index,
               stage,
               variant,
               plan.handoff().len());

        self.store.append_kind(self.run_id,
                               RunEventKind::StageBuilt { index,
                                                          stage: stage.to_string(),
                                                          fingerprint: plan.fingerprint().to_string(),
                                                          handoff_keys: plan.handoff().keys().cloned().collect() });
        self.handoff = next;
        self.plans.push(plan);
        self.routes.push(decision);
        self.statuses[index] = StageStatus::Built;
        Ok(())
    }

    /// Ejecuta los stages restantes y devuelve el resultado completo, o el
    /// primer error (sin resultado parcial).
    pub fn run_to_completion(mut self) -> Result<PipelineResult, PipelineError> {
        while self.step()? {}

        let fingerprint = run_fingerprint(self.definition.definition_hash(), &self.plans);
        self.store.append_kind(self.run_id,
                               RunEventKind::RunCompleted { run_fingerprint: fingerprint.clone() });
        info!("run {} completed: fingerprint={}", self.run_id, fingerprint);

        let journal = if self.record_journal { self.store.list(self.run_id) } else { Vec::new() };
        Ok(PipelineResult::new(self.run_id,
                               self.plans,
                               self.routes,
                               self.handoff,
                               self.definition.definition_hash(),
                               journal))
    }
}
