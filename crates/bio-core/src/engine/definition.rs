//! Definición inmutable de un flowsheet.

use indexmap::IndexMap;

use super::DefinitionBuilder;
use crate::baseline::BaselineStore;
use crate::errors::{FlowError, RegistryError};
use crate::model::{HandoffState, ResolvedConfig, StageId, UnitPlan, Variant};
use crate::registry::ModuleRegistry;
use crate::routing::{RouteDecision, RouteTable};

/// Secuencia ordenada de stages con su routing y sus builders.
///
/// Inmutable tras `DefinitionBuilder::build`; se comparte por referencia
/// entre corridas (también entre hilos).
#[derive(Debug)]
pub struct FlowDefinition {
    pub(crate) stages: Vec<StageId>,
    pub(crate) routes: IndexMap<StageId, RouteTable>,
    pub(crate) registry: ModuleRegistry,
    pub(crate) definition_hash: String,
}

impl FlowDefinition {
    pub fn builder() -> DefinitionBuilder {
        DefinitionBuilder::default()
    }

    pub fn stages(&self) -> &[StageId] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn route_table(&self, stage: &StageId) -> Option<&RouteTable> {
        self.routes.get(stage)
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Hash de la secuencia y de los contratos registrados.
    pub fn definition_hash(&self) -> &str {
        &self.definition_hash
    }

    /// Routing Resolver para `stage`.
    pub fn resolve_variant(&self,
                           stage: &StageId,
                           config: &ResolvedConfig,
                           handoff: &HandoffState)
                           -> Result<RouteDecision, FlowError> {
        self.route_table(stage)
            .ok_or_else(|| FlowError::UnknownStage { stage: stage.to_string() })?
            .resolve(config, handoff)
    }

    /// Module Registry para `(stage, variant)`.
    pub fn build(&self,
                 stage: &StageId,
                 variant: &Variant,
                 config: &ResolvedConfig,
                 handoff: &HandoffState)
                 -> Result<UnitPlan, FlowError> {
        self.registry.build(stage, variant, config, handoff)
    }

    /// Comprueba que todos los stages de la secuencia tengan baseline.
    pub fn check_baseline(&self, store: &BaselineStore) -> Result<(), RegistryError> {
        match self.stages.iter().find(|s| !store.contains(s)) {
            Some(stage) => Err(RegistryError::MissingBaseline(stage.to_string())),
            None => Ok(()),
        }
    }
}
