//! `OverrideStack`: secuencia ordenada de overrides aplicada de forma
//! determinista sobre el baseline de cada stage.

use log::warn;

use super::merge::merge;
use super::OverrideDocument;
use crate::errors::FlowError;
use crate::model::{ConfigDocument, ResolvedConfig, StageId};

/// Capas de override en orden de precedencia creciente (la última gana).
#[derive(Debug, Clone, Default)]
pub struct OverrideStack {
    layers: Vec<OverrideDocument>,
}

impl OverrideStack {
    pub fn new() -> Self {
        Self { layers: vec![] }
    }

    pub fn with_layers(layers: Vec<OverrideDocument>) -> Self {
        Self { layers }
    }

    pub fn push(&mut self, layer: OverrideDocument) {
        self.layers.push(layer);
    }

    pub fn layers(&self) -> &[OverrideDocument] {
        &self.layers
    }

    /// Sub-documentos aplicables a `stage`, en orden de capa.
    pub fn layers_for(&self, stage: &StageId) -> Result<Vec<ConfigDocument>, FlowError> {
        let mut out = Vec::new();
        for layer in &self.layers {
            if let Some(doc) = layer.for_stage(stage)? {
                out.push(doc);
            }
        }
        Ok(out)
    }

    /// baseline -> capas (en orden) para un stage.
    pub fn resolve(&self, stage: &StageId, baseline: &ConfigDocument) -> Result<ResolvedConfig, FlowError> {
        let layers = self.layers_for(stage)?;
        merge(stage, baseline, &layers)
    }

    /// Claves de override (`capa:clave`) que no apuntan a ningún stage de
    /// `sequence`. Nunca se aplican a otro stage; sólo se reportan.
    pub fn unmatched_keys(&self, sequence: &[StageId]) -> Vec<String> {
        let mut out = Vec::new();
        for layer in &self.layers {
            for (key, stage) in layer.stage_keys() {
                if !sequence.iter().any(|s| s == stage) {
                    warn!("override '{}' key '{}' matches no stage in the sequence", layer.name(), key);
                    out.push(format!("{}:{}", layer.name(), key));
                }
            }
        }
        out
    }
}
