//! Tipos de evento de una corrida y estructura `RunEvent`.
//!
//! Rol en el flujo:
//! - Cada corrida del `FlowEngine` emite eventos a un `EventStore`
//!   append-only, incluso si aborta.
//! - Los eventos son auditoría: `ts` y `run_id` nunca entran en fingerprints.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::FlowError;
use crate::routing::RouteReason;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunEventKind {
    /// Primer evento de un `run_id`: fija la definición usada.
    RunInitialized { definition_hash: String, stage_count: usize },
    /// Variante elegida para un stage y por qué.
    StageResolved {
        index: usize,
        stage: String,
        variant: String,
        reason: RouteReason,
    },
    /// Plan construido y handoff propagado.
    StageBuilt {
        index: usize,
        stage: String,
        fingerprint: String,
        handoff_keys: Vec<String>,
    },
    /// Error terminal: la corrida no continúa.
    StageFailed { index: usize, stage: String, error: FlowError },
    /// Cierre con el fingerprint agregado de la corrida.
    RunCompleted { run_fingerprint: String },
}

impl RunEventKind {
    /// Código compacto de una letra (útil en tests y logs).
    pub fn code(&self) -> &'static str {
        match self {
            RunEventKind::RunInitialized { .. } => "I",
            RunEventKind::StageResolved { .. } => "R",
            RunEventKind::StageBuilt { .. } => "B",
            RunEventKind::StageFailed { .. } => "X",
            RunEventKind::RunCompleted { .. } => "C",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEvent {
    pub seq: u64, // asignado por el store (orden append)
    pub run_id: Uuid,
    pub kind: RunEventKind,
    pub ts: DateTime<Utc>,
}
