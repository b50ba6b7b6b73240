//! Errores del motor de resolución.
//!
//! Todos los errores de `FlowError` son fatales para la corrida en curso: la
//! configuración es determinista y reintentar sin cambios reproduce el mismo
//! fallo. Cada variante lleva el contexto (stage, variante, clave) necesario
//! para corregir el override y volver a correr.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum FlowError {
    #[error("unknown stage '{stage}'")]
    UnknownStage { stage: String },
    #[error("unknown variant '{variant}' for stage '{stage}'")]
    UnknownVariant { stage: String, variant: String },
    #[error("type conflict at '{path}' in stage '{stage}': {detail}")]
    MergeType { stage: String, path: String, detail: String },
    #[error("stage '{stage}' is missing required parameter '{key}'")]
    MissingParameter { stage: String, key: String },
    #[error("invalid parameter '{key}' in stage '{stage}': {reason}")]
    InvalidParameter { stage: String, key: String, reason: String },
    #[error("handoff key '{key}' emitted by '{stage}' was already written by '{owner}'")]
    HandoffCollision { stage: String, key: String, owner: String },
    #[error("internal: {0}")]
    Internal(String),
}

/// Tipo plano del error, útil para que un caller capture una clase concreta
/// y ofrezca un override correctivo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    UnknownStage,
    UnknownVariant,
    MergeType,
    MissingParameter,
    InvalidParameter,
    HandoffCollision,
    Internal,
}

impl FlowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FlowError::UnknownStage { .. } => ErrorKind::UnknownStage,
            FlowError::UnknownVariant { .. } => ErrorKind::UnknownVariant,
            FlowError::MergeType { .. } => ErrorKind::MergeType,
            FlowError::MissingParameter { .. } => ErrorKind::MissingParameter,
            FlowError::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            FlowError::HandoffCollision { .. } => ErrorKind::HandoffCollision,
            FlowError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn merge_type(stage: impl Into<String>, path: impl Into<String>, detail: impl Into<String>) -> Self {
        FlowError::MergeType { stage: stage.into(),
                               path: path.into(),
                               detail: detail.into() }
    }

    pub(crate) fn invalid(stage: impl Into<String>, key: impl Into<String>, reason: impl Into<String>) -> Self {
        FlowError::InvalidParameter { stage: stage.into(),
                                      key: key.into(),
                                      reason: reason.into() }
    }
}

/// Fallo de una corrida completa: el primer error, con la posición del stage
/// que abortó. El orquestador nunca devuelve resultados parciales.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[error("run aborted at stage #{index} '{stage}': {error}")]
pub struct PipelineError {
    pub index: usize,
    pub stage: String,
    /// Variante elegida, si el fallo ocurrió después del routing.
    pub variant: Option<String>,
    pub error: FlowError,
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

/// Violaciones del contrato de registro detectadas al construir una
/// `FlowDefinition` o un `BaselineStore`.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum RegistryError {
    #[error("builder for ({stage}, {variant}) registered twice")]
    DuplicateBuilder { stage: String, variant: String },
    #[error("builder ({stage}, {variant}) declares handoff key '{key}' twice")]
    DuplicateHandoffKey { stage: String, variant: String, key: String },
    #[error("builder ({stage}, {variant}) declares parameter '{key}' twice")]
    DuplicateParameter { stage: String, variant: String, key: String },
    #[error("stage '{0}' appears twice in the sequence")]
    DuplicateStage(String),
    #[error("stage '{stage}' routes to variant '{variant}' but no builder is registered for it")]
    UnregisteredVariant { stage: String, variant: String },
    #[error("builder registered for stage '{0}' which is not in the sequence")]
    OrphanBuilder(String),
    #[error("stage '{0}' has no baseline document")]
    MissingBaseline(String),
    #[error("malformed baseline key '{0}': expected 'stage.parameter'")]
    MalformedBaselineKey(String),
    #[error("baseline conflict: {0}")]
    BaselineConflict(FlowError),
}
