//! Modelos neutrales del motor (identificadores, documentos, valores, planes).

pub mod document;
pub mod handoff;
pub mod plan;
pub mod stage;
pub mod units;
pub mod value;

pub use document::{ConfigDocument, ResolvedConfig};
pub use handoff::{propagate, HandoffEntry, HandoffState};
pub use plan::{PipelineResult, UnitPlan};
pub use stage::{StageId, Variant};
pub use units::{Domain, Unit};
pub use value::{PlanValue, SignalValue};
