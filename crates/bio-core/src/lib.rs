//! bio-core: motor determinista de resolución de configuración para
//! flowsheets de bioprocesos.
//!
//! Por stage y en orden fijo: baseline -> overrides (deep-merge) -> routing
//! de variante -> builder registrado -> propagación de handoff.
pub mod baseline;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod model;
pub mod overrides;
pub mod registry;
pub mod routing;
pub mod unit;

pub use baseline::BaselineStore;
pub use engine::{DefinitionBuilder, FlowDefinition, FlowEngine, RunCtx};
pub use errors::{ErrorKind, FlowError, PipelineError, RegistryError};
pub use event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind};
pub use model::{propagate, ConfigDocument, Domain, HandoffEntry, HandoffState, PipelineResult, PlanValue, ResolvedConfig,
                SignalValue, StageId, Unit, UnitPlan, Variant};
pub use overrides::{merge, OverrideDocument, OverrideStack};
pub use registry::ModuleRegistry;
pub use routing::{Predicate, RouteDecision, RouteReason, RouteTable};
pub use unit::{BuildContext, ParamKind, ParamSpec, StageStatus, UnitBuilder};
