//! Pipeline Orchestrator.
//!
//! - `FlowDefinition`: secuencia fija de stages + tablas de routing +
//!   registro de builders, validada al construirse (`DefinitionBuilder`).
//! - `FlowEngine`: corre la definición contra un baseline y una lista de
//!   overrides.
//! - `RunCtx`: corrida en curso, avanzable stage a stage.

pub mod builder;
pub mod core;
pub mod definition;
pub mod flow_ctx;

pub use builder::DefinitionBuilder;
pub use self::core::FlowEngine;
pub use definition::FlowDefinition;
pub use flow_ctx::RunCtx;
