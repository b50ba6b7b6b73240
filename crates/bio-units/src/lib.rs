//! bio-units: catálogo de bioproceso sobre `bio-core`.
//!
//! Secuencia de stages, baseline de ingeniería, tablas de routing, builders
//! de cada (stage, variante) y escenarios con nombre. La definición y el
//! baseline son valores de proceso inmutables, construidos una sola vez.

pub mod baseline;
pub mod builders;
pub mod routes;
pub mod scenarios;
pub mod stages;

use bio_core::{FlowDefinition, FlowEngine, RegistryError};
use log::info;
use once_cell::sync::OnceCell;

pub use scenarios::{compose, scenario, UnknownScenario};

static DEFINITION: OnceCell<FlowDefinition> = OnceCell::new();

/// Construye una definición nueva del catálogo (sin cachear).
pub fn build_definition() -> Result<FlowDefinition, RegistryError> {
    let mut builder = FlowDefinition::builder();
    for table in routes::tables() {
        builder = builder.stage(table);
    }
    for unit in builders::all() {
        builder = builder.register_boxed(unit);
    }
    let definition = builder.build()?;
    definition.check_baseline(baseline::store()?)?;
    info!("bioprocess catalog ready: {} stages, {} builders",
          definition.len(),
          definition.registry().len());
    Ok(definition)
}

/// Definición del catálogo, compartida por todo el proceso.
pub fn definition() -> Result<&'static FlowDefinition, RegistryError> {
    DEFINITION.get_or_try_init(build_definition)
}

/// Motor sobre el baseline y la definición globales.
pub fn engine() -> Result<FlowEngine<'static>, RegistryError> {
    Ok(FlowEngine::new(baseline::store()?, definition()?))
}
