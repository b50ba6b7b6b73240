//! Builder para `FlowDefinition`.
//!
//! Acumula tablas de routing (una por stage, en orden de secuencia) y
//! builders; `build` valida el contrato completo:
//! - stage repetido en la secuencia -> `DuplicateStage`
//! - builder de un stage fuera de la secuencia -> `OrphanBuilder`
//! - variante declarada en una tabla sin builder -> `UnregisteredVariant`
//!
//! Las variantes registradas que la tabla no menciona quedan declaradas
//! como alternativas (seleccionables por selector explícito).

use indexmap::IndexMap;
use log::debug;
use serde_json::json;

use super::FlowDefinition;
use crate::constants::ENGINE_VERSION;
use crate::errors::RegistryError;
use crate::hashing::hash_value;
use crate::model::StageId;
use crate::registry::ModuleRegistry;
use crate::routing::RouteTable;
use crate::unit::UnitBuilder;

#[derive(Debug, Default)]
pub struct DefinitionBuilder {
    tables: Vec<RouteTable>,
    builders: Vec<Box<dyn UnitBuilder>>,
}

impl DefinitionBuilder {
    /// Añade el siguiente stage de la secuencia.
    pub fn stage(mut self, table: RouteTable) -> Self {
        self.tables.push(table);
        self
    }

    pub fn register<B>(mut self, builder: B) -> Self
        where B: UnitBuilder + 'static
    {
        self.builders.push(Box::new(builder));
        self
    }

    pub fn register_boxed(mut self, builder: Box<dyn UnitBuilder>) -> Self {
        self.builders.push(builder);
        self
    }

    pub fn build(self) -> Result<FlowDefinition, RegistryError> {
        let mut registry = ModuleRegistry::new();
        for b in self.builders {
            registry.register_boxed(b)?;
        }

        let mut stages: Vec<StageId> = Vec::with_capacity(self.tables.len());
        let mut routes: IndexMap<StageId, RouteTable> = IndexMap::new();
        for mut table in self.tables {
            let stage = table.stage().clone();
            if routes.contains_key(&stage) {
                return Err(RegistryError::DuplicateStage(stage.to_string()));
            }
            for v in registry.variants(&stage) {
                table.declare(v.clone());
            }
            if let Some(v) = table.variants().find(|v| !registry.contains(&stage, v)) {
                return Err(RegistryError::UnregisteredVariant { stage: stage.to_string(),
                                                                variant: v.to_string() });
            }
            stages.push(stage.clone());
            routes.insert(stage, table);
        }

        if let Some((orphan, _, _)) = registry.entries().find(|(s, _, _)| !routes.contains_key(*s)) {
            return Err(RegistryError::OrphanBuilder(orphan.to_string()));
        }

        let contracts: Vec<_> = registry.entries()
                                        .map(|(s, v, b)| {
                                            json!({
                                                "stage": s.as_str(),
                                                "variant": v.as_str(),
                                                "required": b.required_keys(),
                                                "produces": b.produces()
                                            })
                                        })
                                        .collect();
        let definition_hash = hash_value(&json!({
            "engine_version": ENGINE_VERSION,
            "stages": stages.iter().map(StageId::as_str).collect::<Vec<_>>(),
            "contracts": contracts
        }));
        debug!("flow definition built: {} stage(s), {} builder(s), hash={}",
               stages.len(),
               registry.len(),
               definition_hash);

        Ok(FlowDefinition { stages,
                            routes,
                            registry,
                            definition_hash })
    }
}
