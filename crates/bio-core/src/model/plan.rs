//! Planes por stage y resultado agregado de una corrida.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::{HandoffState, PlanValue, SignalValue, StageId, Variant};
use crate::constants::ENGINE_VERSION;
use crate::event::RunEvent;
use crate::hashing::hash_value;
use crate::routing::RouteDecision;

/// Configuración de una unidad de proceso ya construida.
///
/// - `specs`: parámetros consumidos desde la configuración resuelta.
/// - `derived`: valores calculados por el builder.
/// - `handoff`: señales que el stage expone a stages posteriores.
///
/// El fingerprint cubre (versión de motor, stage, variante, specs, derived,
/// handoff) y es estable para entradas iguales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitPlan {
    stage: StageId,
    variant: Variant,
    specs: IndexMap<String, PlanValue>,
    derived: IndexMap<String, PlanValue>,
    handoff: IndexMap<String, SignalValue>,
    fingerprint: String,
}

impl UnitPlan {
    pub(crate) fn assemble(stage: StageId,
                           variant: Variant,
                           specs: IndexMap<String, PlanValue>,
                           derived: IndexMap<String, PlanValue>,
                           handoff: IndexMap<String, SignalValue>)
                           -> Self {
        let fingerprint = plan_fingerprint(&stage, &variant, &specs, &derived, &handoff);
        Self { stage,
               variant,
               specs,
               derived,
               handoff,
               fingerprint }
    }

    pub fn stage(&self) -> &StageId {
        &self.stage
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    pub fn specs(&self) -> &IndexMap<String, PlanValue> {
        &self.specs
    }

    pub fn derived(&self) -> &IndexMap<String, PlanValue> {
        &self.derived
    }

    pub fn handoff(&self) -> &IndexMap<String, SignalValue> {
        &self.handoff
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn spec(&self, key: &str) -> Option<&PlanValue> {
        self.specs.get(key)
    }

    /// Valor derivado numérico (atajo frecuente en tests y reportes).
    pub fn derived_number(&self, key: &str) -> Option<f64> {
        self.derived.get(key).and_then(PlanValue::as_f64)
    }
}

fn values_to_json<'a, I, V>(entries: I) -> Value
    where I: IntoIterator<Item = (&'a String, V)>,
          V: Into<Value>
{
    let map: Map<String, Value> = entries.into_iter().map(|(k, v)| (k.clone(), v.into())).collect();
    Value::Object(map)
}

fn plan_fingerprint(stage: &StageId,
                    variant: &Variant,
                    specs: &IndexMap<String, PlanValue>,
                    derived: &IndexMap<String, PlanValue>,
                    handoff: &IndexMap<String, SignalValue>)
                    -> String {
    let handoff_json: Map<String, Value> = handoff.iter()
                                                  .map(|(k, v)| (k.clone(), PlanValue::from(v).to_json()))
                                                  .collect();
    hash_value(&json!({
        "engine_version": ENGINE_VERSION,
        "stage": stage.as_str(),
        "variant": variant.as_str(),
        "specs": values_to_json(specs.iter().map(|(k, v)| (k, v.to_json()))),
        "derived": values_to_json(derived.iter().map(|(k, v)| (k, v.to_json()))),
        "handoff": Value::Object(handoff_json)
    }))
}

/// Resultado completo de una corrida exitosa. Nunca se construye un
/// resultado parcial: si un stage falla, la corrida devuelve el error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    run_id: Uuid,
    plans: Vec<UnitPlan>,
    routes: Vec<RouteDecision>,
    handoff: HandoffState,
    run_fingerprint: String,
    journal: Vec<RunEvent>,
}

impl PipelineResult {
    pub(crate) fn new(run_id: Uuid,
                      plans: Vec<UnitPlan>,
                      routes: Vec<RouteDecision>,
                      handoff: HandoffState,
                      definition_hash: &str,
                      journal: Vec<RunEvent>)
                      -> Self {
        let run_fingerprint = run_fingerprint(definition_hash, &plans);
        Self { run_id,
               plans,
               routes,
               handoff,
               run_fingerprint,
               journal }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Planes en el orden de la secuencia de stages.
    pub fn plans(&self) -> &[UnitPlan] {
        &self.plans
    }

    pub fn plan(&self, stage: &str) -> Option<&UnitPlan> {
        self.plans.iter().find(|p| p.stage() == stage)
    }

    /// Decisiones de routing, una por stage y en el mismo orden que `plans`.
    pub fn routes(&self) -> &[RouteDecision] {
        &self.routes
    }

    /// Estado de handoff final (todas las señales de la corrida).
    pub fn handoff(&self) -> &HandoffState {
        &self.handoff
    }

    /// Hash de la definición y de los fingerprints de todos los planes, en orden.
    pub fn run_fingerprint(&self) -> &str {
        &self.run_fingerprint
    }

    /// Eventos registrados durante la corrida (vacío si el journal está
    /// desactivado).
    pub fn journal(&self) -> &[RunEvent] {
        &self.journal
    }

    pub fn into_plans(self) -> Vec<UnitPlan> {
        self.plans
    }
}

pub(crate) fn run_fingerprint(definition_hash: &str, plans: &[UnitPlan]) -> String {
    let fps: Vec<&str> = plans.iter().map(UnitPlan::fingerprint).collect();
    hash_value(&json!({
        "engine_version": ENGINE_VERSION,
        "definition_hash": definition_hash,
        "plan_fingerprints": fps
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Unit;

    fn sample(titer: f64) -> UnitPlan {
        let mut specs = IndexMap::new();
        specs.insert("titer_g_per_l".to_string(), PlanValue::quantity(titer, Unit::GramPerLiter));
        let mut derived = IndexMap::new();
        derived.insert("product_mass_kg".to_string(), PlanValue::quantity(70.0 * titer, Unit::Kilogram));
        let mut handoff = IndexMap::new();
        handoff.insert("production.product_mass_kg".to_string(), SignalValue::from(70.0 * titer));
        UnitPlan::assemble("production".into(), "fed_batch".into(), specs, derived, handoff)
    }

    #[test]
    fn fingerprint_is_stable_and_sensitive_to_values() {
        assert_eq!(sample(4.0).fingerprint(), sample(4.0).fingerprint());
        assert_ne!(sample(4.0).fingerprint(), sample(8.0).fingerprint());
        assert_eq!(sample(4.0).fingerprint().len(), 64);
    }
}
