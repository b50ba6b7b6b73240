//! Tabla de routing por stage y decisión resultante.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Predicate;
use crate::constants::DEFAULT_SELECTOR_KEY;
use crate::errors::FlowError;
use crate::model::document::kind_name;
use crate::model::{HandoffState, ResolvedConfig, StageId, Variant};

/// Regla `(predicado, variante)` con nombre para auditoría.
#[derive(Debug, Clone)]
pub struct RoutingRule {
    pub name: String,
    pub when: Predicate,
    pub variant: Variant,
}

/// Motivo por el que se eligió una variante.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteReason {
    /// Fijada por el selector explícito de la configuración.
    Explicit,
    /// Primera regla que cumplió.
    Rule { name: String },
    /// Ninguna regla cumplió.
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDecision {
    pub stage: StageId,
    pub variant: Variant,
    pub reason: RouteReason,
}

/// Variantes declaradas de un stage (default + alternativas) y sus reglas,
/// evaluadas en orden de declaración.
#[derive(Debug, Clone)]
pub struct RouteTable {
    stage: StageId,
    default: Variant,
    alternates: Vec<Variant>,
    rules: Vec<RoutingRule>,
    selector_key: String,
}

impl RouteTable {
    pub fn new(stage: impl Into<StageId>, default: impl Into<Variant>) -> Self {
        Self { stage: stage.into(),
               default: default.into(),
               alternates: Vec::new(),
               rules: Vec::new(),
               selector_key: DEFAULT_SELECTOR_KEY.to_string() }
    }

    /// Declara una variante alternativa (seleccionable sólo por selector
    /// explícito si ninguna regla apunta a ella).
    pub fn alternate(mut self, variant: impl Into<Variant>) -> Self {
        self.declare(variant.into());
        self
    }

    /// Añade una regla al final de la lista; su variante queda declarada.
    pub fn rule(mut self, name: impl Into<String>, when: Predicate, variant: impl Into<Variant>) -> Self {
        let variant = variant.into();
        self.declare(variant.clone());
        self.rules.push(RoutingRule { name: name.into(),
                                      when,
                                      variant });
        self
    }

    /// Cambia la clave del selector explícito (por defecto `method`).
    pub fn selector(mut self, key: impl Into<String>) -> Self {
        self.selector_key = key.into();
        self
    }

    pub(crate) fn declare(&mut self, variant: Variant) {
        if variant != self.default && !self.alternates.contains(&variant) {
            self.alternates.push(variant);
        }
    }

    pub fn stage(&self) -> &StageId {
        &self.stage
    }

    pub fn default_variant(&self) -> &Variant {
        &self.default
    }

    /// Default primero, luego alternativas en orden de declaración.
    pub fn variants(&self) -> impl Iterator<Item = &Variant> {
        std::iter::once(&self.default).chain(self.alternates.iter())
    }

    pub fn declares(&self, variant: &str) -> bool {
        self.variants().any(|v| v == variant)
    }

    pub fn rules(&self) -> &[RoutingRule] {
        &self.rules
    }

    pub fn selector_key(&self) -> &str {
        &self.selector_key
    }

    /// Resuelve la variante del stage.
    ///
    /// Un selector explícito se respeta siempre (aunque las reglas elegirían
    /// otra cosa) salvo que nombre una variante no declarada, en cuyo caso
    /// falla con `UnknownVariant`.
    pub fn resolve(&self, config: &ResolvedConfig, handoff: &HandoffState) -> Result<RouteDecision, FlowError> {
        if let Some(raw) = config.get(&self.selector_key) {
            let chosen = match raw {
                Value::String(s) => s.as_str(),
                other => {
                    return Err(FlowError::invalid(self.stage.as_str(),
                                                  self.selector_key.as_str(),
                                                  format!("expected a variant name, found {}", kind_name(other))))
                }
            };
            if !self.declares(chosen) {
                return Err(FlowError::UnknownVariant { stage: self.stage.to_string(),
                                                       variant: chosen.to_string() });
            }
            info!("stage '{}' pinned to variant '{}' by '{}'", self.stage, chosen, self.selector_key);
            return Ok(self.decision(Variant::from(chosen), RouteReason::Explicit));
        }

        for rule in &self.rules {
            if rule.when.evaluate(config, handoff) {
                debug!("stage '{}' routed to '{}' by rule '{}'", self.stage, rule.variant, rule.name);
                return Ok(self.decision(rule.variant.clone(), RouteReason::Rule { name: rule.name.clone() }));
            }
        }

        debug!("stage '{}' falls back to default variant '{}'", self.stage, self.default);
        Ok(self.decision(self.default.clone(), RouteReason::Default))
    }

    fn decision(&self, variant: Variant, reason: RouteReason) -> RouteDecision {
        RouteDecision { stage: self.stage.clone(),
                        variant,
                        reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn membrane_table() -> RouteTable {
        RouteTable::new("membrane_conditioning", "ultrafiltration")
            .rule("contaminant_present", Predicate::flag("production.contaminant_present"), "diafiltration")
            .rule("salt_after_capture",
                  Predicate::All(vec![Predicate::flag("capture.salt_present"),
                                      Predicate::config_number_above("salt_removal_target", 0.9)]),
                  "diafiltration")
    }

    fn cfg(v: Value) -> ResolvedConfig {
        ResolvedConfig::from_value("membrane_conditioning", v).unwrap()
    }

    #[test]
    fn first_matching_rule_wins_then_default() {
        let table = membrane_table();
        let flagged = HandoffState::new().with_signal("production", "production.contaminant_present", true)
                                         .unwrap();
        let d = table.resolve(&cfg(json!({})), &flagged).unwrap();
        assert_eq!(d.variant, "diafiltration");
        assert_eq!(d.reason, RouteReason::Rule { name: "contaminant_present".into() });

        let d = table.resolve(&cfg(json!({})), &HandoffState::new()).unwrap();
        assert_eq!(d.variant, "ultrafiltration");
        assert_eq!(d.reason, RouteReason::Default);
        assert_eq!(table.variants().map(Variant::as_str).collect::<Vec<_>>(), vec!["ultrafiltration", "diafiltration"]);
    }

    #[test]
    fn explicit_selector_short_circuits_rules() {
        let table = membrane_table();
        let flagged = HandoffState::new().with_signal("production", "production.contaminant_present", true)
                                         .unwrap();
        let d = table.resolve(&cfg(json!({"method": "ultrafiltration"})), &flagged).unwrap();
        assert_eq!(d.variant, "ultrafiltration");
        assert_eq!(d.reason, RouteReason::Explicit);

        let err = table.resolve(&cfg(json!({"method": "electrodialysis"})), &flagged).unwrap_err();
        assert_eq!(err,
                   FlowError::UnknownVariant { stage: "membrane_conditioning".into(),
                                               variant: "electrodialysis".into() });

        let err = table.resolve(&cfg(json!({"method": 3})), &flagged).unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::InvalidParameter);
    }

    #[test]
    fn custom_selector_key() {
        let table = RouteTable::new("final_form", "spray_drying").alternate("liquid_formulation")
                                                                 .selector("product_form");
        let d = table.resolve(&ResolvedConfig::from_value("final_form", json!({"product_form": "liquid_formulation", "method": "x"})).unwrap(),
                              &HandoffState::new())
                     .unwrap();
        assert_eq!(d.variant, "liquid_formulation");
    }
}
