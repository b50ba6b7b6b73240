//! Contexto de construcción de un plan.
//!
//! Todas las lecturas pasan por aquí: cada parámetro consumido queda
//! registrado en `specs` con su unidad declarada (así `specs` es exactamente
//! el conjunto usado), se comprueba su dominio y ninguna derivación puede
//! producir NaN/infinito.

use indexmap::IndexMap;
use serde_json::Value;

use super::{ParamKind, ParamSpec};
use crate::errors::FlowError;
use crate::model::document::kind_name;
use crate::model::{HandoffState, PlanValue, ResolvedConfig, SignalValue, StageId, Unit, Variant};

pub(crate) type BuildParts = (IndexMap<String, PlanValue>, IndexMap<String, PlanValue>, IndexMap<String, SignalValue>);

#[derive(Debug)]
pub struct BuildContext<'a> {
    stage: &'a StageId,
    variant: &'a Variant,
    config: &'a ResolvedConfig,
    handoff: &'a HandoffState,
    params: &'a [ParamSpec],
    produces: &'a [&'static str],
    specs: IndexMap<String, PlanValue>,
    derived: IndexMap<String, PlanValue>,
    emitted: IndexMap<String, SignalValue>,
}

impl<'a> BuildContext<'a> {
    pub(crate) fn new(stage: &'a StageId,
                      variant: &'a Variant,
                      config: &'a ResolvedConfig,
                      handoff: &'a HandoffState,
                      params: &'a [ParamSpec],
                      produces: &'a [&'static str])
                      -> Self {
        Self { stage,
               variant,
               config,
               handoff,
               params,
               produces,
               specs: IndexMap::new(),
               derived: IndexMap::new(),
               emitted: IndexMap::new() }
    }

    pub fn stage(&self) -> &StageId {
        self.stage
    }

    pub fn variant(&self) -> &Variant {
        self.variant
    }

    pub fn config(&self) -> &ResolvedConfig {
        self.config
    }

    pub fn handoff(&self) -> &HandoffState {
        self.handoff
    }

    fn declared(&self, key: &str) -> Result<ParamSpec, FlowError> {
        self.params
            .iter()
            .find(|p| p.key == key)
            .copied()
            .ok_or_else(|| {
                FlowError::Internal(format!("builder ({}, {}) reads undeclared parameter '{}'", self.stage, self.variant, key))
            })
    }

    fn missing(&self, key: &str) -> FlowError {
        FlowError::MissingParameter { stage: self.stage.to_string(),
                                      key: key.to_string() }
    }

    fn raw(&self, key: &str) -> Option<&'a Value> {
        self.config.get(key)
    }

    /// Parámetro numérico declarado; valida tipo y dominio.
    pub fn number(&mut self, key: &str) -> Result<f64, FlowError> {
        match self.raw(key) {
            Some(raw) => self.accept_number(key, raw),
            None => Err(self.missing(key)),
        }
    }

    /// Como `number`, con un valor propio del builder si la clave no está.
    pub fn number_or(&mut self, key: &str, default: f64) -> Result<f64, FlowError> {
        match self.raw(key) {
            Some(raw) => self.accept_number(key, raw),
            None => self.accept_number(key, &Value::from(default)),
        }
    }

    fn accept_number(&mut self, key: &str, raw: &Value) -> Result<f64, FlowError> {
        let spec = self.declared(key)?;
        let ParamKind::Number { unit, domain } = spec.kind else {
            return Err(FlowError::Internal(format!("parameter '{key}' is not declared as a number")));
        };
        let value = raw.as_f64()
                       .ok_or_else(|| FlowError::invalid(self.stage.as_str(), key, format!("expected a number, found {}", kind_name(raw))))?;
        domain.check(value)
              .map_err(|reason| FlowError::invalid(self.stage.as_str(), key, reason))?;
        self.specs.insert(key.to_string(), PlanValue::quantity(value, unit));
        Ok(value)
    }

    pub fn flag(&mut self, key: &str) -> Result<bool, FlowError> {
        match self.raw(key) {
            Some(raw) => self.accept_flag(key, raw),
            None => Err(self.missing(key)),
        }
    }

    pub fn flag_or(&mut self, key: &str, default: bool) -> Result<bool, FlowError> {
        match self.raw(key) {
            Some(raw) => self.accept_flag(key, raw),
            None => self.accept_flag(key, &Value::Bool(default)),
        }
    }

    fn accept_flag(&mut self, key: &str, raw: &Value) -> Result<bool, FlowError> {
        let spec = self.declared(key)?;
        if spec.kind != ParamKind::Flag {
            return Err(FlowError::Internal(format!("parameter '{key}' is not declared as a flag")));
        }
        let value = raw.as_bool()
                       .ok_or_else(|| FlowError::invalid(self.stage.as_str(), key, format!("expected a boolean, found {}", kind_name(raw))))?;
        self.specs.insert(key.to_string(), PlanValue::Flag(value));
        Ok(value)
    }

    pub fn text(&mut self, key: &str) -> Result<String, FlowError> {
        let raw = self.raw(key).ok_or_else(|| self.missing(key))?;
        let spec = self.declared(key)?;
        if spec.kind != ParamKind::Text {
            return Err(FlowError::Internal(format!("parameter '{key}' is not declared as text")));
        }
        let value = raw.as_str()
                       .ok_or_else(|| FlowError::invalid(self.stage.as_str(), key, format!("expected a string, found {}", kind_name(raw))))?
                       .to_string();
        self.specs.insert(key.to_string(), PlanValue::Text(value.clone()));
        Ok(value)
    }

    /// Señal numérica de un stage anterior. Ausente -> `MissingParameter`
    /// con la clave de handoff.
    pub fn upstream(&mut self, key: &str, unit: Unit) -> Result<f64, FlowError> {
        let value = self.handoff.number(key).ok_or_else(|| self.missing(key))?;
        self.specs.insert(key.to_string(), PlanValue::quantity(value, unit));
        Ok(value)
    }

    /// Señal booleana de un stage anterior, si existe.
    pub fn upstream_flag(&mut self, key: &str) -> Option<bool> {
        let value = self.handoff.flag(key)?;
        self.specs.insert(key.to_string(), PlanValue::Flag(value));
        Some(value)
    }

    /// Corriente de proceso actual: la señal más reciente `*.{suffix}`.
    pub fn stream(&mut self, suffix: &str, unit: Unit) -> Result<f64, FlowError> {
        let (key, value) = self.handoff
                               .latest(suffix)
                               .and_then(|(k, e)| e.value.as_f64().map(|v| (k.to_string(), v)))
                               .ok_or_else(|| self.missing(&format!("*.{suffix}")))?;
        self.specs.insert(key, PlanValue::quantity(value, unit));
        Ok(value)
    }

    /// Registra un valor derivado. Un resultado no finito indica entradas
    /// fuera de dominio y se rechaza.
    pub fn derive(&mut self, key: &str, value: f64, unit: Unit) -> Result<f64, FlowError> {
        if !value.is_finite() {
            return Err(FlowError::invalid(self.stage.as_str(), key, format!("derived value is not finite ({value})")));
        }
        self.derived.insert(key.to_string(), PlanValue::quantity(value, unit));
        Ok(value)
    }

    pub fn derive_flag(&mut self, key: &str, value: bool) {
        self.derived.insert(key.to_string(), PlanValue::Flag(value));
    }

    pub fn derive_text(&mut self, key: &str, value: impl Into<String>) {
        self.derived.insert(key.to_string(), PlanValue::Text(value.into()));
    }

    /// Emite una señal de handoff declarada en `produces`.
    pub fn emit(&mut self, key: &str, value: impl Into<SignalValue>) -> Result<(), FlowError> {
        if !self.produces.iter().any(|k| *k == key) {
            return Err(FlowError::Internal(format!("builder ({}, {}) emits undeclared handoff key '{}'",
                                                   self.stage, self.variant, key)));
        }
        let value = value.into();
        if let SignalValue::Number(n) = value {
            if !n.is_finite() {
                return Err(FlowError::invalid(self.stage.as_str(), key, format!("handoff value is not finite ({n})")));
            }
        }
        self.emitted.insert(key.to_string(), value);
        Ok(())
    }

    pub(crate) fn into_parts(self) -> BuildParts {
        (self.specs, self.derived, self.emitted)
    }
}
