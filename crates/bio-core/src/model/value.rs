//! Valores tipados de planes (`specs`, `derived`) y señales de handoff.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Unit;

/// Señal intercambiada entre stages: numérica, booleana o texto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignalValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl SignalValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SignalValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SignalValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SignalValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for SignalValue {
    fn from(v: f64) -> Self {
        SignalValue::Number(v)
    }
}

impl From<bool> for SignalValue {
    fn from(v: bool) -> Self {
        SignalValue::Flag(v)
    }
}

impl From<&str> for SignalValue {
    fn from(v: &str) -> Self {
        SignalValue::Text(v.to_string())
    }
}

impl From<String> for SignalValue {
    fn from(v: String) -> Self {
        SignalValue::Text(v)
    }
}

/// Valor registrado en `specs`/`derived` de un `UnitPlan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlanValue {
    Quantity { value: f64, unit: Unit },
    Flag(bool),
    Text(String),
}

impl PlanValue {
    pub fn quantity(value: f64, unit: Unit) -> Self {
        PlanValue::Quantity { value, unit }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PlanValue::Quantity { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn unit(&self) -> Option<Unit> {
        match self {
            PlanValue::Quantity { unit, .. } => Some(*unit),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PlanValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PlanValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl From<&SignalValue> for PlanValue {
    fn from(v: &SignalValue) -> Self {
        match v {
            SignalValue::Number(n) => PlanValue::Quantity { value: *n,
                                                            unit: Unit::None },
            SignalValue::Flag(b) => PlanValue::Flag(*b),
            SignalValue::Text(s) => PlanValue::Text(s.clone()),
        }
    }
}
