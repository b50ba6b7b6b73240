//! Estado de handoff entre stages.
//!
//! Acumula señales de forma monótona a lo largo de la corrida: un stage
//! posterior puede leer pero nunca reescribir una señal previa (write-once).
//! La propagación es funcional: `propagate` devuelve un estado nuevo.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{SignalValue, StageId, UnitPlan};
use crate::errors::FlowError;

/// Señal con el stage que la emitió.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandoffEntry {
    pub value: SignalValue,
    pub origin: StageId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandoffState {
    signals: IndexMap<String, HandoffEntry>,
}

impl HandoffState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Devuelve un estado nuevo con la señal añadida. Falla con
    /// `HandoffCollision` si la clave ya existe.
    pub fn with_signal(&self,
                       origin: impl Into<StageId>,
                       key: impl Into<String>,
                       value: impl Into<SignalValue>)
                       -> Result<Self, FlowError> {
        let mut next = self.clone();
        next.insert(origin.into(), key.into(), value.into())?;
        Ok(next)
    }

    fn insert(&mut self, origin: StageId, key: String, value: SignalValue) -> Result<(), FlowError> {
        if let Some(existing) = self.signals.get(&key) {
            return Err(FlowError::HandoffCollision { stage: origin.to_string(),
                                                     key,
                                                     owner: existing.origin.to_string() });
        }
        self.signals.insert(key, HandoffEntry { value, origin });
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&SignalValue> {
        self.signals.get(key).map(|e| &e.value)
    }

    pub fn entry(&self, key: &str) -> Option<&HandoffEntry> {
        self.signals.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.signals.contains_key(key)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(SignalValue::as_f64)
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(SignalValue::as_bool)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(SignalValue::as_str)
    }

    /// Señal emitida más recientemente cuya clave termina en `.{suffix}`.
    ///
    /// Permite a un stage encontrar la corriente de proceso actual (masa,
    /// volumen) sin conocer qué stage opcional corrió inmediatamente antes.
    pub fn latest(&self, suffix: &str) -> Option<(&str, &HandoffEntry)> {
        self.signals
            .iter()
            .rev()
            .find(|(k, _)| {
                k.len() > suffix.len() && k.ends_with(suffix) && k[..k.len() - suffix.len()].ends_with('.')
            })
            .map(|(k, e)| (k.as_str(), e))
    }

    pub fn latest_number(&self, suffix: &str) -> Option<f64> {
        self.latest(suffix).and_then(|(_, e)| e.value.as_f64())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.signals.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HandoffEntry)> {
        self.signals.iter().map(|(k, e)| (k.as_str(), e))
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

/// Devuelve `state` más las señales declaradas por `plan`.
///
/// Función pura: `state` no se modifica. Propagar dos veces el mismo plan
/// falla con `HandoffCollision` en la primera clave repetida.
pub fn propagate(plan: &UnitPlan, state: &HandoffState) -> Result<HandoffState, FlowError> {
    let mut next = state.clone();
    for (key, value) in plan.handoff() {
        next.insert(plan.stage().clone(), key.clone(), value.clone())?;
    }
    Ok(next)
}
