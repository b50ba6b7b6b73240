//! Predicados declarativos de routing.

use crate::model::{HandoffState, ResolvedConfig};

/// Predicado arbitrario. Un puntero a función (sin captura de estado) es puro
/// mientras su cuerpo lo sea.
pub type PredicateFn = fn(&ResolvedConfig, &HandoffState) -> bool;

/// Condición evaluada sobre el handoff acumulado y/o la configuración
/// resuelta del stage. Una señal ausente nunca cumple.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Señal booleana de handoff igual a `true`.
    Flag(String),
    NumberAbove { key: String, threshold: f64 },
    NumberBelow { key: String, threshold: f64 },
    TextEquals { key: String, value: String },
    /// Clave booleana de la configuración resuelta igual a `true`.
    ConfigFlag(String),
    ConfigNumberAbove { path: String, threshold: f64 },
    ConfigTextEquals { path: String, value: String },
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
    Not(Box<Predicate>),
    Custom(PredicateFn),
}

impl Predicate {
    pub fn flag(key: impl Into<String>) -> Self {
        Predicate::Flag(key.into())
    }

    pub fn number_above(key: impl Into<String>, threshold: f64) -> Self {
        Predicate::NumberAbove { key: key.into(),
                                 threshold }
    }

    pub fn number_below(key: impl Into<String>, threshold: f64) -> Self {
        Predicate::NumberBelow { key: key.into(),
                                 threshold }
    }

    pub fn text_equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::TextEquals { key: key.into(),
                                value: value.into() }
    }

    pub fn config_flag(path: impl Into<String>) -> Self {
        Predicate::ConfigFlag(path.into())
    }

    pub fn config_number_above(path: impl Into<String>, threshold: f64) -> Self {
        Predicate::ConfigNumberAbove { path: path.into(),
                                       threshold }
    }

    pub fn config_text_equals(path: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::ConfigTextEquals { path: path.into(),
                                      value: value.into() }
    }

    pub fn negate(inner: Predicate) -> Self {
        Predicate::Not(Box::new(inner))
    }

    pub fn evaluate(&self, config: &ResolvedConfig, handoff: &HandoffState) -> bool {
        match self {
            Predicate::Flag(key) => handoff.flag(key) == Some(true),
            Predicate::NumberAbove { key, threshold } => handoff.number(key).is_some_and(|n| n > *threshold),
            Predicate::NumberBelow { key, threshold } => handoff.number(key).is_some_and(|n| n < *threshold),
            Predicate::TextEquals { key, value } => handoff.text(key) == Some(value.as_str()),
            Predicate::ConfigFlag(path) => config.flag(path) == Some(true),
            Predicate::ConfigNumberAbove { path, threshold } => config.number(path).is_some_and(|n| n > *threshold),
            Predicate::ConfigTextEquals { path, value } => config.text(path) == Some(value.as_str()),
            Predicate::All(items) => items.iter().all(|p| p.evaluate(config, handoff)),
            Predicate::Any(items) => items.iter().any(|p| p.evaluate(config, handoff)),
            Predicate::Not(inner) => !inner.evaluate(config, handoff),
            Predicate::Custom(f) => f(config, handoff),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn high_concentration(_: &ResolvedConfig, h: &HandoffState) -> bool {
        h.number("production.titer_g_per_l").is_some_and(|t| t > 50.0)
    }

    #[test]
    fn absent_signals_never_match() {
        let cfg = ResolvedConfig::from_value("membrane_conditioning", json!({"salt_removal_target": 0.95})).unwrap();
        let empty = HandoffState::new();
        assert!(!Predicate::flag("production.contaminant_present").evaluate(&cfg, &empty));
        assert!(!Predicate::number_below("capture.product_mass_kg", 10.0).evaluate(&cfg, &empty));
        assert!(Predicate::negate(Predicate::flag("production.contaminant_present")).evaluate(&cfg, &empty));
        assert!(Predicate::config_number_above("salt_removal_target", 0.9).evaluate(&cfg, &empty));
    }

    #[test]
    fn composite_predicates_combine_handoff_and_config() {
        let cfg = ResolvedConfig::from_value("membrane_conditioning", json!({"salt_removal_target": 0.95})).unwrap();
        let h = HandoffState::new().with_signal("capture", "capture.salt_present", true)
                                   .unwrap()
                                   .with_signal("production", "production.titer_g_per_l", 80.0)
                                   .unwrap();
        let both = Predicate::All(vec![Predicate::flag("capture.salt_present"),
                                       Predicate::config_number_above("salt_removal_target", 0.9)]);
        assert!(both.evaluate(&cfg, &h));
        assert!(Predicate::Custom(high_concentration).evaluate(&cfg, &h));
        assert!(Predicate::Any(vec![Predicate::flag("missing"), Predicate::number_above("production.titer_g_per_l", 50.0)]).evaluate(&cfg, &h));
    }
}
