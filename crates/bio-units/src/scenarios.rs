//! Escenarios con nombre (documentos de override ya parseados).
//!
//! Se componen en el orden dado; si dos escenarios tocan la misma clave, el
//! último gana.

use bio_core::OverrideDocument;
use serde_json::{json, Value};

pub const NAMES: [&str; 7] = ["glycerol_feed",
                              "continuous_mode",
                              "high_titer",
                              "contaminated_feed",
                              "liquid_product",
                              "high_purity",
                              "heat_sensitive"];

fn body(name: &str) -> Option<Value> {
    let v = match name {
        "glycerol_feed" => json!({"production": {"carbon_source": "glycerol", "product_yield_g_per_g": 0.25}}),
        "continuous_mode" => json!({"production.method": "continuous"}),
        "high_titer" => json!({"production.titer_g_per_l": 8}),
        "contaminated_feed" => json!({"production": {"contaminant_present": true}}),
        "liquid_product" => json!({"final_form.method": "liquid_formulation"}),
        "high_purity" => json!({"polish.purity_target": 0.995}),
        "heat_sensitive" => json!({"concentration": {"heat_sensitive": true}}),
        _ => return None,
    };
    Some(v)
}

/// Documento del escenario `name`, o `None` si no existe.
pub fn scenario(name: &str) -> Option<OverrideDocument> {
    body(name).and_then(|b| OverrideDocument::new(name, b).ok())
}

/// Documentos de `names` en el orden dado. Falla con el primer nombre
/// desconocido.
pub fn compose(names: &[&str]) -> Result<Vec<OverrideDocument>, UnknownScenario> {
    names.iter()
         .map(|n| scenario(n).ok_or_else(|| UnknownScenario(n.to_string())))
         .collect()
}

/// Nombre de escenario que no existe en el catálogo.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scenario '{0}'")]
pub struct UnknownScenario(pub String);

