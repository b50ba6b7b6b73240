//! Tablas de routing del catálogo, una por stage y en orden de secuencia.
//!
//! Reglas evaluadas en orden de declaración; la primera que cumple gana.
//! Condiciones compuestas van dentro de una sola regla (`All`/`Any`).

use bio_core::{HandoffState, Predicate, ResolvedConfig, RouteTable};

use crate::stages::*;

/// Concentración de la corriente (g/L) por encima del umbral configurado.
/// Sin umbral o sin corriente, no cumple.
fn concentrated_stream(config: &ResolvedConfig, handoff: &HandoffState) -> bool {
    let (Some(mass), Some(volume), Some(threshold)) = (handoff.latest_number(STREAM_MASS),
                                                        handoff.latest_number(STREAM_VOLUME),
                                                        config.number("precipitation_threshold_g_per_l"))
    else {
        return false;
    };
    volume > 0.0 && mass * 1000.0 / volume > threshold
}

pub fn tables() -> Vec<RouteTable> {
    vec![RouteTable::new(SEED_TRAIN, "flask_train").alternate("direct_inoculation"),
         RouteTable::new(PRODUCTION, "fed_batch").alternate("continuous"),
         RouteTable::new(CELL_REMOVAL, "centrifugation").rule("continuous_harvest",
                                                               Predicate::text_equals("production.mode", "continuous"),
                                                               "microfiltration"),
         RouteTable::new(CONCENTRATION, "evaporation").rule("heat_sensitive_product",
                                                             Predicate::config_flag("heat_sensitive"),
                                                             "reverse_osmosis"),
         RouteTable::new(CAPTURE, "ion_exchange").rule("concentrated_stream",
                                                        Predicate::Custom(concentrated_stream),
                                                        "precipitation"),
         RouteTable::new(MEMBRANE_CONDITIONING, "ultrafiltration")
             .rule("contaminant_present", Predicate::flag("production.contaminant_present"), "diafiltration")
             .rule("salt_removal_required",
                   Predicate::All(vec![Predicate::flag("capture.salt_present"),
                                       Predicate::config_number_above("salt_removal_target", 0.9)]),
                   "diafiltration"),
         RouteTable::new(POLISH, "activated_carbon").rule("high_purity_target",
                                                          Predicate::config_number_above("purity_target", 0.99),
                                                          "chromatography"),
         RouteTable::new(FINAL_FORM, "spray_drying").alternate("liquid_formulation")]
}
