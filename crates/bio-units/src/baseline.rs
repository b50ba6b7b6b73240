//! Valores por defecto de ingeniería, como tabla plana `stage.parametro`.
//!
//! Es la forma en que llegan desde la extracción de la hoja de cálculo; el
//! store se construye una sola vez por proceso.

use bio_core::{BaselineStore, RegistryError};
use once_cell::sync::OnceCell;
use serde_json::{json, Value};

static STORE: OnceCell<BaselineStore> = OnceCell::new();

/// Tabla plana de defaults.
pub fn baseline_table() -> Vec<(&'static str, Value)> {
    vec![
        // seed train
        ("seed_train.inoculum_fraction", json!(0.05)),
        ("seed_train.target_volume_l", json!(70000)),
        ("seed_train.start_volume_l", json!(1)),
        ("seed_train.scale_up_ratio", json!(10)),
        ("seed_train.stage_duration_h", json!(24)),
        // fermentación de producción (fed-batch y continua)
        ("production.batch_volume_l", json!(70000)),
        ("production.titer_g_per_l", json!(4)),
        ("production.fermentation_time_h", json!(96)),
        ("production.turnaround_h", json!(12)),
        ("production.product_yield_g_per_g", json!(0.3)),
        ("production.carbon_source", json!("glucose")),
        ("production.contaminant_present", json!(false)),
        ("production.working_volume_l", json!(20000)),
        ("production.dilution_rate_per_h", json!(0.05)),
        ("production.run_time_h", json!(480)),
        // separación de biomasa
        ("cell_removal.throughput_l_per_h", json!(15000)),
        ("cell_removal.solids_fraction", json!(0.05)),
        ("cell_removal.recovery", json!(0.97)),
        ("cell_removal.flux_lmh", json!(60)),
        ("cell_removal.process_time_h", json!(8)),
        // concentración
        ("concentration.concentration_factor", json!(4)),
        ("concentration.steam_per_water", json!(0.35)),
        ("concentration.recovery", json!(0.99)),
        ("concentration.flux_lmh", json!(20)),
        ("concentration.process_time_h", json!(10)),
        ("concentration.heat_sensitive", json!(false)),
        // captura
        ("capture.resin_capacity_g_per_l", json!(40)),
        ("capture.cycles", json!(4)),
        ("capture.elution_bv", json!(2)),
        ("capture.wash_bv", json!(10)),
        ("capture.recovery", json!(0.9)),
        ("capture.precipitant_dose_g_per_l", json!(150)),
        ("capture.redissolution_fraction", json!(0.25)),
        ("capture.precipitation_threshold_g_per_l", json!(50)),
        // acondicionamiento por membrana
        ("membrane_conditioning.concentration_factor", json!(2)),
        ("membrane_conditioning.flux_lmh", json!(40)),
        ("membrane_conditioning.process_time_h", json!(4)),
        ("membrane_conditioning.recovery", json!(0.98)),
        ("membrane_conditioning.diavolumes", json!(5)),
        ("membrane_conditioning.salt_removal_target", json!(0.5)),
        // pulido
        ("polish.carbon_dose_g_per_l", json!(5)),
        ("polish.contact_time_h", json!(2)),
        ("polish.recovery", json!(0.98)),
        ("polish.purity_target", json!(0.98)),
        ("polish.resin_capacity_g_per_l", json!(25)),
        ("polish.cycles", json!(5)),
        // forma final
        ("final_form.residual_moisture", json!(0.05)),
        ("final_form.evaporation_rate_kg_per_h", json!(400)),
        ("final_form.recovery", json!(0.97)),
        ("final_form.target_concentration_g_per_l", json!(200)),
    ]
}

/// Store global de baselines, inicializado una sola vez.
pub fn store() -> Result<&'static BaselineStore, RegistryError> {
    STORE.get_or_try_init(|| BaselineStore::from_flat_table(baseline_table()))
}
