//! Secuencia fija de stages del flowsheet.
//!
//! Añadir o quitar un stage exige tocar esta lista, el baseline, las tablas
//! de routing y los builders.

pub const SEED_TRAIN: &str = "seed_train";
pub const PRODUCTION: &str = "production";
pub const CELL_REMOVAL: &str = "cell_removal";
pub const CONCENTRATION: &str = "concentration";
pub const CAPTURE: &str = "capture";
pub const MEMBRANE_CONDITIONING: &str = "membrane_conditioning";
pub const POLISH: &str = "polish";
pub const FINAL_FORM: &str = "final_form";

pub const SEQUENCE: [&str; 8] = [SEED_TRAIN,
                                 PRODUCTION,
                                 CELL_REMOVAL,
                                 CONCENTRATION,
                                 CAPTURE,
                                 MEMBRANE_CONDITIONING,
                                 POLISH,
                                 FINAL_FORM];

/// Sufijo de la señal de masa de producto de la corriente actual.
pub const STREAM_MASS: &str = "product_mass_kg";
/// Sufijo de la señal de volumen de la corriente actual.
pub const STREAM_VOLUME: &str = "stream_volume_l";
