//! Builders de cada (stage, variante) del catálogo.
//!
//! Todos leen la corriente de proceso actual con `BuildContext::stream`, así
//! un stage no necesita saber qué stage corrió inmediatamente antes.

pub mod formulation;
pub mod purification;
pub mod recovery;
pub mod upstream;

use bio_core::UnitBuilder;

/// Todos los builders del catálogo, en orden de secuencia y con la variante
/// por defecto primero.
pub fn all() -> Vec<Box<dyn UnitBuilder>> {
    vec![Box::new(upstream::FlaskTrain::new()),
         Box::new(upstream::DirectInoculation::new()),
         Box::new(upstream::FedBatch::new()),
         Box::new(upstream::Continuous::new()),
         Box::new(recovery::Centrifugation::new()),
         Box::new(recovery::Microfiltration::new()),
         Box::new(recovery::Evaporation::new()),
         Box::new(recovery::ReverseOsmosis::new()),
         Box::new(purification::IonExchange::new()),
         Box::new(purification::Precipitation::new()),
         Box::new(purification::Ultrafiltration::new()),
         Box::new(purification::Diafiltration::new()),
         Box::new(purification::ActivatedCarbon::new()),
         Box::new(purification::Chromatography::new()),
         Box::new(formulation::SprayDrying::new()),
         Box::new(formulation::LiquidFormulation::new())]
}
