use bio_core::{FlowError, PipelineError, RegistryError};
use bio_units::UnknownScenario;
use thiserror::Error;

/// Errores de la capa de aplicación.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Corrida abortada: {0}")]
    Pipeline(#[from] PipelineError),
    #[error("Definición inválida: {0}")]
    Registry(#[from] RegistryError),
    #[error("Error de resolución: {0}")]
    Flow(#[from] FlowError),
    #[error("Escenario inválido: {0}")]
    Scenario(#[from] UnknownScenario),
    #[error("Error de configuración: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_variant_from() {
        let err: AppError = UnknownScenario("nope".into()).into();
        assert_eq!(err.to_string(), "Escenario inválido: unknown scenario 'nope'");
    }

    #[test]
    fn test_config_variant_format() {
        let err = AppError::Config("mala configuración".into());
        assert_eq!(err.to_string(), "Error de configuración: mala configuración");
    }

    #[test]
    fn test_flow_variant_from() {
        let err: AppError = FlowError::UnknownStage { stage: "x".into() }.into();
        assert!(err.to_string().starts_with("Error de resolución: "));
    }
}
