//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) y expone una estructura inmutable (`CONFIG`).
use std::env;

use log::warn;
use once_cell::sync::Lazy;

use crate::errors::AppError;

/// Configuración global de la aplicación.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Corridas de escenarios en paralelo; `1` fuerza evaluación secuencial.
    pub parallel_runs: usize,
    /// Si los `PipelineResult` cargan el journal de la corrida.
    pub record_journal: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { parallel_runs: rayon::current_num_threads(),
               record_journal: true }
    }
}

impl AppConfig {
    /// Lee `.env` (si existe) y las variables `BIOFLOW_*` del proceso.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables arbitraria.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
        where F: Fn(&str) -> Option<String>
    {
        let mut config = Self::default();
        if let Some(raw) = lookup("BIOFLOW_PARALLEL_RUNS") {
            config.parallel_runs = match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(AppError::Config(format!("BIOFLOW_PARALLEL_RUNS inválido: '{raw}'"))),
            };
        }
        if let Some(raw) = lookup("BIOFLOW_RECORD_JOURNAL") {
            config.record_journal = parse_flag(&raw).ok_or_else(|| {
                                                     AppError::Config(format!("BIOFLOW_RECORD_JOURNAL inválido: '{raw}'"))
                                                 })?;
        }
        Ok(config)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Instancia global perezosa de configuración, evaluada una sola vez.
/// Con valores inválidos cae a los defaults.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    AppConfig::from_env().unwrap_or_else(|e| {
                             warn!("{e}; usando configuración por defecto");
                             AppConfig::default()
                         })
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn missing_variables_use_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.parallel_runs >= 1);
    }

    #[test]
    fn variables_are_parsed() {
        let config = AppConfig::from_lookup(lookup(&[("BIOFLOW_PARALLEL_RUNS", "1"),
                                                     ("BIOFLOW_RECORD_JOURNAL", "off")])).unwrap();
        assert_eq!(config.parallel_runs, 1);
        assert!(!config.record_journal);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let err = AppConfig::from_lookup(lookup(&[("BIOFLOW_PARALLEL_RUNS", "0")])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        let err = AppConfig::from_lookup(lookup(&[("BIOFLOW_RECORD_JOURNAL", "maybe")])).unwrap_err();
        assert!(err.to_string().contains("BIOFLOW_RECORD_JOURNAL"));
    }
}
