//! Constantes del motor de resolución.
//!
//! `ENGINE_VERSION` forma parte del input de todos los fingerprints: cambiarla
//! invalida de forma determinista los fingerprints de planes previos aunque la
//! configuración no cambie.

/// Versión lógica del motor. Mantener estable mientras no haya cambios
/// incompatibles en el cálculo de planes.
pub const ENGINE_VERSION: &str = "B1.0";

/// Clave de configuración que fija explícitamente la variante de un stage.
pub const DEFAULT_SELECTOR_KEY: &str = "method";

/// Separador de rutas en documentos de configuración (`stage.sub.key`).
pub const PATH_SEPARATOR: char = '.';
