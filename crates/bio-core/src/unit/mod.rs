//! Builders de unidades de proceso.
//!
//! Un builder es una unidad determinista que, dada la configuración resuelta
//! de su stage y el handoff acumulado, produce `specs`, `derived` y las
//! señales de handoff que declaró. Este módulo define:
//! - `UnitBuilder`: interfaz neutral usada por el registro.
//! - `ParamSpec`: contrato de parámetros (unidad, dominio, obligatoriedad).
//! - `BuildContext`: acceso controlado a entradas y registro de salidas.
//! - `unit_builder!`: macro para declarar builders sin boilerplate.

pub mod context;
pub mod definition;
pub mod macros;
mod status;

pub use context::BuildContext;
pub use definition::{ParamKind, ParamSpec, UnitBuilder};
pub use status::StageStatus;
