//! Overrides de configuración: documentos por escenario, deep-merge con
//! precedencia "last wins" y composición de capas.
//!
//! Orden de resolución por stage: baseline -> overrides (en el orden dado
//! por el caller). `null` es el centinela de "unset": elimina la clave del
//! resultado en lugar de dejarla vacía.

pub mod composite;
pub mod document;
pub mod merge;

pub use composite::OverrideStack;
pub use document::OverrideDocument;
pub use merge::{merge, merge_documents};
