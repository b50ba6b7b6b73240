//! Baseline Store: un documento por defecto, inmutable, por stage.

pub mod store;

pub use store::BaselineStore;
