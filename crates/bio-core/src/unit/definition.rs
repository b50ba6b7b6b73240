use std::fmt::Debug;

use super::BuildContext;
use crate::errors::FlowError;
use crate::model::{Domain, Unit};

/// Tipo declarado de un parámetro de configuración.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Number { unit: Unit, domain: Domain },
    Flag,
    Text,
}

/// Parámetro que un builder lee de su configuración resuelta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub key: &'static str,
    pub kind: ParamKind,
    pub required: bool,
}

impl ParamSpec {
    pub const fn number(key: &'static str, unit: Unit, domain: Domain) -> Self {
        Self { key,
               kind: ParamKind::Number { unit, domain },
               required: true }
    }

    pub const fn flag(key: &'static str) -> Self {
        Self { key,
               kind: ParamKind::Flag,
               required: true }
    }

    pub const fn text(key: &'static str) -> Self {
        Self { key,
               kind: ParamKind::Text,
               required: true }
    }

    /// El builder tiene un valor por defecto propio para este parámetro.
    pub const fn optional(self) -> Self {
        Self { required: false,
               ..self }
    }
}

/// Trait que define un builder. Implementaciones deben ser puras respecto a
/// (configuración resuelta, handoff): mismas entradas, mismo plan.
pub trait UnitBuilder: Send + Sync + Debug {
    /// Stage al que pertenece.
    fn stage(&self) -> &'static str;

    /// Variante que implementa.
    fn variant(&self) -> &'static str;

    /// Parámetros que lee (los `required` se validan antes de `build`).
    fn params(&self) -> &[ParamSpec];

    /// Claves de handoff que promete emitir, todas y sólo ellas.
    fn produces(&self) -> &[&'static str];

    /// Calcula specs/derived/handoff a través del contexto.
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<(), FlowError>;

    fn required_keys(&self) -> Vec<&'static str> {
        self.params().iter().filter(|p| p.required).map(|p| p.key).collect()
    }
}
