//! Documentos de configuración direccionables por ruta con puntos.
//!
//! Un `ConfigDocument` es un mapa JSON ordenado (orden de inserción) de
//! claves a escalares o sub-mapas. Baseline y overrides comparten esta forma.
//! Las claves individuales no contienen `.`: el punto separa niveles.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::StageId;
use crate::constants::PATH_SEPARATOR;
use crate::errors::FlowError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument(Map<String, Value>);

impl ConfigDocument {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Envuelve un objeto JSON ya parseado. `context` se usa sólo para el
    /// mensaje de error cuando `value` no es un objeto.
    pub fn from_value(context: &str, value: Value) -> Result<Self, FlowError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(FlowError::merge_type(context, "", format!("expected a mapping, found {}", kind_name(&other)))),
        }
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub(crate) fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Busca `a.b.c` recorriendo sub-mapas.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split(PATH_SEPARATOR);
        let first = segments.next()?;
        let mut current = self.0.get(first)?;
        for seg in segments {
            current = current.as_object()?.get(seg)?;
        }
        Some(current)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Inserta `value` en `path`, creando sub-mapas intermedios. Falla con
    /// `MergeType` si un escalar ocupa un nivel intermedio o si se intenta
    /// cambiar un sub-mapa por un escalar (o viceversa).
    pub fn insert_path(&mut self, stage: &str, path: &str, value: Value) -> Result<(), FlowError> {
        let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(FlowError::merge_type(stage, path, "empty path segment"));
        }
        let (leaf, parents) = match segments.split_last() {
            Some(split) => split,
            None => return Err(FlowError::merge_type(stage, path, "empty path")),
        };

        let mut current = &mut self.0;
        for (depth, seg) in parents.iter().enumerate() {
            let slot = current.entry(seg.to_string())
                              .or_insert_with(|| Value::Object(Map::new()));
            current = match slot {
                Value::Object(map) => map,
                other => {
                    let at = segments[..=depth].join(".");
                    return Err(FlowError::merge_type(stage,
                                                     at,
                                                     format!("cannot descend into {}", kind_name(other))));
                }
            };
        }

        if let Some(existing) = current.get(*leaf) {
            if existing.is_object() != value.is_object() && !value.is_null() && !existing.is_null() {
                return Err(FlowError::merge_type(stage,
                                                 path,
                                                 format!("cannot replace {} with {}", kind_name(existing), kind_name(&value))));
            }
        }
        current.insert(leaf.to_string(), value);
        Ok(())
    }

    /// Rutas completas (`a.b.c`) de todas las hojas, en orden de documento.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_leaves(&self.0, "", &mut out);
        out
    }
}

fn collect_leaves(map: &Map<String, Value>, prefix: &str, out: &mut Vec<String>) {
    for (k, v) in map {
        let path = if prefix.is_empty() { k.clone() } else { format!("{prefix}.{k}") };
        match v {
            Value::Object(inner) if !inner.is_empty() => collect_leaves(inner, &path, out),
            _ => out.push(path),
        }
    }
}

pub(crate) fn kind_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

/// Configuración resuelta (baseline + overrides) de un stage. Inmutable una
/// vez producida: sólo expone lectura.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    stage: StageId,
    document: ConfigDocument,
}

impl ResolvedConfig {
    pub(crate) fn new(stage: StageId, document: ConfigDocument) -> Self {
        Self { stage, document }
    }

    /// Construye una configuración resuelta directamente desde un objeto JSON
    /// (útil para invocar builders o reglas fuera del orquestador).
    pub fn from_value(stage: impl Into<StageId>, value: Value) -> Result<Self, FlowError> {
        let stage = stage.into();
        let document = ConfigDocument::from_value(stage.as_str(), value)?;
        Ok(Self { stage, document })
    }

    pub fn stage(&self) -> &StageId {
        &self.stage
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        self.document.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.document.contains(path)
    }

    pub fn number(&self, path: &str) -> Option<f64> {
        self.get(path).and_then(Value::as_f64)
    }

    pub fn flag(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(Value::as_bool)
    }

    pub fn text(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }
}
