//! Deep-merge determinista de documentos de configuración.
//!
//! Reglas, clave por clave del overlay:
//! - overlay `null` -> se elimina la clave del resultado.
//! - mapa sobre mapa -> merge recursivo.
//! - mapa vs escalar (en cualquier dirección) -> `MergeType`.
//! - resto -> el overlay reemplaza el valor completo (las listas son hojas).
//!
//! Aplicar dos veces la misma lista de overrides produce el mismo resultado,
//! y repetir una capa idéntica no cambia nada.

use log::debug;
use serde_json::{Map, Value};

use crate::errors::FlowError;
use crate::model::document::kind_name;
use crate::model::{ConfigDocument, ResolvedConfig, StageId};

/// Fusiona `overrides` sobre `baseline` en el orden dado.
pub fn merge(stage: &StageId, baseline: &ConfigDocument, overrides: &[ConfigDocument]) -> Result<ResolvedConfig, FlowError> {
    let mut accumulated = baseline.clone();
    for layer in overrides {
        accumulated = merge_documents(stage.as_str(), &accumulated, layer)?;
    }
    debug!("stage '{}' resolved from baseline + {} override layer(s)", stage, overrides.len());
    Ok(ResolvedConfig::new(stage.clone(), accumulated))
}

/// Merge de una sola capa: devuelve un documento nuevo, `base` no se toca.
pub fn merge_documents(stage: &str, base: &ConfigDocument, overlay: &ConfigDocument) -> Result<ConfigDocument, FlowError> {
    let mut out = base.clone();
    merge_into(stage, "", out.as_map_mut(), overlay.as_map())?;
    Ok(out)
}

fn merge_into(stage: &str, prefix: &str, target: &mut Map<String, Value>, overlay: &Map<String, Value>) -> Result<(), FlowError> {
    for (key, incoming) in overlay {
        let path = if prefix.is_empty() { key.clone() } else { format!("{prefix}.{key}") };

        if incoming.is_null() {
            target.remove(key);
            continue;
        }

        match (target.get_mut(key), incoming) {
            (Some(Value::Object(current)), Value::Object(inner)) => {
                merge_into(stage, &path, current, inner)?;
            }
            (Some(existing), _) if !existing.is_null() && existing.is_object() != incoming.is_object() => {
                return Err(FlowError::merge_type(stage,
                                                 path,
                                                 format!("cannot replace {} with {}",
                                                         kind_name(existing),
                                                         kind_name(incoming))));
            }
            _ => {
                target.insert(key.clone(), strip_nulls(incoming));
            }
        }
    }
    Ok(())
}

/// Un mapa nuevo introducido por un override no arrastra centinelas `null`.
fn strip_nulls(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let cleaned: Map<String, Value> = map.iter()
                                                 .filter(|(_, v)| !v.is_null())
                                                 .map(|(k, v)| (k.clone(), strip_nulls(v)))
                                                 .collect();
            Value::Object(cleaned)
        }
        other => other.clone(),
    }
}
