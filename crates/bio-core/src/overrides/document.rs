//! Documento de override de un escenario.
//!
//! Las claves de primer nivel son ids de stage (`"production": {...}`) o
//! rutas con puntos (`"production.titer_g_per_l": 8`). Ambas formas pueden
//! convivir en un mismo documento: primero se toma la forma anidada y luego
//! las claves con puntos, en orden de documento.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::PATH_SEPARATOR;
use crate::errors::FlowError;
use crate::model::document::kind_name;
use crate::model::{ConfigDocument, StageId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideDocument {
    name: String,
    body: Map<String, Value>,
}

impl OverrideDocument {
    /// Envuelve un documento ya parseado. Debe ser un objeto JSON.
    pub fn new(name: impl Into<String>, body: Value) -> Result<Self, FlowError> {
        let name = name.into();
        match body {
            Value::Object(body) => Ok(Self { name, body }),
            other => Err(FlowError::merge_type(name.as_str(),
                                               "",
                                               format!("override document must be a mapping, found {}", kind_name(&other)))),
        }
    }

    pub fn from_map(name: impl Into<String>, body: Map<String, Value>) -> Self {
        Self { name: name.into(),
               body }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Stage al que apunta cada clave de primer nivel, en orden de documento
    /// (puede repetirse si se usan ambas formas).
    pub fn stage_keys(&self) -> impl Iterator<Item = (&str, &str)> {
        self.body.keys().map(|k| {
                            let stage = k.split(PATH_SEPARATOR).next().unwrap_or(k.as_str());
                            (k.as_str(), stage)
                        })
    }

    /// Sub-documento aplicable a `stage`, o `None` si el override no lo toca.
    pub fn for_stage(&self, stage: &StageId) -> Result<Option<ConfigDocument>, FlowError> {
        let mut doc: Option<ConfigDocument> = None;

        if let Some(nested) = self.body.get(stage.as_str()) {
            match nested {
                Value::Object(map) => doc = Some(ConfigDocument::from_map(map.clone())),
                other => {
                    return Err(FlowError::merge_type(stage.as_str(),
                                                     "",
                                                     format!("override '{}' maps the stage to {}",
                                                             self.name,
                                                             kind_name(other))))
                }
            }
        }

        for (key, value) in &self.body {
            let Some((head, rest)) = key.split_once(PATH_SEPARATOR) else {
                continue;
            };
            if head != stage.as_str() {
                continue;
            }
            doc.get_or_insert_with(ConfigDocument::new)
               .insert_path(stage.as_str(), rest, value.clone())?;
        }

        Ok(doc)
    }
}
