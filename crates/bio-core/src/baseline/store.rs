//! Almacén de baselines.
//!
//! Se puebla desde una tabla plana `stage.parametro -> valor` y a partir de
//! ahí sólo se entrega por referencia compartida. Ninguna corrida escribe
//! sobre él; quien lo construye lo guarda como valor único del proceso.

use indexmap::IndexMap;
use log::debug;
use serde_json::Value;

use crate::constants::PATH_SEPARATOR;
use crate::errors::{FlowError, RegistryError};
use crate::model::{ConfigDocument, StageId};

#[derive(Debug, Clone, Default)]
pub struct BaselineStore {
    documents: IndexMap<StageId, ConfigDocument>,
}

impl BaselineStore {
    /// Construye el store desde una tabla plana ya validada (`stage.ruta`).
    ///
    /// Las filas `null` se ignoran (celdas vacías de la fuente). Una clave sin
    /// parte de parámetro es `MalformedBaselineKey`; dos filas incompatibles
    /// en la misma ruta son `BaselineConflict`.
    pub fn from_flat_table<'a, I>(rows: I) -> Result<Self, RegistryError>
        where I: IntoIterator<Item = (&'a str, Value)>
    {
        let mut documents: IndexMap<StageId, ConfigDocument> = IndexMap::new();
        let mut count = 0usize;
        for (key, value) in rows {
            if value.is_null() {
                continue;
            }
            let (stage, path) = key.split_once(PATH_SEPARATOR)
                                   .filter(|(s, p)| !s.is_empty() && !p.is_empty())
                                   .ok_or_else(|| RegistryError::MalformedBaselineKey(key.to_string()))?;
            documents.entry(StageId::from(stage))
                     .or_default()
                     .insert_path(stage, path, value)
                     .map_err(RegistryError::BaselineConflict)?;
            count += 1;
        }
        debug!("baseline store loaded: {} stage(s), {} parameter(s)", documents.len(), count);
        Ok(Self { documents })
    }

    /// Documento por defecto de `stage`.
    pub fn get_baseline(&self, stage: &StageId) -> Result<&ConfigDocument, FlowError> {
        self.documents
            .get(stage)
            .ok_or_else(|| FlowError::UnknownStage { stage: stage.to_string() })
    }

    pub fn contains(&self, stage: &StageId) -> bool {
        self.documents.contains_key(stage)
    }

    pub fn stages(&self) -> impl Iterator<Item = &StageId> {
        self.documents.keys()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_table_groups_rows_by_stage() {
        let store = BaselineStore::from_flat_table(vec![("production.titer_g_per_l", json!(4)),
                                                        ("production.batch_volume_l", json!(70000)),
                                                        ("polish.carbon.dose_g_per_l", json!(5)),
                                                        ("polish.unused", Value::Null)]).unwrap();
        let prod = store.get_baseline(&"production".into()).unwrap();
        assert_eq!(prod.get("titer_g_per_l"), Some(&json!(4)));
        let polish = store.get_baseline(&"polish".into()).unwrap();
        assert_eq!(polish.get("carbon.dose_g_per_l"), Some(&json!(5)));
        assert!(!polish.contains("unused"));
        assert_eq!(store.stages().map(StageId::as_str).collect::<Vec<_>>(), vec!["production", "polish"]);
    }

    #[test]
    fn unknown_stage_and_malformed_keys_fail() {
        let store = BaselineStore::from_flat_table(vec![("capture.recovery", json!(0.9))]).unwrap();
        let err = store.get_baseline(&"drying".into()).unwrap_err();
        assert_eq!(err, FlowError::UnknownStage { stage: "drying".into() });

        let err = BaselineStore::from_flat_table(vec![("capture", json!(1))]).unwrap_err();
        assert_eq!(err, RegistryError::MalformedBaselineKey("capture".into()));

        let err = BaselineStore::from_flat_table(vec![("capture.resin", json!(1)), ("capture.resin.cycles", json!(4))]).unwrap_err();
        assert!(matches!(err, RegistryError::BaselineConflict(_)));
    }
}
