//! Module Registry: `(stage, variante) -> builder`.
//!
//! Antes de invocar un builder se valida que la configuración resuelta
//! contenga todas sus claves obligatorias y que ninguna de las señales que
//! promete emitir exista ya en el handoff. Después se comprueba que emitió
//! exactamente lo declarado.

use indexmap::IndexMap;
use log::debug;

use crate::errors::{FlowError, RegistryError};
use crate::model::{HandoffState, ResolvedConfig, StageId, UnitPlan, Variant};
use crate::unit::{BuildContext, UnitBuilder};

#[derive(Debug, Default)]
pub struct ModuleRegistry {
    builders: IndexMap<(StageId, Variant), Box<dyn UnitBuilder>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<B>(&mut self, builder: B) -> Result<(), RegistryError>
        where B: UnitBuilder + 'static
    {
        self.register_boxed(Box::new(builder))
    }

    /// Registra un builder validando su contrato: par (stage, variante)
    /// único, sin parámetros ni claves de handoff repetidas.
    pub fn register_boxed(&mut self, builder: Box<dyn UnitBuilder>) -> Result<(), RegistryError> {
        let stage = builder.stage();
        let variant = builder.variant();

        let params = builder.params();
        for (i, p) in params.iter().enumerate() {
            if params[..i].iter().any(|q| q.key == p.key) {
                return Err(RegistryError::DuplicateParameter { stage: stage.to_string(),
                                                               variant: variant.to_string(),
                                                               key: p.key.to_string() });
            }
        }
        let produces = builder.produces();
        for (i, key) in produces.iter().enumerate() {
            if produces[..i].contains(key) {
                return Err(RegistryError::DuplicateHandoffKey { stage: stage.to_string(),
                                                                variant: variant.to_string(),
                                                                key: key.to_string() });
            }
        }

        let id = (StageId::from(stage), Variant::from(variant));
        if self.builders.contains_key(&id) {
            return Err(RegistryError::DuplicateBuilder { stage: stage.to_string(),
                                                         variant: variant.to_string() });
        }
        self.builders.insert(id, builder);
        Ok(())
    }

    pub fn contains(&self, stage: &StageId, variant: &Variant) -> bool {
        self.builders.contains_key(&(stage.clone(), variant.clone()))
    }

    pub fn get(&self, stage: &StageId, variant: &Variant) -> Option<&dyn UnitBuilder> {
        self.builders.get(&(stage.clone(), variant.clone())).map(|b| b.as_ref())
    }

    /// Variantes registradas para `stage`, en orden de registro.
    pub fn variants(&self, stage: &StageId) -> Vec<&Variant> {
        self.builders.keys().filter(|(s, _)| s == stage).map(|(_, v)| v).collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&StageId, &Variant, &dyn UnitBuilder)> {
        self.builders.iter().map(|((s, v), b)| (s, v, b.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }

    /// Construye el plan de `(stage, variant)`.
    pub fn build(&self,
                 stage: &StageId,
                 variant: &Variant,
                 config: &ResolvedConfig,
                 handoff: &HandoffState)
                 -> Result<UnitPlan, FlowError> {
        let builder = self.get(stage, variant)
                          .ok_or_else(|| FlowError::UnknownVariant { stage: stage.to_string(),
                                                                     variant: variant.to_string() })?;

        for key in builder.required_keys() {
            if !config.contains(key) {
                return Err(FlowError::MissingParameter { stage: stage.to_string(),
                                                         key: key.to_string() });
            }
        }
        for key in builder.produces() {
            if let Some(entry) = handoff.entry(key) {
                return Err(FlowError::HandoffCollision { stage: stage.to_string(),
                                                         key: key.to_string(),
                                                         owner: entry.origin.to_string() });
            }
        }

        let mut ctx = BuildContext::new(stage, variant, config, handoff, builder.params(), builder.produces());
        builder.build(&mut ctx)?;
        let (specs, derived, emitted) = ctx.into_parts();

        if let Some(key) = builder.produces().iter().find(|k| !emitted.contains_key(**k)) {
            return Err(FlowError::Internal(format!("builder ({stage}, {variant}) did not emit declared handoff key '{key}'")));
        }

        let plan = UnitPlan::assemble(stage.clone(), variant.clone(), specs, derived, emitted);
        debug!("built ({}, {}) fingerprint={}", stage, variant, plan.fingerprint());
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Domain, SignalValue, Unit};
    use crate::unit::ParamSpec;
    use crate::unit_builder;
    use serde_json::json;

    unit_builder! {
        Dosing {
            stage: "polish",
            variant: "activated_carbon",
            params: [ParamSpec::number("volume_l", Unit::Liter, Domain::Positive),
                     ParamSpec::number("dose_g_per_l", Unit::GramPerLiter, Domain::NonNegative)],
            produces: ["polish.carbon_kg"],
            build(ctx) {
                let v = ctx.number("volume_l")?;
                let dose = ctx.number("dose_g_per_l")?;
                let kg = ctx.derive("carbon_kg", v * dose / 1000.0, Unit::Kilogram)?;
                ctx.emit("polish.carbon_kg", kg)
            }
        }
    }

    unit_builder! {
        Forgetful {
            stage: "polish",
            variant: "chromatography",
            params: [],
            produces: ["polish.resin_l"],
            build(_ctx) {
                Ok(())
            }
        }
    }

    fn registry() -> ModuleRegistry {
        let mut r = ModuleRegistry::new();
        r.register(Dosing::new()).unwrap();
        r.register(Forgetful::new()).unwrap();
        r
    }

    #[test]
    fn build_is_deterministic_and_records_specs() {
        let r = registry();
        let cfg = ResolvedConfig::from_value("polish", json!({"volume_l": 20000, "dose_g_per_l": 5, "unused": true})).unwrap();
        let a = r.build(&"polish".into(), &"activated_carbon".into(), &cfg, &HandoffState::new()).unwrap();
        let b = r.build(&"polish".into(), &"activated_carbon".into(), &cfg, &HandoffState::new()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.derived_number("carbon_kg"), Some(100.0));
        assert_eq!(a.handoff().get("polish.carbon_kg"), Some(&SignalValue::Number(100.0)));
        assert!(a.spec("unused").is_none());
    }

    #[test]
    fn contract_violations_are_reported() {
        let r = registry();
        let stage = StageId::from("polish");
        let cfg = ResolvedConfig::from_value("polish", json!({"volume_l": 20000})).unwrap();
        let err = r.build(&stage, &"activated_carbon".into(), &cfg, &HandoffState::new()).unwrap_err();
        assert_eq!(err,
                   FlowError::MissingParameter { stage: "polish".into(),
                                                 key: "dose_g_per_l".into() });

        let err = r.build(&stage, &"membrane".into(), &cfg, &HandoffState::new()).unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::UnknownVariant);

        let err = r.build(&stage, &"chromatography".into(), &cfg, &HandoffState::new()).unwrap_err();
        assert!(matches!(err, FlowError::Internal(_)));

        let taken = HandoffState::new().with_signal("capture", "polish.carbon_kg", 1.0).unwrap();
        let cfg = ResolvedConfig::from_value("polish", json!({"volume_l": 1, "dose_g_per_l": 1})).unwrap();
        let err = r.build(&stage, &"activated_carbon".into(), &cfg, &taken).unwrap_err();
        assert_eq!(err,
                   FlowError::HandoffCollision { stage: "polish".into(),
                                                 key: "polish.carbon_kg".into(),
                                                 owner: "capture".into() });
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut r = registry();
        assert_eq!(r.register(Dosing::new()),
                   Err(RegistryError::DuplicateBuilder { stage: "polish".into(),
                                                         variant: "activated_carbon".into() }));
        assert_eq!(r.variants(&"polish".into()).len(), 2);
    }
}
