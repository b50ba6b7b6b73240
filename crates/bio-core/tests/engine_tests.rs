use bio_core::{unit_builder, BaselineStore, Domain, ErrorKind, FlowDefinition, FlowEngine, FlowError, InMemoryEventStore,
               OverrideDocument, ParamSpec, Predicate, RegistryError, RouteReason, RouteTable, RunEventKind, StageStatus, Unit};
use bio_core::EventStore;
use rayon::prelude::*;
use serde_json::json;

unit_builder! {
    Batch {
        stage: "production",
        variant: "batch",
        params: [ParamSpec::number("volume_l", Unit::Liter, Domain::Positive),
                 ParamSpec::number("titer_g_per_l", Unit::GramPerLiter, Domain::NonNegative),
                 ParamSpec::flag("dirty")],
        produces: ["production.product_mass_kg", "production.dirty"],
        build(ctx) {
            let v = ctx.number("volume_l")?;
            let t = ctx.number("titer_g_per_l")?;
            let dirty = ctx.flag("dirty")?;
            let mass = ctx.derive("product_mass_kg", v * t / 1000.0, Unit::Kilogram)?;
            ctx.emit("production.product_mass_kg", mass)?;
            ctx.emit("production.dirty", dirty)
        }
    }
}

unit_builder! {
    Plain {
        stage: "cleanup",
        variant: "plain",
        params: [ParamSpec::number("recovery", Unit::Fraction, Domain::Fraction)],
        produces: ["cleanup.product_mass_kg"],
        build(ctx) {
            let m = ctx.stream("product_mass_kg", Unit::Kilogram)?;
            let r = ctx.number("recovery")?;
            let out = ctx.derive("product_mass_kg", m * r, Unit::Kilogram)?;
            ctx.emit("cleanup.product_mass_kg", out)
        }
    }
}

unit_builder! {
    Scrub {
        stage: "cleanup",
        variant: "scrub",
        params: [ParamSpec::number("recovery", Unit::Fraction, Domain::Fraction)],
        produces: ["cleanup.product_mass_kg"],
        build(ctx) {
            let m = ctx.stream("product_mass_kg", Unit::Kilogram)?;
            let r = ctx.number("recovery")?;
            let out = ctx.derive("product_mass_kg", m * r * 0.9, Unit::Kilogram)?;
            ctx.emit("cleanup.product_mass_kg", out)
        }
    }
}

fn definition() -> FlowDefinition {
    FlowDefinition::builder().stage(RouteTable::new("production", "batch"))
                             .stage(RouteTable::new("cleanup", "plain").rule("dirty_feed",
                                                                              Predicate::flag("production.dirty"),
                                                                              "scrub"))
                             .register(Batch::new())
                             .register(Plain::new())
                             .register(Scrub::new())
                             .build()
                             .expect("valid definition")
}

fn baseline() -> BaselineStore {
    BaselineStore::from_flat_table(vec![("production.volume_l", json!(1000)),
                                        ("production.titer_g_per_l", json!(4)),
                                        ("production.dirty", json!(false)),
                                        ("cleanup.recovery", json!(0.5))]).expect("valid baseline")
}

#[test]
fn full_run_threads_handoff_and_routes() {
    let (def, base) = (definition(), baseline());
    let engine = FlowEngine::new(&base, &def);

    let clean = engine.run(&[]).unwrap();
    assert_eq!(clean.plans().len(), 2);
    assert_eq!(clean.plan("cleanup").unwrap().variant(), "plain");
    assert_eq!(clean.routes()[1].reason, RouteReason::Default);
    assert_eq!(clean.handoff().number("cleanup.product_mass_kg"), Some(2.0));

    let dirty = OverrideDocument::new("dirty", json!({"production": {"dirty": true}})).unwrap();
    let scrubbed = engine.run(&[dirty]).unwrap();
    assert_eq!(scrubbed.plan("cleanup").unwrap().variant(), "scrub");
    assert_eq!(scrubbed.routes()[1].reason, RouteReason::Rule { name: "dirty_feed".into() });
    assert_ne!(clean.run_fingerprint(), scrubbed.run_fingerprint());

    let codes: Vec<&str> = clean.journal().iter().map(|e| e.kind.code()).collect();
    assert_eq!(codes, vec!["I", "R", "B", "R", "B", "C"]);
}

#[test]
fn identical_inputs_give_identical_plans() {
    let (def, base) = (definition(), baseline());
    let engine = FlowEngine::new(&base, &def).with_journal(false);
    let a = engine.run(&[]).unwrap();
    let b = engine.run(&[]).unwrap();
    assert_ne!(a.run_id(), b.run_id());
    assert_eq!(a.plans(), b.plans());
    assert_eq!(a.run_fingerprint(), b.run_fingerprint());
    assert!(a.journal().is_empty());
}

#[test]
fn failure_aborts_without_partial_result_but_keeps_journal() {
    let (def, base) = (definition(), baseline());
    let engine = FlowEngine::new(&base, &def);
    let bad = OverrideDocument::new("bad", json!({"cleanup.recovery": 1.5})).unwrap();

    let mut store = InMemoryEventStore::new();
    let err = engine.run_with_store(&[bad.clone()], &mut store).unwrap_err();
    assert_eq!(err.index, 1);
    assert_eq!(err.stage, "cleanup");
    assert_eq!(err.variant.as_deref(), Some("plain"));
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);

    let run_id = store.run_ids()[0];
    let events = store.list(run_id);
    assert!(matches!(events.last().map(|e| &e.kind), Some(RunEventKind::StageFailed { index: 1, .. })));
    assert!(!events.iter().any(|e| matches!(e.kind, RunEventKind::RunCompleted { .. })));

    let mut store = InMemoryEventStore::new();
    let mut ctx = engine.context(&[bad], &mut store);
    assert!(ctx.step().unwrap());
    assert_eq!(ctx.status(0), Some(StageStatus::Built));
    assert!(ctx.step().is_err());
    assert_eq!(ctx.status(1), Some(StageStatus::Failed));
    assert_eq!(ctx.step().unwrap_err().index, 1);
    assert!(!ctx.is_complete());
}

#[test]
fn unset_required_key_is_a_missing_parameter() {
    let (def, base) = (definition(), baseline());
    let unset = OverrideDocument::new("unset", json!({"production.titer_g_per_l": null})).unwrap();
    let err = FlowEngine::new(&base, &def).run(&[unset]).unwrap_err();
    assert_eq!(err.error,
               FlowError::MissingParameter { stage: "production".into(),
                                             key: "titer_g_per_l".into() });
    assert_eq!(err.variant.as_deref(), Some("batch"));
}

#[test]
fn explicit_pin_beats_rules_and_unknown_pin_fails() {
    let (def, base) = (definition(), baseline());
    let engine = FlowEngine::new(&base, &def);
    let pinned = OverrideDocument::new("pin", json!({"production.dirty": true, "cleanup.method": "plain"})).unwrap();
    let res = engine.run(&[pinned]).unwrap();
    assert_eq!(res.plan("cleanup").unwrap().variant(), "plain");
    assert_eq!(res.routes()[1].reason, RouteReason::Explicit);

    let bogus = OverrideDocument::new("pin", json!({"cleanup": {"method": "centrifuge"}})).unwrap();
    let err = engine.run(&[bogus]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownVariant);
    assert_eq!(err.variant, None);
}

#[test]
fn stage_without_baseline_is_unknown() {
    let def = definition();
    let base = BaselineStore::from_flat_table(vec![("production.volume_l", json!(1000)),
                                                   ("production.titer_g_per_l", json!(4)),
                                                   ("production.dirty", json!(false))]).unwrap();
    assert_eq!(def.check_baseline(&base), Err(RegistryError::MissingBaseline("cleanup".into())));
    let err = FlowEngine::new(&base, &def).run(&[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownStage);
}

#[test]
fn unmatched_override_keys_are_reported() {
    let (def, base) = (definition(), baseline());
    let engine = FlowEngine::new(&base, &def);
    let doc = OverrideDocument::new("typo", json!({"prodution.titer_g_per_l": 8, "cleanup": {"recovery": 0.6}})).unwrap();
    assert_eq!(engine.unmatched_override_keys(std::slice::from_ref(&doc)),
               vec!["typo:prodution.titer_g_per_l".to_string()]);
    let res = engine.run(&[doc]).unwrap();
    assert_eq!(res.plan("production").unwrap().derived_number("product_mass_kg"), Some(4.0));
}

#[test]
fn definition_contract_is_validated() {
    let err = FlowDefinition::builder().stage(RouteTable::new("production", "batch").alternate("fed_batch"))
                                       .register(Batch::new())
                                       .build()
                                       .unwrap_err();
    assert_eq!(err,
               RegistryError::UnregisteredVariant { stage: "production".into(),
                                                    variant: "fed_batch".into() });

    let err = FlowDefinition::builder().stage(RouteTable::new("production", "batch"))
                                       .register(Batch::new())
                                       .register(Plain::new())
                                       .build()
                                       .unwrap_err();
    assert_eq!(err, RegistryError::OrphanBuilder("cleanup".into()));

    let err = FlowDefinition::builder().stage(RouteTable::new("production", "batch"))
                                       .stage(RouteTable::new("production", "batch"))
                                       .register(Batch::new())
                                       .build()
                                       .unwrap_err();
    assert_eq!(err, RegistryError::DuplicateStage("production".into()));

    let def = definition();
    let table = def.route_table(&"cleanup".into()).unwrap();
    assert!(table.declares("scrub"));
    assert_eq!(def.definition_hash(), definition().definition_hash());
}

#[test]
fn concurrent_runs_share_read_only_state() {
    let (def, base) = (definition(), baseline());
    let engine = FlowEngine::new(&base, &def);
    let expected = engine.run(&[]).unwrap().run_fingerprint().to_string();
    let fingerprints: Vec<String> = (0..8).into_par_iter()
                                          .map(|i| {
                                              let titer = OverrideDocument::new("titer", json!({"production.titer_g_per_l": i % 2 * 4})).unwrap();
                                              let _ = engine.run(&[titer]).unwrap();
                                              engine.run(&[]).unwrap().run_fingerprint().to_string()
                                          })
                                          .collect();
    assert!(fingerprints.iter().all(|f| *f == expected));
}
