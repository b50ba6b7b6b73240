use bio_core::{ErrorKind, OverrideDocument, RouteReason};
use bio_units::{compose, engine, stages, UnknownScenario};
use serde_json::json;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6 * b.abs().max(1.0)
}

fn doc(name: &str, v: serde_json::Value) -> OverrideDocument {
    OverrideDocument::new(name, v).expect("object override")
}

#[test]
fn baseline_run_walks_the_full_sequence() {
    let res = engine().unwrap().run(&[]).unwrap();
    let order: Vec<&str> = res.plans().iter().map(|p| p.stage().as_str()).collect();
    assert_eq!(order, stages::SEQUENCE.to_vec());

    let variants: Vec<&str> = res.plans().iter().map(|p| p.variant().as_str()).collect();
    assert_eq!(variants,
               vec!["flask_train",
                    "fed_batch",
                    "centrifugation",
                    "evaporation",
                    "ion_exchange",
                    "ultrafiltration",
                    "activated_carbon",
                    "spray_drying"]);
    assert!(res.routes().iter().all(|r| r.reason == RouteReason::Default));

    let seed = res.plan("seed_train").unwrap();
    assert_eq!(seed.derived_number("stage_count"), Some(4.0));
    assert!(close(seed.derived_number("duration_h").unwrap(), 96.0));

    let production = res.plan("production").unwrap();
    assert!(close(production.derived_number("product_mass_kg").unwrap(), 280.0));
    assert!(production.spec("working_volume_l").is_none());

    assert!(close(res.handoff().number("cell_removal.product_mass_kg").unwrap(), 271.6));
    assert!(close(res.handoff().number("concentration.stream_volume_l").unwrap(), 16625.0));
    assert_eq!(res.handoff().flag("capture.salt_present"), Some(true));
    assert!(res.handoff().contains("final_form.packaged_mass_kg"));
}

#[test]
fn catalog_runs_are_deterministic() {
    let engine = engine().unwrap();
    let a = engine.run(&compose(&["high_titer", "contaminated_feed"]).unwrap()).unwrap();
    let b = engine.run(&compose(&["high_titer", "contaminated_feed"]).unwrap()).unwrap();
    assert_eq!(a.plans(), b.plans());
    assert_eq!(a.run_fingerprint(), b.run_fingerprint());
}

#[test]
fn scenarios_route_to_alternate_variants() {
    let engine = engine().unwrap();

    let res = engine.run(&compose(&["heat_sensitive"]).unwrap()).unwrap();
    assert_eq!(res.plan("concentration").unwrap().variant(), "reverse_osmosis");

    let res = engine.run(&compose(&["high_purity"]).unwrap()).unwrap();
    assert_eq!(res.plan("polish").unwrap().variant(), "chromatography");
    assert_eq!(res.routes()[6].reason,
               RouteReason::Rule { name: "high_purity_target".into() });

    let res = engine.run(&compose(&["liquid_product"]).unwrap()).unwrap();
    let final_form = res.plan("final_form").unwrap();
    assert_eq!(final_form.variant(), "liquid_formulation");
    assert_eq!(res.routes()[7].reason, RouteReason::Explicit);
    assert!(res.handoff().contains("final_form.stream_volume_l"));
}

#[test]
fn continuous_mode_changes_harvest_route_downstream() {
    let res = engine().unwrap().run(&compose(&["continuous_mode"]).unwrap()).unwrap();
    let production = res.plan("production").unwrap();
    assert_eq!(production.variant(), "continuous");
    assert!(close(production.derived_number("harvest_volume_l").unwrap(), 480000.0));
    assert!(close(production.derived_number("product_mass_kg").unwrap(), 1920.0));
    assert_eq!(res.routes()[1].reason, RouteReason::Explicit);

    assert_eq!(res.plan("cell_removal").unwrap().variant(), "microfiltration");
    assert_eq!(res.routes()[2].reason,
               RouteReason::Rule { name: "continuous_harvest".into() });
}

#[test]
fn composed_scenarios_do_not_cross_contaminate() {
    let res = engine().unwrap().run(&compose(&["glycerol_feed", "continuous_mode"]).unwrap()).unwrap();
    let production = res.plan("production").unwrap();
    assert_eq!(production.variant(), "continuous");
    assert_eq!(production.spec("carbon_source").and_then(|v| v.as_str()), Some("glycerol"));
    assert_eq!(production.spec("product_yield_g_per_g").and_then(|v| v.as_f64()), Some(0.25));
    assert!(production.spec("batch_volume_l").is_none());
    assert!(production.spec("method").is_none());

    let capture = res.plan("capture").unwrap();
    assert!(capture.spec("carbon_source").is_none());
}

#[test]
fn concentrated_stream_switches_capture_to_precipitation() {
    let strong = doc("strong", json!({"concentration.concentration_factor": 20}));
    let res = engine().unwrap().run(&[strong]).unwrap();
    assert_eq!(res.plan("capture").unwrap().variant(), "precipitation");
    assert_eq!(res.handoff().flag("capture.salt_present"), Some(false));
    assert_eq!(res.plan("membrane_conditioning").unwrap().variant(), "ultrafiltration");
}

#[test]
fn salt_removal_rule_needs_both_conditions() {
    let engine = engine().unwrap();
    let strict = doc("strict", json!({"membrane_conditioning": {"salt_removal_target": 0.95}}));
    let res = engine.run(&[strict]).unwrap();
    let membrane = res.plan("membrane_conditioning").unwrap();
    assert_eq!(membrane.variant(), "diafiltration");
    assert_eq!(res.routes()[5].reason,
               RouteReason::Rule { name: "salt_removal_required".into() });
    assert_eq!(membrane.derived().get("meets_salt_removal_target").and_then(|v| v.as_bool()), Some(true));

    let both = vec![doc("strict", json!({"membrane_conditioning.salt_removal_target": 0.95})),
                    doc("dirty", json!({"production.contaminant_present": true}))];
    let res = engine.run(&both).unwrap();
    assert_eq!(res.routes()[5].reason,
               RouteReason::Rule { name: "contaminant_present".into() });
}

#[test]
fn out_of_domain_and_unknown_inputs_abort() {
    let engine = engine().unwrap();

    let negative = doc("negative", json!({"production.batch_volume_l": -70000}));
    let err = engine.run(&[negative]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    assert_eq!(err.index, 1);

    let bogus = doc("bogus", json!({"capture.method": "magnetic_beads"}));
    let err = engine.run(&[bogus]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownVariant);
    assert_eq!(err.stage, "capture");

    assert_eq!(compose(&["high_titer", "nope"]).unwrap_err(), UnknownScenario("nope".into()));
}

fn invalid_key(err: &bio_core::PipelineError) -> Option<&str> {
    match &err.error {
        bio_core::FlowError::InvalidParameter { key, .. } => Some(key.as_str()),
        _ => None,
    }
}

#[test]
fn boundary_inputs_are_rejected_on_the_input_key() {
    let engine = engine().unwrap();

    let flat = doc("flat", json!({"seed_train.scale_up_ratio": 1}));
    let err = engine.run(&[flat]).unwrap_err();
    assert_eq!(err.stage, "seed_train");
    assert_eq!(invalid_key(&err), Some("scale_up_ratio"));

    let wet = doc("wet", json!({"final_form.residual_moisture": 1}));
    let err = engine.run(&[wet]).unwrap_err();
    assert_eq!(err.stage, "final_form");
    assert_eq!(invalid_key(&err), Some("residual_moisture"));
}

#[test]
fn zero_titer_liquid_product_completes_without_volume_ratio() {
    let mut overrides = compose(&["liquid_product"]).unwrap();
    overrides.push(doc("no_product", json!({"production.titer_g_per_l": 0})));
    let res = engine().unwrap().run(&overrides).unwrap();

    let final_form = res.plan("final_form").unwrap();
    assert_eq!(final_form.variant(), "liquid_formulation");
    assert_eq!(final_form.derived_number("product_mass_kg"), Some(0.0));
    assert_eq!(final_form.derived_number("final_volume_l"), Some(0.0));
    assert!(final_form.derived_number("volume_ratio").is_none());

    let res = engine().unwrap().run(&compose(&["liquid_product"]).unwrap()).unwrap();
    assert!(res.plan("final_form").unwrap().derived_number("volume_ratio").unwrap() > 0.0);
}
