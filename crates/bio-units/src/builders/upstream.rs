//! Upstream: tren de semilla y fermentación de producción.

use bio_core::{unit_builder, Domain, ParamSpec, Unit};

unit_builder! {
    /// Escalado en matraces/biorreactores semilla con razón fija por etapa.
    FlaskTrain {
        stage: "seed_train",
        variant: "flask_train",
        params: [ParamSpec::number("inoculum_fraction", Unit::Fraction, Domain::OpenFraction),
                 ParamSpec::number("target_volume_l", Unit::Liter, Domain::Positive),
                 ParamSpec::number("start_volume_l", Unit::Liter, Domain::Positive),
                 ParamSpec::number("scale_up_ratio", Unit::Ratio, Domain::GreaterThanOne),
                 ParamSpec::number("stage_duration_h", Unit::Hour, Domain::Positive)],
        produces: ["seed_train.inoculum_volume_l", "seed_train.duration_h"],
        build(ctx) {
            let fraction = ctx.number("inoculum_fraction")?;
            let target = ctx.number("target_volume_l")?;
            let start = ctx.number("start_volume_l")?;
            let ratio = ctx.number("scale_up_ratio")?;
            let per_stage = ctx.number("stage_duration_h")?;

            let inoculum = ctx.derive("inoculum_volume_l", target * fraction, Unit::Liter)?;
            let stages = ((inoculum / start).ln() / ratio.ln()).ceil().max(1.0);
            let stages = ctx.derive("stage_count", stages, Unit::Count)?;
            let duration = ctx.derive("duration_h", stages * per_stage, Unit::Hour)?;

            ctx.emit("seed_train.inoculum_volume_l", inoculum)?;
            ctx.emit("seed_train.duration_h", duration)
        }
    }
}

unit_builder! {
    /// Inóculo comprado/criopreservado directo al fermentador.
    DirectInoculation {
        stage: "seed_train",
        variant: "direct_inoculation",
        params: [ParamSpec::number("inoculum_fraction", Unit::Fraction, Domain::OpenFraction),
                 ParamSpec::number("target_volume_l", Unit::Liter, Domain::Positive)],
        produces: ["seed_train.inoculum_volume_l", "seed_train.duration_h"],
        build(ctx) {
            let fraction = ctx.number("inoculum_fraction")?;
            let target = ctx.number("target_volume_l")?;
            let inoculum = ctx.derive("inoculum_volume_l", target * fraction, Unit::Liter)?;
            ctx.derive("stage_count", 0.0, Unit::Count)?;
            ctx.emit("seed_train.inoculum_volume_l", inoculum)?;
            ctx.emit("seed_train.duration_h", 0.0)
        }
    }
}

unit_builder! {
    /// Fermentación fed-batch en un solo lote.
    FedBatch {
        stage: "production",
        variant: "fed_batch",
        params: [ParamSpec::number("batch_volume_l", Unit::Liter, Domain::Positive),
                 ParamSpec::number("titer_g_per_l", Unit::GramPerLiter, Domain::NonNegative),
                 ParamSpec::number("fermentation_time_h", Unit::Hour, Domain::Positive),
                 ParamSpec::number("turnaround_h", Unit::Hour, Domain::NonNegative),
                 ParamSpec::number("product_yield_g_per_g", Unit::GramPerGram, Domain::OpenFraction),
                 ParamSpec::text("carbon_source"),
                 ParamSpec::flag("contaminant_present")],
        produces: ["production.product_mass_kg",
                   "production.stream_volume_l",
                   "production.contaminant_present",
                   "production.mode"],
        build(ctx) {
            let volume = ctx.number("batch_volume_l")?;
            let titer = ctx.number("titer_g_per_l")?;
            let time = ctx.number("fermentation_time_h")?;
            let turnaround = ctx.number("turnaround_h")?;
            let yield_ = ctx.number("product_yield_g_per_g")?;
            let carbon = ctx.text("carbon_source")?;
            let contaminant = ctx.flag("contaminant_present")?;
            let inoculum = ctx.upstream("seed_train.inoculum_volume_l", Unit::Liter)?;

            let mass = ctx.derive("product_mass_kg", volume * titer / 1000.0, Unit::Kilogram)?;
            ctx.derive("substrate_demand_kg", mass / yield_, Unit::Kilogram)?;
            ctx.derive("productivity_g_per_l_h", titer / time, Unit::GramPerLiterHour)?;
            ctx.derive("cycle_time_h", time + turnaround, Unit::Hour)?;
            ctx.derive("inoculum_ratio", inoculum / volume, Unit::Fraction)?;
            ctx.derive_text("carbon_source", carbon);

            ctx.emit("production.product_mass_kg", mass)?;
            ctx.emit("production.stream_volume_l", volume)?;
            ctx.emit("production.contaminant_present", contaminant)?;
            ctx.emit("production.mode", "fed_batch")
        }
    }
}

unit_builder! {
    /// Quimiostato: cosecha continua a tasa de dilución fija.
    Continuous {
        stage: "production",
        variant: "continuous",
        params: [ParamSpec::number("working_volume_l", Unit::Liter, Domain::Positive),
                 ParamSpec::number("dilution_rate_per_h", Unit::PerHour, Domain::Positive),
                 ParamSpec::number("run_time_h", Unit::Hour, Domain::Positive),
                 ParamSpec::number("titer_g_per_l", Unit::GramPerLiter, Domain::NonNegative),
                 ParamSpec::number("product_yield_g_per_g", Unit::GramPerGram, Domain::OpenFraction),
                 ParamSpec::text("carbon_source"),
                 ParamSpec::flag("contaminant_present")],
        produces: ["production.product_mass_kg",
                   "production.stream_volume_l",
                   "production.contaminant_present",
                   "production.mode"],
        build(ctx) {
            let working = ctx.number("working_volume_l")?;
            let dilution = ctx.number("dilution_rate_per_h")?;
            let run_time = ctx.number("run_time_h")?;
            let titer = ctx.number("titer_g_per_l")?;
            let yield_ = ctx.number("product_yield_g_per_g")?;
            let carbon = ctx.text("carbon_source")?;
            let contaminant = ctx.flag("contaminant_present")?;

            let harvest = ctx.derive("harvest_volume_l", working * dilution * run_time, Unit::Liter)?;
            let mass = ctx.derive("product_mass_kg", harvest * titer / 1000.0, Unit::Kilogram)?;
            ctx.derive("substrate_demand_kg", mass / yield_, Unit::Kilogram)?;
            ctx.derive("harvest_rate_l_per_h", working * dilution, Unit::LiterPerHour)?;
            ctx.derive_text("carbon_source", carbon);

            ctx.emit("production.product_mass_kg", mass)?;
            ctx.emit("production.stream_volume_l", harvest)?;
            ctx.emit("production.contaminant_present", contaminant)?;
            ctx.emit("production.mode", "continuous")
        }
    }
}
