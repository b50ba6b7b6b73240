//! Forma final del producto.

use bio_core::{unit_builder, Domain, ParamSpec, Unit};

use crate::stages::{STREAM_MASS, STREAM_VOLUME};

unit_builder! {
    /// Secado por aspersión a polvo con humedad residual fija.
    SprayDrying {
        stage: "final_form",
        variant: "spray_drying",
        params: [ParamSpec::number("residual_moisture", Unit::Fraction, Domain::FractionBelowOne),
                 ParamSpec::number("evaporation_rate_kg_per_h", Unit::KilogramPerHour, Domain::Positive),
                 ParamSpec::number("recovery", Unit::Fraction, Domain::Fraction)],
        produces: ["final_form.product_mass_kg", "final_form.packaged_mass_kg"],
        build(ctx) {
            let volume = ctx.stream(STREAM_VOLUME, Unit::Liter)?;
            let mass = ctx.stream(STREAM_MASS, Unit::Kilogram)?;
            let moisture = ctx.number("residual_moisture")?;
            let rate = ctx.number("evaporation_rate_kg_per_h")?;
            let recovery = ctx.number("recovery")?;

            let product = ctx.derive("product_mass_kg", mass * recovery, Unit::Kilogram)?;
            let powder = ctx.derive("powder_mass_kg", product / (1.0 - moisture), Unit::Kilogram)?;
            let water = ctx.derive("water_evaporated_kg", (volume - powder).max(0.0), Unit::Kilogram)?;
            ctx.derive("drying_time_h", water / rate, Unit::Hour)?;

            ctx.emit("final_form.product_mass_kg", product)?;
            ctx.emit("final_form.packaged_mass_kg", powder)
        }
    }
}

unit_builder! {
    /// Formulación líquida ajustada a una concentración objetivo.
    LiquidFormulation {
        stage: "final_form",
        variant: "liquid_formulation",
        params: [ParamSpec::number("target_concentration_g_per_l", Unit::GramPerLiter, Domain::Positive),
                 ParamSpec::number("recovery", Unit::Fraction, Domain::Fraction)],
        produces: ["final_form.product_mass_kg", "final_form.stream_volume_l"],
        build(ctx) {
            let volume = ctx.stream(STREAM_VOLUME, Unit::Liter)?;
            let mass = ctx.stream(STREAM_MASS, Unit::Kilogram)?;
            let target = ctx.number("target_concentration_g_per_l")?;
            let recovery = ctx.number("recovery")?;

            let product = ctx.derive("product_mass_kg", mass * recovery, Unit::Kilogram)?;
            let final_volume = ctx.derive("final_volume_l", product * 1000.0 / target, Unit::Liter)?;
            // Sin producto no hay volumen final: la razón no se registra.
            if final_volume > 0.0 {
                ctx.derive("volume_ratio", volume / final_volume, Unit::Ratio)?;
            }

            ctx.emit("final_form.product_mass_kg", product)?;
            ctx.emit("final_form.stream_volume_l", final_volume)
        }
    }
}
