//! Purificación: captura, acondicionamiento por membrana y pulido.

use bio_core::{unit_builder, Domain, ParamSpec, Unit};

use crate::stages::{STREAM_MASS, STREAM_VOLUME};

unit_builder! {
    /// Intercambio iónico en columna empacada. La elución deja sal en la
    /// corriente (`capture.salt_present`).
    IonExchange {
        stage: "capture",
        variant: "ion_exchange",
        params: [ParamSpec::number("resin_capacity_g_per_l", Unit::GramPerLiter, Domain::Positive),
                 ParamSpec::number("cycles", Unit::Count, Domain::AtLeastOne),
                 ParamSpec::number("elution_bv", Unit::Ratio, Domain::Positive),
                 ParamSpec::number("wash_bv", Unit::Ratio, Domain::NonNegative),
                 ParamSpec::number("recovery", Unit::Fraction, Domain::Fraction)],
        produces: ["capture.product_mass_kg", "capture.stream_volume_l", "capture.salt_present"],
        build(ctx) {
            let mass = ctx.stream(STREAM_MASS, Unit::Kilogram)?;
            let capacity = ctx.number("resin_capacity_g_per_l")?;
            let cycles = ctx.number("cycles")?;
            let elution = ctx.number("elution_bv")?;
            let wash = ctx.number("wash_bv")?;
            let recovery = ctx.number("recovery")?;

            let resin = ctx.derive("resin_volume_l", mass * 1000.0 / (capacity * cycles), Unit::Liter)?;
            let eluate = ctx.derive("eluate_volume_l", resin * elution * cycles, Unit::Liter)?;
            ctx.derive("buffer_volume_l", resin * (elution + wash) * cycles, Unit::Liter)?;
            let out = ctx.derive("product_mass_kg", mass * recovery, Unit::Kilogram)?;

            ctx.emit("capture.product_mass_kg", out)?;
            ctx.emit("capture.stream_volume_l", eluate)?;
            ctx.emit("capture.salt_present", true)
        }
    }
}

unit_builder! {
    /// Precipitación y redisolución en un volumen reducido.
    Precipitation {
        stage: "capture",
        variant: "precipitation",
        params: [ParamSpec::number("precipitant_dose_g_per_l", Unit::GramPerLiter, Domain::Positive),
                 ParamSpec::number("redissolution_fraction", Unit::Fraction, Domain::OpenFraction),
                 ParamSpec::number("recovery", Unit::Fraction, Domain::Fraction)],
        produces: ["capture.product_mass_kg", "capture.stream_volume_l", "capture.salt_present"],
        build(ctx) {
            let volume = ctx.stream(STREAM_VOLUME, Unit::Liter)?;
            let mass = ctx.stream(STREAM_MASS, Unit::Kilogram)?;
            let dose = ctx.number("precipitant_dose_g_per_l")?;
            let fraction = ctx.number("redissolution_fraction")?;
            let recovery = ctx.number("recovery")?;

            ctx.derive("precipitant_kg", volume * dose / 1000.0, Unit::Kilogram)?;
            let redissolved = ctx.derive("redissolved_volume_l", volume * fraction, Unit::Liter)?;
            let out = ctx.derive("product_mass_kg", mass * recovery, Unit::Kilogram)?;

            ctx.emit("capture.product_mass_kg", out)?;
            ctx.emit("capture.stream_volume_l", redissolved)?;
            ctx.emit("capture.salt_present", false)
        }
    }
}

unit_builder! {
    Ultrafiltration {
        stage: "membrane_conditioning",
        variant: "ultrafiltration",
        params: [ParamSpec::number("concentration_factor", Unit::Ratio, Domain::AtLeastOne),
                 ParamSpec::number("flux_lmh", Unit::LiterPerSquareMeterHour, Domain::Positive),
                 ParamSpec::number("process_time_h", Unit::Hour, Domain::Positive),
                 ParamSpec::number("recovery", Unit::Fraction, Domain::Fraction)],
        produces: ["membrane_conditioning.product_mass_kg", "membrane_conditioning.stream_volume_l"],
        build(ctx) {
            let volume = ctx.stream(STREAM_VOLUME, Unit::Liter)?;
            let mass = ctx.stream(STREAM_MASS, Unit::Kilogram)?;
            let factor = ctx.number("concentration_factor")?;
            let flux = ctx.number("flux_lmh")?;
            let time = ctx.number("process_time_h")?;
            let recovery = ctx.number("recovery")?;

            let retentate = ctx.derive("retentate_volume_l", volume / factor, Unit::Liter)?;
            let permeate = ctx.derive("permeate_volume_l", volume - retentate, Unit::Liter)?;
            ctx.derive("membrane_area_m2", permeate / (flux * time), Unit::SquareMeter)?;
            let out = ctx.derive("product_mass_kg", mass * recovery, Unit::Kilogram)?;

            ctx.emit("membrane_conditioning.product_mass_kg", out)?;
            ctx.emit("membrane_conditioning.stream_volume_l", retentate)
        }
    }
}

unit_builder! {
    /// Ultrafiltración seguida de lavado a volumen constante. Con rechazo
    /// nulo de sal, la fracción residual es `exp(-diavolúmenes)`.
    Diafiltration {
        stage: "membrane_conditioning",
        variant: "diafiltration",
        params: [ParamSpec::number("concentration_factor", Unit::Ratio, Domain::AtLeastOne),
                 ParamSpec::number("flux_lmh", Unit::LiterPerSquareMeterHour, Domain::Positive),
                 ParamSpec::number("process_time_h", Unit::Hour, Domain::Positive),
                 ParamSpec::number("recovery", Unit::Fraction, Domain::Fraction),
                 ParamSpec::number("diavolumes", Unit::Ratio, Domain::NonNegative),
                 ParamSpec::number("salt_removal_target", Unit::Fraction, Domain::Fraction).optional()],
        produces: ["membrane_conditioning.product_mass_kg", "membrane_conditioning.stream_volume_l"],
        build(ctx) {
            let volume = ctx.stream(STREAM_VOLUME, Unit::Liter)?;
            let mass = ctx.stream(STREAM_MASS, Unit::Kilogram)?;
            let factor = ctx.number("concentration_factor")?;
            let flux = ctx.number("flux_lmh")?;
            let time = ctx.number("process_time_h")?;
            let recovery = ctx.number("recovery")?;
            let diavolumes = ctx.number("diavolumes")?;
            let target = ctx.number_or("salt_removal_target", 0.0)?;

            let retentate = ctx.derive("retentate_volume_l", volume / factor, Unit::Liter)?;
            let permeate = ctx.derive("permeate_volume_l", volume - retentate, Unit::Liter)?;
            let buffer = ctx.derive("buffer_volume_l", retentate * diavolumes, Unit::Liter)?;
            ctx.derive("membrane_area_m2", (permeate + buffer) / (flux * time), Unit::SquareMeter)?;
            let residual = ctx.derive("residual_salt_fraction", (-diavolumes).exp(), Unit::Fraction)?;
            ctx.derive_flag("meets_salt_removal_target", 1.0 - residual >= target);
            let out = ctx.derive("product_mass_kg", mass * recovery, Unit::Kilogram)?;

            ctx.emit("membrane_conditioning.product_mass_kg", out)?;
            ctx.emit("membrane_conditioning.stream_volume_l", retentate)
        }
    }
}

unit_builder! {
    ActivatedCarbon {
        stage: "polish",
        variant: "activated_carbon",
        params: [ParamSpec::number("carbon_dose_g_per_l", Unit::GramPerLiter, Domain::NonNegative),
                 ParamSpec::number("contact_time_h", Unit::Hour, Domain::Positive),
                 ParamSpec::number("recovery", Unit::Fraction, Domain::Fraction)],
        produces: ["polish.product_mass_kg", "polish.stream_volume_l"],
        build(ctx) {
            let volume = ctx.stream(STREAM_VOLUME, Unit::Liter)?;
            let mass = ctx.stream(STREAM_MASS, Unit::Kilogram)?;
            let dose = ctx.number("carbon_dose_g_per_l")?;
            let contact = ctx.number("contact_time_h")?;
            let recovery = ctx.number("recovery")?;

            ctx.derive("carbon_mass_kg", volume * dose / 1000.0, Unit::Kilogram)?;
            ctx.derive("tank_turnover_l_per_h", volume / contact, Unit::LiterPerHour)?;
            let out = ctx.derive("product_mass_kg", mass * recovery, Unit::Kilogram)?;

            ctx.emit("polish.product_mass_kg", out)?;
            ctx.emit("polish.stream_volume_l", volume)
        }
    }
}

unit_builder! {
    /// Cromatografía de pulido para objetivos de pureza altos.
    Chromatography {
        stage: "polish",
        variant: "chromatography",
        params: [ParamSpec::number("resin_capacity_g_per_l", Unit::GramPerLiter, Domain::Positive),
                 ParamSpec::number("cycles", Unit::Count, Domain::AtLeastOne),
                 ParamSpec::number("recovery", Unit::Fraction, Domain::Fraction)],
        produces: ["polish.product_mass_kg", "polish.stream_volume_l"],
        build(ctx) {
            let volume = ctx.stream(STREAM_VOLUME, Unit::Liter)?;
            let mass = ctx.stream(STREAM_MASS, Unit::Kilogram)?;
            let capacity = ctx.number("resin_capacity_g_per_l")?;
            let cycles = ctx.number("cycles")?;
            let recovery = ctx.number("recovery")?;

            ctx.derive("column_volume_l", mass * 1000.0 / (capacity * cycles), Unit::Liter)?;
            let out = ctx.derive("product_mass_kg", mass * recovery, Unit::Kilogram)?;

            ctx.emit("polish.product_mass_kg", out)?;
            ctx.emit("polish.stream_volume_l", volume)
        }
    }
}
