//! Recuperación primaria: separación de biomasa y concentración del caldo.
//!
//! Convención: densidad de las corrientes acuosas 1 kg/L.

use bio_core::{unit_builder, Domain, ParamSpec, Unit};

use crate::stages::{STREAM_MASS, STREAM_VOLUME};

unit_builder! {
    /// Centrífuga de discos en continuo.
    Centrifugation {
        stage: "cell_removal",
        variant: "centrifugation",
        params: [ParamSpec::number("throughput_l_per_h", Unit::LiterPerHour, Domain::Positive),
                 ParamSpec::number("solids_fraction", Unit::Fraction, Domain::Fraction),
                 ParamSpec::number("recovery", Unit::Fraction, Domain::Fraction)],
        produces: ["cell_removal.product_mass_kg", "cell_removal.stream_volume_l"],
        build(ctx) {
            let volume = ctx.stream(STREAM_VOLUME, Unit::Liter)?;
            let mass = ctx.stream(STREAM_MASS, Unit::Kilogram)?;
            let throughput = ctx.number("throughput_l_per_h")?;
            let solids = ctx.number("solids_fraction")?;
            let recovery = ctx.number("recovery")?;

            ctx.derive("duration_h", volume / throughput, Unit::Hour)?;
            ctx.derive("solids_volume_l", volume * solids, Unit::Liter)?;
            let clarified = ctx.derive("clarified_volume_l", volume * (1.0 - solids), Unit::Liter)?;
            let out = ctx.derive("product_mass_kg", mass * recovery, Unit::Kilogram)?;

            ctx.emit("cell_removal.product_mass_kg", out)?;
            ctx.emit("cell_removal.stream_volume_l", clarified)
        }
    }
}

unit_builder! {
    /// Microfiltración tangencial; el área sale del flux y el tiempo de proceso.
    Microfiltration {
        stage: "cell_removal",
        variant: "microfiltration",
        params: [ParamSpec::number("flux_lmh", Unit::LiterPerSquareMeterHour, Domain::Positive),
                 ParamSpec::number("process_time_h", Unit::Hour, Domain::Positive),
                 ParamSpec::number("recovery", Unit::Fraction, Domain::Fraction)],
        produces: ["cell_removal.product_mass_kg", "cell_removal.stream_volume_l"],
        build(ctx) {
            let volume = ctx.stream(STREAM_VOLUME, Unit::Liter)?;
            let mass = ctx.stream(STREAM_MASS, Unit::Kilogram)?;
            let flux = ctx.number("flux_lmh")?;
            let time = ctx.number("process_time_h")?;
            let recovery = ctx.number("recovery")?;

            ctx.derive("membrane_area_m2", volume / (flux * time), Unit::SquareMeter)?;
            let permeate = ctx.derive("permeate_volume_l", volume, Unit::Liter)?;
            let out = ctx.derive("product_mass_kg", mass * recovery, Unit::Kilogram)?;

            ctx.emit("cell_removal.product_mass_kg", out)?;
            ctx.emit("cell_removal.stream_volume_l", permeate)
        }
    }
}

unit_builder! {
    /// Evaporador multiefecto.
    Evaporation {
        stage: "concentration",
        variant: "evaporation",
        params: [ParamSpec::number("concentration_factor", Unit::Ratio, Domain::AtLeastOne),
                 ParamSpec::number("steam_per_water", Unit::Ratio, Domain::Positive),
                 ParamSpec::number("recovery", Unit::Fraction, Domain::Fraction)],
        produces: ["concentration.product_mass_kg", "concentration.stream_volume_l"],
        build(ctx) {
            let volume = ctx.stream(STREAM_VOLUME, Unit::Liter)?;
            let mass = ctx.stream(STREAM_MASS, Unit::Kilogram)?;
            let factor = ctx.number("concentration_factor")?;
            let steam_ratio = ctx.number("steam_per_water")?;
            let recovery = ctx.number("recovery")?;

            let concentrate = ctx.derive("concentrate_volume_l", volume / factor, Unit::Liter)?;
            let water = ctx.derive("water_removed_kg", volume - concentrate, Unit::Kilogram)?;
            ctx.derive("steam_kg", water * steam_ratio, Unit::Kilogram)?;
            let out = ctx.derive("product_mass_kg", mass * recovery, Unit::Kilogram)?;

            ctx.emit("concentration.product_mass_kg", out)?;
            ctx.emit("concentration.stream_volume_l", concentrate)
        }
    }
}

unit_builder! {
    /// Ósmosis inversa (para productos sensibles al calor).
    ReverseOsmosis {
        stage: "concentration",
        variant: "reverse_osmosis",
        params: [ParamSpec::number("concentration_factor", Unit::Ratio, Domain::AtLeastOne),
                 ParamSpec::number("flux_lmh", Unit::LiterPerSquareMeterHour, Domain::Positive),
                 ParamSpec::number("process_time_h", Unit::Hour, Domain::Positive),
                 ParamSpec::number("recovery", Unit::Fraction, Domain::Fraction)],
        produces: ["concentration.product_mass_kg", "concentration.stream_volume_l"],
        build(ctx) {
            let volume = ctx.stream(STREAM_VOLUME, Unit::Liter)?;
            let mass = ctx.stream(STREAM_MASS, Unit::Kilogram)?;
            let factor = ctx.number("concentration_factor")?;
            let flux = ctx.number("flux_lmh")?;
            let time = ctx.number("process_time_h")?;
            let recovery = ctx.number("recovery")?;

            let concentrate = ctx.derive("concentrate_volume_l", volume / factor, Unit::Liter)?;
            let permeate = ctx.derive("permeate_volume_l", volume - concentrate, Unit::Liter)?;
            ctx.derive("membrane_area_m2", permeate / (flux * time), Unit::SquareMeter)?;
            let out = ctx.derive("product_mass_kg", mass * recovery, Unit::Kilogram)?;

            ctx.emit("concentration.product_mass_kg", out)?;
            ctx.emit("concentration.stream_volume_l", concentrate)
        }
    }
}
