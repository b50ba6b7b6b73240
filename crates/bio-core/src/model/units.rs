//! Convenciones de unidades y dominios válidos de parámetros numéricos.
//!
//! Cada parámetro declara su unidad; las derivaciones de los builders asumen
//! estas unidades (volúmenes en L, masas en kg, concentraciones en g/L,
//! tiempos en h). Convertir g → kg es responsabilidad del builder.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Liter,
    Kilogram,
    GramPerLiter,
    GramPerLiterHour,
    Hour,
    PerHour,
    LiterPerHour,
    LiterPerSquareMeterHour,
    SquareMeter,
    KilogramPerHour,
    GramPerGram,
    /// Relación adimensional (factores de concentración, volúmenes de columna).
    Ratio,
    /// Fracción 0..=1 (recuperaciones, humedad).
    Fraction,
    Count,
    None,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Liter => "L",
            Unit::Kilogram => "kg",
            Unit::GramPerLiter => "g/L",
            Unit::GramPerLiterHour => "g/(L*h)",
            Unit::Hour => "h",
            Unit::PerHour => "1/h",
            Unit::LiterPerHour => "L/h",
            Unit::LiterPerSquareMeterHour => "L/(m2*h)",
            Unit::SquareMeter => "m2",
            Unit::KilogramPerHour => "kg/h",
            Unit::GramPerGram => "g/g",
            Unit::Ratio => "x",
            Unit::Fraction => "-",
            Unit::Count => "count",
            Unit::None => "",
        }
    }
}

/// Dominio válido de un parámetro numérico. Un valor fuera de dominio es
/// `InvalidParameter`, nunca un resultado NaN o basura.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Any,
    NonNegative,
    Positive,
    /// 0 <= x <= 1
    Fraction,
    /// 0 < x < 1
    OpenFraction,
    /// 0 <= x < 1 (humedad residual: 1 deja el denominador en cero)
    FractionBelowOne,
    /// x >= 1 (factores de concentración)
    AtLeastOne,
    /// x > 1 (razones de escalado que entran en un logaritmo)
    GreaterThanOne,
}

impl Domain {
    /// Devuelve `Err(motivo)` si `value` está fuera del dominio.
    pub fn check(&self, value: f64) -> Result<(), String> {
        if !value.is_finite() {
            return Err(format!("{value} is not a finite number"));
        }
        let ok = match self {
            Domain::Any => true,
            Domain::NonNegative => value >= 0.0,
            Domain::Positive => value > 0.0,
            Domain::Fraction => (0.0..=1.0).contains(&value),
            Domain::OpenFraction => value > 0.0 && value < 1.0,
            Domain::FractionBelowOne => (0.0..1.0).contains(&value),
            Domain::AtLeastOne => value >= 1.0,
            Domain::GreaterThanOne => value > 1.0,
        };
        if ok {
            Ok(())
        } else {
            Err(format!("{value} is outside the {} domain", self.describe()))
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Domain::Any => "any",
            Domain::NonNegative => "non-negative",
            Domain::Positive => "positive",
            Domain::Fraction => "[0, 1]",
            Domain::OpenFraction => "(0, 1)",
            Domain::FractionBelowOne => "[0, 1)",
            Domain::AtLeastOne => ">= 1",
            Domain::GreaterThanOne => "> 1",
        }
    }
}
