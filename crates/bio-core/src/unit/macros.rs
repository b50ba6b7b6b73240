//! Macro para declarar builders de unidades sin boilerplate.
//!
//! Exportada en la raíz del crate:
//!   use bio_core::unit_builder;

/// Declara un builder (struct unitario + `UnitBuilder`).
///
/// ```ignore
/// unit_builder! {
///     /// Carbón activado.
///     ActivatedCarbon {
///         stage: "polish",
///         variant: "activated_carbon",
///         params: [ParamSpec::number("carbon_dose_g_per_l", Unit::GramPerLiter, Domain::NonNegative)],
///         produces: ["polish.product_mass_kg"],
///         build(ctx) {
///             let dose = ctx.number("carbon_dose_g_per_l")?;
///             ctx.emit("polish.product_mass_kg", dose)
///         }
///     }
/// }
/// ```
#[macro_export]
macro_rules! unit_builder {
    (
        $(#[$meta:meta])*
        $name:ident {
            stage: $stage:expr,
            variant: $variant:expr,
            params: [$($param:expr),* $(,)?],
            produces: [$($key:expr),* $(,)?],
            build($ctx:ident) $body:block
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $name;

        impl $name {
            pub const PARAMS: &'static [$crate::unit::ParamSpec] = &[$($param),*];
            pub const PRODUCES: &'static [&'static str] = &[$($key),*];

            pub fn new() -> Self {
                Self
            }
        }

        impl $crate::unit::UnitBuilder for $name {
            fn stage(&self) -> &'static str {
                $stage
            }

            fn variant(&self) -> &'static str {
                $variant
            }

            fn params(&self) -> &[$crate::unit::ParamSpec] {
                Self::PARAMS
            }

            fn produces(&self) -> &[&'static str] {
                Self::PRODUCES
            }

            fn build(&self, $ctx: &mut $crate::unit::BuildContext<'_>) -> ::std::result::Result<(), $crate::errors::FlowError> $body
        }
    };
}
