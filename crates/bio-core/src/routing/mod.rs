//! Routing Resolver: elige la variante concreta de cada stage.
//!
//! Política: selector explícito (`method`) -> primera regla que cumple, en
//! orden de declaración -> variante por defecto. Los predicados son
//! funciones puras de (configuración resuelta, handoff): dos evaluaciones con
//! las mismas entradas eligen siempre la misma variante.

pub mod predicate;
pub mod table;

pub use predicate::{Predicate, PredicateFn};
pub use table::{RouteDecision, RouteReason, RouteTable, RoutingRule};
