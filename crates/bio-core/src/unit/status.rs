/// Estado de un stage dentro de una corrida.
///
/// Transiciones válidas:
/// - `Pending` -> `Routed`
/// - `Routed` -> `Built`
/// - `Pending` | `Routed` -> `Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    /// Aún no procesado.
    Pending,
    /// Variante elegida, plan aún no construido.
    Routed,
    /// Plan construido y handoff propagado.
    Built,
    /// Falló; la corrida se aborta.
    Failed,
}
