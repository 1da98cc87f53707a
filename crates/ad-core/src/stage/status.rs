/// Estado de una etapa en tiempo de ejecución.
///
/// Transiciones válidas: `Pending -> Running`, `Running -> FinishedOk`,
/// `Running -> Failed`. Sin reversiones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Pending,
    Running,
    FinishedOk,
    Failed,
}
