use thiserror::Error;

/// Errors surfaced by geometry and spatial-index operations.
///
/// The optimizer never reports through this type: malformed nets are logged
/// and skipped, and an infeasible placement is reported through
/// [`CostResult::is_feasible`](crate::CostResult::is_feasible) rather than an
/// error, so a run always completes with the best placement seen.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("polygon requires at least 3 vertices, got {0}")]
    InvalidPolygon(usize),

    #[error("scalar magnitude below tolerance in division")]
    DivideByZero,

    #[error("block not found: {0}")]
    BlockNotFound(String),

    #[error("duplicate block name: {0}")]
    DuplicateBlockName(String),
}

pub type Result<T, E = LayoutError> = std::result::Result<T, E>;
