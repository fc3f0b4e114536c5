use crate::core::actions::cancellation::Cancelled;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum RenderError {
    #[error("dimension must be at least 2 and small enough to address, got {dimension}")]
    InvalidDimension { dimension: usize },

    #[error("escape threshold must be positive and finite, got {threshold}")]
    InvalidEscapeThreshold { threshold: f64 },

    #[error("maximum iterations must be greater than zero")]
    ZeroMaxIterations,

    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}
