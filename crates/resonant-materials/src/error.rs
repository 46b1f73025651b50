//! Errors raised while building material descriptions.

use resonant_geometry::{Dimensionality, GeometryError};
use thiserror::Error;

/// Errors from material registration.
#[derive(Debug, Error)]
pub enum MaterialError {
    #[error("Dispersive materials are not supported on {0} grids")]
    UnsupportedDimensionality(Dimensionality),

    #[error("Failed to allocate a coefficient array of {elements} elements")]
    AllocationFailure { elements: usize },

    #[error("Invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("Term was built for a different volume than the material")]
    VolumeMismatch,

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),
}
