use thiserror::Error;

/// Top-level error type for stackmesh builds.
#[derive(Debug, Error)]
pub enum StackmeshError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Errors raised while validating build parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("match tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),

    #[error("resolution bounds must satisfy 0 < min <= max, got min = {min}, max = {max}")]
    InvalidBounds { min: f64, max: f64 },

    #[error("resolution hint for region `{region}` is invalid: {reason}")]
    InvalidResolution { region: String, reason: String },
}

/// Errors related to input geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("region `{region}` has an invalid polygon: {reason}")]
    InvalidPolygon { region: String, reason: String },
}

/// Errors related to the point/segment registry and the loops built on it.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("loop needs at least 3 distinct vertices, got {distinct}")]
    DegenerateLoop { distinct: usize },

    #[error("segment endpoints ({x}, {y}) coincide within tolerance")]
    ZeroLengthSegment { x: f64, y: f64 },
}

/// Errors reported by a mesher.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("mesh generation failed: {0}")]
    Generation(String),
}

/// Convenience type alias for results using [`StackmeshError`].
pub type Result<T> = std::result::Result<T, StackmeshError>;
