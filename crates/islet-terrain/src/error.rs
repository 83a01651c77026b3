//! Terrain error types.

/// Errors raised while creating heightfields or building terrain meshes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TerrainError {
    /// A grid dimension is zero.
    #[error("invalid heightfield dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// The element count of a `width x height` grid does not fit in `usize`.
    #[error("heightfield dimensions {width}x{height} overflow the addressable size")]
    DimensionsOverflow { width: usize, height: usize },

    /// The backing array does not match `width * height * channels`.
    #[error("heightfield data has {actual} elements, expected {expected}")]
    DataLength { expected: usize, actual: usize },

    /// Vertex indices would not fit the `u32` index buffer.
    #[error("terrain grid of {vertices} vertices exceeds the u32 index range")]
    GridTooLarge { vertices: usize },
}
