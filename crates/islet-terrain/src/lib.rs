//! Heightfield sampling, fBm heightfield generation, and terrain mesh construction.

mod error;
mod fbm;
mod heightfield;
mod mesh;

pub use error::TerrainError;
pub use fbm::{FbmGenerator, FbmParams, NoiseRequest};
pub use heightfield::{HeightSource, Heightfield, Samples};
pub use mesh::{MeshBuilder, TerrainMesh, TerrainVertex, WATER_LEVEL};
