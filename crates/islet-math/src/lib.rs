//! Affine transform composition and small matrix helpers shared by terrain, actors and lights.

mod transform;

pub use transform::{
    Elementary, compose, compose_elementary, normal_matrix, translation_of,
};
