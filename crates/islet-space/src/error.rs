//! Scene construction errors.

/// Errors raised while building an actor hierarchy or actor geometry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// Two actors share a name.
    #[error("duplicate actor name: {0}")]
    DuplicateActor(String),

    /// An orbit names a parent that does not exist.
    #[error("actor '{actor}' orbits unknown parent '{parent}'")]
    UnknownParent { actor: String, parent: String },

    /// Following orbit parents from this actor revisits an actor.
    #[error("orbit cycle through actor '{0}'")]
    OrbitCycle(String),

    /// A UV sphere needs at least two rings.
    #[error("uv sphere needs at least 2 divisions, got {0}")]
    SphereDivisions(u32),
}
