//! Hierarchical actor transforms.
//!
//! Actors are rigid bodies that spin about their own Z axis and optionally
//! revolve around a parent actor. The hierarchy is validated once at
//! construction and evaluated every frame in a stored parent-first order, so
//! a child always reads a parent transform computed for the same `sim_time`.

use std::collections::HashMap;

use glam::{Mat4, Vec3};
use islet_math::{Elementary, compose_elementary, translation_of};
use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// Orbit parameters as written in configuration, parent referenced by name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrbitDesc {
    pub parent: String,
    pub radius: f32,
    /// Radians per simulated second.
    pub angular_speed: f32,
    /// Orbit angle at `sim_time = 0`, in radians.
    pub phase: f32,
}

/// An actor as written in configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActorDesc {
    pub name: String,
    /// Uniform scale applied to the unit sphere.
    pub size: f32,
    /// Spin about the local Z axis, radians per simulated second.
    pub rotation_speed: f32,
    #[serde(default)]
    pub orbit: Option<OrbitDesc>,
}

/// Index of an actor inside its [`ActorHierarchy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub usize);

/// Orbit with its parent resolved to an id.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orbit {
    pub parent: ActorId,
    pub radius: f32,
    pub angular_speed: f32,
    pub phase: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    pub name: String,
    pub size: f32,
    pub rotation_speed: f32,
    pub orbit: Option<Orbit>,
}

/// `translate(parent_translation) * rotateZ(angle) * translate(radius, 0, 0)`.
///
/// Only the parent's translation is inherited; its spin and scale are not.
pub fn orbit_transform(orbit: &Orbit, parent_model_to_world: &Mat4, sim_time: f32) -> Mat4 {
    let angle = sim_time * orbit.angular_speed + orbit.phase;
    compose_elementary(&[
        Elementary::Translate(translation_of(parent_model_to_world)),
        Elementary::RotateZ(angle),
        Elementary::Translate(Vec3::new(orbit.radius, 0.0, 0.0)),
    ])
}

/// World transform of a single actor.
///
/// `parent_model_to_world` must be the parent's transform for the same
/// `sim_time`; it is ignored for actors without an orbit.
pub fn actor_to_world(actor: &Actor, parent_model_to_world: Option<&Mat4>, sim_time: f32) -> Mat4 {
    let orbit = match (&actor.orbit, parent_model_to_world) {
        (Some(orbit), Some(parent)) => orbit_transform(orbit, parent, sim_time),
        (Some(_), None) => panic!(
            "actor '{}' evaluated without its parent transform",
            actor.name
        ),
        (None, _) => Mat4::IDENTITY,
    };
    compose_elementary(&[
        Elementary::Matrix(orbit),
        Elementary::RotateZ(sim_time * actor.rotation_speed),
        Elementary::uniform_scale(actor.size),
    ])
}

/// A validated, acyclic set of actors and their most recently published
/// world transforms.
#[derive(Clone, Debug)]
pub struct ActorHierarchy {
    actors: Vec<Actor>,
    /// Parent-first evaluation order.
    order: Vec<ActorId>,
    transforms: Vec<Mat4>,
}

impl ActorHierarchy {
    /// Resolve parents by name and compute the evaluation order.
    ///
    /// Declaration order is kept among actors at the same depth.
    pub fn new(descs: &[ActorDesc]) -> Result<Self, SceneError> {
        let mut ids = HashMap::with_capacity(descs.len());
        for (index, desc) in descs.iter().enumerate() {
            if ids.insert(desc.name.as_str(), ActorId(index)).is_some() {
                return Err(SceneError::DuplicateActor(desc.name.clone()));
            }
        }

        let mut actors = Vec::with_capacity(descs.len());
        for desc in descs {
            let orbit = match &desc.orbit {
                Some(o) => {
                    let parent = *ids.get(o.parent.as_str()).ok_or_else(|| {
                        SceneError::UnknownParent {
                            actor: desc.name.clone(),
                            parent: o.parent.clone(),
                        }
                    })?;
                    Some(Orbit {
                        parent,
                        radius: o.radius,
                        angular_speed: o.angular_speed,
                        phase: o.phase,
                    })
                }
                None => None,
            };
            actors.push(Actor {
                name: desc.name.clone(),
                size: desc.size,
                rotation_speed: desc.rotation_speed,
                orbit,
            });
        }

        // Depth of each actor in the orbit tree. A walk longer than the actor
        // count must have revisited an actor.
        let mut depths = Vec::with_capacity(actors.len());
        for actor in &actors {
            let mut depth = 0usize;
            let mut current = actor;
            while let Some(orbit) = &current.orbit {
                depth += 1;
                if depth > actors.len() {
                    return Err(SceneError::OrbitCycle(actor.name.clone()));
                }
                current = &actors[orbit.parent.0];
            }
            depths.push(depth);
        }

        let mut order: Vec<ActorId> = (0..actors.len()).map(ActorId).collect();
        order.sort_by_key(|id| depths[id.0]);

        log::debug!("actor hierarchy: {} actors", actors.len());
        let transforms = vec![Mat4::IDENTITY; actors.len()];
        Ok(Self {
            actors,
            order,
            transforms,
        })
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn actor(&self, id: ActorId) -> &Actor {
        &self.actors[id.0]
    }

    pub fn find(&self, name: &str) -> Option<ActorId> {
        self.actors
            .iter()
            .position(|a| a.name == name)
            .map(ActorId)
    }

    /// Ids in declaration order, which is also draw order.
    pub fn ids(&self) -> impl Iterator<Item = ActorId> + '_ {
        (0..self.actors.len()).map(ActorId)
    }

    pub fn evaluation_order(&self) -> &[ActorId] {
        &self.order
    }

    /// Compute every actor's transform at `sim_time` without publishing.
    ///
    /// The result is indexed by [`ActorId`].
    ///
    /// # Panics
    ///
    /// Panics if a child is reached before its parent, which would mean the
    /// stored order is broken.
    pub fn evaluate(&self, sim_time: f32) -> Vec<Mat4> {
        let mut staged: Vec<Option<Mat4>> = vec![None; self.actors.len()];
        for &id in &self.order {
            let actor = &self.actors[id.0];
            let parent = actor.orbit.map(|orbit| {
                let parent = staged[orbit.parent.0];
                assert!(
                    parent.is_some(),
                    "actor '{}' evaluated before its parent '{}'",
                    actor.name,
                    self.actors[orbit.parent.0].name
                );
                parent.unwrap_or(Mat4::IDENTITY)
            });
            staged[id.0] = Some(actor_to_world(actor, parent.as_ref(), sim_time));
        }
        staged
            .into_iter()
            .map(|m| m.unwrap_or(Mat4::IDENTITY))
            .collect()
    }

    /// Replace the published transforms with a complete evaluated set.
    pub fn publish(&mut self, transforms: Vec<Mat4>) {
        assert_eq!(transforms.len(), self.actors.len());
        self.transforms = transforms;
    }

    pub fn update(&mut self, sim_time: f32) {
        let transforms = self.evaluate(sim_time);
        self.publish(transforms);
    }

    pub fn model_to_world(&self, id: ActorId) -> Mat4 {
        self.transforms[id.0]
    }

    pub fn translation(&self, id: ActorId) -> Vec3 {
        translation_of(&self.transforms[id.0])
    }

    pub fn transforms(&self) -> &[Mat4] {
        &self.transforms
    }
}
