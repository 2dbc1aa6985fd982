// Copyright 2025 the ember authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The rigid-body component: mass policy and the per-frame transform pull.

use ember_core::math::{Quaternion, Transform, Vec3};

use crate::component::binding::{BodyState, PhysicsBinding};
use crate::error::PhysicsError;
use crate::world::PhysicsWorld;

/// Owns the mass/dynamics configuration of a game object and pulls the
/// simulation transform back into the engine transform every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBodyComponent {
    mass: f32,
}

impl RigidBodyComponent {
    /// Creates the component with the given mass. `0` means static.
    pub fn new(mass: f32) -> Self {
        Self { mass }
    }

    /// The configured mass.
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Reclassifies the body's mass.
    ///
    /// Before initialization the value is stored for use at start. On a live
    /// body the world switches it between static and dynamic, re-derives
    /// inertia from the collider shape, and zeroes its velocities — the
    /// remove-recompute-readd sequence is explicit here, not hidden behind a
    /// field assignment.
    pub fn set_mass(
        &mut self,
        world: &mut PhysicsWorld,
        binding: &PhysicsBinding,
        mass: f32,
    ) -> Result<(), PhysicsError> {
        match binding.state() {
            BodyState::Uninitialized => {
                self.mass = mass;
                Ok(())
            }
            BodyState::Initialized { object, .. } => {
                world.set_object_mass(object, mass)?;
                self.mass = mass;
                Ok(())
            }
            BodyState::Destroyed => {
                log::error!("set_mass called on a destroyed binding.");
                Err(PhysicsError::UseAfterDestroy {
                    operation: "set_mass",
                })
            }
        }
    }

    /// Pulls the simulation transform into the engine transform.
    ///
    /// Skipped while uninitialized and for static bodies (mass 0): statics
    /// never move, and a kinematic designer-set transform must not be
    /// overwritten. Gameplay code that wants to move a dynamic body goes
    /// through velocities and impulses, not direct transform writes.
    pub fn update(
        &self,
        world: &PhysicsWorld,
        binding: &PhysicsBinding,
        transform: &mut Transform,
    ) {
        if self.mass == 0.0 {
            return;
        }
        let object = match binding.state() {
            BodyState::Initialized { object, .. } => object,
            BodyState::Uninitialized => return,
            BodyState::Destroyed => {
                log::error!("update called on a destroyed binding.");
                return;
            }
        };
        if let Some((position, rotation)) = world.object_transform(object) {
            transform.position = position;
            transform.rotation = rotation;
        }
    }

    /// Teleports the object, writing the transform and pushing it into the
    /// simulation body when one exists.
    pub fn teleport(
        &self,
        world: &mut PhysicsWorld,
        binding: &PhysicsBinding,
        transform: &mut Transform,
        position: Vec3,
        rotation: Quaternion,
    ) -> Result<(), PhysicsError> {
        transform.position = position;
        transform.rotation = rotation;
        match binding.state() {
            BodyState::Initialized { object, .. } => {
                world.set_object_transform(object, position, rotation)
            }
            BodyState::Uninitialized => Ok(()),
            BodyState::Destroyed => {
                log::error!("teleport called on a destroyed binding.");
                Err(PhysicsError::UseAfterDestroy {
                    operation: "teleport",
                })
            }
        }
    }
}

impl Default for RigidBodyComponent {
    fn default() -> Self {
        Self::new(0.0)
    }
}
