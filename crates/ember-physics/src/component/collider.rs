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

//! The collider component: derives collision shapes from the owning
//! object's transform.

use ember_core::asset::MeshData;
use ember_core::math::Transform;

use crate::component::binding::{BodyState, PhysicsBinding};
use crate::error::PhysicsError;
use crate::shape::ShapeDesc;
use crate::world::PhysicsWorld;

/// Which primitive the collider derives from the transform scale.
#[derive(Debug, Clone)]
pub enum ColliderKind {
    /// Box; half-extents are the scale components.
    Box,
    /// Sphere; radius is the largest scale component.
    Sphere,
    /// Y-aligned capsule; radius from X/Z scale, height from Y scale.
    Capsule,
    /// Static triangle mesh, scaled per axis.
    Mesh(MeshData),
}

/// Shape-factory component. One per game object at most; when present it is
/// always resolved before the rigid-body component so the body adopts the
/// collider's shape.
#[derive(Debug, Clone)]
pub struct ColliderComponent {
    kind: ColliderKind,
}

impl ColliderComponent {
    /// A box collider.
    pub fn new_box() -> Self {
        Self {
            kind: ColliderKind::Box,
        }
    }

    /// A sphere collider.
    pub fn new_sphere() -> Self {
        Self {
            kind: ColliderKind::Sphere,
        }
    }

    /// A capsule collider.
    pub fn new_capsule() -> Self {
        Self {
            kind: ColliderKind::Capsule,
        }
    }

    /// A static triangle-mesh collider built from baked geometry.
    pub fn new_mesh(mesh: MeshData) -> Self {
        Self {
            kind: ColliderKind::Mesh(mesh),
        }
    }

    /// The collider's primitive kind.
    pub fn kind(&self) -> &ColliderKind {
        &self.kind
    }

    /// Changes the primitive kind. Takes effect on the next
    /// [`refresh_shape`](Self::refresh_shape) (or at start).
    pub fn set_kind(&mut self, kind: ColliderKind) {
        self.kind = kind;
    }

    /// Derives the shape descriptor from the current transform scale.
    pub fn shape_desc(&self, transform: &Transform) -> Result<ShapeDesc, PhysicsError> {
        match &self.kind {
            ColliderKind::Box => Ok(ShapeDesc::box_from_scale(transform.scale)),
            ColliderKind::Sphere => Ok(ShapeDesc::sphere_from_scale(transform.scale)),
            ColliderKind::Capsule => Ok(ShapeDesc::capsule_from_scale(transform.scale)),
            ColliderKind::Mesh(mesh) => ShapeDesc::mesh_from_source(mesh, transform.scale),
        }
    }

    /// Rebuilds the shape after a live scale or kind change (e.g. a
    /// stand/crouch stance switch) and swaps it onto the existing body.
    ///
    /// The body keeps its world transform and its per-body gravity override;
    /// only the extents change. Shapes are recreated, never mutated.
    pub fn refresh_shape(
        &self,
        world: &mut PhysicsWorld,
        binding: &PhysicsBinding,
        transform: &Transform,
    ) -> Result<(), PhysicsError> {
        let object = match binding.state() {
            BodyState::Initialized { object, .. } => object,
            BodyState::Uninitialized => {
                // Nothing to swap yet; the shape is derived at start.
                return Ok(());
            }
            BodyState::Destroyed => {
                log::error!("refresh_shape called on a destroyed binding.");
                return Err(PhysicsError::UseAfterDestroy {
                    operation: "refresh_shape",
                });
            }
        };
        let shape = self.shape_desc(transform)?;
        world.replace_object_shape(object, shape, transform)
    }
}
