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

//! Component adapters binding game objects to simulation bodies.
//!
//! A game object carries at most one simulation body, shared by its collider
//! and rigid-body components. [`start_physics`] resolves the components in a
//! deterministic order (collider first when present) so the body's creator
//! never depends on component start order.

mod binding;
mod collider;
mod rigid_body;

pub use binding::{BodyOwner, BodyState, PhysicsBinding};
pub use collider::{ColliderComponent, ColliderKind};
pub use rigid_body::RigidBodyComponent;

use ember_core::math::{Transform, Vec3};

use crate::error::PhysicsError;
use crate::shape::{ShapeDesc, ShapeKind};
use crate::world::{ObjectDesc, PhysicsWorld};

/// Creates the game object's single simulation body from its components.
///
/// Resolution order is fixed: the collider's shape wins when a collider is
/// present (the rigid body adopts it and contributes its mass); otherwise the
/// rigid body creates a default unit-box body. Exactly one body is created
/// per binding; a second call is a logged no-op.
pub fn start_physics(
    world: &mut PhysicsWorld,
    binding: &mut PhysicsBinding,
    transform: &Transform,
    collider: Option<&ColliderComponent>,
    rigid_body: Option<&RigidBodyComponent>,
) -> Result<(), PhysicsError> {
    match binding.state() {
        BodyState::Uninitialized => {}
        BodyState::Initialized { .. } => {
            log::warn!("start_physics called on an already-initialized binding; ignoring.");
            return Ok(());
        }
        BodyState::Destroyed => {
            log::error!("start_physics called on a destroyed binding.");
            return Err(PhysicsError::UseAfterDestroy {
                operation: "start_physics",
            });
        }
    }

    let mass = rigid_body.map(|rb| rb.mass()).unwrap_or(0.0);
    let (shape, owner) = match collider {
        Some(collider) => (collider.shape_desc(transform)?, BodyOwner::Collider),
        None => (
            ShapeDesc::box_from_scale(Vec3::splat(0.5)),
            BodyOwner::RigidBody,
        ),
    };
    if shape.kind() == ShapeKind::TriangleMesh && mass > 0.0 {
        return Err(PhysicsError::InvalidMesh {
            reason: "a mesh-collider object cannot carry a dynamic rigid body".to_string(),
        });
    }

    let mut desc = ObjectDesc::new(shape);
    desc.mass = mass;
    desc.position = transform.position;
    desc.rotation = transform.rotation;
    desc.friction = world.config().default_friction;
    desc.restitution = world.config().default_restitution;
    let object = world.create_object(desc)?;
    binding.mark_initialized(object, owner);
    Ok(())
}
