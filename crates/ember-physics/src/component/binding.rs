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

//! The per-game-object body lifecycle state machine.

use crate::error::PhysicsError;
use crate::object::PhysicsObjectHandle;
use crate::world::PhysicsWorld;

/// Which component created the shared body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyOwner {
    /// The collider component created the body.
    Collider,
    /// The rigid-body component created the body (no collider present).
    RigidBody,
}

/// Lifecycle state of a game object's simulation body.
///
/// Transitions: `Uninitialized → Initialized → Destroyed`. `Destroyed` is
/// terminal; operations on a destroyed binding are lifecycle bugs and are
/// surfaced as [`PhysicsError::UseAfterDestroy`], never silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyState {
    /// No body exists yet.
    Uninitialized,
    /// A body exists and is registered with the world.
    Initialized {
        /// Handle of the tracked physics object.
        object: PhysicsObjectHandle,
        /// Which component created the body.
        owner: BodyOwner,
    },
    /// The body has been removed and disposed.
    Destroyed,
}

/// Tracks the one simulation body shared by all physics components of a
/// game object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhysicsBinding {
    state: BodyState,
}

impl Default for BodyState {
    fn default() -> Self {
        BodyState::Uninitialized
    }
}

impl PhysicsBinding {
    /// Creates an uninitialized binding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BodyState {
        self.state
    }

    /// Handle of the live object, if initialized.
    pub fn object(&self) -> Option<PhysicsObjectHandle> {
        match self.state {
            BodyState::Initialized { object, .. } => Some(object),
            _ => None,
        }
    }

    pub(crate) fn mark_initialized(&mut self, object: PhysicsObjectHandle, owner: BodyOwner) {
        self.state = BodyState::Initialized { object, owner };
    }

    /// Removes the body from the world and moves to the terminal state.
    ///
    /// Destroying an uninitialized binding is legal (the object never had a
    /// body); destroying twice is a use-after-destroy bug.
    pub fn destroy(&mut self, world: &mut PhysicsWorld) -> Result<(), PhysicsError> {
        match self.state {
            BodyState::Uninitialized => {
                self.state = BodyState::Destroyed;
                Ok(())
            }
            BodyState::Initialized { object, .. } => {
                world.remove_object(object)?;
                self.state = BodyState::Destroyed;
                Ok(())
            }
            BodyState::Destroyed => {
                log::error!("destroy called on an already-destroyed binding.");
                Err(PhysicsError::UseAfterDestroy {
                    operation: "destroy",
                })
            }
        }
    }
}
