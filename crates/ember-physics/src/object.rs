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

//! Tracked physics objects and the generational arena that owns them.
//!
//! Simulation bodies reference their owning object through a typed arena
//! handle encoded in the body's user data, so the hot collision loop resolves
//! identities by index instead of downcasting.

use ember_core::render::RenderProxy;
use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};

use crate::contact::ContactHandler;
use crate::shape::ShapeKind;

/// Typed handle to a tracked physics object.
///
/// The generation counter detects stale handles: a slot reused after removal
/// invalidates every handle minted for its previous occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhysicsObjectHandle {
    index: u32,
    generation: u32,
}

impl PhysicsObjectHandle {
    /// Packs the handle into a single `u64`.
    #[inline]
    pub fn to_bits(self) -> u64 {
        ((self.generation as u64) << 32) | self.index as u64
    }

    #[inline]
    fn from_bits(bits: u64) -> Self {
        Self {
            index: bits as u32,
            generation: (bits >> 32) as u32,
        }
    }

    /// Encodes the handle into body user data. Zero is reserved for "no
    /// back-reference" so foreign bodies are never misresolved.
    #[inline]
    pub(crate) fn to_user_data(self) -> u128 {
        self.to_bits() as u128 + 1
    }

    /// Decodes body user data back into a handle, if one was encoded.
    #[inline]
    pub(crate) fn from_user_data(data: u128) -> Option<Self> {
        let bits = data.checked_sub(1)?;
        if bits > u64::MAX as u128 {
            return None;
        }
        Some(Self::from_bits(bits as u64))
    }
}

/// A simulation body coupled with its render proxy and contact callbacks.
pub(crate) struct PhysicsObject {
    /// Backend body handle.
    pub body: RigidBodyHandle,
    /// Backend collider handle.
    pub collider: ColliderHandle,
    /// Family of the collider's current shape.
    pub kind: ShapeKind,
    /// Renderable stand-in updated after every step.
    pub proxy: Option<Box<dyn RenderProxy>>,
    /// Per-object enter/stay/exit callbacks.
    pub handler: Option<Box<dyn ContactHandler>>,
}

struct Slot {
    generation: u32,
    entry: Option<PhysicsObject>,
}

/// Generational arena of tracked physics objects.
#[derive(Default)]
pub(crate) struct ObjectArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl ObjectArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an object and returns its handle.
    pub fn insert(&mut self, object: PhysicsObject) -> PhysicsObjectHandle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(object);
            PhysicsObjectHandle {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                entry: Some(object),
            });
            PhysicsObjectHandle {
                index,
                generation: 0,
            }
        }
    }

    /// Removes an object, invalidating its handle. Returns the object so the
    /// caller can tear down its body before the slot is reused.
    pub fn remove(&mut self, handle: PhysicsObjectHandle) -> Option<PhysicsObject> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation || slot.entry.is_none() {
            return None;
        }
        let object = slot.entry.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        object
    }

    pub fn get(&self, handle: PhysicsObjectHandle) -> Option<&PhysicsObject> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.entry.as_ref()
    }

    pub fn get_mut(&mut self, handle: PhysicsObjectHandle) -> Option<&mut PhysicsObject> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.entry.as_mut()
    }

    pub fn contains(&self, handle: PhysicsObjectHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Iterates over every live object.
    pub fn iter_mut(
        &mut self,
    ) -> impl Iterator<Item = (PhysicsObjectHandle, &mut PhysicsObject)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, slot)| {
            let generation = slot.generation;
            slot.entry.as_mut().map(move |obj| {
                (
                    PhysicsObjectHandle {
                        index: i as u32,
                        generation,
                    },
                    obj,
                )
            })
        })
    }

    /// Drains every live object, handle first.
    pub fn drain(&mut self) -> Vec<(PhysicsObjectHandle, PhysicsObject)> {
        let mut drained = Vec::with_capacity(self.len);
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if let Some(obj) = slot.entry.take() {
                drained.push((
                    PhysicsObjectHandle {
                        index: i as u32,
                        generation: slot.generation,
                    },
                    obj,
                ));
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(i as u32);
            }
        }
        self.len = 0;
        drained
    }
}

#[cfg(test)]
pub(crate) mod tests_support {
    use super::*;

    pub(crate) fn dummy_object() -> PhysicsObject {
        PhysicsObject {
            body: RigidBodyHandle::invalid(),
            collider: ColliderHandle::invalid(),
            kind: ShapeKind::Box,
            proxy: None,
            handler: None,
        }
    }

    /// Mints `N` distinct live handles through a real arena.
    pub(crate) fn handles<const N: usize>() -> [PhysicsObjectHandle; N] {
        let mut arena = ObjectArena::new();
        std::array::from_fn(|_| arena.insert(dummy_object()))
    }
}
