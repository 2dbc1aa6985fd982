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

//! Persistent collision-pair bookkeeping.
//!
//! Each step the world rebuilds the set of genuinely-touching pairs from the
//! narrow phase; diffing it against the previous step's set yields the
//! enter/stay/exit events consumed by gameplay.

use std::collections::HashSet;

use crate::object::PhysicsObjectHandle;

/// An unordered pair of physics object identities.
///
/// Canonicalized on construction so `(A, B)` and `(B, A)` compare equal and
/// hash identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionPair {
    a: PhysicsObjectHandle,
    b: PhysicsObjectHandle,
}

impl CollisionPair {
    /// Creates the canonical pair for two objects.
    pub fn new(x: PhysicsObjectHandle, y: PhysicsObjectHandle) -> Self {
        if x.to_bits() <= y.to_bits() {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }

    /// The lower-ordered participant.
    pub fn first(&self) -> PhysicsObjectHandle {
        self.a
    }

    /// The higher-ordered participant.
    pub fn second(&self) -> PhysicsObjectHandle {
        self.b
    }

    /// Whether `handle` is one of the two participants.
    pub fn involves(&self, handle: PhysicsObjectHandle) -> bool {
        self.a == handle || self.b == handle
    }

    /// The participant that is not `handle`, if `handle` participates.
    pub fn other(&self, handle: PhysicsObjectHandle) -> Option<PhysicsObjectHandle> {
        if self.a == handle {
            Some(self.b)
        } else if self.b == handle {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Which edge of a contact's lifetime an event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    /// The pair started touching this step.
    Enter,
    /// The pair kept touching this step.
    Stay,
    /// The pair stopped touching this step.
    Exit,
}

/// A collision event for one pair, published on the world's event bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    /// The pair the event concerns.
    pub pair: CollisionPair,
    /// Enter, stay, or exit.
    pub phase: ContactPhase,
}

/// Per-object collision callbacks, invoked after each step.
///
/// A panicking callback is isolated and logged; it never aborts dispatch for
/// other pairs.
pub trait ContactHandler: Send {
    /// Called the step a contact with `other` begins.
    fn on_contact_enter(&mut self, _other: PhysicsObjectHandle) {}

    /// Called every step a contact with `other` persists.
    fn on_contact_stay(&mut self, _other: PhysicsObjectHandle) {}

    /// Called the step a contact with `other` ends.
    fn on_contact_exit(&mut self, _other: PhysicsObjectHandle) {}
}

/// Derives enter/stay/exit events by diffing successive pair sets.
#[derive(Debug, Default)]
pub struct ContactTracker {
    current: HashSet<CollisionPair>,
    previous: HashSet<CollisionPair>,
}

impl ContactTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts this step's freshly-built pair set and returns the events it
    /// implies relative to the previous step.
    ///
    /// A pair entering fires exactly one `Enter`; a pair leaving fires exactly
    /// one `Exit`; a pair present in both sets fires `Stay`.
    pub fn reconcile(&mut self, fresh: HashSet<CollisionPair>) -> Vec<ContactEvent> {
        std::mem::swap(&mut self.previous, &mut self.current);
        self.current = fresh;

        let mut events = Vec::new();
        for &pair in &self.current {
            let phase = if self.previous.contains(&pair) {
                ContactPhase::Stay
            } else {
                ContactPhase::Enter
            };
            events.push(ContactEvent { pair, phase });
        }
        for &pair in &self.previous {
            if !self.current.contains(&pair) {
                events.push(ContactEvent {
                    pair,
                    phase: ContactPhase::Exit,
                });
            }
        }
        events
    }

    /// Scrubs every pair involving `handle` from both sets.
    ///
    /// Called when an object is removed from the world, so no stale exit is
    /// fired for a body that no longer exists.
    pub fn purge(&mut self, handle: PhysicsObjectHandle) {
        self.current.retain(|pair| !pair.involves(handle));
        self.previous.retain(|pair| !pair.involves(handle));
    }

    /// Whether the pair is currently tracked as touching.
    pub fn is_touching(&self, pair: &CollisionPair) -> bool {
        self.current.contains(pair)
    }

    /// Number of currently-touching pairs.
    pub fn touching_count(&self) -> usize {
        self.current.len()
    }

    /// Forgets all tracked pairs.
    pub fn clear(&mut self) {
        self.current.clear();
        self.previous.clear();
    }
}
