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

//! Tunable parameters of the physics world.

use ember_core::math::Vec3;

/// Configuration applied when the world is initialized.
///
/// The sub-stepping and contact-threshold defaults are tuning values carried
/// by the engine, not hard requirements; override them per world as needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsConfig {
    /// Global gravity vector.
    pub gravity: Vec3,
    /// Duration of one fixed sub-step, in seconds.
    pub fixed_timestep: f32,
    /// Maximum number of fixed sub-steps consumed per `step` call, regardless
    /// of how large the wall-clock delta is.
    pub max_substeps: u32,
    /// A contact manifold counts as a genuine touch only when at least one of
    /// its points is within this distance. Filters broadphase-only overlaps.
    pub contact_distance_threshold: f32,
    /// Friction applied to colliders created without an explicit material.
    pub default_friction: f32,
    /// Restitution applied to colliders created without an explicit material.
    pub default_restitution: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 10,
            contact_distance_threshold: 0.005,
            default_friction: 1.0,
            default_restitution: 0.0,
        }
    }
}
