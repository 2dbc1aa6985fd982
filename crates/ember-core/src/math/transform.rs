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

//! Provides the world transform of a game object.

use serde::{Deserialize, Serialize};

use super::{Quaternion, Vec3};

/// Position, rotation, and non-uniform scale of a game object in world space.
///
/// Owned exclusively by its game object. The physics adapters pull the
/// simulation transform into `position` and `rotation` after each step;
/// gameplay code that teleports an object must push the new transform back
/// into the simulation body through the owning adapter, not only mutate this
/// struct.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// World-space position.
    pub position: Vec3,
    /// World-space rotation.
    pub rotation: Quaternion,
    /// Per-axis scale. Shape factories derive collision extents from this.
    pub scale: Vec3,
}

impl Transform {
    /// The identity transform: origin, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quaternion::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Creates a transform at `position` with no rotation and unit scale.
    #[inline]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Creates a transform at `position` with the given per-axis `scale`.
    #[inline]
    pub fn from_position_scale(position: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation: Quaternion::IDENTITY,
            scale,
        }
    }

    /// Transforms a point from local space into world space.
    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation.rotate(point * self.scale) + self.position
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_leaves_points_unchanged() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Transform::IDENTITY.transform_point(p), p);
    }

    #[test]
    fn transform_point_applies_scale_then_translation() {
        let t = Transform::from_position_scale(Vec3::new(10.0, 0.0, 0.0), Vec3::splat(2.0));
        let p = t.transform_point(Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(p, Vec3::new(12.0, 2.0, 2.0));
    }
}
