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

//! Contract between the physics subsystem and whatever draws its objects.

use crate::math::{Quaternion, Vec3};

/// A renderable stand-in for a simulated object.
///
/// The physics world writes the body's world transform into the proxy after
/// every step, so the renderer never depends on physics types directly.
pub trait RenderProxy: Send {
    /// Sets the proxy's world-space position.
    fn set_position(&mut self, position: Vec3);

    /// Sets the proxy's world-space rotation.
    fn set_rotation(&mut self, rotation: Quaternion);

    /// Per-frame hook, called after the transform has been updated.
    fn render(&mut self, _dt: f32) {}
}
