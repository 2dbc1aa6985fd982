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

//! Contract for mesh data consumed by the physics subsystem.

/// Provider of baked triangle-mesh geometry in object-local space.
///
/// Mesh colliders are built from this data; the provider keeps ownership of
/// the underlying buffers.
pub trait MeshSource {
    /// Flat vertex positions, three `f32` per vertex (x, y, z).
    fn positions(&self) -> &[f32];

    /// Triangle indices into the position buffer, three per triangle.
    fn indices(&self) -> &[u32];
}

/// A [`MeshSource`] backed by owned buffers, useful for tests and tooling.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Flat vertex positions, three `f32` per vertex.
    pub positions: Vec<f32>,
    /// Triangle indices, three per triangle.
    pub indices: Vec<u32>,
}

impl MeshSource for MeshData {
    fn positions(&self) -> &[f32] {
        &self.positions
    }

    fn indices(&self) -> &[u32] {
        &self.indices
    }
}
