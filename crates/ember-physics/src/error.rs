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

//! Defines the error types of the physics subsystem.
//!
//! Benign lifecycle anomalies (double `init`, `step` before `init`) are *not*
//! errors; they are logged warnings and no-ops. Errors represent lifecycle
//! bugs in calling code (use-after-destroy, unknown handles) or resource
//! creation failures that must not yield a half-constructed body.

use std::fmt;

/// An error raised by the physics world or its component adapters.
#[derive(Debug)]
pub enum PhysicsError {
    /// An operation was attempted on a component whose body has already been
    /// destroyed. Indicates a use-after-destroy bug in calling code.
    UseAfterDestroy {
        /// The operation that was attempted.
        operation: &'static str,
    },
    /// A handle did not resolve to a live physics object.
    UnknownObject,
    /// Mesh data was malformed or unusable for collision geometry.
    InvalidMesh {
        /// Why the mesh was rejected.
        reason: String,
    },
    /// The backend failed to construct a collision shape.
    ShapeCreation {
        /// Detailed error message from the shape builder.
        details: String,
    },
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::UseAfterDestroy { operation } => {
                write!(f, "'{operation}' called on a destroyed physics body")
            }
            PhysicsError::UnknownObject => {
                write!(f, "Handle does not resolve to a live physics object.")
            }
            PhysicsError::InvalidMesh { reason } => {
                write!(f, "Mesh unusable for collision geometry: {reason}")
            }
            PhysicsError::ShapeCreation { details } => {
                write!(f, "Failed to construct collision shape: {details}")
            }
        }
    }
}

impl std::error::Error for PhysicsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn use_after_destroy_display() {
        let err = PhysicsError::UseAfterDestroy {
            operation: "set_mass",
        };
        assert_eq!(
            format!("{err}"),
            "'set_mass' called on a destroyed physics body"
        );
    }

    #[test]
    fn invalid_mesh_display() {
        let err = PhysicsError::InvalidMesh {
            reason: "index out of range".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "Mesh unusable for collision geometry: index out of range"
        );
    }
}
