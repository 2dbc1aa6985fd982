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

//! # Ember Physics
//!
//! Rigid-body physics integration for the engine: the simulation world,
//! persistent contact tracking with enter/stay/exit events, shape factories,
//! and the component adapters that keep game objects and simulation bodies
//! synchronized.
//!
//! The world is an owned instance (never a global), stepped synchronously
//! from the game loop. Internal solver parallelism runs on a pluggable
//! scheduler backend and completes before [`PhysicsWorld::step`] returns.

#![warn(missing_docs)]

pub mod component;
pub mod config;
pub mod contact;
pub mod error;
pub mod object;
pub mod scheduler;
pub mod shape;
pub mod world;

pub use config::PhysicsConfig;
pub use contact::{CollisionPair, ContactEvent, ContactHandler, ContactPhase};
pub use error::PhysicsError;
pub use object::PhysicsObjectHandle;
pub use scheduler::{SchedulerKind, SchedulerPool};
pub use shape::{ShapeDesc, ShapeKind};
pub use world::{ObjectDesc, PhysicsWorld, RayHit};
