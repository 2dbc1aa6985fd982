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

//! The rigid-body simulation world.
//!
//! Owns the rapier context end to end: body and collider sets, broadphase,
//! narrow phase, islands, CCD, and the constraint pipeline. Advances with
//! fixed sub-steps, derives enter/stay/exit collision events after every
//! step, and keeps render proxies synchronized with their bodies.
//!
//! The world is an owned instance passed to the adapters that need it; it is
//! not thread-safe against concurrent external callers and assumes
//! single-threaded access from the game loop. Solver parallelism inside one
//! `step` call is an implementation detail of the active scheduler backend.

use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};

use ember_core::math::{Quaternion, Transform, Vec3, EPSILON};
use ember_core::render::RenderProxy;
use ember_core::variable::Variables;
use rapier3d::na;
use rapier3d::prelude::*;

use crate::config::PhysicsConfig;
use crate::contact::{CollisionPair, ContactEvent, ContactHandler, ContactPhase, ContactTracker};
use crate::error::PhysicsError;
use crate::object::{ObjectArena, PhysicsObject, PhysicsObjectHandle};
use crate::scheduler::{SchedulerKind, SchedulerPool};
use crate::shape::{ShapeDesc, ShapeKind};

/// Everything needed to register a new physics object.
pub struct ObjectDesc {
    /// Collision shape descriptor.
    pub shape: ShapeDesc,
    /// Body mass. `0` creates a static body; `> 0` a dynamic one.
    pub mass: f32,
    /// Initial world-space position.
    pub position: Vec3,
    /// Initial world-space rotation.
    pub rotation: Quaternion,
    /// Surface friction.
    pub friction: f32,
    /// Surface restitution (bounciness).
    pub restitution: f32,
    /// Renderable stand-in updated after every step.
    pub proxy: Option<Box<dyn RenderProxy>>,
    /// Per-object collision callbacks.
    pub handler: Option<Box<dyn ContactHandler>>,
}

impl ObjectDesc {
    /// A static unit box at the origin; override fields as needed.
    pub fn new(shape: ShapeDesc) -> Self {
        Self {
            shape,
            mass: 0.0,
            position: Vec3::ZERO,
            rotation: Quaternion::IDENTITY,
            friction: 1.0,
            restitution: 0.0,
            proxy: None,
            handler: None,
        }
    }
}

/// Result of a closest-hit ray query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// The tracked object that was hit, when the collider belongs to one.
    pub object: Option<PhysicsObjectHandle>,
    /// World-space hit point.
    pub point: Vec3,
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
}

/// The owned rigid-body simulation world.
pub struct PhysicsWorld {
    config: PhysicsConfig,
    initialized: bool,
    warned_uninitialized_step: bool,
    accumulator: f32,

    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,

    objects: ObjectArena,
    tracker: ContactTracker,
    events: ember_core::event::EventBus<ContactEvent>,
    schedulers: SchedulerPool,
    variable_watch: Option<flume::Receiver<ember_core::variable::VariableChange>>,
}

impl PhysicsWorld {
    /// Creates an uninitialized world using the given scheduler pool.
    ///
    /// Bodies may be registered before `init`, but stepping is a guarded
    /// no-op until then.
    pub fn new(schedulers: SchedulerPool) -> Self {
        let config = PhysicsConfig::default();
        Self {
            config,
            initialized: false,
            warned_uninitialized_step: false,
            accumulator: 0.0,
            gravity: to_na(config.gravity),
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            objects: ObjectArena::new(),
            tracker: ContactTracker::new(),
            events: ember_core::event::EventBus::new(),
            schedulers,
            variable_watch: None,
        }
    }

    /// Applies the configuration and marks the world ready to step.
    ///
    /// Calling `init` on an already-initialized world logs a warning and
    /// keeps the existing state; it never re-creates the simulation context.
    pub fn init(&mut self, config: PhysicsConfig) {
        if self.initialized {
            log::warn!("PhysicsWorld::init called twice; keeping the existing world.");
            return;
        }
        self.config = config;
        self.gravity = to_na(config.gravity);
        self.integration_parameters = IntegrationParameters {
            dt: config.fixed_timestep,
            ..IntegrationParameters::default()
        };
        self.initialized = true;
        log::info!(
            "Physics world initialized (scheduler: {}).",
            self.schedulers.active().label()
        );
    }

    /// Whether `init` has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The active configuration.
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Current global gravity.
    pub fn gravity(&self) -> Vec3 {
        from_na(&self.gravity)
    }

    /// Number of simulation bodies currently registered.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of tracked physics objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// The active scheduler backend.
    pub fn active_scheduler(&self) -> SchedulerKind {
        self.schedulers.active()
    }

    /// Switches to the next scheduler backend without touching the world.
    pub fn cycle_scheduler(&mut self) -> SchedulerKind {
        self.schedulers.cycle()
    }

    /// Subscribes to the global collision event stream.
    pub fn contact_events(&self) -> flume::Receiver<ContactEvent> {
        self.events.subscribe()
    }

    /// Whether two objects are currently tracked as touching.
    pub fn touching(&self, a: PhysicsObjectHandle, b: PhysicsObjectHandle) -> bool {
        self.tracker.is_touching(&CollisionPair::new(a, b))
    }

    /// Connects the world to the engine variable bus.
    ///
    /// Changes to the `gravity` variable (downward Y magnitude) take effect
    /// at the start of the next step, updating global gravity and resetting
    /// every body's gravity override.
    pub fn watch_variables(&mut self, variables: &mut Variables) {
        self.variable_watch = Some(variables.watch());
    }

    // --- Object lifecycle ---

    /// Registers a new physics object and returns its handle.
    pub fn create_object(&mut self, desc: ObjectDesc) -> Result<PhysicsObjectHandle, PhysicsError> {
        let ObjectDesc {
            shape,
            mass,
            position,
            rotation,
            friction,
            restitution,
            proxy,
            handler,
        } = desc;

        let kind = shape.kind();
        if kind == ShapeKind::TriangleMesh && mass > 0.0 {
            return Err(PhysicsError::InvalidMesh {
                reason: "triangle-mesh colliders support static bodies only (mass must be 0)"
                    .to_string(),
            });
        }
        let shared = shape.build()?;

        let body_type = if mass > 0.0 {
            RigidBodyType::Dynamic
        } else {
            RigidBodyType::Fixed
        };
        let body = RigidBodyBuilder::new(body_type)
            .translation(to_na(position))
            .build();
        let body_handle = self.bodies.insert(body);

        let mut collider = ColliderBuilder::new(shared)
            .friction(friction)
            .restitution(restitution);
        if mass > 0.0 {
            collider = collider.mass(mass);
        }
        let collider_handle = self
            .colliders
            .insert_with_parent(collider, body_handle, &mut self.bodies);

        let handle = self.objects.insert(PhysicsObject {
            body: body_handle,
            collider: collider_handle,
            kind,
            proxy,
            handler,
        });
        if let Some(body) = self.bodies.get_mut(body_handle) {
            body.user_data = handle.to_user_data();
            body.set_rotation(to_na_rot(rotation), true);
        }
        Ok(handle)
    }

    /// Convenience factory: box whose half-extents come from the transform's scale.
    pub fn create_box(
        &mut self,
        transform: &Transform,
        mass: f32,
        proxy: Option<Box<dyn RenderProxy>>,
    ) -> Result<PhysicsObjectHandle, PhysicsError> {
        let mut desc = ObjectDesc::new(ShapeDesc::box_from_scale(transform.scale));
        desc.mass = mass;
        desc.position = transform.position;
        desc.rotation = transform.rotation;
        desc.friction = self.config.default_friction;
        desc.restitution = self.config.default_restitution;
        desc.proxy = proxy;
        self.create_object(desc)
    }

    /// Convenience factory: sphere whose radius is the dominant scale component.
    pub fn create_sphere(
        &mut self,
        transform: &Transform,
        mass: f32,
        proxy: Option<Box<dyn RenderProxy>>,
    ) -> Result<PhysicsObjectHandle, PhysicsError> {
        let mut desc = ObjectDesc::new(ShapeDesc::sphere_from_scale(transform.scale));
        desc.mass = mass;
        desc.position = transform.position;
        desc.rotation = transform.rotation;
        desc.friction = self.config.default_friction;
        desc.restitution = self.config.default_restitution;
        desc.proxy = proxy;
        self.create_object(desc)
    }

    /// Convenience factory: static triangle mesh scaled by the transform.
    ///
    /// A malformed mesh degrades to "no physics body": the error is returned
    /// (and logged) instead of crashing object creation.
    pub fn create_mesh(
        &mut self,
        mesh: &dyn ember_core::asset::MeshSource,
        transform: &Transform,
        proxy: Option<Box<dyn RenderProxy>>,
    ) -> Result<PhysicsObjectHandle, PhysicsError> {
        let shape = match ShapeDesc::mesh_from_source(mesh, transform.scale) {
            Ok(shape) => shape,
            Err(e) => {
                log::warn!("Mesh collider rejected, object gets no physics body: {e}");
                return Err(e);
            }
        };
        let mut desc = ObjectDesc::new(shape);
        desc.position = transform.position;
        desc.rotation = transform.rotation;
        desc.friction = self.config.default_friction;
        desc.restitution = self.config.default_restitution;
        desc.proxy = proxy;
        self.create_object(desc)
    }

    /// Removes an object, scrubbing its collision pairs before the body is
    /// disposed so no stale event fires on the next step.
    pub fn remove_object(&mut self, handle: PhysicsObjectHandle) -> Result<(), PhysicsError> {
        let object = self
            .objects
            .remove(handle)
            .ok_or(PhysicsError::UnknownObject)?;
        self.tracker.purge(handle);
        self.bodies.remove(
            object.body,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        Ok(())
    }

    /// Attaches (or replaces) the per-object contact callbacks.
    pub fn set_contact_handler(
        &mut self,
        handle: PhysicsObjectHandle,
        handler: Box<dyn ContactHandler>,
    ) -> Result<(), PhysicsError> {
        let object = self
            .objects
            .get_mut(handle)
            .ok_or(PhysicsError::UnknownObject)?;
        object.handler = Some(handler);
        Ok(())
    }

    // --- Body state ---

    /// Reclassifies an object's mass.
    ///
    /// Mass `0` switches the body to static and zeroes its velocities; a
    /// positive mass switches it to dynamic, re-derives inertia from the
    /// collider shape, and zeroes velocities so the object cannot keep a
    /// velocity inconsistent with its new mass class.
    pub fn set_object_mass(
        &mut self,
        handle: PhysicsObjectHandle,
        mass: f32,
    ) -> Result<(), PhysicsError> {
        let (body_handle, collider_handle, kind) = {
            let object = self.objects.get(handle).ok_or(PhysicsError::UnknownObject)?;
            (object.body, object.collider, object.kind)
        };
        if kind == ShapeKind::TriangleMesh && mass > 0.0 {
            return Err(PhysicsError::InvalidMesh {
                reason: "triangle-mesh colliders cannot become dynamic".to_string(),
            });
        }
        if mass > 0.0 {
            if let Some(collider) = self.colliders.get_mut(collider_handle) {
                collider.set_mass(mass);
            }
        }
        let body = self
            .bodies
            .get_mut(body_handle)
            .ok_or(PhysicsError::UnknownObject)?;
        if mass > 0.0 {
            body.set_body_type(RigidBodyType::Dynamic, true);
            body.recompute_mass_properties_from_colliders(&self.colliders);
        } else {
            body.set_body_type(RigidBodyType::Fixed, true);
        }
        body.set_linvel(vector![0.0, 0.0, 0.0], true);
        body.set_angvel(vector![0.0, 0.0, 0.0], true);
        Ok(())
    }

    /// Replaces an object's collision shape in place.
    ///
    /// The world transform is re-applied to the body and the per-body gravity
    /// override survives the disable/enable cycle (re-enabling a body resets
    /// some simulation fields; the override is restored explicitly).
    pub fn replace_object_shape(
        &mut self,
        handle: PhysicsObjectHandle,
        shape: ShapeDesc,
        transform: &Transform,
    ) -> Result<(), PhysicsError> {
        let kind = shape.kind();
        let (body_handle, collider_handle, was_dynamic) = {
            let object = self.objects.get(handle).ok_or(PhysicsError::UnknownObject)?;
            let dynamic = self
                .bodies
                .get(object.body)
                .is_some_and(|b| b.is_dynamic());
            (object.body, object.collider, dynamic)
        };
        if kind == ShapeKind::TriangleMesh && was_dynamic {
            return Err(PhysicsError::InvalidMesh {
                reason: "cannot swap a dynamic body onto a triangle mesh".to_string(),
            });
        }
        let shared = shape.build()?;

        let gravity_scale = self
            .bodies
            .get(body_handle)
            .map(|b| b.gravity_scale())
            .unwrap_or(1.0);

        if let Some(collider) = self.colliders.get_mut(collider_handle) {
            collider.set_shape(shared);
        }
        let body = self
            .bodies
            .get_mut(body_handle)
            .ok_or(PhysicsError::UnknownObject)?;
        body.set_enabled(false);
        body.set_translation(to_na(transform.position), false);
        body.set_rotation(to_na_rot(transform.rotation), false);
        body.set_enabled(true);
        body.set_gravity_scale(gravity_scale, false);
        if was_dynamic {
            body.recompute_mass_properties_from_colliders(&self.colliders);
        }
        body.wake_up(true);

        if let Some(object) = self.objects.get_mut(handle) {
            object.kind = kind;
        }
        Ok(())
    }

    /// Teleports an object, pushing the new transform into the simulation.
    pub fn set_object_transform(
        &mut self,
        handle: PhysicsObjectHandle,
        position: Vec3,
        rotation: Quaternion,
    ) -> Result<(), PhysicsError> {
        let object = self.objects.get(handle).ok_or(PhysicsError::UnknownObject)?;
        let body = self
            .bodies
            .get_mut(object.body)
            .ok_or(PhysicsError::UnknownObject)?;
        body.set_translation(to_na(position), true);
        body.set_rotation(to_na_rot(rotation), true);
        Ok(())
    }

    /// Reads an object's simulation transform.
    pub fn object_transform(&self, handle: PhysicsObjectHandle) -> Option<(Vec3, Quaternion)> {
        let object = self.objects.get(handle)?;
        let body = self.bodies.get(object.body)?;
        Some((from_na(body.translation()), from_na_rot(body.rotation())))
    }

    /// Reads an object's linear velocity.
    pub fn linear_velocity(&self, handle: PhysicsObjectHandle) -> Option<Vec3> {
        let object = self.objects.get(handle)?;
        let body = self.bodies.get(object.body)?;
        Some(from_na(body.linvel()))
    }

    /// Reads an object's effective mass.
    pub fn object_mass(&self, handle: PhysicsObjectHandle) -> Option<f32> {
        let object = self.objects.get(handle)?;
        Some(self.bodies.get(object.body)?.mass())
    }

    /// Applies a linear impulse at the center of mass. Static bodies ignore
    /// impulses by construction.
    pub fn apply_impulse(
        &mut self,
        handle: PhysicsObjectHandle,
        impulse: Vec3,
    ) -> Result<(), PhysicsError> {
        let object = self.objects.get(handle).ok_or(PhysicsError::UnknownObject)?;
        let body = self
            .bodies
            .get_mut(object.body)
            .ok_or(PhysicsError::UnknownObject)?;
        body.apply_impulse(to_na(impulse), true);
        Ok(())
    }

    /// Reads an object's per-body gravity override.
    pub fn object_gravity_scale(&self, handle: PhysicsObjectHandle) -> Option<f32> {
        let object = self.objects.get(handle)?;
        Some(self.bodies.get(object.body)?.gravity_scale())
    }

    /// Sets an object's per-body gravity override (a scale on global gravity).
    pub fn set_object_gravity_scale(
        &mut self,
        handle: PhysicsObjectHandle,
        scale: f32,
    ) -> Result<(), PhysicsError> {
        let object = self.objects.get(handle).ok_or(PhysicsError::UnknownObject)?;
        let body = self
            .bodies
            .get_mut(object.body)
            .ok_or(PhysicsError::UnknownObject)?;
        body.set_gravity_scale(scale, true);
        Ok(())
    }

    // --- Stepping ---

    /// Advances the simulation.
    ///
    /// Wall-clock time is consumed in fixed sub-steps (up to
    /// `config.max_substeps` of `config.fixed_timestep` each) so the solver
    /// stays stable under variable frame rate. Collision events are derived
    /// and dispatched before this returns; a no-op (with a one-time warning)
    /// if the world was never initialized.
    pub fn step(&mut self, dt: f32) {
        if !self.initialized {
            if !self.warned_uninitialized_step {
                log::warn!("PhysicsWorld::step called before init; ignoring.");
                self.warned_uninitialized_step = true;
            }
            return;
        }
        self.pump_variables();

        self.accumulator += dt;
        let mut substeps = 0;
        while self.accumulator >= self.config.fixed_timestep
            && substeps < self.config.max_substeps
        {
            self.accumulator -= self.config.fixed_timestep;
            substeps += 1;
            self.integration_parameters.dt = self.config.fixed_timestep;

            let Self {
                schedulers,
                pipeline,
                gravity,
                integration_parameters,
                islands,
                broad_phase,
                narrow_phase,
                bodies,
                colliders,
                impulse_joints,
                multibody_joints,
                ccd_solver,
                ..
            } = self;
            schedulers.install(|| {
                pipeline.step(
                    gravity,
                    integration_parameters,
                    islands,
                    broad_phase,
                    narrow_phase,
                    bodies,
                    colliders,
                    impulse_joints,
                    multibody_joints,
                    ccd_solver,
                    &(),
                    &(),
                );
            });
        }
        // A long hitch must not replay as a burst of catch-up steps later.
        if self.accumulator > self.config.fixed_timestep {
            self.accumulator = self.config.fixed_timestep;
        }

        if substeps > 0 {
            let fresh = self.collect_touching_pairs();
            let events = self.tracker.reconcile(fresh);
            self.dispatch(&events);
        }
        self.sync_proxies(dt);
    }

    // --- Queries ---

    /// Closest-hit ray query between two points. Independent of `step`.
    pub fn ray_test(&self, from: Vec3, to: Vec3) -> Option<RayHit> {
        let delta = to - from;
        let len = delta.length();
        if len <= EPSILON {
            return None;
        }
        let dir = delta / len;
        let ray = Ray::new(
            point![from.x, from.y, from.z],
            vector![dir.x, dir.y, dir.z],
        );
        let pipeline = self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            QueryFilter::default(),
        );
        let (collider, toi) = pipeline.cast_ray(&ray, len, true)?;
        Some(RayHit {
            object: self.resolve_collider(collider),
            point: from + dir * toi,
            distance: toi,
        })
    }

    /// Applies an outward impulse to every dynamic body within `radius` of
    /// `center`, with linear falloff `1 - distance/radius`.
    ///
    /// The impulse only lands when no static body occludes the straight path
    /// from the center to the body's center of mass, so explosions do not
    /// reach through walls. Bodies at the center itself are skipped to avoid
    /// a degenerate direction.
    pub fn explode(&mut self, center: Vec3, radius: f32, force: f32) {
        if radius <= 0.0 {
            return;
        }
        let mut targets = Vec::new();
        for (body_handle, body) in self.bodies.iter() {
            if !body.is_dynamic() {
                continue;
            }
            let com = body.center_of_mass();
            let delta = Vec3::new(com.x, com.y, com.z) - center;
            let distance = delta.length();
            if distance < 0.001 || distance > radius {
                continue;
            }
            targets.push((body_handle, delta / distance, distance));
        }

        for (body_handle, dir, distance) in targets {
            let ray = Ray::new(
                point![center.x, center.y, center.z],
                vector![dir.x, dir.y, dir.z],
            );
            let occluded = {
                let pipeline = self.broad_phase.as_query_pipeline(
                    self.narrow_phase.query_dispatcher(),
                    &self.bodies,
                    &self.colliders,
                    QueryFilter::only_fixed(),
                );
                pipeline.cast_ray(&ray, distance, true).is_some()
            };
            if occluded {
                continue;
            }
            let falloff = 1.0 - distance / radius;
            if let Some(body) = self.bodies.get_mut(body_handle) {
                body.apply_impulse(to_na(dir * (force * falloff)), true);
            }
        }
    }

    /// Removes and disposes every tracked body, then forgets all collision
    /// pairs. The world goes back to the uninitialized state.
    pub fn dispose(&mut self) {
        for (handle, object) in self.objects.drain() {
            self.tracker.purge(handle);
            self.bodies.remove(
                object.body,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            );
        }
        self.tracker.clear();
        self.initialized = false;
    }

    // --- Internals ---

    fn pump_variables(&mut self) {
        let Some(watch) = &self.variable_watch else {
            return;
        };
        let mut new_gravity = None;
        for change in watch.try_iter() {
            if change.name == "gravity" {
                if let Some(g) = change.value.as_float() {
                    new_gravity = Some(g);
                }
            }
        }
        if let Some(g) = new_gravity {
            self.gravity = vector![0.0, -g, 0.0];
            for (_, body) in self.bodies.iter_mut() {
                body.set_gravity_scale(1.0, true);
            }
            log::debug!("Gravity variable changed; world gravity is now (0, {}, 0).", -g);
        }
    }

    fn collect_touching_pairs(&self) -> HashSet<CollisionPair> {
        let threshold = self.config.contact_distance_threshold;
        let mut fresh = HashSet::new();
        for pair in self.narrow_phase.contact_pairs() {
            let touching = pair
                .manifolds
                .iter()
                .any(|m| m.points.iter().any(|p| p.dist <= threshold));
            if !touching {
                continue;
            }
            match (
                self.resolve_collider(pair.collider1),
                self.resolve_collider(pair.collider2),
            ) {
                (Some(a), Some(b)) if a != b => {
                    fresh.insert(CollisionPair::new(a, b));
                }
                _ => log::trace!("Skipping a manifold with no resolvable object identity."),
            }
        }
        fresh
    }

    fn resolve_collider(&self, collider: ColliderHandle) -> Option<PhysicsObjectHandle> {
        let parent = self.colliders.get(collider)?.parent()?;
        let body = self.bodies.get(parent)?;
        let handle = PhysicsObjectHandle::from_user_data(body.user_data)?;
        self.objects.contains(handle).then_some(handle)
    }

    fn dispatch(&mut self, events: &[ContactEvent]) {
        // Without a subscriber the unbounded channel would buffer every
        // stay event for the life of the world.
        if self.events.has_subscribers() {
            for event in events {
                self.events.publish(*event);
            }
        }
        for event in events {
            self.notify(event.pair.first(), event.phase, event.pair.second());
            self.notify(event.pair.second(), event.phase, event.pair.first());
        }
    }

    /// Invokes one per-object callback, isolated so a panicking listener
    /// cannot abort dispatch for other pairs.
    fn notify(&mut self, target: PhysicsObjectHandle, phase: ContactPhase, other: PhysicsObjectHandle) {
        let Some(mut handler) = self
            .objects
            .get_mut(target)
            .and_then(|object| object.handler.take())
        else {
            return;
        };
        let outcome = catch_unwind(AssertUnwindSafe(|| match phase {
            ContactPhase::Enter => handler.on_contact_enter(other),
            ContactPhase::Stay => handler.on_contact_stay(other),
            ContactPhase::Exit => handler.on_contact_exit(other),
        }));
        if outcome.is_err() {
            log::error!("Contact callback panicked for object {target:?}; continuing dispatch.");
        }
        if let Some(object) = self.objects.get_mut(target) {
            if object.handler.is_none() {
                object.handler = Some(handler);
            }
        }
    }

    fn sync_proxies(&mut self, dt: f32) {
        let bodies = &self.bodies;
        for (_, object) in self.objects.iter_mut() {
            let Some(proxy) = object.proxy.as_mut() else {
                continue;
            };
            let Some(body) = bodies.get(object.body) else {
                continue;
            };
            proxy.set_position(from_na(body.translation()));
            proxy.set_rotation(from_na_rot(body.rotation()));
            proxy.render(dt);
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(SchedulerPool::default())
    }
}

impl Drop for PhysicsWorld {
    fn drop(&mut self) {
        self.dispose();
    }
}

// --- Math conversions ---

#[inline]
fn to_na(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

#[inline]
fn from_na(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[inline]
fn to_na_rot(q: Quaternion) -> na::UnitQuaternion<Real> {
    na::UnitQuaternion::from_quaternion(na::Quaternion::new(q.w, q.x, q.y, q.z))
}

#[inline]
fn from_na_rot(q: &na::UnitQuaternion<Real>) -> Quaternion {
    Quaternion::new(q.i, q.j, q.k, q.w)
}
