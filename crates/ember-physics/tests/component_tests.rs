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

use approx::assert_relative_eq;
use ember_core::asset::MeshData;
use ember_core::math::{Quaternion, Transform, Vec3};
use ember_physics::component::{
    start_physics, BodyOwner, BodyState, ColliderComponent, PhysicsBinding, RigidBodyComponent,
};
use ember_physics::{PhysicsConfig, PhysicsError, PhysicsWorld, SchedulerKind, SchedulerPool};

const DT: f32 = 1.0 / 60.0;

fn test_world() -> PhysicsWorld {
    let mut world = PhysicsWorld::new(SchedulerPool::from_kinds(vec![SchedulerKind::Sequential]));
    world.init(PhysicsConfig::default());
    world
}

fn zero_gravity_world() -> PhysicsWorld {
    let mut world = PhysicsWorld::new(SchedulerPool::from_kinds(vec![SchedulerKind::Sequential]));
    world.init(PhysicsConfig {
        gravity: Vec3::ZERO,
        ..PhysicsConfig::default()
    });
    world
}

fn floor_mesh() -> MeshData {
    MeshData {
        positions: vec![
            -1.0, 0.0, -1.0, //
            1.0, 0.0, -1.0, //
            1.0, 0.0, 1.0, //
            -1.0, 0.0, 1.0,
        ],
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

#[test]
fn collider_with_rigid_body_is_owned_by_the_collider() {
    let mut world = test_world();
    let mut binding = PhysicsBinding::new();
    let transform = Transform::from_position_scale(Vec3::new(0.0, 3.0, 0.0), Vec3::splat(0.5));
    let collider = ColliderComponent::new_sphere();
    let rigid_body = RigidBodyComponent::new(1.5);

    start_physics(
        &mut world,
        &mut binding,
        &transform,
        Some(&collider),
        Some(&rigid_body),
    )
    .unwrap();

    match binding.state() {
        BodyState::Initialized { object, owner } => {
            assert_eq!(owner, BodyOwner::Collider);
            assert_relative_eq!(world.object_mass(object).unwrap(), 1.5, epsilon = 1e-4);
        }
        other => panic!("binding should be initialized, got {other:?}"),
    }
    assert_eq!(world.body_count(), 1);
}

#[test]
fn rigid_body_alone_gets_a_default_box() {
    let mut world = test_world();
    let mut binding = PhysicsBinding::new();
    let transform = Transform::from_position(Vec3::new(0.0, 5.0, 0.0));
    let rigid_body = RigidBodyComponent::new(1.0);

    start_physics(&mut world, &mut binding, &transform, None, Some(&rigid_body)).unwrap();

    match binding.state() {
        BodyState::Initialized { owner, .. } => assert_eq!(owner, BodyOwner::RigidBody),
        other => panic!("binding should be initialized, got {other:?}"),
    }

    // The implicit unit box falls like any dynamic body.
    let mut transform = transform;
    for _ in 0..30 {
        world.step(DT);
        rigid_body.update(&world, &binding, &mut transform);
    }
    assert!(
        transform.position.y < 5.0,
        "default-box body should fall, y = {}",
        transform.position.y
    );
}

#[test]
fn collider_alone_is_static() {
    let mut world = zero_gravity_world();
    let mut binding = PhysicsBinding::new();
    let transform = Transform::from_position_scale(Vec3::ZERO, Vec3::splat(0.5));
    let collider = ColliderComponent::new_box();

    start_physics(&mut world, &mut binding, &transform, Some(&collider), None).unwrap();

    let object = binding.object().unwrap();
    world.apply_impulse(object, Vec3::new(5.0, 0.0, 0.0)).unwrap();
    world.step(DT);
    assert_eq!(
        world.linear_velocity(object).unwrap(),
        Vec3::ZERO,
        "a collider without a rigid body is static"
    );
}

#[test]
fn second_start_is_ignored() {
    let mut world = test_world();
    let mut binding = PhysicsBinding::new();
    let transform = Transform::from_position_scale(Vec3::ZERO, Vec3::splat(0.5));
    let collider = ColliderComponent::new_box();

    start_physics(&mut world, &mut binding, &transform, Some(&collider), None).unwrap();
    start_physics(&mut world, &mut binding, &transform, Some(&collider), None).unwrap();
    assert_eq!(world.body_count(), 1, "one body per binding");
}

#[test]
fn set_mass_before_start_is_stored() {
    let mut world = zero_gravity_world();
    let mut binding = PhysicsBinding::new();
    let transform = Transform::from_position_scale(Vec3::ZERO, Vec3::splat(0.5));
    let collider = ColliderComponent::new_box();
    let mut rigid_body = RigidBodyComponent::default();

    rigid_body.set_mass(&mut world, &binding, 4.0).unwrap();
    assert_eq!(rigid_body.mass(), 4.0);

    start_physics(
        &mut world,
        &mut binding,
        &transform,
        Some(&collider),
        Some(&rigid_body),
    )
    .unwrap();
    let object = binding.object().unwrap();
    assert_relative_eq!(world.object_mass(object).unwrap(), 4.0, epsilon = 1e-4);
}

#[test]
fn set_mass_reclassifies_a_live_body() {
    let mut world = zero_gravity_world();
    let mut binding = PhysicsBinding::new();
    let transform = Transform::from_position_scale(Vec3::ZERO, Vec3::splat(0.5));
    let collider = ColliderComponent::new_box();
    let mut rigid_body = RigidBodyComponent::new(2.0);

    start_physics(
        &mut world,
        &mut binding,
        &transform,
        Some(&collider),
        Some(&rigid_body),
    )
    .unwrap();
    let object = binding.object().unwrap();

    world.apply_impulse(object, Vec3::new(2.0, 0.0, 0.0)).unwrap();
    assert_relative_eq!(
        world.linear_velocity(object).unwrap().x,
        1.0,
        epsilon = 1e-4
    );

    // Dropping to mass 0 makes the body static and clears its motion.
    rigid_body.set_mass(&mut world, &binding, 0.0).unwrap();
    assert_eq!(world.linear_velocity(object).unwrap(), Vec3::ZERO);
    world.apply_impulse(object, Vec3::new(2.0, 0.0, 0.0)).unwrap();
    assert_eq!(world.linear_velocity(object).unwrap(), Vec3::ZERO);
}

#[test]
fn update_skips_static_bodies() {
    let mut world = test_world();
    let mut binding = PhysicsBinding::new();
    let mut transform = Transform::from_position_scale(Vec3::new(0.0, 2.0, 0.0), Vec3::splat(0.5));
    let collider = ColliderComponent::new_box();
    let rigid_body = RigidBodyComponent::new(0.0);

    start_physics(
        &mut world,
        &mut binding,
        &transform,
        Some(&collider),
        Some(&rigid_body),
    )
    .unwrap();

    for _ in 0..30 {
        world.step(DT);
        rigid_body.update(&world, &binding, &mut transform);
    }
    assert_eq!(
        transform.position.y, 2.0,
        "a static body's transform must stay designer-owned"
    );
}

#[test]
fn teleport_moves_the_live_body() {
    let mut world = zero_gravity_world();
    let mut binding = PhysicsBinding::new();
    let mut transform = Transform::from_position_scale(Vec3::ZERO, Vec3::splat(0.5));
    let collider = ColliderComponent::new_box();
    let rigid_body = RigidBodyComponent::new(1.0);

    start_physics(
        &mut world,
        &mut binding,
        &transform,
        Some(&collider),
        Some(&rigid_body),
    )
    .unwrap();

    let target = Vec3::new(7.0, 1.0, -3.0);
    rigid_body
        .teleport(
            &mut world,
            &binding,
            &mut transform,
            target,
            Quaternion::IDENTITY,
        )
        .unwrap();
    assert_eq!(transform.position, target);

    let (position, _) = world.object_transform(binding.object().unwrap()).unwrap();
    assert_relative_eq!(position.x, 7.0, epsilon = 1e-4);
    assert_relative_eq!(position.z, -3.0, epsilon = 1e-4);
}

#[test]
fn refresh_shape_swaps_extents_and_keeps_the_pose() {
    let mut world = zero_gravity_world();
    let mut binding = PhysicsBinding::new();
    let mut transform = Transform::from_position_scale(Vec3::new(3.0, 4.0, 5.0), Vec3::new(0.5, 1.0, 0.5));
    let collider = ColliderComponent::new_capsule();
    let rigid_body = RigidBodyComponent::new(1.0);

    start_physics(
        &mut world,
        &mut binding,
        &transform,
        Some(&collider),
        Some(&rigid_body),
    )
    .unwrap();
    let object = binding.object().unwrap();
    world.set_object_gravity_scale(object, 0.25).unwrap();

    // Crouch: halve the capsule height and rebuild the shape.
    transform.scale.y = 0.5;
    collider.refresh_shape(&mut world, &binding, &transform).unwrap();

    let (position, _) = world.object_transform(object).unwrap();
    assert_relative_eq!(position.x, 3.0, epsilon = 1e-4);
    assert_relative_eq!(position.y, 4.0, epsilon = 1e-4);
    assert_relative_eq!(position.z, 5.0, epsilon = 1e-4);
    assert_eq!(
        world.object_gravity_scale(object),
        Some(0.25),
        "shape swap must keep the per-body gravity override"
    );
}

#[test]
fn refresh_shape_before_start_is_a_noop() {
    let mut world = test_world();
    let binding = PhysicsBinding::new();
    let transform = Transform::IDENTITY;
    let collider = ColliderComponent::new_box();
    collider
        .refresh_shape(&mut world, &binding, &transform)
        .unwrap();
    assert_eq!(world.body_count(), 0);
}

#[test]
fn static_mesh_collider_starts() {
    let mut world = test_world();
    let mut binding = PhysicsBinding::new();
    let transform = Transform::from_position_scale(Vec3::ZERO, Vec3::splat(5.0));
    let collider = ColliderComponent::new_mesh(floor_mesh());

    start_physics(&mut world, &mut binding, &transform, Some(&collider), None).unwrap();
    assert_eq!(world.body_count(), 1);
}

#[test]
fn dynamic_mesh_collider_is_rejected() {
    let mut world = test_world();
    let mut binding = PhysicsBinding::new();
    let transform = Transform::from_position_scale(Vec3::ZERO, Vec3::splat(5.0));
    let collider = ColliderComponent::new_mesh(floor_mesh());
    let rigid_body = RigidBodyComponent::new(1.0);

    let err = start_physics(
        &mut world,
        &mut binding,
        &transform,
        Some(&collider),
        Some(&rigid_body),
    )
    .unwrap_err();
    assert!(matches!(err, PhysicsError::InvalidMesh { .. }));
    assert_eq!(binding.state(), BodyState::Uninitialized);
    assert_eq!(world.body_count(), 0, "rejection must not leak a body");
}

#[test]
fn destroy_removes_the_body_and_is_terminal() {
    let mut world = test_world();
    let mut binding = PhysicsBinding::new();
    let transform = Transform::from_position_scale(Vec3::ZERO, Vec3::splat(0.5));
    let collider = ColliderComponent::new_box();

    start_physics(&mut world, &mut binding, &transform, Some(&collider), None).unwrap();
    assert_eq!(world.body_count(), 1);

    binding.destroy(&mut world).unwrap();
    assert_eq!(world.body_count(), 0);
    assert_eq!(binding.state(), BodyState::Destroyed);

    let err = binding.destroy(&mut world).unwrap_err();
    assert!(matches!(
        err,
        PhysicsError::UseAfterDestroy {
            operation: "destroy"
        }
    ));

    let mut rigid_body = RigidBodyComponent::new(1.0);
    let err = rigid_body.set_mass(&mut world, &binding, 2.0).unwrap_err();
    assert!(matches!(err, PhysicsError::UseAfterDestroy { .. }));
}
