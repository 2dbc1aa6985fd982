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

//! Headless physics sandbox: a stack of boxes, a gravity tweak and an
//! explosion, stepped at a fixed 60 Hz.
//!
//! Launch flags pick the solver's scheduler backend: `-s` (sequential),
//! `-mpt` (multi-processing), `-tbb` (work stealing). Without flags the
//! default parallel backend is used.

use std::env;
use std::error::Error;

use ember_core::math::{Quaternion, Transform, Vec3};
use ember_core::render::RenderProxy;
use ember_core::variable::Variables;
use ember_physics::{ContactPhase, PhysicsConfig, PhysicsWorld, SchedulerPool};

const DT: f32 = 1.0 / 60.0;

/// Console stand-in for a renderer: remembers the latest transform and
/// prints it once a second.
struct ConsoleProxy {
    name: &'static str,
    position: Vec3,
    elapsed: f32,
}

impl ConsoleProxy {
    fn new(name: &'static str) -> Box<Self> {
        Box::new(Self {
            name,
            position: Vec3::ZERO,
            elapsed: 0.0,
        })
    }
}

impl RenderProxy for ConsoleProxy {
    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn set_rotation(&mut self, _rotation: Quaternion) {}

    fn render(&mut self, dt: f32) {
        self.elapsed += dt;
        if self.elapsed >= 1.0 {
            self.elapsed = 0.0;
            println!(
                "{:>8}: ({:6.2}, {:6.2}, {:6.2})",
                self.name, self.position.x, self.position.y, self.position.z
            );
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut variables = Variables::new();
    let mut world = PhysicsWorld::new(SchedulerPool::from_args(env::args().skip(1)));
    world.watch_variables(&mut variables);
    world.init(PhysicsConfig::default());
    log::info!("Scheduler backend: {}", world.active_scheduler().label());

    let ground = Transform::from_position_scale(Vec3::ZERO, Vec3::new(20.0, 0.5, 20.0));
    world.create_box(&ground, 0.0, None)?;

    // A small tower; each crate reports through its console proxy.
    let names = ["crate-a", "crate-b", "crate-c"];
    for (i, name) in names.iter().enumerate() {
        let transform = Transform::from_position_scale(
            Vec3::new(0.0, 2.0 + 1.5 * i as f32, 0.0),
            Vec3::splat(0.5),
        );
        world.create_box(&transform, 1.0, Some(ConsoleProxy::new(name)))?;
    }

    let events = world.contact_events();

    for frame in 0..600 {
        if frame == 200 {
            log::info!("Switching to the {} backend", world.cycle_scheduler().label());
        }
        if frame == 300 {
            println!("-- moon gravity --");
            variables.set_float("gravity", 1.62);
        }
        if frame == 450 {
            println!("-- explosion --");
            world.explode(Vec3::new(0.0, 0.5, 0.0), 15.0, 40.0);
        }
        world.step(DT);

        for event in events.try_iter() {
            if event.phase == ContactPhase::Enter {
                log::debug!("contact enter: {:?}", event.pair);
            }
        }
    }

    if let Some(hit) = world.ray_test(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -10.0, 0.0)) {
        println!(
            "ray down from y=10 hit at y={:.2} (distance {:.2})",
            hit.point.y, hit.distance
        );
    }

    world.dispose();
    Ok(())
}
