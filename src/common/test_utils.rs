//! Test helpers.
//!
//! `World::run_system_once` (via the `RunSystemOnce` trait) executes a system without building
//! a schedule. Systems that use `Commands` only enqueue structural changes, so we flush after
//! running to apply them before assertions.

use std::time::Duration;

use avian2d::prelude::*;
use bevy::ecs::message::Messages;
use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// Insert (or replace) the generic `Time` resource so `time.elapsed_secs() == now`
/// and `time.delta_secs() == delta`.
pub fn set_clock(world: &mut World, now: f32, delta: f32) {
    let mut time = Time::<()>::default();
    time.advance_by(Duration::from_secs_f32((now - delta).max(0.0)));
    time.advance_by(Duration::from_secs_f32(delta));
    world.insert_resource(time);
}

/// Ensure a message queue exists, as `App::add_message` would.
pub fn ensure_messages<M: Message>(world: &mut World) {
    if world.get_resource::<Messages<M>>().is_none() {
        world.init_resource::<Messages<M>>();
    }
}

/// Inject a `CollisionStart` between two colliders, each attached to `body` (or standalone).
pub fn write_collision_start(
    world: &mut World,
    collider1: Entity,
    collider2: Entity,
    body1: Option<Entity>,
    body2: Option<Entity>,
) {
    ensure_messages::<CollisionStart>(world);
    world.write_message(CollisionStart {
        collider1,
        collider2,
        body1,
        body2,
    });
}

/// Read every pending message of type `M` with a fresh reader.
pub fn collect_messages<M: Message + Clone>(world: &mut World) -> Vec<M> {
    ensure_messages::<M>(world);
    run_system_once(world, |mut reader: MessageReader<M>| {
        reader.read().cloned().collect::<Vec<M>>()
    })
}

/// Drop every pending message of type `M`, so the next fresh reader only sees new ones.
pub fn clear_messages<M: Message>(world: &mut World) {
    ensure_messages::<M>(world);
    world.resource_mut::<Messages<M>>().clear();
}
