//! Projectile tests.
//!
//! Collisions are not produced by a physics step here: `CollisionStart` messages
//! are injected directly and the resolver runs once.

use avian2d::prelude::*;
use bevy::prelude::*;

use super::{allocator, collision, commit, components, messages, pool, request};
use crate::common::layers::Layer;
use crate::common::movement::Facing;
use crate::common::test_utils::{collect_messages, init_messages, run_system_once};
use crate::common::tunables::Tunables;
use crate::plugins::enemies::{Boss, Enemy};
use crate::plugins::feedback::{ParticleBurst, SoundCue};
use crate::plugins::hud::AmmoLedger;
use crate::plugins::level::Level;
use crate::plugins::player::{Player, PlayerInput};

// --------------------------------------------------------------------------------------
// Helpers
// --------------------------------------------------------------------------------------

fn ledger_with(count: u32) -> AmmoLedger {
    let mut ledger = AmmoLedger::default();
    for _ in 0..count {
        ledger.add_one();
    }
    ledger
}

/// World with a pool of `capacity` inactive bullets and the fire pipeline's resources.
fn pooled_world(capacity: usize, ammo: u32) -> World {
    let mut world = World::new();
    world.insert_resource(pool::BulletPool::new(capacity));
    world.insert_resource(ledger_with(ammo));
    world.insert_resource(Tunables::default());
    init_messages::<messages::SpawnBulletRequest>(&mut world);
    init_messages::<SoundCue>(&mut world);
    init_messages::<ParticleBurst>(&mut world);
    init_messages::<CollisionStart>(&mut world);
    run_system_once(&mut world, pool::init_bullet_pool);
    world
}

fn active_bullets(world: &mut World) -> Vec<(Vec2, Vec2)> {
    world
        .query::<(&components::BulletState, &Transform, &LinearVelocity)>()
        .iter(world)
        .filter(|(state, _, _)| **state == components::BulletState::Active)
        .map(|(_, tf, vel)| (tf.translation.truncate(), vel.0))
        .collect()
}

fn write_collision_start(world: &mut World, collider1: Entity, collider2: Entity) {
    world.write_message(CollisionStart {
        collider1,
        collider2,
        body1: Some(collider1),
        body2: Some(collider2),
    });
}

fn spawn_active_bullet(world: &mut World) -> Entity {
    world
        .spawn((
            components::PooledBullet,
            components::BulletState::Active,
            pool::active_bullet_layers(),
        ))
        .id()
}

fn hostile_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Enemy, [Layer::World, Layer::PlayerBullet])
}

// --------------------------------------------------------------------------------------
// Pooling
// --------------------------------------------------------------------------------------

#[test]
fn init_bullet_pool_spawns_capacity_bullets_inactive() {
    let mut world = pooled_world(8, 0);

    assert_eq!(world.resource::<pool::BulletPool>().free_len(), 8);

    let mut q = world.query::<(
        &components::PooledBullet,
        &components::BulletState,
        &Visibility,
        &CollisionLayers,
        &CollisionEventsEnabled,
    )>();
    assert_eq!(q.iter(&world).count(), 8);

    for (_, state, vis, layers, _) in q.iter(&world) {
        assert_eq!(*state, components::BulletState::Inactive);
        assert_eq!(*vis, Visibility::Hidden);
        assert!(layers.memberships.has_all(Layer::PlayerBullet));
        assert!(!layers.filters.has_all(Layer::World));
        assert!(!layers.filters.has_all(Layer::Enemy));
    }
}

#[test]
fn return_to_pool_commit_deactivates_and_recycles() {
    let mut world = pooled_world(1, 0);
    let components::BulletEntity(e) = world.resource_mut::<pool::BulletPool>().pop_free().unwrap();
    *world.get_mut::<components::BulletState>(e).unwrap() = components::BulletState::PendingReturn;
    world.get_mut::<LinearVelocity>(e).unwrap().0 = Vec2::new(500.0, 0.0);
    *world.get_mut::<Visibility>(e).unwrap() = Visibility::Visible;
    *world.get_mut::<CollisionLayers>(e).unwrap() = pool::active_bullet_layers();

    run_system_once(&mut world, commit::return_to_pool_commit);

    assert_eq!(*world.get::<components::BulletState>(e).unwrap(), components::BulletState::Inactive);
    assert_eq!(*world.get::<Visibility>(e).unwrap(), Visibility::Hidden);
    assert_eq!(world.get::<LinearVelocity>(e).unwrap().0, Vec2::ZERO);
    assert_eq!(*world.get::<CollisionLayers>(e).unwrap(), pool::inactive_bullet_layers());
    assert_eq!(world.resource::<pool::BulletPool>().free_len(), 1);
}

// --------------------------------------------------------------------------------------
// Fire pipeline
// --------------------------------------------------------------------------------------

fn fire_world(capacity: usize, ammo: u32, facing: Facing) -> World {
    let mut world = pooled_world(capacity, ammo);
    world.insert_resource(PlayerInput { fire_pressed: true, ..default() });
    world.spawn((Player, Transform::from_xyz(100.0, 50.0, 5.0), facing));
    world
}

fn fire_once(world: &mut World) {
    run_system_once(world, request::request_player_bullets);
    run_system_once(world, allocator::allocate_bullets_from_pool);
}

#[test]
fn fire_with_ammo_launches_one_bullet_the_way_the_player_faces() {
    for (facing, vx) in [(Facing::Right, 500.0), (Facing::Left, -500.0)] {
        let mut world = fire_world(4, 2, facing);

        fire_once(&mut world);

        assert_eq!(active_bullets(&mut world), vec![(Vec2::new(100.0, 50.0), Vec2::new(vx, 0.0))]);
        assert_eq!(world.resource::<AmmoLedger>().count(), 1);
        assert_eq!(world.resource::<pool::BulletPool>().free_len(), 3);
        assert_eq!(collect_messages::<SoundCue>(&mut world), vec![SoundCue::Shot]);
    }
}

#[test]
fn fire_without_ammo_is_a_no_op() {
    let mut world = fire_world(4, 0, Facing::Right);

    fire_once(&mut world);

    assert!(active_bullets(&mut world).is_empty());
    assert_eq!(world.resource::<AmmoLedger>().count(), 0);
    assert!(collect_messages::<messages::SpawnBulletRequest>(&mut world).is_empty());
    assert!(collect_messages::<SoundCue>(&mut world).is_empty());
}

#[test]
fn no_fire_edge_no_request() {
    let mut world = fire_world(4, 3, Facing::Right);
    world.insert_resource(PlayerInput::default());

    fire_once(&mut world);

    assert!(active_bullets(&mut world).is_empty());
    assert_eq!(world.resource::<AmmoLedger>().count(), 3);
}

#[test]
fn exhausted_pool_refunds_the_round() {
    let mut world = fire_world(1, 3, Facing::Right);

    fire_once(&mut world);
    fire_once(&mut world);

    assert_eq!(active_bullets(&mut world).len(), 1);
    assert_eq!(world.resource::<AmmoLedger>().count(), 2);
    assert_eq!(collect_messages::<SoundCue>(&mut world), vec![SoundCue::Shot]);
}

#[test]
fn allocator_never_overdraws_the_ledger() {
    let mut world = pooled_world(4, 1);
    for _ in 0..3 {
        world.write_message(messages::SpawnBulletRequest { pos: Vec2::ZERO, vel: Vec2::X });
    }

    run_system_once(&mut world, allocator::allocate_bullets_from_pool);

    assert_eq!(active_bullets(&mut world).len(), 1);
    assert_eq!(world.resource::<AmmoLedger>().count(), 0);
}

// --------------------------------------------------------------------------------------
// Collisions
// --------------------------------------------------------------------------------------

#[test]
fn bullet_hitting_ground_returns() {
    let mut world = pooled_world(0, 0);
    let bullet = spawn_active_bullet(&mut world);
    let wall = world.spawn(CollisionLayers::new(Layer::World, [Layer::PlayerBullet])).id();

    write_collision_start(&mut world, wall, bullet);
    run_system_once(&mut world, collision::process_player_bullet_collisions);

    assert_eq!(
        *world.get::<components::BulletState>(bullet).unwrap(),
        components::BulletState::PendingReturn
    );
    assert!(collect_messages::<SoundCue>(&mut world).is_empty());
}

#[test]
fn bullet_kills_enemy() {
    let mut world = pooled_world(0, 0);
    let bullet = spawn_active_bullet(&mut world);
    let enemy = world.spawn((Enemy, hostile_layers())).id();

    write_collision_start(&mut world, bullet, enemy);
    run_system_once(&mut world, collision::process_player_bullet_collisions);

    assert!(world.get_entity(enemy).is_err());
    assert_eq!(
        *world.get::<components::BulletState>(bullet).unwrap(),
        components::BulletState::PendingReturn
    );
    assert_eq!(collect_messages::<SoundCue>(&mut world), vec![SoundCue::EnemyDeath]);
}

#[test]
fn two_bullets_one_enemy_scores_once() {
    let mut world = pooled_world(0, 0);
    let b1 = spawn_active_bullet(&mut world);
    let b2 = spawn_active_bullet(&mut world);
    let enemy = world.spawn((Enemy, hostile_layers())).id();

    write_collision_start(&mut world, b1, enemy);
    write_collision_start(&mut world, b2, enemy);
    run_system_once(&mut world, collision::process_player_bullet_collisions);

    assert_eq!(collect_messages::<SoundCue>(&mut world), vec![SoundCue::EnemyDeath]);
    assert_eq!(
        *world.get::<components::BulletState>(b2).unwrap(),
        components::BulletState::Active
    );
}

#[test]
fn inactive_bullets_are_ignored() {
    let mut world = pooled_world(0, 0);
    let bullet = spawn_active_bullet(&mut world);
    *world.get_mut::<components::BulletState>(bullet).unwrap() = components::BulletState::Inactive;
    let enemy = world.spawn((Enemy, hostile_layers())).id();

    write_collision_start(&mut world, bullet, enemy);
    run_system_once(&mut world, collision::process_player_bullet_collisions);

    assert!(world.get_entity(enemy).is_ok());
}

#[test]
fn boss_takes_ten_hits_and_dies_with_a_single_sound() {
    let mut world = pooled_world(0, 0);
    let boss = world
        .spawn((Boss { health: 10 }, Transform::from_xyz(7.0, 9.0, 0.0), hostile_layers()))
        .id();

    for hit in 1..=10u32 {
        let bullet = spawn_active_bullet(&mut world);
        write_collision_start(&mut world, bullet, boss);
        run_system_once(&mut world, collision::process_player_bullet_collisions);

        let sounds = collect_messages::<SoundCue>(&mut world);
        if hit < 10 {
            assert_eq!(world.get::<Boss>(boss).unwrap().health, 10 - hit);
            assert_eq!(sounds.last(), Some(&SoundCue::BossHit));
        } else {
            assert!(world.get_entity(boss).is_err());
            assert_eq!(sounds.last(), Some(&SoundCue::EnemyDeath));
        }
        world.resource_mut::<bevy::ecs::message::Messages<SoundCue>>().clear();
    }

    let bursts = collect_messages::<ParticleBurst>(&mut world);
    assert!(bursts.iter().all(|b| b.count == 5 && b.position == Vec2::new(7.0, 9.0)));
}

// --------------------------------------------------------------------------------------
// Bounds and recall
// --------------------------------------------------------------------------------------

#[test]
fn bullets_leaving_the_level_return() {
    let mut world = pooled_world(0, 0);
    let level = Level::builtin().unwrap();
    let outside = Vec2::new(level.width() + 10.0, 100.0);
    world.insert_resource(level);

    let out = spawn_active_bullet(&mut world);
    world.entity_mut(out).insert(Transform::from_translation(outside.extend(0.0)));
    let inside = spawn_active_bullet(&mut world);
    world.entity_mut(inside).insert(Transform::from_xyz(100.0, 100.0, 0.0));

    run_system_once(&mut world, commit::return_out_of_bounds);

    assert_eq!(
        *world.get::<components::BulletState>(out).unwrap(),
        components::BulletState::PendingReturn
    );
    assert_eq!(
        *world.get::<components::BulletState>(inside).unwrap(),
        components::BulletState::Active
    );
}

#[test]
fn recall_marks_every_live_bullet() {
    let mut world = pooled_world(3, 0);
    let components::BulletEntity(live) = world.resource_mut::<pool::BulletPool>().pop_free().unwrap();
    *world.get_mut::<components::BulletState>(live).unwrap() = components::BulletState::Active;

    run_system_once(&mut world, commit::recall_live_bullets);
    run_system_once(&mut world, commit::return_to_pool_commit);

    assert_eq!(world.resource::<pool::BulletPool>().free_len(), 3);
    assert!(active_bullets(&mut world).is_empty());
}
