mod common;

use avian2d::prelude::*;
use bevy::prelude::*;

use platformer_game::common::movement::Facing;
use platformer_game::plugins::enemies::{Boss, Enemy};
use platformer_game::plugins::hud::AmmoLedger;
use platformer_game::plugins::level::{Marker, MarkerKind};
use platformer_game::plugins::player::{Player, PlayerInput};
use platformer_game::plugins::projectiles::components::{BulletState, PooledBullet};
use platformer_game::plugins::projectiles::pool::BulletPool;

/// Player at the left end facing right, a boss pacing between two bouncers ahead.
fn arena() -> App {
    let mut markers = common::core_markers(90.0, 1200.0, 1300.0);
    markers.push(Marker::new(MarkerKind::BossSpawn, 500.0, common::FLOOR_Y));
    markers.push(Marker::new(MarkerKind::EnemyBouncer, 400.0, common::FLOOR_Y));
    markers.push(Marker::new(MarkerKind::EnemyBouncer, 600.0, common::FLOOR_Y));

    let mut app = common::app_with_level(common::flat_level(40, None, markers));
    common::start(&mut app);

    let player = common::player(&mut app);
    *app.world_mut().get_mut::<Facing>(player).unwrap() = Facing::Right;
    app
}

fn give_ammo(app: &mut App, n: u32) {
    let mut ledger = app.world_mut().resource_mut::<AmmoLedger>();
    for _ in 0..n {
        ledger.add_one();
    }
}

fn fire(app: &mut App, shots: usize) {
    for _ in 0..shots {
        common::set_input(
            app,
            PlayerInput {
                fire_pressed: true,
                ..default()
            },
        );
        common::tick(app, 1);
    }
    common::set_input(app, PlayerInput::default());
}

fn live_bullets(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<&BulletState, With<PooledBullet>>()
        .iter(app.world())
        .filter(|s| s.is_live())
        .count()
}

#[test]
fn ten_shots_bring_the_boss_down_and_the_pool_refills() {
    let mut app = arena();
    give_ammo(&mut app, 10);

    fire(&mut app, 10);
    assert_eq!(app.world().resource::<AmmoLedger>().count(), 0);
    assert!(live_bullets(&mut app) > 0);

    common::tick(&mut app, 250);

    assert_eq!(common::count::<Boss>(&mut app), 0);
    assert_eq!(common::count::<Player>(&mut app), 1);
    assert_eq!(live_bullets(&mut app), 0);

    let pool = app.world().resource::<BulletPool>();
    assert_eq!(pool.free_len(), pool.capacity());
}

#[test]
fn boss_survives_one_shot_short() {
    let mut app = arena();
    give_ammo(&mut app, 9);

    fire(&mut app, 9);
    common::tick(&mut app, 120);

    let boss = app
        .world_mut()
        .query::<&Boss>()
        .single(app.world())
        .expect("boss still standing");
    assert_eq!(boss.health, 1);
}

#[test]
fn fire_without_ammo_does_nothing() {
    let mut app = arena();

    fire(&mut app, 3);
    assert_eq!(live_bullets(&mut app), 0);
    let pool = app.world().resource::<BulletPool>();
    assert_eq!(pool.free_len(), pool.capacity());
}

#[test]
fn injected_hit_kills_an_enemy_and_returns_the_bullet() {
    let mut markers = common::core_markers(90.0, 1000.0, 1050.0);
    markers.push(Marker::new(MarkerKind::EnemySpawn, 700.0, common::FLOOR_Y));
    let mut app = common::app_with_level(common::flat_level(32, None, markers));
    common::start(&mut app);

    let enemy = app
        .world_mut()
        .query_filtered::<Entity, With<Enemy>>()
        .single(app.world())
        .unwrap();
    // Mark one pooled bullet live without going through the allocator.
    let bullet = app
        .world_mut()
        .resource_mut::<BulletPool>()
        .pop_free()
        .unwrap()
        .0;
    *app.world_mut().get_mut::<BulletState>(bullet).unwrap() = BulletState::Active;

    app.world_mut().write_message(CollisionStart {
        collider1: bullet,
        collider2: enemy,
        body1: Some(bullet),
        body2: Some(enemy),
    });
    common::tick(&mut app, 1);

    assert!(app.world().get_entity(enemy).is_err());
    assert_eq!(
        *app.world().get::<BulletState>(bullet).unwrap(),
        BulletState::Inactive
    );
}
