use bevy::prelude::*;

use super::*;
use crate::common::test_utils::run_system_once;

#[test]
fn any_key_restarts() {
    let mut world = World::new();
    world.init_resource::<NextState<GameState>>();
    let mut keys = ButtonInput::<KeyCode>::default();
    keys.press(KeyCode::KeyQ);
    world.insert_resource(keys);

    run_system_once(&mut world, restart_on_any_key);

    assert!(matches!(
        *world.resource::<NextState<GameState>>(),
        NextState::Pending(GameState::InGame)
    ));
}

#[test]
fn no_key_stays_on_the_victory_screen() {
    let mut world = World::new();
    world.init_resource::<NextState<GameState>>();
    world.insert_resource(ButtonInput::<KeyCode>::default());

    run_system_once(&mut world, restart_on_any_key);

    assert!(matches!(*world.resource::<NextState<GameState>>(), NextState::Unchanged));
}

#[test]
fn mouse_click_restarts() {
    let mut world = World::new();
    world.init_resource::<NextState<GameState>>();
    let mut mouse = ButtonInput::<MouseButton>::default();
    mouse.press(MouseButton::Left);
    world.insert_resource(mouse);

    run_system_once(&mut world, restart_on_any_key);

    assert!(matches!(
        *world.resource::<NextState<GameState>>(),
        NextState::Pending(GameState::InGame)
    ));
}

#[test]
fn victory_screen_shows_title_and_prompt() {
    let mut world = World::new();
    crate::common::test_utils::init_messages::<MusicCue>(&mut world);

    run_system_once(&mut world, enter_victory);

    let mut texts: Vec<String> = world
        .query::<&Text2d>()
        .iter(&world)
        .map(|t| t.0.clone())
        .collect();
    texts.sort();
    assert_eq!(texts, vec![PROMPT.to_string(), TITLE.to_string()]);
    assert_eq!(world.query::<&RestartPrompt>().iter(&world).count(), 1);
}
