use bevy::{input::mouse::AccumulatedMouseMotion, prelude::*};
use leafwing_input_manager::prelude::*;
use obby_shared::Key;

use crate::{
    config::Settings,
    cursor::PointerLock,
    session::{FrameSet, PlayerInput},
};

#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputAction {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    Jump,
    /// Acquire pointer lock.
    Grab,
    /// Give the pointer back.
    Release,
}

/// Movement actions and the session key each one drives.
const MOVEMENT: [(InputAction, Key); 5] = [
    (InputAction::Forward, Key::Forward),
    (InputAction::Back, Key::Back),
    (InputAction::StrafeLeft, Key::Left),
    (InputAction::StrafeRight, Key::Right),
    (InputAction::Jump, Key::Jump),
];

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<InputAction>::default());

    app.register_type::<InputAction>();

    let input_map = InputMap::<InputAction>::new([
        (InputAction::Forward, KeyCode::KeyW),
        (InputAction::Back, KeyCode::KeyS),
        (InputAction::StrafeLeft, KeyCode::KeyA),
        (InputAction::StrafeRight, KeyCode::KeyD),
        (InputAction::Jump, KeyCode::Space),
        (InputAction::Release, KeyCode::Escape),
    ])
    .with(InputAction::Grab, MouseButton::Left);
    app.insert_resource(input_map);
    app.insert_resource(ActionState::<InputAction>::default());

    app.add_systems(
        Update,
        (
            sample_keys,
            mouse_look.run_if(resource_equals(PointerLock::Locked)),
        )
            .in_set(FrameSet::Input),
    );
}

fn sample_keys(actions: Res<ActionState<InputAction>>, mut input: ResMut<PlayerInput>) {
    for (action, key) in MOVEMENT {
        input.set(key, actions.pressed(&action));
    }
}

/// Raw pixel deltas, +y down.
fn mouse_look(
    motion: Res<AccumulatedMouseMotion>,
    settings: Res<Settings>,
    mut input: ResMut<PlayerInput>,
) {
    let delta = motion.delta;
    if delta != Vec2::ZERO {
        input
            .look
            .apply_delta(delta.x, delta.y, settings.mouse_sensitivity);
    }
}
