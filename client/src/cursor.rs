use bevy::{
    prelude::*,
    window::{CursorGrabMode, CursorOptions, PrimaryWindow, WindowFocused},
};
use leafwing_input_manager::prelude::*;

use crate::input::InputAction;

/// Whether mouse motion currently drives the view.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerLock {
    #[default]
    Free,
    Locked,
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<PointerLock>();

    app.add_systems(Update, (grab_on_click, release_on_escape, release_on_blur));

    // Apply when our desired lock changes
    app.add_systems(
        PostUpdate,
        apply_pointer_lock.run_if(resource_changed::<PointerLock>),
    );
}

fn grab_on_click(actions: Res<ActionState<InputAction>>, mut lock: ResMut<PointerLock>) {
    if actions.just_pressed(&InputAction::Grab) {
        lock.set_if_neq(PointerLock::Locked);
    }
}

fn release_on_escape(actions: Res<ActionState<InputAction>>, mut lock: ResMut<PointerLock>) {
    if actions.just_pressed(&InputAction::Release) {
        lock.set_if_neq(PointerLock::Free);
    }
}

fn release_on_blur(mut messages: MessageReader<WindowFocused>, mut lock: ResMut<PointerLock>) {
    for message in messages.read() {
        if !message.focused {
            lock.set_if_neq(PointerLock::Free);
        }
    }
}

fn apply_pointer_lock(
    lock: Res<PointerLock>,
    mut cursor: Single<&mut CursorOptions, With<PrimaryWindow>>,
) {
    let locked = *lock == PointerLock::Locked;

    cursor.grab_mode = if locked {
        // Locked is unsupported on some platforms; Confined is the closest fallback there.
        if cfg!(target_os = "macos") || cfg!(target_arch = "wasm32") {
            CursorGrabMode::Locked
        } else {
            CursorGrabMode::Confined
        }
    } else {
        CursorGrabMode::None
    };
    cursor.visible = !locked;

    debug!("Pointer lock: {:?}", *lock);
}
