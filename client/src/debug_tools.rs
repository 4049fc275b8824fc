//! Debug/performance tooling for native dev builds.
//!
//! This plugin is compiled/used only when the caller gates it behind `dev_native`
//! (`#[cfg(feature = "dev_native")] mod debug_tools;` in `main.rs`).

use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin, SystemInformationDiagnosticsPlugin,
};
use bevy::prelude::*;
use bevy::render::diagnostic::RenderDiagnosticsPlugin;
use iyes_perf_ui::prelude::*;

use crate::session::{FrameSet, Session, to_vec3};

const REACHED: Color = Color::srgb(0.2, 0.9, 0.3);
const PENDING: Color = Color::srgb(1.0, 0.85, 0.1);
const HAZARD: Color = Color::srgb(1.0, 0.1, 0.1);

/// Add debug/perf tooling (intended for `dev_native` builds only).
pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        FrameTimeDiagnosticsPlugin::default(),
        EntityCountDiagnosticsPlugin::default(),
        SystemInformationDiagnosticsPlugin::default(),
        RenderDiagnosticsPlugin,
        PerfUiPlugin,
    ));

    app.add_systems(Startup, spawn_perf_ui);
    app.add_systems(Update, draw_trigger_volumes.after(FrameSet::Sync));
}

fn spawn_perf_ui(mut commands: Commands) {
    commands.spawn(PerfUiAllEntries::default());
}

/// Checkpoint and hazard reach spheres, plus the player's contact state.
fn draw_trigger_volumes(mut gizmos: Gizmos, session: Option<Res<Session>>) {
    let Some(session) = session else {
        return;
    };
    let config = session.config();
    let reached = session.current_checkpoint();

    for (i, checkpoint) in session.checkpoints().checkpoints().iter().enumerate() {
        let color = if i < reached { REACHED } else { PENDING };
        gizmos.sphere(
            Isometry3d::from_translation(to_vec3(checkpoint)),
            config.checkpoint_radius,
            color,
        );
    }

    for (_, hazard) in session.level().hazards() {
        gizmos.sphere(
            Isometry3d::from_translation(to_vec3(&hazard.center)),
            config.hazard_radius,
            HAZARD,
        );
    }

    let player = to_vec3(&session.player_pose().translation);
    let color = if session.is_grounded() { REACHED } else { PENDING };
    gizmos.arrow(player, player + Vec3::NEG_Y * 3.0, color);
}
