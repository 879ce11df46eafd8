use bevy::prelude::*;
use bevy_pancam::{PanCam, PanCamPlugin};

use crate::EguiBlockInputState;

pub struct CameraSystemPlugin;

impl Plugin for CameraSystemPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PanCamPlugin)
            .add_systems(Startup, setup_camera)
            .add_systems(Update, handle_pancam);
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        PanCam {
            grab_buttons: vec![MouseButton::Middle],
            zoom_to_cursor: true,
            min_scale: 0.01,
            ..default()
        },
    ));
}

/// The map stops panning while the pointer is over the toolbar or a dialog.
fn handle_pancam(mut query: Query<&mut PanCam>, state: Res<EguiBlockInputState>) {
    if state.is_changed() {
        for mut pancam in &mut query {
            pancam.enabled = !state.block_input;
        }
    }
}
