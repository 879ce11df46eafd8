use bevy::{prelude::*, winit::{UpdateMode, WinitSettings}};

use bevy_egui::EguiPlugin;
use camera::CameraSystemPlugin;
use tools::ToolsPlugin;

pub mod camera;
pub mod error;
pub mod settings;
pub mod tools;
pub mod types;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Map Editor".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .add_plugins(EguiPlugin {
            enable_multipass_for_primary_context: false,
        })
        .insert_resource(EguiBlockInputState::default())
        .add_plugins(CameraSystemPlugin)
        .insert_resource(WinitSettings {
            unfocused_mode: UpdateMode::Reactive {
                wait: std::time::Duration::from_secs(1),
                react_to_device_events: true,
                react_to_user_events: true,
                react_to_window_events: true,
            },
            ..Default::default()
        })
        .insert_resource(ClearColor(Color::from(Srgba {
            red: 0.9,
            green: 0.9,
            blue: 0.8,
            alpha: 1.0,
        })))
        .add_plugins(ToolsPlugin::default())
        .add_systems(Update, absorb_egui_inputs)
        .run();
}

/// Set while egui is using the pointer, so the map ignores it.
#[derive(Resource, Default)]
pub struct EguiBlockInputState {
    pub block_input: bool,
}

fn absorb_egui_inputs(
    mut contexts: bevy_egui::EguiContexts,
    mut state: ResMut<EguiBlockInputState>,
) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    let block_input = ctx.wants_pointer_input() || ctx.is_pointer_over_area();
    if state.block_input != block_input {
        state.block_input = block_input;
    }
}
