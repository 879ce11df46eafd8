use bevy::prelude::*;
use bevy_egui::{
    EguiContexts, EguiPreUpdateSet,
    egui::{self, Align2, Color32, RichText},
};

use crate::types::{Properties, PropertyValue};

use super::{
    Control, ControlId, DialogItem, Editor, MapOverlays, SELECTION_CLASS, next_selection_properties,
    selection_type,
};

const BUTTON_WIDTH: f32 = 64.0;
const TOOLBAR_HEIGHT: f32 = 40.0;
const DIALOG_WIDTH: f32 = 220.0;
const DIALOG_SPACING: f32 = 170.0;

pub struct ToolbarUiPlugin;

impl Plugin for ToolbarUiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (toolbar_ui, dialog_ui).after(EguiPreUpdateSet::InitContexts),
        );
    }
}

fn panel_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(egui::Color32::from_rgba_premultiplied(30, 30, 30, 220))
        .corner_radius(10.0)
        .inner_margin(8.0)
        .shadow(egui::epaint::Shadow {
            color: egui::Color32::from_black_alpha(60),
            offset: [5, 5],
            blur: 10,
            spread: 5,
        })
}

fn toolbar_ui(
    mut editor: ResMut<Editor>,
    mut contexts: EguiContexts,
    mut loaders_installed: Local<bool>,
) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    if !*loaders_installed {
        egui_extras::install_image_loaders(ctx);
        *loaders_installed = true;
    }

    let toolbar_width = (BUTTON_WIDTH + 8.0) * editor.controls().len() as f32;
    let screen_rect = ctx.screen_rect();
    let toolbar_pos = egui::pos2(
        (screen_rect.width() - toolbar_width) / 2.0,
        screen_rect.height() - TOOLBAR_HEIGHT - 10.0,
    );

    let mut clicked = None;
    let mut cycled = None;
    egui::Area::new("toolbar".into())
        .fixed_pos(toolbar_pos)
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.set_height(TOOLBAR_HEIGHT);
                ui.horizontal_centered(|ui| {
                    ui.spacing_mut().item_spacing = egui::vec2(8.0, 0.0);
                    for control in editor.controls() {
                        let fill = if control.get_active() {
                            Color32::from_rgb(70, 130, 180)
                        } else {
                            Color32::from_rgb(40, 40, 40)
                        };
                        let text = RichText::new(control.title()).color(Color32::WHITE);
                        let element = control.element();
                        let button = if element.image.is_empty() {
                            egui::Button::new(text)
                        } else {
                            let icon = egui::Image::new(format!("file://{}", element.image))
                                .fit_to_exact_size(egui::vec2(14.0, 14.0));
                            egui::Button::image_and_text(icon, text)
                        };
                        let button = button.fill(fill).corner_radius(8.0);

                        let response = ui
                            .add_sized([BUTTON_WIDTH, 30.0], button)
                            .on_hover_text(hover_text(control));
                        if response.clicked() {
                            clicked = Some(control.id());
                        }
                        // Right click cycles the selection shape.
                        if response.secondary_clicked() && control.class_name() == SELECTION_CLASS {
                            cycled = Some((control.id(), next_selection_properties(control)));
                        }
                    }
                });
            });
        });

    if let Some(id) = clicked {
        if let Err(e) = editor.toggle(id) {
            error!("Failed to toggle control: {}", e);
        }
    }
    if let Some((id, properties)) = cycled {
        if let Err(e) = editor.set_properties(id, properties) {
            error!("Failed to change selection shape: {}", e);
        }
    }
}

fn hover_text(control: &Control) -> String {
    let mut text = format!(
        "{}\n{} features",
        control.element().class_name(),
        control.source().len()
    );
    if control.class_name() == SELECTION_CLASS {
        text.push_str(&format!(
            "\nShape: {} (right click to change)",
            selection_type(control).as_str()
        ));
    }
    text
}

fn dialog_ui(mut editor: ResMut<Editor>, overlays: Res<MapOverlays>, mut contexts: EguiContexts) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };

    let mut edits: Vec<(ControlId, Properties)> = Vec::new();
    for (index, overlay) in overlays.snapshot().iter().enumerate() {
        let Some(control) = editor.control(overlay.owner) else {
            continue;
        };
        let mut properties = control.get_properties().clone();
        let mut changed = false;

        egui::Area::new(egui::Id::new(overlay.id))
            .anchor(Align2::RIGHT_TOP, [-10.0, 10.0 + index as f32 * DIALOG_SPACING])
            .show(ctx, |ui| {
                panel_frame().show(ui, |ui| {
                    ui.set_width(DIALOG_WIDTH);
                    ui.vertical(|ui| {
                        ui.label(RichText::new(&overlay.title).heading().color(Color32::WHITE));
                        for item in &overlay.template.items {
                            changed |= dialog_item(ui, item, &mut properties);
                        }
                    });
                });
            });

        if changed {
            edits.push((overlay.owner, properties));
        }
    }

    for (id, properties) in edits {
        if let Err(e) = editor.set_properties(id, properties) {
            error!("Failed to update control properties: {}", e);
        }
    }
}

/// Draws one dialog row, returning whether the bound property was edited.
fn dialog_item(ui: &mut egui::Ui, item: &DialogItem, properties: &mut Properties) -> bool {
    let text_color = Color32::from_rgb(221, 221, 221);
    match item {
        DialogItem::Heading(text) => {
            ui.label(RichText::new(text).strong().color(Color32::WHITE));
            false
        }
        DialogItem::Text(text) => {
            ui.label(RichText::new(text).color(text_color));
            false
        }
        DialogItem::Checkbox { key, label } => {
            let Some(PropertyValue::Bool(value)) = properties.get_mut(key) else {
                return false;
            };
            ui.checkbox(value, RichText::new(label).color(text_color)).changed()
        }
        DialogItem::Slider { key, label, min, max } => {
            let Some(PropertyValue::Number(value)) = properties.get_mut(key) else {
                return false;
            };
            // Unreadable stored numbers show up at the bottom of the range.
            let mut current = if value.is_finite() { *value as i64 } else { *min };
            let changed = ui
                .add(egui::Slider::new(&mut current, *min..=*max).text(RichText::new(label).color(text_color)))
                .changed();
            if changed {
                *value = current as f64;
            }
            changed
        }
        DialogItem::TextField { key, label } => {
            let Some(PropertyValue::Text(value)) = properties.get_mut(key) else {
                return false;
            };
            ui.horizontal(|ui| {
                ui.label(RichText::new(label).color(text_color));
                ui.text_edit_singleline(value).changed()
            })
            .inner
        }
    }
}
