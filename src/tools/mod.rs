//! # Toolbar Controls Module
//!
//! Toggleable toolbar controls for editing features on the map.
//!
//! ## Sub-modules
//! - `control`: activation state machine, properties and dialog lifecycle of a single control
//! - `dialog`: structured dialog descriptions and the map overlay mount
//! - `editor`: owner of the controls, keeps exclusive controls from overlapping
//! - `measure`, `pin`, `selection`, `snap`: the concrete toolbar controls
//! - `ui`: egui toolbar and dialog rendering
//!
//! Each control persists its properties through the settings store and seeds
//! them from it on startup.

mod control;
mod dialog;
mod editor;
mod measure;
mod pin;
mod selection;
mod snap;
mod ui;

pub use control::*;
pub use dialog::*;
pub use editor::*;
pub use measure::*;
pub use pin::*;
pub use selection::*;
pub use snap::*;
pub use ui::*;

use std::path::PathBuf;
use std::sync::Arc;

use bevy::prelude::*;

use crate::error::Result;
use crate::settings::{JsonSettingsStore, SETTINGS_FILENAME, SettingsProvider, SettingsStore};
use crate::types::VectorSource;

/// Features edited by the toolbar controls.
#[derive(Resource, Clone)]
pub struct EditSource(pub VectorSource);

impl Default for EditSource {
    fn default() -> Self {
        EditSource(VectorSource::empty())
    }
}

#[derive(Default)]
pub struct ToolsPlugin {
    /// Overrides the platform config location of the settings file.
    pub settings_file: Option<PathBuf>,
}

impl Plugin for ToolsPlugin {
    fn build(&self, app: &mut App) {
        let path = match &self.settings_file {
            Some(path) => path.clone(),
            None => JsonSettingsStore::default_path().unwrap_or_else(|e| {
                warn!("{}, keeping settings in the working directory", e);
                PathBuf::from(SETTINGS_FILENAME)
            }),
        };

        app.insert_resource(SettingsStore::new(JsonSettingsStore::load_or_empty(path)))
            .init_resource::<EditSource>()
            .init_resource::<MapOverlays>()
            .init_resource::<Editor>()
            .add_plugins(ToolbarUiPlugin)
            .add_systems(Startup, setup_toolbar);
    }
}

/// Builds every toolbar control from the stored settings.
pub fn build_controls(settings: &dyn SettingsProvider, source: &VectorSource) -> Result<Vec<Control>> {
    Ok(vec![
        selection_control(settings, source.clone())?,
        measure_control(settings, source.clone())?,
        pin_control(settings, source.clone())?,
        snap_control(settings, source.clone())?,
    ])
}

/// Writes property changes of the control back to the settings store.
pub fn persist_properties(control: &mut Control, settings: SettingsStore) {
    let class_name = control.class_name().to_string();
    control.on_properties_change(move |properties| {
        if let Err(e) = settings.persist(properties) {
            warn!("Failed to persist properties of {}: {}", class_name, e);
        }
    });
}

fn setup_toolbar(
    mut editor: ResMut<Editor>,
    overlays: Res<MapOverlays>,
    settings: Res<SettingsStore>,
    source: Res<EditSource>,
) {
    let controls = match build_controls(&*settings, &source.0) {
        Ok(controls) => controls,
        Err(e) => {
            error!("Failed to build toolbar: {}", e);
            return;
        }
    };

    for mut control in controls {
        persist_properties(&mut control, settings.clone());
        editor.add_control(control);
    }
    editor.set_map(Arc::new(overlays.clone()));
    info!(
        "Toolbar ready with {} controls editing {} features",
        editor.controls().len(),
        source.0.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemorySettings;
    use crate::types::{properties, PropertyValue};
    use tempfile::tempdir;

    #[test]
    fn test_property_edits_are_persisted() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(SETTINGS_FILENAME);
        let settings = SettingsStore::new(JsonSettingsStore::load_or_empty(&path));

        let mut editor = Editor::new();
        let mut controls = build_controls(&settings, &VectorSource::empty()).unwrap();
        let mut snap = controls.pop().unwrap();
        persist_properties(&mut snap, settings.clone());
        let id = editor.add_control(snap);

        editor
            .set_properties(
                id,
                properties([
                    ("showSnapLines", PropertyValue::from(false)),
                    ("showSnapPoints", PropertyValue::from(true)),
                    ("snapTolerance", PropertyValue::from(40)),
                ]),
            )
            .unwrap();

        let reloaded = JsonSettingsStore::load(&path).unwrap();
        let rebuilt = snap_control(&reloaded, VectorSource::empty()).unwrap();
        assert_eq!(rebuilt.get_properties()["showSnapLines"], PropertyValue::Bool(false));
        assert_eq!(rebuilt.get_properties()["snapTolerance"], PropertyValue::Number(40.0));
    }

    #[test]
    fn test_toolbar_exclusivity() {
        let overlays = MapOverlays::default();
        let mut editor = Editor::new();
        let controls = build_controls(&MemorySettings::default(), &VectorSource::empty()).unwrap();
        let ids = editor.add_controls(controls);
        editor.set_map(Arc::new(overlays.clone()));
        let (select, measure, pin, snap) = (ids[0], ids[1], ids[2], ids[3]);

        editor.toggle(snap).unwrap();
        editor.toggle(measure).unwrap();
        assert_eq!(overlays.len(), 2);

        editor.toggle(pin).unwrap();
        editor.toggle(select).unwrap();
        assert_eq!(editor.active_controls(), &[snap, select]);
        // Only the snap dialog is left, selection has none.
        assert_eq!(overlays.len(), 1);
        assert_eq!(overlays.snapshot()[0].owner, snap);
    }
}
