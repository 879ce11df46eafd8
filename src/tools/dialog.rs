use std::sync::{Arc, Mutex};

use bevy::log::warn;
use bevy::prelude::Resource;
use uuid::Uuid;

use super::ControlId;

/// One row of a control dialog. Inputs are bound to a property key of the owning control.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogItem {
    Heading(String),
    Text(String),
    Checkbox { key: String, label: String },
    Slider { key: String, label: String, min: i64, max: i64 },
    TextField { key: String, label: String },
}

impl DialogItem {
    pub fn checkbox(key: &str, label: &str) -> Self {
        DialogItem::Checkbox {
            key: key.to_string(),
            label: label.to_string(),
        }
    }

    pub fn slider(key: &str, label: &str, min: i64, max: i64) -> Self {
        DialogItem::Slider {
            key: key.to_string(),
            label: label.to_string(),
            min,
            max,
        }
    }

    pub fn text_field(key: &str, label: &str) -> Self {
        DialogItem::TextField {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

/// Dialog contents a control supplies.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DialogTemplate {
    pub items: Vec<DialogItem>,
}

impl DialogTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heading(mut self, text: &str) -> Self {
        self.items.push(DialogItem::Heading(text.to_string()));
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.items.push(DialogItem::Text(text.to_string()));
        self
    }

    pub fn item(mut self, item: DialogItem) -> Self {
        self.items.push(item);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(Uuid);

/// The container mounted on the map for an open dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogOverlay {
    pub id: OverlayId,
    pub owner: ControlId,
    pub title: String,
    pub template: DialogTemplate,
}

impl DialogOverlay {
    pub fn new(owner: ControlId, title: &str, template: DialogTemplate) -> Self {
        Self {
            id: OverlayId(Uuid::new_v4()),
            owner,
            title: title.to_string(),
            template,
        }
    }
}

/// The map's target element that dialogs are mounted into.
pub trait MapSurface: Send + Sync {
    fn append_overlay(&self, overlay: DialogOverlay) -> OverlayId;
    fn remove_overlay(&self, id: OverlayId) -> Option<DialogOverlay>;
}

/// Proof that a dialog is mounted. Detaches from the surface it was mounted on.
pub struct DialogHandle {
    overlay: OverlayId,
    surface: Arc<dyn MapSurface>,
}

impl DialogHandle {
    pub fn open(surface: Arc<dyn MapSurface>, overlay: DialogOverlay) -> Self {
        let overlay = surface.append_overlay(overlay);
        Self { overlay, surface }
    }

    pub fn close(self) {
        if self.surface.remove_overlay(self.overlay).is_none() {
            warn!("Dialog overlay was already removed from the map");
        }
    }
}

impl std::fmt::Debug for DialogHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogHandle").field("overlay", &self.overlay).finish()
    }
}

/// Overlays currently mounted on the map, drawn by the egui layer each frame.
#[derive(Resource, Clone, Default)]
pub struct MapOverlays {
    pub inner: Arc<Mutex<Vec<DialogOverlay>>>,
}

impl MapOverlays {
    pub fn snapshot(&self) -> Vec<DialogOverlay> {
        self.inner.lock().map(|o| o.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MapSurface for MapOverlays {
    fn append_overlay(&self, overlay: DialogOverlay) -> OverlayId {
        let id = overlay.id;
        let mut overlays = match self.inner.lock() {
            Ok(overlays) => overlays,
            Err(poisoned) => poisoned.into_inner(),
        };
        overlays.push(overlay);
        id
    }

    fn remove_overlay(&self, id: OverlayId) -> Option<DialogOverlay> {
        let mut overlays = match self.inner.lock() {
            Ok(overlays) => overlays,
            Err(poisoned) => poisoned.into_inner(),
        };
        let index = overlays.iter().position(|o| o.id == id)?;
        Some(overlays.remove(index))
    }
}
