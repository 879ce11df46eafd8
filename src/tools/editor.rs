use std::sync::{Arc, Weak};

use bevy::log::{debug, info, warn};
use bevy::prelude::Resource;
use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::error::{ControlError, Result};
use crate::types::Properties;

use super::{ActiveStateChange, Control, ControlId, Coordination, MapSurface};

/// Whoever owns a set of controls and wants to hear when they switch on or off.
pub trait EditorHost: Send + Sync {
    fn active_state_change(&self, change: &ActiveStateChange);
}

/// The editor's end of the notification channel handed to its controls.
pub struct EditorChannel {
    sender: Sender<ActiveStateChange>,
}

impl EditorHost for EditorChannel {
    fn active_state_change(&self, change: &ActiveStateChange) {
        if let Err(e) = self.sender.send(change.clone()) {
            warn!("Failed to deliver state change of {}: {}", change.class_name, e);
        }
    }
}

/// Owns the toolbar controls and keeps at most one exclusive control active.
#[derive(Resource)]
pub struct Editor {
    controls: Vec<Control>,
    host: Arc<EditorChannel>,
    changes: Receiver<ActiveStateChange>,
    active_controls: Vec<ControlId>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        let (sender, changes) = unbounded();
        Self {
            controls: Vec::new(),
            host: Arc::new(EditorChannel { sender }),
            changes,
            active_controls: Vec::new(),
        }
    }

    pub fn add_control(&mut self, mut control: Control) -> ControlId {
        let host: Weak<EditorChannel> = Arc::downgrade(&self.host);
        control.set_editor(host);
        let id = control.id();
        debug!("Added control {} ({})", control.class_name(), id);
        self.controls.push(control);
        id
    }

    pub fn add_controls(&mut self, controls: impl IntoIterator<Item = Control>) -> Vec<ControlId> {
        controls.into_iter().map(|c| self.add_control(c)).collect()
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn control(&self, id: ControlId) -> Option<&Control> {
        self.controls.iter().find(|c| c.id() == id)
    }

    fn control_mut(&mut self, id: ControlId) -> Option<&mut Control> {
        self.controls.iter_mut().find(|c| c.id() == id)
    }

    /// Controls currently active, in activation order.
    pub fn active_controls(&self) -> &[ControlId] {
        &self.active_controls
    }

    /// Mounts every control on the given map.
    pub fn set_map(&mut self, map: Arc<dyn MapSurface>) {
        for control in &mut self.controls {
            control.set_map(map.clone());
        }
    }

    pub fn toggle(&mut self, id: ControlId) -> Result<()> {
        self.sync_active_state()?;
        self.existing_mut(id)?.toggle()?;
        self.sync_active_state()
    }

    pub fn activate(&mut self, id: ControlId) -> Result<()> {
        self.sync_active_state()?;
        self.existing_mut(id)?.activate()?;
        self.sync_active_state()
    }

    pub fn deactivate(&mut self, id: ControlId) -> Result<()> {
        self.sync_active_state()?;
        self.existing_mut(id)?.deactivate()?;
        self.sync_active_state()
    }

    pub fn set_properties(&mut self, id: ControlId, properties: Properties) -> Result<()> {
        self.existing_mut(id)?.set_properties(properties);
        Ok(())
    }

    fn existing_mut(&mut self, id: ControlId) -> Result<&mut Control> {
        self.control_mut(id)
            .ok_or_else(|| ControlError::UnknownControl { id: id.to_string() })
    }

    /// Applies pending notifications, including the ones caused by deactivating siblings.
    fn sync_active_state(&mut self) -> Result<()> {
        while let Ok(change) = self.changes.try_recv() {
            self.apply_change(change)?;
        }
        Ok(())
    }

    fn apply_change(&mut self, change: ActiveStateChange) -> Result<()> {
        let current = self.control(change.id).map(|c| c.get_active());
        if current != Some(change.active) {
            debug!("Skipping stale state change of {}", change.class_name);
            return Ok(());
        }

        if !change.active {
            self.active_controls.retain(|id| *id != change.id);
            return Ok(());
        }

        if !self.active_controls.contains(&change.id) {
            self.active_controls.push(change.id);
        }
        if change.coordination == Coordination::Standalone {
            return Ok(());
        }

        let siblings: Vec<ControlId> = self
            .controls
            .iter()
            .filter(|c| c.id() != change.id && c.get_active() && !c.is_standalone())
            .map(|c| c.id())
            .collect();
        for id in siblings {
            if let Some(control) = self.control_mut(id) {
                info!("Deactivating {} in favour of {}", control.class_name(), change.class_name);
                control.deactivate()?;
            }
        }
        Ok(())
    }
}
