use std::sync::{Arc, Weak};

use bevy::log::{debug, info};
use geojson::FeatureCollection;
use uuid::Uuid;

use crate::error::{ControlError, Result};
use crate::types::{FeatureInput, Properties, VectorSource};

use super::{DialogHandle, DialogOverlay, DialogTemplate, EditorHost, MapSurface};

/// Base class of every toolbar button.
pub const CONTROL_CLASS: &str = "ole-control";
/// Marker class present while the control is active.
pub const ACTIVE_CLASS: &str = "active";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(Uuid);

impl ControlId {
    pub fn new() -> Self {
        ControlId(Uuid::new_v4())
    }
}

impl Default for ControlId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ControlId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a control relates to the other active controls of its editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coordination {
    /// May stay active alongside anything else.
    Standalone,
    /// Activating it deactivates the other exclusive controls.
    Exclusive,
}

impl From<bool> for Coordination {
    fn from(standalone: bool) -> Self {
        if standalone {
            Coordination::Standalone
        } else {
            Coordination::Exclusive
        }
    }
}

/// What the editor gets told on every activation change.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveStateChange {
    pub id: ControlId,
    pub class_name: String,
    pub active: bool,
    pub coordination: Coordination,
}

/// The toolbar button itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlElement {
    pub classes: Vec<String>,
    pub title: String,
    pub image: String,
}

impl ControlElement {
    fn new(class_name: &str, title: &str, image: &str) -> Self {
        Self {
            classes: vec![CONTROL_CLASS.to_string(), class_name.to_string()],
            title: title.to_string(),
            image: image.to_string(),
        }
    }

    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }
}

/// Construction options for a control.
#[derive(Debug, Clone)]
pub struct ControlOptions {
    pub class_name: String,
    pub title: String,
    pub image: String,
    pub features: FeatureInput,
    pub standalone: bool,
    pub properties: Properties,
    pub dialog: Option<DialogTemplate>,
}

impl ControlOptions {
    pub fn new(class_name: &str, title: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            title: title.to_string(),
            image: String::new(),
            features: FeatureInput::default(),
            standalone: true,
            properties: Properties::new(),
            dialog: None,
        }
    }

    pub fn image(mut self, image: &str) -> Self {
        self.image = image.to_string();
        self
    }

    pub fn source(mut self, source: VectorSource) -> Self {
        self.features.source = Some(source);
        self
    }

    pub fn features(mut self, features: FeatureCollection) -> Self {
        self.features.features = Some(features);
        self
    }

    pub fn standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    pub fn properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    pub fn dialog(mut self, template: DialogTemplate) -> Self {
        self.dialog = Some(template);
        self
    }
}

pub type PropertyListener = Box<dyn Fn(&Properties) + Send + Sync>;

pub struct Control {
    id: ControlId,
    class_name: String,
    title: String,
    element: ControlElement,
    source: VectorSource,
    coordination: Coordination,
    active: bool,
    properties: Properties,
    dialog_template: Option<DialogTemplate>,
    dialog: Option<DialogHandle>,
    editor: Option<Weak<dyn EditorHost>>,
    map: Option<Arc<dyn MapSurface>>,
    listeners: Vec<PropertyListener>,
}

impl Control {
    pub fn new(options: ControlOptions) -> Result<Self> {
        let ControlOptions {
            class_name,
            title,
            image,
            features,
            standalone,
            properties,
            dialog,
        } = options;

        let source = features
            .into_source()
            .ok_or_else(|| ControlError::MissingFeatures {
                class_name: class_name.clone(),
            })?;

        Ok(Self {
            id: ControlId::new(),
            element: ControlElement::new(&class_name, &title, &image),
            class_name,
            title,
            source,
            coordination: standalone.into(),
            active: false,
            properties,
            dialog_template: dialog,
            dialog: None,
            editor: None,
            map: None,
            listeners: Vec::new(),
        })
    }

    pub fn id(&self) -> ControlId {
        self.id
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn element(&self) -> &ControlElement {
        &self.element
    }

    pub fn source(&self) -> &VectorSource {
        &self.source
    }

    pub fn coordination(&self) -> Coordination {
        self.coordination
    }

    pub fn is_standalone(&self) -> bool {
        self.coordination == Coordination::Standalone
    }

    /// Introduce the control to its editor.
    pub fn set_editor(&mut self, editor: Weak<dyn EditorHost>) {
        self.editor = Some(editor);
    }

    /// Mount the control on a map. An open dialog stays on the map it was opened on.
    pub fn set_map(&mut self, map: Arc<dyn MapSurface>) {
        self.map = Some(map);
    }

    pub fn get_active(&self) -> bool {
        self.active
    }

    /// Click handler for the toolbar button.
    pub fn toggle(&mut self) -> Result<()> {
        if self.active {
            self.deactivate()
        } else {
            self.activate()
        }
    }

    pub fn activate(&mut self) -> Result<()> {
        if self.active {
            debug!("Control {} is already active", self.class_name);
            return Ok(());
        }
        let editor = self.editor()?;
        let map = match (&self.dialog_template, &self.map) {
            (Some(_), None) => {
                return Err(ControlError::NoSurface {
                    class_name: self.class_name.clone(),
                })
            }
            (_, map) => map.clone(),
        };

        self.active = true;
        self.element.add_class(ACTIVE_CLASS);
        editor.active_state_change(&self.state_change());
        self.open_dialog(map);
        info!("Activated control {}", self.class_name);
        Ok(())
    }

    pub fn deactivate(&mut self) -> Result<()> {
        if !self.active {
            debug!("Control {} is already inactive", self.class_name);
            return Ok(());
        }
        let editor = self.editor()?;

        self.active = false;
        self.element.remove_class(ACTIVE_CLASS);
        editor.active_state_change(&self.state_change());
        self.close_dialog();
        info!("Deactivated control {}", self.class_name);
        Ok(())
    }

    /// Replaces all properties and notifies listeners once.
    pub fn set_properties(&mut self, properties: Properties) {
        self.properties = properties;
        debug!("Control {} properties changed: {:?}", self.class_name, self.properties);
        for listener in &self.listeners {
            listener(&self.properties);
        }
    }

    pub fn get_properties(&self) -> &Properties {
        &self.properties
    }

    pub fn on_properties_change(&mut self, listener: impl Fn(&Properties) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn editor(&self) -> Result<Arc<dyn EditorHost>> {
        match &self.editor {
            None => Err(ControlError::NoHost {
                class_name: self.class_name.clone(),
            }),
            Some(editor) => editor.upgrade().ok_or_else(|| ControlError::HostDropped {
                class_name: self.class_name.clone(),
            }),
        }
    }

    fn state_change(&self) -> ActiveStateChange {
        ActiveStateChange {
            id: self.id,
            class_name: self.class_name.clone(),
            active: self.active,
            coordination: self.coordination,
        }
    }

    fn open_dialog(&mut self, map: Option<Arc<dyn MapSurface>>) {
        if let (Some(template), Some(map)) = (&self.dialog_template, map) {
            let overlay = DialogOverlay::new(self.id, &self.title, template.clone());
            self.dialog = Some(DialogHandle::open(map, overlay));
        }
    }

    fn close_dialog(&mut self) {
        if let Some(dialog) = self.dialog.take() {
            dialog.close();
        }
    }
}

impl std::fmt::Debug for Control {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Control")
            .field("id", &self.id)
            .field("class_name", &self.class_name)
            .field("active", &self.active)
            .field("coordination", &self.coordination)
            .field("properties", &self.properties)
            .field("dialog", &self.dialog)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::MapOverlays;
    use crate::types::{properties, PropertyValue};
    use std::sync::Mutex;

    /// Records every notification along with the active flag it carried.
    #[derive(Default)]
    struct RecordingHost {
        changes: Mutex<Vec<ActiveStateChange>>,
    }

    impl EditorHost for RecordingHost {
        fn active_state_change(&self, change: &ActiveStateChange) {
            self.changes.lock().unwrap().push(change.clone());
        }
    }

    impl RecordingHost {
        fn actives(&self) -> Vec<bool> {
            self.changes.lock().unwrap().iter().map(|c| c.active).collect()
        }
    }

    fn options() -> ControlOptions {
        ControlOptions::new("ole-test", "Test").source(VectorSource::empty())
    }

    fn hosted(options: ControlOptions) -> (Control, Arc<RecordingHost>, MapOverlays) {
        let mut control = Control::new(options).unwrap();
        let host = Arc::new(RecordingHost::default());
        let overlays = MapOverlays::default();
        let weak: Weak<RecordingHost> = Arc::downgrade(&host);
        control.set_editor(weak);
        control.set_map(Arc::new(overlays.clone()));
        (control, host, overlays)
    }

    #[test]
    fn test_toggle_alternates() {
        let (mut control, host, _) = hosted(options());
        assert!(!control.get_active());

        let mut seen = Vec::new();
        for _ in 0..5 {
            control.toggle().unwrap();
            seen.push(control.get_active());
        }
        assert_eq!(seen, vec![true, false, true, false, true]);
        assert_eq!(host.actives(), seen);
    }

    #[test]
    fn test_notification_sees_updated_state() {
        let (mut control, host, _) = hosted(options());
        control.activate().unwrap();
        control.deactivate().unwrap();

        let changes = host.changes.lock().unwrap();
        assert_eq!(changes.len(), 2);
        assert!(changes[0].active);
        assert!(!changes[1].active);
        assert_eq!(changes[0].id, control.id());
        assert_eq!(changes[0].coordination, Coordination::Standalone);
    }

    #[test]
    fn test_repeated_activate_is_noop() {
        let (mut control, host, _) = hosted(options());
        control.activate().unwrap();
        control.activate().unwrap();
        assert_eq!(host.actives(), vec![true]);

        control.deactivate().unwrap();
        control.deactivate().unwrap();
        assert_eq!(host.actives(), vec![true, false]);
    }

    #[test]
    fn test_active_class_marker() {
        let (mut control, _host, _) = hosted(options());
        assert_eq!(control.element().class_name(), "ole-control ole-test");

        control.activate().unwrap();
        assert!(control.element().has_class(ACTIVE_CLASS));
        assert_eq!(control.element().class_name(), "ole-control ole-test active");

        control.deactivate().unwrap();
        assert!(!control.element().has_class(ACTIVE_CLASS));
    }

    #[test]
    fn test_dialog_follows_activation() {
        let template = DialogTemplate::new().text("Draw a line");
        let (mut control, _host, overlays) = hosted(options().dialog(template.clone()));
        assert!(overlays.is_empty());

        control.activate().unwrap();
        let mounted = overlays.snapshot();
        assert_eq!(mounted.len(), 1);
        assert_eq!(mounted[0].template, template);
        assert_eq!(mounted[0].owner, control.id());

        control.deactivate().unwrap();
        assert!(overlays.is_empty());
    }

    #[test]
    fn test_no_dialog_without_template() {
        let (mut control, _host, overlays) = hosted(options());
        for _ in 0..4 {
            control.toggle().unwrap();
            assert!(overlays.is_empty());
        }
    }

    #[test]
    fn test_dialog_closes_on_first_map() {
        let (mut control, _host, first) = hosted(options().dialog(DialogTemplate::new()));
        control.activate().unwrap();

        let second = MapOverlays::default();
        control.set_map(Arc::new(second.clone()));
        control.deactivate().unwrap();

        assert!(first.is_empty());
        assert!(second.is_empty());
    }

    #[test]
    fn test_activate_without_editor() {
        let mut control = Control::new(options()).unwrap();
        let err = control.activate().unwrap_err();
        assert!(matches!(err, ControlError::NoHost { .. }));
        assert!(!control.get_active());
        assert!(!control.element().has_class(ACTIVE_CLASS));
    }

    #[test]
    fn test_activate_with_dropped_editor() {
        let (mut control, host, _) = hosted(options());
        drop(host);
        assert!(matches!(control.activate(), Err(ControlError::HostDropped { .. })));
        assert!(!control.get_active());
    }

    #[test]
    fn test_dialog_without_map() {
        let mut control = Control::new(options().dialog(DialogTemplate::new())).unwrap();
        let host = Arc::new(RecordingHost::default());
        let weak: Weak<RecordingHost> = Arc::downgrade(&host);
        control.set_editor(weak);

        assert!(matches!(control.activate(), Err(ControlError::NoSurface { .. })));
        assert!(!control.get_active());
        assert!(host.actives().is_empty());
    }

    #[test]
    fn test_missing_features() {
        let err = Control::new(ControlOptions::new("ole-test", "Test")).unwrap_err();
        assert!(matches!(err, ControlError::MissingFeatures { .. }));
    }

    #[test]
    fn test_features_become_source() {
        let collection = FeatureCollection {
            bbox: None,
            features: Vec::new(),
            foreign_members: None,
        };
        let control = Control::new(ControlOptions::new("ole-test", "Test").features(collection)).unwrap();
        assert!(control.source().is_empty());
    }

    #[test]
    fn test_set_properties_replaces_and_notifies_once() {
        let (mut control, _host, _) = hosted(options());
        let seen: Arc<Mutex<Vec<Properties>>> = Arc::default();
        let sink = seen.clone();
        control.set_properties(properties([("x", 1), ("y", 2)]));
        control.on_properties_change(move |props| sink.lock().unwrap().push(props.clone()));

        control.set_properties(properties([("x", 1)]));

        assert_eq!(control.get_properties(), &properties([("x", 1)]));
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], properties([("x", 1)]));
    }

    #[test]
    fn test_properties_independent_of_activation() {
        let (mut control, _host, _) = hosted(options().properties(properties([("on", true)])));
        control.activate().unwrap();
        control.set_properties(properties([("on", false)]));
        control.deactivate().unwrap();
        assert_eq!(control.get_properties()["on"], PropertyValue::Bool(false));
    }

    #[test]
    fn test_standalone_flag() {
        let control = Control::new(options().standalone(false)).unwrap();
        assert_eq!(control.coordination(), Coordination::Exclusive);
        assert!(!control.is_standalone());
        assert!(Control::new(options()).unwrap().is_standalone());
    }
}
