use crate::error::Result;
use crate::settings::SettingsProvider;
use crate::types::{properties, resolve_defaults, Properties, PropertyValue, VectorSource};

use super::{Control, ControlOptions};

pub const SELECTION_CLASS: &str = "ole-control-select";

/// Selection shapes, persisted by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionType {
    Rectangle,
    Polygon,
    Circle,
}

impl SelectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionType::Rectangle => "rectangle",
            SelectionType::Polygon => "polygon",
            SelectionType::Circle => "circle",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "rectangle" => Some(SelectionType::Rectangle),
            "polygon" => Some(SelectionType::Polygon),
            "circle" => Some(SelectionType::Circle),
            _ => None,
        }
    }

    /// Cycles to the next shape, like clicking the select button again.
    pub fn iterate(&self) -> Self {
        match self {
            SelectionType::Rectangle => SelectionType::Polygon,
            SelectionType::Polygon => SelectionType::Circle,
            SelectionType::Circle => SelectionType::Rectangle,
        }
    }
}

pub fn selection_defaults() -> Properties {
    properties([("selectionType", PropertyValue::from(SelectionType::Circle.as_str()))])
}

/// Area selection. Has no dialog; the shape is part of its properties.
pub fn selection_control(settings: &dyn SettingsProvider, source: VectorSource) -> Result<Control> {
    Control::new(
        ControlOptions::new(SELECTION_CLASS, "Select")
            .image("assets/icons/select.svg")
            .source(source)
            .standalone(false)
            .properties(resolve_defaults(&selection_defaults(), settings)),
    )
}

/// The shape stored on a selection control, falling back to circle for unknown names.
pub fn selection_type(control: &Control) -> SelectionType {
    control
        .get_properties()
        .get("selectionType")
        .and_then(|v| v.as_text())
        .and_then(SelectionType::parse)
        .unwrap_or(SelectionType::Circle)
}

/// The control's properties with the shape advanced to the next one.
pub fn next_selection_properties(control: &Control) -> Properties {
    let mut properties = control.get_properties().clone();
    properties.insert(
        "selectionType".to_string(),
        PropertyValue::from(selection_type(control).iterate().as_str()),
    );
    properties
}
