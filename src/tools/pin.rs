use crate::error::Result;
use crate::settings::SettingsProvider;
use crate::types::{properties, resolve_defaults, Properties, PropertyValue, VectorSource};

use super::{Control, ControlOptions, DialogItem, DialogTemplate};

pub const PIN_CLASS: &str = "ole-control-pin";

pub fn pin_defaults() -> Properties {
    properties([
        ("pinLabel", PropertyValue::from("")),
        ("pinSize", PropertyValue::from(5)),
    ])
}

/// Drops markers on the map.
pub fn pin_control(settings: &dyn SettingsProvider, source: VectorSource) -> Result<Control> {
    let dialog = DialogTemplate::new()
        .item(DialogItem::text_field("pinLabel", "Label"))
        .item(DialogItem::slider("pinSize", "Marker size", 1, 20));

    Control::new(
        ControlOptions::new(PIN_CLASS, "Pin")
            .image("assets/icons/pin.svg")
            .source(source)
            .standalone(false)
            .properties(resolve_defaults(&pin_defaults(), settings))
            .dialog(dialog),
    )
}
