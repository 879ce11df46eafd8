use crate::error::Result;
use crate::settings::SettingsProvider;
use crate::types::{properties, resolve_defaults, Properties, PropertyValue, VectorSource};

use super::{Control, ControlOptions, DialogItem, DialogTemplate};

pub const SNAP_CLASS: &str = "ole-control-cad";

pub fn snap_defaults() -> Properties {
    properties([
        ("showSnapLines", PropertyValue::from(true)),
        ("showSnapPoints", PropertyValue::from(false)),
        ("snapTolerance", PropertyValue::from(10)),
    ])
}

/// Snapping helper. Standalone, so it stays on while drawing tools change.
pub fn snap_control(settings: &dyn SettingsProvider, source: VectorSource) -> Result<Control> {
    let dialog = DialogTemplate::new()
        .heading("Snapping")
        .item(DialogItem::checkbox("showSnapLines", "Show snap lines"))
        .item(DialogItem::checkbox("showSnapPoints", "Show snap points"))
        .item(DialogItem::slider("snapTolerance", "Snap tolerance (px)", 1, 100));

    Control::new(
        ControlOptions::new(SNAP_CLASS, "CAD")
            .image("assets/icons/cad.svg")
            .source(source)
            .standalone(true)
            .properties(resolve_defaults(&snap_defaults(), settings))
            .dialog(dialog),
    )
}
