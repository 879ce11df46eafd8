use crate::error::Result;
use crate::settings::SettingsProvider;
use crate::types::{properties, resolve_defaults, Properties, PropertyValue, VectorSource};

use super::{Control, ControlOptions, DialogItem, DialogTemplate};

pub const MEASURE_CLASS: &str = "ole-control-measure";

pub fn measure_defaults() -> Properties {
    properties([
        ("measureUnits", PropertyValue::from("km")),
        ("measureDecimals", PropertyValue::from(2)),
        ("measureShowLabel", PropertyValue::from(true)),
    ])
}

/// Distance measuring between two clicked points.
pub fn measure_control(settings: &dyn SettingsProvider, source: VectorSource) -> Result<Control> {
    let dialog = DialogTemplate::new()
        .text("Drag with the left mouse button to measure a distance.")
        .item(DialogItem::text_field("measureUnits", "Units"))
        .item(DialogItem::slider("measureDecimals", "Decimals", 0, 6))
        .item(DialogItem::checkbox("measureShowLabel", "Show distance label"));

    Control::new(
        ControlOptions::new(MEASURE_CLASS, "Measure")
            .image("assets/icons/measure.svg")
            .source(source)
            .standalone(false)
            .properties(resolve_defaults(&measure_defaults(), settings))
            .dialog(dialog),
    )
}
