use plot_protocol::{PlotProperties, PlotStatus};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotStyle {
    pub fill_color: &'static str,
    pub color: &'static str,
    pub weight: f32,
    pub fill_opacity: f32,
}

pub fn fill_color(status: PlotStatus) -> &'static str {
    match status {
        PlotStatus::Available => "#90EE90",
        PlotStatus::Occupied => "#FFB6C6",
        PlotStatus::Reserved => "#FFE66D",
        PlotStatus::Unknown => "#CCCCCC",
    }
}

pub fn style_for(status: PlotStatus) -> PlotStyle {
    PlotStyle {
        fill_color: fill_color(status),
        color: "white",
        weight: 1.0,
        fill_opacity: 0.7,
    }
}

pub fn popup_text(properties: &PlotProperties) -> String {
    let area = properties
        .area_sqm
        .map(|area| format!("{area} sq.m"))
        .unwrap_or_else(|| "unknown".to_string());
    format!(
        "Plot: {}\nSection: {}\nStatus: {}\nArea: {}",
        properties.plot_id, properties.section_name, properties.status, area
    )
}
