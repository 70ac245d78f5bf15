//! What the controller needs from the map widget.

use crate::config::TileLayer;
use crate::geometry::{PlotGeometry, RenderedPlot};
use crate::session::{EditableShape, MapView, SaveControl, SaveStatus};
use crate::style::{PlotStyle, popup_text, style_for};

#[derive(Debug, Clone, PartialEq)]
pub struct StyledPlot {
    pub plot_id: i64,
    pub geometry: PlotGeometry,
    pub style: PlotStyle,
    pub popup: String,
}

impl From<&RenderedPlot> for StyledPlot {
    fn from(plot: &RenderedPlot) -> Self {
        Self {
            plot_id: plot.plot_id(),
            geometry: plot.geometry.clone(),
            style: style_for(plot.properties.status),
            popup: popup_text(&plot.properties),
        }
    }
}

/// Rendering capability of the tile map. Implementations draw; they never
/// decide what to draw.
pub trait MapSurface {
    fn set_view(&mut self, view: MapView);

    fn add_tile_layer(&mut self, tiles: &TileLayer);

    /// Replaces the all-plots layer contents in one batch.
    fn render_plots(&mut self, plots: &[StyledPlot]);

    fn set_plots_attached(&mut self, attached: bool);

    fn show_editable(&mut self, shapes: &[EditableShape]);

    fn set_save_control(&mut self, control: SaveControl);

    /// Coordinates panel for the geometry awaiting save.
    fn show_pending(&mut self, geometry: Option<&PlotGeometry>);

    fn show_status(&mut self, status: &SaveStatus);

    fn open_popup(&mut self, plot_id: i64, content: &str);
}
