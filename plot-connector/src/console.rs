//! Text rendition of the map, used by the command line tool.

use std::io::{self, Write};

use crate::config::TileLayer;
use crate::geometry::PlotGeometry;
use crate::session::{EditableShape, MapView, SaveControl, SaveStatus};
use crate::surface::{MapSurface, StyledPlot};

pub struct ConsoleSurface<W> {
    out: W,
}

impl ConsoleSurface<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: std::fmt::Arguments<'_>) {
        if let Err(err) = writeln!(self.out, "{text}") {
            tracing::warn!("console output failed: {err}");
        }
    }
}

impl<W: Write> MapSurface for ConsoleSurface<W> {
    fn set_view(&mut self, view: MapView) {
        self.line(format_args!(
            "view: {:.7}, {:.7} @ zoom {}",
            view.center.lat, view.center.lng, view.zoom
        ));
    }

    fn add_tile_layer(&mut self, tiles: &TileLayer) {
        self.line(format_args!(
            "tiles: {} (max zoom {})",
            tiles.url_template, tiles.max_zoom
        ));
    }

    fn render_plots(&mut self, plots: &[StyledPlot]) {
        self.line(format_args!("plots: {}", plots.len()));
        for plot in plots {
            self.line(format_args!(
                "  #{:<5} {} parts={} {}",
                plot.plot_id,
                plot.style.fill_color,
                plot.geometry.part_count(),
                plot.popup.replace('\n', " | ")
            ));
        }
    }

    fn set_plots_attached(&mut self, attached: bool) {
        let state = if attached { "shown" } else { "hidden" };
        self.line(format_args!("plot layer {state}"));
    }

    fn show_editable(&mut self, shapes: &[EditableShape]) {
        if shapes.is_empty() {
            return;
        }
        for shape in shapes {
            match shape.plot_id {
                Some(plot_id) => self.line(format_args!("editing {} (plot {plot_id})", shape.id)),
                None => self.line(format_args!("editing {} (unsaved)", shape.id)),
            }
        }
    }

    fn set_save_control(&mut self, control: SaveControl) {
        self.line(format_args!("[{}]", control.label()));
    }

    fn show_pending(&mut self, geometry: Option<&PlotGeometry>) {
        match geometry.map(PlotGeometry::to_json_string) {
            Some(Ok(text)) => self.line(format_args!("pending: {text}")),
            Some(Err(err)) => self.line(format_args!("pending: <unprintable: {err}>")),
            None => self.line(format_args!("pending: No polygon drawn yet.")),
        }
    }

    fn show_status(&mut self, status: &SaveStatus) {
        if *status != SaveStatus::Idle {
            self.line(format_args!("status: {status}"));
        }
    }

    fn open_popup(&mut self, plot_id: i64, content: &str) {
        self.line(format_args!("popup #{plot_id}: {}", content.replace('\n', " | ")));
    }
}
