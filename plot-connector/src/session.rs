//! Per-map draw session state, owned by the controller.

use std::fmt;

use crate::config::LatLng;
use crate::geometry::{PlotGeometry, RenderedPlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u64);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: f64,
}

/// A shape in the editable group. `plot_id` is set for shapes copied from a
/// persisted plot and `None` for freshly drawn ones.
#[derive(Debug, Clone, PartialEq)]
pub struct EditableShape {
    pub id: ShapeId,
    pub plot_id: Option<i64>,
    pub geometry: PlotGeometry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveControl {
    Enabled,
    Disabled,
}

impl SaveControl {
    pub fn label(self) -> &'static str {
        match self {
            Self::Enabled => "Save Plot",
            Self::Disabled => "Draw a Plot to Enable Save",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved,
    Error(String),
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => Ok(()),
            Self::Saving => f.write_str("Saving..."),
            Self::Saved => f.write_str("Saved."),
            Self::Error(message) => write!(f, "Error: {message}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MapSession {
    view: MapView,
    plots: Vec<RenderedPlot>,
    editable: Vec<EditableShape>,
    unsaved: Vec<ShapeId>,
    pending: Option<PlotGeometry>,
    plots_attached: bool,
    save_status: SaveStatus,
    next_shape: u64,
}

impl MapSession {
    pub fn new(view: MapView) -> Self {
        Self {
            view,
            plots: Vec::new(),
            editable: Vec::new(),
            unsaved: Vec::new(),
            pending: None,
            plots_attached: false,
            save_status: SaveStatus::Idle,
            next_shape: 1,
        }
    }

    pub fn view(&self) -> MapView {
        self.view
    }

    pub fn plots(&self) -> &[RenderedPlot] {
        &self.plots
    }

    pub fn plot(&self, plot_id: i64) -> Option<&RenderedPlot> {
        self.plots.iter().find(|plot| plot.plot_id() == plot_id)
    }

    pub fn editable(&self) -> &[EditableShape] {
        &self.editable
    }

    pub fn shape(&self, id: ShapeId) -> Option<&EditableShape> {
        self.editable.iter().find(|shape| shape.id == id)
    }

    pub fn unsaved(&self) -> &[ShapeId] {
        &self.unsaved
    }

    pub fn pending(&self) -> Option<&PlotGeometry> {
        self.pending.as_ref()
    }

    pub fn plots_attached(&self) -> bool {
        self.plots_attached
    }

    pub fn save_status(&self) -> &SaveStatus {
        &self.save_status
    }

    pub fn save_control(&self) -> SaveControl {
        if self.pending.is_some() {
            SaveControl::Enabled
        } else {
            SaveControl::Disabled
        }
    }

    pub(crate) fn set_zoom(&mut self, zoom: f64) {
        self.view.zoom = zoom;
    }

    pub(crate) fn set_view(&mut self, view: MapView) {
        self.view = view;
    }

    pub(crate) fn replace_plots(&mut self, plots: Vec<RenderedPlot>) {
        self.plots = plots;
    }

    pub(crate) fn set_plots_attached(&mut self, attached: bool) {
        self.plots_attached = attached;
    }

    pub(crate) fn set_save_status(&mut self, status: SaveStatus) {
        self.save_status = status;
    }

    fn push_shape(&mut self, plot_id: Option<i64>, geometry: PlotGeometry) -> ShapeId {
        let id = ShapeId(self.next_shape);
        self.next_shape += 1;
        self.editable.push(EditableShape {
            id,
            plot_id,
            geometry,
        });
        id
    }

    /// A freshly drawn shape becomes the pending save payload.
    pub(crate) fn record_drawn(&mut self, geometry: PlotGeometry) -> ShapeId {
        let id = self.push_shape(None, geometry.clone());
        self.unsaved.push(id);
        self.pending = Some(geometry);
        id
    }

    /// Returns `true` when no unsaved shape is left.
    pub(crate) fn forget_deleted(&mut self, ids: &[ShapeId]) -> bool {
        self.editable.retain(|shape| !ids.contains(&shape.id));
        self.unsaved.retain(|id| !ids.contains(id));
        self.pending = self.latest_unsaved_geometry();
        self.unsaved.is_empty()
    }

    /// Applies an edited boundary locally. Returns the plot id when the
    /// shape belongs to a persisted plot.
    pub(crate) fn apply_edit(&mut self, id: ShapeId, geometry: PlotGeometry) -> Option<i64> {
        let shape = self.editable.iter_mut().find(|shape| shape.id == id)?;
        shape.geometry = geometry;
        let plot_id = shape.plot_id;
        if plot_id.is_none() && self.unsaved.last() == Some(&id) {
            self.pending = self.latest_unsaved_geometry();
        }
        plot_id
    }

    /// Swaps any previously selected plot out of the editable group for
    /// `plot_id`. Unsaved drawings stay.
    pub(crate) fn select_plot(&mut self, plot_id: i64) -> Option<ShapeId> {
        let geometry = self.plot(plot_id)?.geometry.clone();
        self.editable.retain(|shape| shape.plot_id.is_none());
        Some(self.push_shape(Some(plot_id), geometry))
    }

    /// Empties the editable group, which also ends the draw session.
    pub(crate) fn clear_editable(&mut self) {
        self.editable.clear();
        self.unsaved.clear();
        self.pending = None;
    }

    fn latest_unsaved_geometry(&self) -> Option<PlotGeometry> {
        let id = self.unsaved.last()?;
        self.shape(*id).map(|shape| shape.geometry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plot_protocol::{PlotProperties, PlotStatus};

    fn session() -> MapSession {
        MapSession::new(MapView {
            center: LatLng {
                lat: 14.3052681,
                lng: 120.9758,
            },
            zoom: 18.0,
        })
    }

    fn square(offset: f64) -> PlotGeometry {
        let (lng, lat) = (120.9758 + offset, 14.3052);
        PlotGeometry::polygon(vec![vec![
            vec![lng, lat],
            vec![lng + 0.0001, lat],
            vec![lng + 0.0001, lat + 0.0001],
            vec![lng, lat],
        ]])
    }

    fn plot(plot_id: i64) -> RenderedPlot {
        RenderedPlot {
            properties: PlotProperties {
                plot_id,
                plot_num: None,
                section_name: "Garden".to_string(),
                status: PlotStatus::Available,
                area_sqm: None,
            },
            geometry: square(plot_id as f64 * 0.001),
        }
    }

    #[test]
    fn drawing_sets_pending_and_enables_save() {
        let mut session = session();
        assert_eq!(session.save_control(), SaveControl::Disabled);

        let id = session.record_drawn(square(0.0));
        assert_eq!(session.unsaved(), &[id]);
        assert_eq!(session.pending(), Some(&square(0.0)));
        assert_eq!(session.save_control(), SaveControl::Enabled);
    }

    #[test]
    fn deleting_last_unsaved_shape_clears_pending() {
        let mut session = session();
        let first = session.record_drawn(square(0.0));
        let second = session.record_drawn(square(0.01));

        assert!(!session.forget_deleted(&[second]));
        assert_eq!(session.pending(), Some(&square(0.0)));

        assert!(session.forget_deleted(&[first]));
        assert_eq!(session.pending(), None);
        assert!(session.editable().is_empty());
        assert_eq!(session.save_control(), SaveControl::Disabled);
    }

    #[test]
    fn editing_pending_drawing_updates_payload() {
        let mut session = session();
        let id = session.record_drawn(square(0.0));

        assert_eq!(session.apply_edit(id, square(0.02)), None);
        assert_eq!(session.pending(), Some(&square(0.02)));
    }

    #[test]
    fn selecting_replaces_previous_selection_only() {
        let mut session = session();
        session.replace_plots(vec![plot(1), plot(2)]);
        let drawn = session.record_drawn(square(0.5));

        let first = session.select_plot(1).unwrap();
        let second = session.select_plot(2).unwrap();

        assert!(session.shape(first).is_none());
        assert_eq!(session.shape(second).unwrap().plot_id, Some(2));
        assert!(session.shape(drawn).is_some());
        assert_eq!(session.editable().len(), 2);
        assert_eq!(session.apply_edit(second, square(0.3)), Some(2));
    }

    #[test]
    fn selecting_unknown_plot_changes_nothing() {
        let mut session = session();
        session.replace_plots(vec![plot(1)]);
        session.select_plot(1).unwrap();

        assert!(session.select_plot(9).is_none());
        assert_eq!(session.editable().len(), 1);
    }
}
