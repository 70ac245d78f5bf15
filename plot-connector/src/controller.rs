//! Keeps the map in step with the Feature Store: fetch and render, draw and
//! edit handlers, save and update actions.

use std::time::{Duration, Instant};

use plot_protocol::{CreatePlotRequest, PlotRecord, UpdatePlotRequest};

use crate::config::MapSettings;
use crate::error::{ActionError, ClientError, ClientResult};
use crate::geometry::{PlotGeometry, normalize_features};
use crate::session::{MapSession, MapView, SaveStatus, ShapeId};
use crate::store::PlotStore;
use crate::style::popup_text;
use crate::surface::{MapSurface, StyledPlot};
use crate::visibility::ZoomGate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl ClickModifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub fn any(self) -> bool {
        self.shift || self.ctrl || self.alt
    }
}

#[derive(Debug)]
pub struct EditOutcome {
    pub plot_id: i64,
    pub result: Result<(), ActionError>,
}

pub struct MapController<S, M> {
    store: S,
    surface: M,
    settings: MapSettings,
    section_id: i64,
    session: MapSession,
    zoom_gate: ZoomGate,
}

impl<S: PlotStore, M: MapSurface> MapController<S, M> {
    pub fn new(store: S, surface: M, settings: MapSettings, section_id: i64) -> Self {
        let session = MapSession::new(MapView {
            center: settings.center,
            zoom: settings.zoom,
        });
        let zoom_gate = ZoomGate::new(
            settings.min_render_zoom,
            Duration::from_millis(settings.zoom_debounce_ms),
        );
        Self {
            store,
            surface,
            settings,
            section_id,
            session,
            zoom_gate,
        }
    }

    pub fn session(&self) -> &MapSession {
        &self.session
    }

    pub fn surface(&self) -> &M {
        &self.surface
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn init(&mut self) -> ClientResult<usize> {
        let view = MapView {
            center: self.settings.center,
            zoom: self.settings.zoom,
        };
        self.session.set_view(view);
        self.surface.set_view(view);
        self.surface.add_tile_layer(&self.settings.tiles);
        self.refresh().await
    }

    /// Clears the editable group and re-renders every plot from the store.
    /// Returns how many plots were rendered.
    pub async fn refresh(&mut self) -> ClientResult<usize> {
        self.session.clear_editable();
        self.sync_draw_session();

        let collection = match self.store.fetch_features().await {
            Ok(collection) => collection,
            Err(err) => {
                tracing::error!("error loading plots: {err}");
                self.set_status(SaveStatus::Error(format!("could not load plots: {err}")));
                return Err(err);
            }
        };

        let plots = normalize_features(&collection.features);
        let styled: Vec<StyledPlot> = plots.iter().map(StyledPlot::from).collect();
        tracing::info!(
            rendered = styled.len(),
            dropped = collection.features.len() - plots.len(),
            "plots loaded"
        );

        self.surface.render_plots(&styled);
        self.session.replace_plots(plots);
        // an unsettled zoom is left to tick()
        if !self.zoom_gate.is_pending() {
            self.apply_visibility();
        }
        Ok(styled.len())
    }

    pub fn on_zoom_changed(&mut self, zoom: f64, now: Instant) {
        self.session.set_zoom(zoom);
        self.zoom_gate.record(now);
    }

    /// Applies a settled zoom change. Returns `true` when the all-plots
    /// layer was attached or detached.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.zoom_gate.settle(now) && self.apply_visibility()
    }

    pub fn zoom_settles_in(&self, now: Instant) -> Option<Duration> {
        self.zoom_gate.remaining(now)
    }

    fn apply_visibility(&mut self) -> bool {
        let attach = self.zoom_gate.should_attach(self.session.view().zoom);
        if attach == self.session.plots_attached() {
            return false;
        }
        self.session.set_plots_attached(attach);
        self.surface.set_plots_attached(attach);
        true
    }

    pub fn on_shape_created(&mut self, geometry: PlotGeometry) -> ShapeId {
        let id = self.session.record_drawn(geometry);
        tracing::debug!(%id, "shape drawn");
        self.sync_draw_session();
        id
    }

    pub fn on_shapes_deleted(&mut self, ids: &[ShapeId]) {
        let persisted: Vec<i64> = ids
            .iter()
            .filter_map(|id| self.session.shape(*id))
            .filter_map(|shape| shape.plot_id)
            .collect();
        if !persisted.is_empty() {
            tracing::info!(?persisted, "plots removed from the editable group, store untouched");
        }

        if self.session.forget_deleted(ids) {
            tracing::debug!("no unsaved shapes left");
        }
        self.sync_draw_session();
    }

    /// Sends one update per edited shape that belongs to a persisted plot,
    /// then refreshes once if any of them went through.
    pub async fn on_shapes_edited(
        &mut self,
        edits: Vec<(ShapeId, PlotGeometry)>,
    ) -> Vec<EditOutcome> {
        let mut updates = Vec::new();
        for (id, geometry) in edits {
            if let Some(plot_id) = self.session.apply_edit(id, geometry.clone()) {
                updates.push((plot_id, geometry));
            }
        }
        self.sync_draw_session();

        let mut outcomes = Vec::with_capacity(updates.len());
        for (plot_id, geometry) in updates {
            let result = self.send_update(plot_id, &geometry).await;
            outcomes.push(EditOutcome { plot_id, result });
        }

        if outcomes.iter().any(|outcome| outcome.result.is_ok()) {
            self.refresh_after_write().await;
        }
        outcomes
    }

    /// Plain click opens the popup; a modifier click selects for editing.
    pub fn on_plot_clicked(&mut self, plot_id: i64, modifiers: ClickModifiers) -> Option<ShapeId> {
        if modifiers.any() {
            return self.select_for_editing(plot_id);
        }
        match self.session.plot(plot_id) {
            Some(plot) => {
                let content = popup_text(&plot.properties);
                self.surface.open_popup(plot_id, &content);
            }
            None => tracing::warn!(plot_id, "clicked plot is not loaded"),
        }
        None
    }

    pub fn on_popup_edit(&mut self, plot_id: i64) -> Option<ShapeId> {
        self.select_for_editing(plot_id)
    }

    pub fn select_for_editing(&mut self, plot_id: i64) -> Option<ShapeId> {
        let Some(id) = self.session.select_plot(plot_id) else {
            tracing::warn!(plot_id, "cannot edit a plot that is not loaded");
            return None;
        };
        self.surface.show_editable(self.session.editable());
        Some(id)
    }

    /// Persists the pending drawing. Only a successful save refreshes the
    /// map and resets the save control; failures leave everything in place
    /// for a retry.
    pub async fn store_plot(&mut self) -> Result<PlotRecord, ActionError> {
        let geometry = match self.pending_payload() {
            Ok(geometry) => geometry,
            Err(err) => {
                self.report_failure(&err);
                return Err(err);
            }
        };

        self.set_status(SaveStatus::Saving);
        let request = CreatePlotRequest {
            section_id: Some(self.section_id),
            geometry: Some(geometry),
        };

        match self.store.create_plot(&request).await {
            Ok(record) => {
                tracing::info!(
                    plot_id = record.id,
                    section_id = self.section_id,
                    "plot saved"
                );
                self.set_status(SaveStatus::Saved);
                self.refresh_after_write().await;
                Ok(record)
            }
            Err(err) => {
                let err = ActionError::from(err);
                self.report_failure(&err);
                Err(err)
            }
        }
    }

    pub async fn update_plot(
        &mut self,
        plot_id: i64,
        geometry: &PlotGeometry,
    ) -> Result<(), ActionError> {
        self.send_update(plot_id, geometry).await?;
        self.refresh_after_write().await;
        Ok(())
    }

    fn pending_payload(&self) -> Result<String, ActionError> {
        let geometry = self.session.pending().ok_or(ActionError::MissingGeometry)?;
        geometry.validate()?;
        Ok(geometry.to_json_string().map_err(ClientError::from)?)
    }

    async fn send_update(
        &mut self,
        plot_id: i64,
        geometry: &PlotGeometry,
    ) -> Result<(), ActionError> {
        let result = self.put_geometry(plot_id, geometry).await;
        if let Err(err) = &result {
            tracing::error!(plot_id, "error saving updated plot: {err}");
            self.set_status(SaveStatus::Error(err.to_string()));
        }
        result
    }

    async fn put_geometry(&self, plot_id: i64, geometry: &PlotGeometry) -> Result<(), ActionError> {
        geometry.validate()?;
        let request = UpdatePlotRequest {
            plot_id: Some(plot_id),
            geometry: Some(geometry.to_json_string().map_err(ClientError::from)?),
        };
        let response = self.store.update_plot(&request).await?;
        tracing::info!(plot_id = response.plot.id, "{}", response.message);
        Ok(())
    }

    async fn refresh_after_write(&mut self) {
        // refresh() has already logged and surfaced the failure
        let _ = self.refresh().await;
    }

    fn report_failure(&mut self, err: &ActionError) {
        tracing::error!("{err}");
        self.set_status(SaveStatus::Error(err.to_string()));
    }

    fn set_status(&mut self, status: SaveStatus) {
        self.surface.show_status(&status);
        self.session.set_save_status(status);
    }

    fn sync_draw_session(&mut self) {
        self.surface.show_editable(self.session.editable());
        self.surface.set_save_control(self.session.save_control());
        self.surface.show_pending(self.session.pending());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use plot_protocol::{
        Feature, FeatureCollection, PlotProperties, PlotStatus, UpdatePlotResponse,
    };
    use serde_json::{Value, json};

    use super::*;
    use crate::config::TileLayer;
    use crate::session::{EditableShape, SaveControl};

    #[derive(Default)]
    struct FakeState {
        features: Vec<Feature>,
        next_id: i64,
        fail_create: bool,
        fail_fetch: bool,
        fetches: usize,
        creates: Vec<CreatePlotRequest>,
        updates: Vec<UpdatePlotRequest>,
    }

    #[derive(Default)]
    struct FakeStore {
        state: Mutex<FakeState>,
    }

    impl FakeStore {
        fn with_features(features: Vec<Feature>) -> Self {
            let next_id = features
                .iter()
                .map(|f| f.properties.plot_id)
                .max()
                .unwrap_or(0)
                + 1;
            Self {
                state: Mutex::new(FakeState {
                    features,
                    next_id,
                    ..FakeState::default()
                }),
            }
        }

        fn fetches(&self) -> usize {
            self.state.lock().unwrap().fetches
        }
    }

    fn record(id: i64, geometry: String) -> PlotRecord {
        PlotRecord {
            id,
            plot_num: None,
            section_id: Some(1),
            geometry,
            status: PlotStatus::Available,
            area_sqm: None,
            created_at: "2026-10-19T00:00:00+00:00".to_string(),
            updated_at: "2026-10-19T00:00:00+00:00".to_string(),
        }
    }

    #[async_trait]
    impl PlotStore for FakeStore {
        async fn fetch_features(&self) -> ClientResult<FeatureCollection> {
            let mut state = self.state.lock().unwrap();
            state.fetches += 1;
            if state.fail_fetch {
                return Err(ClientError::InvalidResponse("connection reset".to_string()));
            }
            Ok(FeatureCollection::new(state.features.clone()))
        }

        async fn create_plot(&self, request: &CreatePlotRequest) -> ClientResult<PlotRecord> {
            let mut state = self.state.lock().unwrap();
            state.creates.push(request.clone());
            if state.fail_create {
                return Err(ClientError::Server {
                    status: 500,
                    message: "database is locked".to_string(),
                });
            }
            let id = state.next_id;
            state.next_id += 1;
            let geometry = request.geometry.clone().unwrap_or_default();
            state.features.push(feature(id, serde_json::from_str(&geometry).unwrap()));
            Ok(record(id, geometry))
        }

        async fn update_plot(
            &self,
            request: &UpdatePlotRequest,
        ) -> ClientResult<UpdatePlotResponse> {
            let mut state = self.state.lock().unwrap();
            state.updates.push(request.clone());
            let plot_id = request.plot_id.unwrap_or_default();
            let geometry = request.geometry.clone().unwrap_or_default();
            let Some(feature) = state
                .features
                .iter_mut()
                .find(|f| f.properties.plot_id == plot_id)
            else {
                return Err(ClientError::NotFound(format!("plot {plot_id} not found")));
            };
            feature.geometry = Some(serde_json::from_str(&geometry).unwrap());
            Ok(UpdatePlotResponse {
                message: "Plot updated successfully!".to_string(),
                plot: record(plot_id, geometry),
            })
        }
    }

    #[derive(Debug, Default)]
    struct RecordingSurface {
        views: Vec<MapView>,
        tile_layers: usize,
        rendered: Vec<StyledPlot>,
        attach_calls: Vec<bool>,
        editable: Vec<EditableShape>,
        save_control: Option<SaveControl>,
        pending_shown: bool,
        statuses: Vec<SaveStatus>,
        popups: Vec<(i64, String)>,
    }

    impl MapSurface for RecordingSurface {
        fn set_view(&mut self, view: MapView) {
            self.views.push(view);
        }

        fn add_tile_layer(&mut self, _tiles: &TileLayer) {
            self.tile_layers += 1;
        }

        fn render_plots(&mut self, plots: &[StyledPlot]) {
            self.rendered = plots.to_vec();
        }

        fn set_plots_attached(&mut self, attached: bool) {
            self.attach_calls.push(attached);
        }

        fn show_editable(&mut self, shapes: &[EditableShape]) {
            self.editable = shapes.to_vec();
        }

        fn set_save_control(&mut self, control: SaveControl) {
            self.save_control = Some(control);
        }

        fn show_pending(&mut self, geometry: Option<&PlotGeometry>) {
            self.pending_shown = geometry.is_some();
        }

        fn show_status(&mut self, status: &SaveStatus) {
            self.statuses.push(status.clone());
        }

        fn open_popup(&mut self, plot_id: i64, content: &str) {
            self.popups.push((plot_id, content.to_string()));
        }
    }

    fn ring(lng: f64, lat: f64) -> Value {
        json!([[lng, lat], [lng + 0.0001, lat], [lng + 0.0001, lat + 0.0001], [lng, lat]])
    }

    fn feature(plot_id: i64, geometry: Value) -> Feature {
        Feature::new(
            PlotProperties {
                plot_id,
                plot_num: None,
                section_name: "Garden".to_string(),
                status: PlotStatus::Available,
                area_sqm: Some(2.0),
            },
            Some(geometry),
        )
    }

    fn square(lng: f64, lat: f64) -> PlotGeometry {
        serde_json::from_value(json!({"type": "Polygon", "coordinates": [ring(lng, lat)]})).unwrap()
    }

    fn seeded_store() -> FakeStore {
        FakeStore::with_features(vec![
            feature(1, json!({"type": "Polygon", "coordinates": [ring(120.9758, 14.3052)]})),
            feature(2, json!({"type": "Polygon", "coordinates": [ring(120.9758, 95.0)]})),
            feature(
                3,
                json!({
                    "type": "MultiPolygon",
                    "coordinates": [[ring(120.9760, 14.3052)], [ring(120.9762, 14.3052)]]
                }),
            ),
        ])
    }

    fn controller(store: FakeStore) -> MapController<FakeStore, RecordingSurface> {
        MapController::new(store, RecordingSurface::default(), MapSettings::default(), 1)
    }

    #[tokio::test]
    async fn init_renders_only_valid_plots() {
        let mut map = controller(seeded_store());
        let rendered = map.init().await.unwrap();

        assert_eq!(rendered, 2);
        let surface = map.surface();
        assert_eq!(surface.views.len(), 1);
        assert_eq!(surface.tile_layers, 1);
        let ids: Vec<i64> = surface.rendered.iter().map(|p| p.plot_id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(surface.rendered[1].geometry.part_count(), 2);
        assert_eq!(surface.rendered[0].style.fill_color, "#90EE90");
        assert_eq!(surface.attach_calls, vec![true]);
        assert_eq!(surface.save_control, Some(SaveControl::Disabled));
    }

    #[tokio::test]
    async fn draw_then_save_posts_to_configured_section_and_refreshes() {
        let mut map = controller(seeded_store());
        map.init().await.unwrap();

        let drawn = square(120.9770, 14.3060);
        map.on_shape_created(drawn.clone());
        assert_eq!(map.surface().save_control, Some(SaveControl::Enabled));
        assert!(map.surface().pending_shown);

        let saved = map.store_plot().await.unwrap();
        assert_eq!(saved.id, 4);

        {
            let state = map.store().state.lock().unwrap();
            assert_eq!(state.creates.len(), 1);
            assert_eq!(state.creates[0].section_id, Some(1));
            let sent: PlotGeometry =
                serde_json::from_str(state.creates[0].geometry.as_deref().unwrap()).unwrap();
            assert_eq!(sent, drawn);
        }
        assert_eq!(map.store().fetches(), 2);
        assert_eq!(map.surface().rendered.len(), 3);
        assert!(map.session().pending().is_none());
        assert!(map.session().unsaved().is_empty());
        assert_eq!(map.surface().save_control, Some(SaveControl::Disabled));
        assert_eq!(map.session().save_status(), &SaveStatus::Saved);
    }

    #[tokio::test]
    async fn failed_save_keeps_drawing_and_skips_refresh() {
        let store = seeded_store();
        store.state.lock().unwrap().fail_create = true;
        let mut map = controller(store);
        map.init().await.unwrap();
        map.on_shape_created(square(120.9770, 14.3060));

        let err = map.store_plot().await.unwrap_err();
        assert!(matches!(err, ActionError::Store(ClientError::Server { status: 500, .. })));

        assert_eq!(map.store().fetches(), 1);
        assert!(map.session().pending().is_some());
        assert_eq!(map.surface().save_control, Some(SaveControl::Enabled));
        assert!(matches!(map.session().save_status(), SaveStatus::Error(_)));
    }

    #[tokio::test]
    async fn save_without_drawing_never_calls_the_store() {
        let mut map = controller(seeded_store());
        map.init().await.unwrap();

        let err = map.store_plot().await.unwrap_err();
        assert!(matches!(err, ActionError::MissingGeometry));
        assert!(map.store().state.lock().unwrap().creates.is_empty());
        assert_eq!(
            map.session().save_status().to_string(),
            "Error: Cannot save (missing data)."
        );
    }

    #[tokio::test]
    async fn out_of_range_drawing_is_rejected_before_saving() {
        let mut map = controller(seeded_store());
        map.init().await.unwrap();
        map.on_shape_created(square(200.0, 14.3));

        let err = map.store_plot().await.unwrap_err();
        assert!(matches!(err, ActionError::InvalidGeometry(_)));
        assert!(map.store().state.lock().unwrap().creates.is_empty());
    }

    #[tokio::test]
    async fn deleting_every_drawing_disables_save() {
        let mut map = controller(seeded_store());
        map.init().await.unwrap();
        let first = map.on_shape_created(square(120.9770, 14.3060));
        let second = map.on_shape_created(square(120.9772, 14.3060));

        map.on_shapes_deleted(&[first]);
        assert_eq!(map.surface().save_control, Some(SaveControl::Enabled));

        map.on_shapes_deleted(&[second]);
        assert_eq!(map.surface().save_control, Some(SaveControl::Disabled));
        assert!(!map.surface().pending_shown);
        assert!(map.surface().editable.is_empty());
    }

    #[tokio::test]
    async fn editing_a_selected_plot_sends_update_and_refreshes() {
        let mut map = controller(seeded_store());
        map.init().await.unwrap();

        let shape = map
            .on_plot_clicked(
                1,
                ClickModifiers {
                    shift: true,
                    ..ClickModifiers::NONE
                },
            )
            .unwrap();
        assert_eq!(map.surface().editable.len(), 1);

        let moved = square(120.9780, 14.3070);
        let outcomes = map.on_shapes_edited(vec![(shape, moved.clone())]).await;
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].plot_id, 1);
        assert!(outcomes[0].result.is_ok());

        {
            let state = map.store().state.lock().unwrap();
            assert_eq!(state.updates[0].plot_id, Some(1));
        }
        assert_eq!(map.store().fetches(), 2);
        assert_eq!(map.session().plot(1).unwrap().geometry, moved);
        assert!(map.session().editable().is_empty());
    }

    #[tokio::test]
    async fn failed_update_surfaces_error_without_refresh() {
        let mut map = controller(seeded_store());
        map.init().await.unwrap();
        let shape = map.on_popup_edit(3).unwrap();
        map.store()
            .state
            .lock()
            .unwrap()
            .features
            .retain(|f| f.properties.plot_id != 3);

        let outcomes = map.on_shapes_edited(vec![(shape, square(120.9790, 14.3052))]).await;
        assert!(matches!(
            outcomes[0].result,
            Err(ActionError::Store(ClientError::NotFound(_)))
        ));
        assert_eq!(map.store().fetches(), 1);
        assert!(matches!(map.session().save_status(), SaveStatus::Error(_)));
    }

    #[tokio::test]
    async fn editing_unsaved_drawing_sends_nothing() {
        let mut map = controller(seeded_store());
        map.init().await.unwrap();
        let shape = map.on_shape_created(square(120.9770, 14.3060));

        let moved = square(120.9771, 14.3061);
        let outcomes = map.on_shapes_edited(vec![(shape, moved.clone())]).await;
        assert!(outcomes.is_empty());
        assert_eq!(map.session().pending(), Some(&moved));
        assert!(map.store().state.lock().unwrap().updates.is_empty());
    }

    #[tokio::test]
    async fn plain_click_opens_popup() {
        let mut map = controller(seeded_store());
        map.init().await.unwrap();

        assert!(map.on_plot_clicked(1, ClickModifiers::NONE).is_none());
        assert_eq!(map.surface().popups.len(), 1);
        assert!(map.surface().popups[0].1.starts_with("Plot: 1\n"));
        assert!(map.surface().editable.is_empty());
    }

    #[tokio::test]
    async fn zoom_out_detaches_layer_after_debounce() {
        let mut map = controller(seeded_store());
        map.init().await.unwrap();
        let t0 = Instant::now();

        map.on_zoom_changed(15.0, t0);
        assert!(!map.tick(t0 + Duration::from_millis(100)));
        map.on_zoom_changed(16.0, t0 + Duration::from_millis(150));
        assert!(!map.tick(t0 + Duration::from_millis(300)));
        assert!(map.session().plots_attached());

        assert!(map.tick(t0 + Duration::from_millis(400)));
        assert!(!map.session().plots_attached());

        map.on_zoom_changed(19.0, t0 + Duration::from_millis(500));
        map.on_zoom_changed(18.0, t0 + Duration::from_millis(520));
        assert!(map.tick(t0 + Duration::from_millis(800)));
        assert_eq!(map.surface().attach_calls, vec![true, false, true]);
    }

    #[tokio::test]
    async fn zoom_within_threshold_does_not_toggle() {
        let mut map = controller(seeded_store());
        map.init().await.unwrap();
        let t0 = Instant::now();

        map.on_zoom_changed(20.0, t0);
        assert!(!map.tick(t0 + Duration::from_secs(1)));
        assert_eq!(map.surface().attach_calls, vec![true]);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_plots() {
        let mut map = controller(seeded_store());
        map.init().await.unwrap();
        let rendered_before = map.surface().rendered.clone();
        map.store().state.lock().unwrap().fail_fetch = true;

        assert!(map.refresh().await.is_err());

        assert_eq!(map.store().fetches(), 2);
        let ids: Vec<i64> = map.session().plots().iter().map(|p| p.plot_id()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(map.surface().rendered, rendered_before);
        assert!(matches!(map.session().save_status(), SaveStatus::Error(_)));
        assert!(matches!(map.surface().statuses.last(), Some(SaveStatus::Error(_))));
    }

    #[tokio::test]
    async fn save_during_zoom_waits_for_debounce() {
        let mut map = controller(seeded_store());
        map.init().await.unwrap();
        let t0 = Instant::now();

        map.on_zoom_changed(15.0, t0);
        map.on_shape_created(square(120.9770, 14.3060));
        map.store_plot().await.unwrap();
        assert_eq!(map.surface().attach_calls, vec![true]);
        assert!(map.session().plots_attached());

        assert!(map.tick(t0 + Duration::from_millis(300)));
        assert_eq!(map.surface().attach_calls, vec![true, false]);
    }
}
