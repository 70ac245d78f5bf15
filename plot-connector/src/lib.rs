//! Map-side synchronization for the plot store: keeps a drawing/editing map
//! surface in step with the server's GeoJSON feature collection.

pub mod config;
pub mod console;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod session;
pub mod store;
pub mod style;
pub mod surface;
pub mod visibility;

pub use config::{ConnectorConfig, LatLng, MapSettings, TileLayer};
pub use console::ConsoleSurface;
pub use controller::{ClickModifiers, EditOutcome, MapController};
pub use error::{ActionError, ClientError, ClientResult};
pub use geometry::{GeometryError, PlotGeometry, RenderedPlot};
pub use session::{EditableShape, MapSession, MapView, SaveControl, SaveStatus, ShapeId};
pub use store::{HttpPlotStore, PlotStore};
pub use surface::{MapSurface, StyledPlot};
