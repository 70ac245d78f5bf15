//! Plot geometry as the map understands it: Polygon or MultiPolygon with
//! longitude/latitude positions.

use plot_protocol::{Feature, PlotProperties};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// `[longitude, latitude, ...]`; extra ordinates are carried but ignored.
pub type Position = Vec<f64>;
pub type Ring = Vec<Position>;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("feature has no geometry")]
    Missing,
    #[error("unsupported geometry type `{0}`")]
    Unsupported(String),
    #[error("malformed geometry: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("geometry has no coordinates")]
    Empty,
    #[error("coordinate {0:?} is outside longitude/latitude range")]
    OutOfRange(Vec<f64>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlotGeometry {
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
}

impl PlotGeometry {
    pub fn polygon(rings: Vec<Ring>) -> Self {
        Self::Polygon { coordinates: rings }
    }

    pub fn from_value(value: &Value) -> Result<Self, GeometryError> {
        match value.get("type").and_then(Value::as_str) {
            Some("Polygon") | Some("MultiPolygon") => {
                Ok(serde_json::from_value(value.clone())?)
            }
            Some(other) => Err(GeometryError::Unsupported(other.to_string())),
            None if value.is_null() => Err(GeometryError::Missing),
            None => Err(GeometryError::Unsupported(value.to_string())),
        }
    }

    /// Accepts either a bare geometry or a GeoJSON Feature wrapping one, as
    /// produced by drawing tools.
    pub fn from_geojson_str(text: &str) -> Result<Self, GeometryError> {
        let value: Value = serde_json::from_str(text)?;
        if value.get("type").and_then(Value::as_str) == Some("Feature") {
            return Self::from_value(value.get("geometry").unwrap_or(&Value::Null));
        }
        Self::from_value(&value)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn part_count(&self) -> usize {
        match self {
            Self::Polygon { .. } => 1,
            Self::MultiPolygon { coordinates } => coordinates.len(),
        }
    }

    pub fn positions(&self) -> Box<dyn Iterator<Item = &Position> + '_> {
        match self {
            Self::Polygon { coordinates } => Box::new(coordinates.iter().flatten()),
            Self::MultiPolygon { coordinates } => {
                Box::new(coordinates.iter().flatten().flatten())
            }
        }
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        let mut seen = false;
        for position in self.positions() {
            if !is_valid_position(position) {
                return Err(GeometryError::OutOfRange(position.clone()));
            }
            seen = true;
        }
        if seen { Ok(()) } else { Err(GeometryError::Empty) }
    }
}

pub fn is_valid_position(position: &[f64]) -> bool {
    let [lng, lat, ..] = position else {
        return false;
    };
    lng.is_finite()
        && lat.is_finite()
        && (-180.0..=180.0).contains(lng)
        && (-90.0..=90.0).contains(lat)
}

/// A fetched plot whose geometry survived normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPlot {
    pub properties: PlotProperties,
    pub geometry: PlotGeometry,
}

impl RenderedPlot {
    pub fn plot_id(&self) -> i64 {
        self.properties.plot_id
    }
}

/// Multi-part plots keep every part.
pub fn normalize_feature(feature: &Feature) -> Result<RenderedPlot, GeometryError> {
    let value = feature.geometry.as_ref().ok_or(GeometryError::Missing)?;
    let geometry = PlotGeometry::from_value(value)?;
    geometry.validate()?;
    Ok(RenderedPlot {
        properties: feature.properties.clone(),
        geometry,
    })
}

pub fn normalize_features(features: &[Feature]) -> Vec<RenderedPlot> {
    features
        .iter()
        .filter_map(|feature| match normalize_feature(feature) {
            Ok(plot) => Some(plot),
            Err(err) => {
                tracing::warn!(plot_id = feature.properties.plot_id, "skipping plot: {err}");
                None
            }
        })
        .collect()
}
