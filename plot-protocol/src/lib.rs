use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// Section name reported for plots whose section row is missing.
pub const UNASSIGNED_SECTION: &str = "N/A";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotStatus {
    #[default]
    Available,
    Occupied,
    Reserved,
    #[serde(other)]
    Unknown,
}

impl PlotStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Reserved => "reserved",
            Self::Unknown => "unknown",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "available" => Self::Available,
            "occupied" => Self::Occupied,
            "reserved" => Self::Reserved,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for PlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
    #[default]
    Feature,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureCollectionType {
    #[default]
    FeatureCollection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotProperties {
    pub plot_id: i64,
    #[serde(default)]
    pub plot_num: Option<String>,
    /// Carries the section *name* on the wire, under the historical key.
    #[serde(rename = "section_id")]
    pub section_name: String,
    #[serde(default)]
    pub status: PlotStatus,
    #[serde(default)]
    pub area_sqm: Option<f64>,
}

/// One plot as served by the list endpoint. `geometry` is `None` when the
/// stored text could not be parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default)]
    pub kind: FeatureType,
    pub properties: PlotProperties,
    pub geometry: Option<serde_json::Value>,
}

impl Feature {
    pub fn new(properties: PlotProperties, geometry: Option<serde_json::Value>) -> Self {
        Self {
            kind: FeatureType::Feature,
            properties,
            geometry,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default)]
    pub kind: FeatureCollectionType,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: FeatureCollectionType::FeatureCollection,
            features,
        }
    }
}

/// Create body as the connector sends it. Fields are optional so a partial
/// request can still be built and rejected by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePlotRequest {
    #[serde(default)]
    pub section_id: Option<i64>,
    /// Serialized GeoJSON geometry.
    #[serde(default)]
    pub geometry: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePlotRequest {
    #[serde(default)]
    pub plot_id: Option<i64>,
    #[serde(default)]
    pub geometry: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotRecord {
    pub id: i64,
    pub plot_num: Option<String>,
    pub section_id: Option<i64>,
    pub geometry: String,
    pub status: PlotStatus,
    pub area_sqm: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePlotResponse {
    pub message: String,
    pub plot: PlotRecord,
}
