use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to locate config dir")]
    NoConfigDir,
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLayer {
    pub url_template: String,
    pub subdomains: Vec<String>,
    pub max_zoom: u8,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url_template: "https://{s}.google.com/vt/lyrs=s&x={x}&y={y}&z={z}".to_string(),
            subdomains: ["mt0", "mt1", "mt2", "mt3"].map(String::from).to_vec(),
            max_zoom: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub center: LatLng,
    pub zoom: f64,
    /// The all-plots layer is only attached at or above this zoom.
    pub min_render_zoom: f64,
    pub zoom_debounce_ms: u64,
    pub tiles: TileLayer,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            center: LatLng {
                lat: 14.3052681,
                lng: 120.9758,
            },
            zoom: 18.0,
            min_render_zoom: 17.0,
            zoom_debounce_ms: 200,
            tiles: TileLayer::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    pub server: String,
    /// Section newly drawn plots are filed under.
    pub section_id: i64,
    pub request_timeout_secs: u64,
    pub map: MapSettings,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            server: "http://127.0.0.1:8787".to_string(),
            section_id: 1,
            request_timeout_secs: 30,
            map: MapSettings::default(),
        }
    }
}

impl ConnectorConfig {
    /// Missing file means defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(io_err)
    }
}

pub fn config_path() -> Result<PathBuf, ConfigError> {
    let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(base.join("plot-map").join("connector.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConnectorConfig::load(&dir.path().join("connector.toml")).unwrap();
        assert_eq!(config, ConnectorConfig::default());
        assert_eq!(config.section_id, 1);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("connector.toml");
        std::fs::write(&path, "server = \"http://plots.local\"\n[map]\nmin_render_zoom = 19.0\n")
            .unwrap();

        let config = ConnectorConfig::load(&path).unwrap();
        assert_eq!(config.server, "http://plots.local");
        assert_eq!(config.map.min_render_zoom, 19.0);
        assert_eq!(config.map.zoom, 18.0);
        assert_eq!(config.map.tiles.subdomains.len(), 4);
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("connector.toml");
        let mut config = ConnectorConfig::default();
        config.section_id = 4;
        config.save(&path).unwrap();

        assert_eq!(ConnectorConfig::load(&path).unwrap().section_id, 4);
    }
}
