//! Provisioning import of the section and plot GeoJSON files.

use std::path::{Path, PathBuf};

use plot_protocol::PlotStatus;
use rusqlite::Connection;
use serde::Deserialize;
use thiserror::Error;

use crate::db::{self, PlotUpsert, SectionUpsert};

pub const SECTIONS_FILE: &str = "sections.geojson";
pub const PLOTS_FILE: &str = "plots.geojson";

const UNNAMED_SECTION: &str = "Unnamed";

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("GeoJSON file not found at path: {}", .0.display())]
    Missing(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid GeoJSON format in {}: 'features' key not found", .0.display())]
    MissingFeatures(PathBuf),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub sections: Option<usize>,
    pub plots: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct SeedDocument<P> {
    features: Option<Vec<SeedFeature<P>>>,
}

#[derive(Debug, Deserialize)]
struct SeedFeature<P> {
    properties: Option<P>,
    #[serde(default)]
    geometry: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
struct SectionProps {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PlotProps {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    section_id: Option<i64>,
    #[serde(default)]
    plot_num: Option<serde_json::Value>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    area_sqm: Option<f64>,
}

/// Imports sections then plots from `dir`. A missing or malformed file is
/// logged and skipped; database failures abort the import.
pub fn seed_from_dir(conn: &mut Connection, dir: &Path) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    tracing::info!("importing sections...");
    match seed_sections(conn, &dir.join(SECTIONS_FILE)) {
        Ok(count) => {
            tracing::info!("sections imported: {count}");
            report.sections = Some(count);
        }
        Err(SeedError::Database(err)) => return Err(SeedError::Database(err)),
        Err(err) => tracing::error!("{err}"),
    }

    tracing::info!("importing plots...");
    match seed_plots(conn, &dir.join(PLOTS_FILE)) {
        Ok(count) => {
            tracing::info!("plots imported: {count}");
            report.plots = Some(count);
        }
        Err(SeedError::Database(err)) => return Err(SeedError::Database(err)),
        Err(err) => tracing::error!("{err}"),
    }

    Ok(report)
}

pub fn seed_sections(conn: &mut Connection, path: &Path) -> Result<usize, SeedError> {
    let features = read_features::<SectionProps>(path)?;

    let tx = conn.transaction()?;
    for feature in &features {
        let props = feature.properties.as_ref();
        db::upsert_section(
            &tx,
            &SectionUpsert {
                id: props.and_then(|p| p.id),
                name: props
                    .and_then(|p| p.name.clone())
                    .unwrap_or_else(|| UNNAMED_SECTION.to_string()),
                geometry: feature.geometry.to_string(),
            },
        )?;
    }
    tx.commit()?;

    Ok(features.len())
}

pub fn seed_plots(conn: &mut Connection, path: &Path) -> Result<usize, SeedError> {
    let features = read_features::<PlotProps>(path)?;

    let tx = conn.transaction()?;
    for feature in &features {
        let props = feature.properties.as_ref();
        let status = props.and_then(|p| p.status.as_deref()).map(PlotStatus::parse);
        if status == Some(PlotStatus::Unknown) {
            tracing::warn!(
                plot_id = ?props.and_then(|p| p.id),
                "unknown plot status in seed file, keeping default"
            );
        }

        db::upsert_plot(
            &tx,
            &PlotUpsert {
                id: props.and_then(|p| p.id),
                section_id: props.and_then(|p| p.section_id),
                geometry: feature.geometry.to_string(),
                plot_num: props.and_then(|p| p.plot_num.as_ref()).and_then(plot_num_text),
                status,
                area_sqm: props.and_then(|p| p.area_sqm),
            },
        )?;
    }
    tx.commit()?;

    Ok(features.len())
}

fn read_features<P>(path: &Path) -> Result<Vec<SeedFeature<P>>, SeedError>
where
    P: for<'de> Deserialize<'de>,
{
    if !path.exists() {
        return Err(SeedError::Missing(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document: SeedDocument<P> =
        serde_json::from_str(&text).map_err(|source| SeedError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    document
        .features
        .ok_or_else(|| SeedError::MissingFeatures(path.to_path_buf()))
}

fn plot_num_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
