//! SQLite schema and the queries the plot endpoints and the seeder share.

use std::path::Path;

use chrono::Utc;
use plot_protocol::{Feature, PlotProperties, PlotRecord, PlotStatus, UNASSIGNED_SECTION};
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn open_database(path: &Path) -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open(path)?;
    run_migrations(&conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open_in_memory()?;
    run_migrations(&conn)?;
    Ok(conn)
}

pub fn now_utc() -> String {
    Utc::now().to_rfc3339()
}

pub fn run_migrations(conn: &Connection) -> Result<(), rusqlite::Error> {
    // plots.section_id is not a foreign key: seed files may reference
    // sections that were never imported, and those plots read back as "N/A".
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS sections (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            geometry TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS plots (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            plot_num TEXT,
            section_id INTEGER,
            geometry TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'available'
                CHECK (status IN ('available', 'occupied', 'reserved')),
            area_sqm REAL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_plots_section_id ON plots(section_id);
        ",
    )
}

/// A plot joined with its section name, as read for the feature listing.
#[derive(Debug, Clone)]
pub struct PlotRow {
    pub id: i64,
    pub plot_num: Option<String>,
    pub section_name: Option<String>,
    pub geometry: String,
    pub status: String,
    pub area_sqm: Option<f64>,
}

impl PlotRow {
    pub fn into_feature(self) -> Feature {
        let geometry = match serde_json::from_str::<serde_json::Value>(&self.geometry) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(plot_id = self.id, "stored geometry is not valid JSON: {err}");
                None
            }
        };

        Feature::new(
            PlotProperties {
                plot_id: self.id,
                plot_num: self.plot_num,
                section_name: self
                    .section_name
                    .unwrap_or_else(|| UNASSIGNED_SECTION.to_string()),
                status: PlotStatus::parse(&self.status),
                area_sqm: self.area_sqm,
            },
            geometry,
        )
    }
}

pub fn list_plots_with_section(conn: &Connection) -> Result<Vec<PlotRow>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.plot_num, s.name, p.geometry, p.status, p.area_sqm
         FROM plots p LEFT JOIN sections s ON s.id = p.section_id
         ORDER BY p.id",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(PlotRow {
            id: row.get(0)?,
            plot_num: row.get(1)?,
            section_name: row.get(2)?,
            geometry: row.get(3)?,
            status: row.get(4)?,
            area_sqm: row.get(5)?,
        })
    })?;

    rows.collect()
}

pub fn section_exists(conn: &Connection, section_id: i64) -> Result<bool, rusqlite::Error> {
    conn.query_row(
        "SELECT 1 FROM sections WHERE id = ?1",
        params![section_id],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
}

fn plot_record(row: &Row<'_>) -> Result<PlotRecord, rusqlite::Error> {
    let status: String = row.get(4)?;
    Ok(PlotRecord {
        id: row.get(0)?,
        plot_num: row.get(1)?,
        section_id: row.get(2)?,
        geometry: row.get(3)?,
        status: PlotStatus::parse(&status),
        area_sqm: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

pub fn find_plot(conn: &Connection, plot_id: i64) -> Result<Option<PlotRecord>, rusqlite::Error> {
    conn.query_row(
        "SELECT id, plot_num, section_id, geometry, status, area_sqm, created_at, updated_at
         FROM plots WHERE id = ?1",
        params![plot_id],
        plot_record,
    )
    .optional()
}

pub fn count_plots(conn: &Connection) -> Result<i64, rusqlite::Error> {
    conn.query_row("SELECT COUNT(*) FROM plots", [], |row| row.get(0))
}

pub fn insert_plot(
    conn: &Connection,
    section_id: i64,
    geometry: &str,
) -> Result<i64, rusqlite::Error> {
    let now = now_utc();
    conn.execute(
        "INSERT INTO plots (section_id, geometry, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
        params![section_id, geometry, now],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Overwrites a plot's geometry in one statement. Returns `false` when no
/// plot has that id.
pub fn update_plot_geometry(
    conn: &Connection,
    plot_id: i64,
    geometry: &str,
) -> Result<bool, rusqlite::Error> {
    let changed = conn.execute(
        "UPDATE plots SET geometry = ?1, updated_at = ?2 WHERE id = ?3",
        params![geometry, now_utc(), plot_id],
    )?;
    Ok(changed > 0)
}

#[derive(Debug, Clone, Default)]
pub struct SectionUpsert {
    pub id: Option<i64>,
    pub name: String,
    pub geometry: String,
}

pub fn upsert_section(conn: &Connection, section: &SectionUpsert) -> Result<i64, rusqlite::Error> {
    let now = now_utc();
    conn.execute(
        "INSERT INTO sections (id, name, geometry, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            geometry = excluded.geometry,
            updated_at = excluded.updated_at",
        params![section.id, section.name, section.geometry, now],
    )?;
    Ok(section.id.unwrap_or_else(|| conn.last_insert_rowid()))
}

#[derive(Debug, Clone, Default)]
pub struct PlotUpsert {
    pub id: Option<i64>,
    pub section_id: Option<i64>,
    pub geometry: String,
    pub plot_num: Option<String>,
    pub status: Option<PlotStatus>,
    pub area_sqm: Option<f64>,
}

/// Optional columns left as `None` keep their stored value on conflict.
pub fn upsert_plot(conn: &Connection, plot: &PlotUpsert) -> Result<i64, rusqlite::Error> {
    let now = now_utc();
    let status = plot
        .status
        .filter(|status| *status != PlotStatus::Unknown)
        .map(PlotStatus::as_str);

    conn.execute(
        "INSERT INTO plots (id, plot_num, section_id, geometry, status, area_sqm, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, COALESCE(?5, 'available'), ?6, ?7, ?7)
         ON CONFLICT(id) DO UPDATE SET
            plot_num = COALESCE(excluded.plot_num, plots.plot_num),
            section_id = excluded.section_id,
            geometry = excluded.geometry,
            status = COALESCE(?5, plots.status),
            area_sqm = COALESCE(excluded.area_sqm, plots.area_sqm),
            updated_at = excluded.updated_at",
        params![
            plot.id,
            plot.plot_num,
            plot.section_id,
            plot.geometry,
            status,
            plot.area_sqm,
            now
        ],
    )?;
    Ok(plot.id.unwrap_or_else(|| conn.last_insert_rowid()))
}
