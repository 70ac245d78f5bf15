use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use clap::{Parser, Subcommand};
use plot_connector::{
    ConnectorConfig, ConsoleSurface, HttpPlotStore, MapController, PlotGeometry, config,
};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Overrides the server from the config file
    #[arg(long)]
    server: Option<String>,

    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load and print every plot the map would render
    Show,
    /// Submit a drawn polygon (GeoJSON Feature or geometry) as a new plot
    Draw { geojson_path: PathBuf },
    /// Replace the boundary of an existing plot
    Edit { plot_id: i64, geojson_path: PathBuf },
    /// Zoom the map and report whether plots stay visible
    Zoom { level: f64 },
    /// Write the current settings to the config file
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plot_connector=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = match cli.config {
        Some(path) => path,
        None => config::config_path()?,
    };
    let mut config = ConnectorConfig::load(&config_path)?;
    if let Some(server) = cli.server {
        config.server = server;
    }

    if let Commands::InitConfig = cli.command {
        config.save(&config_path)?;
        println!("Wrote {}", config_path.display());
        return Ok(());
    }

    let store = HttpPlotStore::new(
        config.server.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;
    let mut map = MapController::new(
        store,
        ConsoleSurface::stdout(),
        config.map.clone(),
        config.section_id,
    );
    map.init().await?;

    match cli.command {
        Commands::Show | Commands::InitConfig => {}
        Commands::Draw { geojson_path } => {
            let geometry = read_geometry(&geojson_path)?;
            map.on_shape_created(geometry);
            let plot = map.store_plot().await?;
            println!("Created plot {}", plot.id);
        }
        Commands::Edit {
            plot_id,
            geojson_path,
        } => {
            let geometry = read_geometry(&geojson_path)?;
            let shape = map
                .select_for_editing(plot_id)
                .ok_or_else(|| format!("plot {plot_id} is not on the map"))?;
            for outcome in map.on_shapes_edited(vec![(shape, geometry)]).await {
                outcome.result?;
                println!("Updated plot {}", outcome.plot_id);
            }
        }
        Commands::Zoom { level } => {
            map.on_zoom_changed(level, Instant::now());
            if let Some(wait) = map.zoom_settles_in(Instant::now()) {
                tokio::time::sleep(wait).await;
            }
            map.tick(Instant::now());
            let state = if map.session().plots_attached() {
                "visible"
            } else {
                "hidden"
            };
            println!("Plots {state} at zoom {level}");
        }
    }

    Ok(())
}

fn read_geometry(path: &Path) -> Result<PlotGeometry, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    Ok(PlotGeometry::from_geojson_str(&text)?)
}
