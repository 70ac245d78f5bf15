use plothub::{ServerConfig, run_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plothub=info,tower_http=info".into()),
        )
        .init();

    let mut config = ServerConfig::default();
    if let Ok(bind) = std::env::var("PLOTHUB_BIND") {
        config.bind = bind;
    }
    if let Ok(db_path) = std::env::var("PLOTHUB_DB_PATH") {
        config.db_path = db_path.into();
    }
    if let Ok(seed_dir) = std::env::var("PLOTHUB_SEED_DIR") {
        if !seed_dir.trim().is_empty() {
            config.seed_dir = Some(seed_dir.into());
        }
    }
    if let Ok(static_dir) = std::env::var("PLOTHUB_STATIC_DIR") {
        if static_dir.trim().is_empty() {
            config.static_dir = None;
        } else {
            config.static_dir = Some(static_dir.into());
        }
    }

    run_server(config).await
}
