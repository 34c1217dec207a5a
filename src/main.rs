use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use olympics_ml_backend::{AppState, Config, dataset, ml::ModelBundle, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "olympics_ml_backend=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        "Starting Olympics ML backend on port {} with data at {}",
        config.port,
        config.athletes_csv
    );

    // Load and join the athlete-events table once; it is immutable afterwards
    let dataset = dataset::load_dataset(&config.athletes_csv, &config.regions_csv)?;
    tracing::info!(
        "Loaded {} athlete event rows ({} countries)",
        dataset.len(),
        olympics_ml_backend::stats::aggregate::distinct_regions(&dataset).len()
    );

    // Load pre-trained models (no training happens in the serving path)
    let models = ModelBundle::load(&config.lr_model_path, &config.rf_model_path)?;
    tracing::info!("Models loaded successfully");

    // Create shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        dataset,
        models,
    });

    // Build router
    let app = routes::app(state)?;

    // Start server
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!("Server listening on 0.0.0.0:{}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
