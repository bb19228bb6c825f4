mod app;
mod db;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use crate::external::onnx_scorer::ModelRegistry;
use crate::external::scorer::ScorerMode;
use crate::services::features::FeatureSpec;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    logging::init_logging(logging::LoggingConfig::from_env())?;

    let database_url = std::env::var("DATABASE_URL")?;
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    let feature_spec = Arc::new(FeatureSpec::load().await);
    tracing::info!(
        "Feature spec: {} products, {} cities, vector width {}",
        feature_spec.product_categories.len(),
        feature_spec.city_categories.len(),
        feature_spec.width()
    );

    let model_registry = Arc::new(ModelRegistry::from_env(feature_spec.width()));

    // Select scorer strategy based on the SCORER env var (defaults to auto)
    let scorer_name = std::env::var("SCORER").unwrap_or_else(|_| "auto".to_string());
    let scorer_mode = ScorerMode::parse(&scorer_name).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid SCORER: {}. Must be 'onnx', 'statistical', or 'auto'",
            scorer_name
        )
    })?;

    match scorer_mode {
        ScorerMode::Onnx => {
            tracing::info!("📈 Using scorer: trained ONNX model only");
            model_registry
                .get()
                .map_err(|e| anyhow::anyhow!("Failed to load ONNX model (check MODEL_PATH): {}", e))?;
        }
        ScorerMode::Statistical => {
            tracing::info!("📈 Using scorer: statistical moving-average fallback only");
        }
        ScorerMode::Auto => {
            tracing::info!("📈 Using scorer: ONNX model with statistical fallback");
            model_registry.warm_up();
        }
    }

    let forecast_timeout = std::env::var("FORECAST_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(30u64);

    let state = AppState {
        pool,
        feature_spec,
        model_registry,
        scorer_mode,
        forecast_timeout: Duration::from_secs(forecast_timeout),
    };
    let app = app::create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Agriprice backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
