use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::external::scorer::{Scorer, ScorerMode};
use crate::external::statistical_scorer::StatisticalScorer;
use crate::models::{DailySeries, ForecastRequest, PriceForecast, PricePrediction};
use crate::services::forecast_engine::{run_forecast, CancelFlag};
use crate::services::history_service;
use crate::state::AppState;

pub const MAX_FORECAST_DAYS: u32 = 30;

/// End-to-end forecast: read history, score N days ahead, write back.
///
/// The engine itself is a pure function of the series and the scorer;
/// independent requests share nothing mutable and run fully in parallel.
pub async fn generate_forecast(
    state: &AppState,
    request: ForecastRequest,
) -> Result<PriceForecast, AppError> {
    if request.days == 0 || request.days > MAX_FORECAST_DAYS {
        return Err(AppError::Validation(format!(
            "days must be between 1 and {}",
            MAX_FORECAST_DAYS
        )));
    }

    let (product, series) = history_service::get_daily_series(
        &state.pool,
        &request.product,
        &request.city,
        request.lookback_days,
    )
    .await?;

    let scorer = resolve_scorer(state, &series)?;
    let model_version = scorer.model_version().to_string();

    info!(
        "Forecasting {} days for {} in {} with {}",
        request.days, request.product, request.city, model_version
    );

    // The scorer loop is CPU-bound and strictly sequential (each day feeds
    // the next), so it runs on a blocking worker under the per-request
    // timeout. On timeout the flag stops the loop at the next iteration.
    let cancel = CancelFlag::default();
    let engine_cancel = cancel.clone();
    let engine_series = series.clone();
    let engine_spec = state.feature_spec.clone();
    let engine_scorer = scorer.clone();
    let product_name = request.product.clone();
    let city = request.city.clone();
    let days = request.days;

    let task = tokio::task::spawn_blocking(move || {
        run_forecast(
            &engine_series,
            &engine_spec,
            &product_name,
            &city,
            days,
            engine_scorer.as_ref(),
            &engine_cancel,
        )
    });

    let predictions = match tokio::time::timeout(state.forecast_timeout, task).await {
        Ok(Ok(result)) => result?,
        Ok(Err(join_error)) => {
            error!("Forecast task failed: {}", join_error);
            return Err(AppError::Scorer(format!(
                "forecast task failed: {}",
                join_error
            )));
        }
        Err(_) => {
            cancel.cancel();
            warn!(
                "Forecast for {} in {} exceeded {:?} and was cancelled",
                request.product, request.city, state.forecast_timeout
            );
            return Err(AppError::Cancelled);
        }
    };

    let generated_at = Utc::now();
    let rows: Vec<PricePrediction> = predictions
        .iter()
        .map(|point| PricePrediction {
            id: Uuid::new_v4(),
            product_id: product.id,
            product_name: product.name.clone(),
            city: request.city.clone(),
            predict_date: point.date,
            predicted_price: point.price,
            model_version: model_version.clone(),
            created_at: generated_at,
        })
        .collect();

    let mut warnings = Vec::new();
    let persisted = match db::prediction_queries::upsert_predictions(&state.pool, &rows).await {
        Ok(()) => true,
        Err(e) => {
            // The computation succeeded; only the write-back failed. Return
            // the forecast but say so.
            error!(
                "Forecast for {} in {} computed but not saved: {}",
                request.product, request.city, e
            );
            warnings.push(
                "Forecast could not be saved to the prediction store; it was returned but not persisted."
                    .to_string(),
            );
            false
        }
    };

    Ok(PriceForecast {
        success: true,
        product: request.product,
        city: request.city,
        predictions,
        model_version,
        persisted,
        warnings,
        generated_at,
    })
}

/// Pick the scorer strategy for this request per deployment configuration.
fn resolve_scorer(
    state: &AppState,
    series: &DailySeries,
) -> Result<Arc<dyn Scorer>, AppError> {
    match state.scorer_mode {
        ScorerMode::Statistical => Ok(Arc::new(StatisticalScorer::from_series(series))),
        ScorerMode::Onnx => state
            .model_registry
            .get()
            .map(|scorer| scorer as Arc<dyn Scorer>)
            .map_err(AppError::from),
        ScorerMode::Auto => match state.model_registry.get() {
            Ok(scorer) => Ok(scorer as Arc<dyn Scorer>),
            Err(e) => {
                warn!(
                    "Trained model unavailable ({}); falling back to statistical scorer",
                    e
                );
                Ok(Arc::new(StatisticalScorer::from_series(series)))
            }
        },
    }
}
