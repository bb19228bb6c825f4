use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Duration;

use crate::errors::{AppError, MIN_HISTORY_DAYS};
use crate::external::scorer::{Scorer, ScoringInput};
use crate::models::{DailySeries, ForecastPoint};
use crate::services::features::{build_feature_vector, FeatureSpec};

/// Trailing window of real observations the autoregression starts from.
pub const WORKING_WINDOW_DAYS: usize = 14;

/// Cooperative cancellation signal, checked between forecast days.
///
/// A scorer call that has already started is allowed to finish, so the
/// working series is never left half-extended.
#[derive(Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Forecast `days` consecutive days past the end of `series`.
///
/// Day 1 is scored from the real history; every later day is scored from the
/// history extended with the engine's own earlier predictions (its lag_1 is
/// the previous day's prediction, never a real price the engine could not
/// have had). Any scorer failure aborts the whole forecast — a partial
/// forecast is never returned, because each remaining day would depend on
/// the failed one.
pub fn run_forecast(
    series: &DailySeries,
    spec: &FeatureSpec,
    product: &str,
    city: &str,
    days: u32,
    scorer: &dyn Scorer,
    cancel: &CancelFlag,
) -> Result<Vec<ForecastPoint>, AppError> {
    if days == 0 {
        return Err(AppError::Validation("days must be positive".to_string()));
    }
    if series.len() < MIN_HISTORY_DAYS {
        return Err(AppError::InsufficientHistory {
            required: MIN_HISTORY_DAYS,
            got: series.len(),
        });
    }

    let last_real_date = series
        .last_date()
        .ok_or_else(|| AppError::Validation("series has no observations".to_string()))?;

    // Real prices only; predictions are appended as synthetic observations.
    let mut working = series.tail_prices(WORKING_WINDOW_DAYS);
    let mut forecast = Vec::with_capacity(days as usize);

    for day_offset in 1..=days {
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        let predict_date = last_real_date + Duration::days(day_offset as i64);
        let features = build_feature_vector(&working, predict_date, product, city, spec)?;

        if let Some(expected) = scorer.expected_width() {
            if expected != features.len() {
                return Err(AppError::SchemaMismatch {
                    expected,
                    got: features.len(),
                });
            }
        }

        let predicted = scorer
            .score(&ScoringInput {
                features: &features,
                day_offset,
            })?
            .max(0.0);

        working.push(predicted);
        forecast.push(ForecastPoint {
            date: predict_date,
            price: round2(predicted),
        });
    }

    Ok(forecast)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
