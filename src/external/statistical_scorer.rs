use crate::external::scorer::{Scorer, ScorerError, ScoringInput};
use crate::models::DailySeries;

pub const STATISTICAL_MODEL_VERSION: &str = "Statistical-Moving-Average-v1.0";

/// Fallback scorer that needs no trained model.
///
/// Captures the 7-day average, a short-term trend and the 7-day standard
/// deviation from the real series once, then projects
/// `avg + avg * trend * day_offset * 0.5` plus a bounded random perturbation.
/// Deliberately non-deterministic; every prediction stays within
/// `avg ± (|trend| * avg * day_offset * 0.5 + 0.15 * std)`.
pub struct StatisticalScorer {
    avg7: f64,
    trend: f64,
    std7: f64,
}

impl StatisticalScorer {
    pub fn from_series(series: &DailySeries) -> Self {
        let recent = series.tail_prices(7);
        let avg7 = mean(&recent);

        // Trend: newest 3 days of the window against its oldest 3.
        let trend = if recent.len() >= 6 {
            let newer = mean(&recent[recent.len() - 3..]);
            let older = mean(&recent[..3]);
            if older > 0.0 {
                (newer - older) / older
            } else {
                0.0
            }
        } else {
            0.0
        };

        let variance = recent
            .iter()
            .map(|p| (p - avg7).powi(2))
            .sum::<f64>()
            / recent.len().max(1) as f64;

        Self {
            avg7,
            trend,
            std7: variance.sqrt(),
        }
    }
}

impl Scorer for StatisticalScorer {
    fn model_version(&self) -> &str {
        STATISTICAL_MODEL_VERSION
    }

    fn expected_width(&self) -> Option<usize> {
        None
    }

    fn score(&self, input: &ScoringInput) -> Result<f64, ScorerError> {
        let noise = (rand::random::<f64>() - 0.5) * self.std7 * 0.3;
        let trend_factor = self.avg7 * self.trend * input.day_offset as f64 * 0.5;
        Ok((self.avg7 + trend_factor + noise).max(0.0))
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
