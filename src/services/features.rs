use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;

/// Numeric slots, in canonical order. Consumers must not reorder.
pub const NUMERIC_FEATURES: [&str; 9] = [
    "lag_1",
    "lag_3",
    "lag_7",
    "roll7_mean",
    "roll7_std",
    "roll10_mean",
    "dow",
    "dom",
    "month",
];

/// Catalogs the one-hot blocks are encoded against. Versioned together with
/// the trained model: their cardinalities fix the feature-vector width.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub product_categories: Vec<String>,
    pub city_categories: Vec<String>,
    pub numeric_features: Vec<String>,
}

impl Default for FeatureSpec {
    fn default() -> Self {
        Self {
            product_categories: [
                "Apples", "Beef", "Cabbage", "Carrots", "Chicken", "Corn", "Cucumbers",
                "Pears", "Pork", "Potatoes", "Rice", "Tomatoes", "Wheat",
            ]
            .map(String::from)
            .to_vec(),
            city_categories: [
                "Changzhou", "Huai'an", "Lianyungang", "Nanjing", "Nantong", "Suqian",
                "Suzhou", "Taizhou", "Wuxi", "Xuzhou", "Yancheng", "Yangzhou", "Zhenjiang",
            ]
            .map(String::from)
            .to_vec(),
            numeric_features: NUMERIC_FEATURES.map(String::from).to_vec(),
        }
    }
}

impl FeatureSpec {
    /// Total feature-vector width for this deployment.
    pub fn width(&self) -> usize {
        self.numeric_features.len()
            + self.product_categories.len()
            + self.city_categories.len()
    }

    /// Load the catalogs artifact: FEATURE_SPEC_URL, then FEATURE_SPEC_PATH,
    /// then the built-in defaults that match the training pipeline.
    pub async fn load() -> Self {
        if let Ok(url) = std::env::var("FEATURE_SPEC_URL") {
            match fetch_spec(&url).await {
                Ok(spec) => {
                    info!("Feature spec loaded from {}", url);
                    return spec;
                }
                Err(e) => warn!("Failed to load feature spec from {}: {}", url, e),
            }
        }

        if let Ok(path) = std::env::var("FEATURE_SPEC_PATH") {
            match std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|raw| serde_json::from_str(&raw).map_err(|e| e.to_string()))
            {
                Ok(spec) => {
                    info!("Feature spec loaded from {}", path);
                    return spec;
                }
                Err(e) => warn!("Failed to load feature spec from {}: {}", path, e),
            }
        }

        info!("Using default feature spec");
        Self::default()
    }
}

async fn fetch_spec(url: &str) -> Result<FeatureSpec, String> {
    let response = reqwest::get(url).await.map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("unexpected status {}", response.status()));
    }
    response.json().await.map_err(|e| e.to_string())
}

/// The nine numeric features for the day being predicted.
///
/// `window` is the trailing (real + synthetic) daily prices ending the day
/// before `predict_date`, oldest first. Lags the window is too short for
/// degrade to 0 rather than failing.
pub fn numeric_features(window: &[f64], predict_date: NaiveDate) -> [f64; 9] {
    [
        lag(window, 1),
        lag(window, 3),
        lag(window, 7),
        rolling_mean(window, 7),
        rolling_std(window, 7),
        rolling_mean(window, 10),
        // Monday = 0, matching the convention the model was trained with.
        predict_date.weekday().num_days_from_monday() as f64,
        predict_date.day() as f64,
        predict_date.month() as f64,
    ]
}

/// Price `k` days before the date being predicted.
fn lag(window: &[f64], k: usize) -> f64 {
    if window.len() >= k {
        window[window.len() - k]
    } else {
        0.0
    }
}

/// Mean over the last `n` entries, or however many exist.
fn rolling_mean(window: &[f64], n: usize) -> f64 {
    let start = window.len().saturating_sub(n);
    let tail = &window[start..];
    if tail.is_empty() {
        return 0.0;
    }
    tail.iter().sum::<f64>() / tail.len() as f64
}

/// Population standard deviation over the last `n` entries; 0 with fewer
/// than 2 points.
fn rolling_std(window: &[f64], n: usize) -> f64 {
    let start = window.len().saturating_sub(n);
    let tail = &window[start..];
    if tail.len() < 2 {
        return 0.0;
    }
    let mean = tail.iter().sum::<f64>() / tail.len() as f64;
    let variance = tail.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / tail.len() as f64;
    variance.sqrt()
}

/// Binary block with a single 1 at the matching catalog position.
///
/// An identifier absent from the catalog yields an all-zero block, so unseen
/// products/cities degrade gracefully instead of failing the forecast.
pub fn one_hot(value: &str, catalog: &[String]) -> Vec<f32> {
    let mut block = vec![0.0; catalog.len()];
    if let Some(index) = catalog.iter().position(|c| c == value) {
        block[index] = 1.0;
    }
    block
}

/// Assemble the full vector: numeric block, product one-hot, city one-hot.
pub fn build_feature_vector(
    window: &[f64],
    predict_date: NaiveDate,
    product: &str,
    city: &str,
    spec: &FeatureSpec,
) -> Result<Vec<f32>, AppError> {
    let mut vector: Vec<f32> = numeric_features(window, predict_date)
        .iter()
        .map(|&v| v as f32)
        .collect();
    vector.extend(one_hot(product, &spec.product_categories));
    vector.extend(one_hot(city, &spec.city_categories));

    if vector.len() != spec.width() {
        return Err(AppError::SchemaMismatch {
            expected: spec.width(),
            got: vector.len(),
        });
    }

    Ok(vector)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2025-06-04 is a Wednesday.
    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 4).unwrap()
    }

    #[test]
    fn test_numeric_feature_order_and_values() {
        let window: Vec<f64> = (1..=14).map(|v| v as f64).collect();
        let f = numeric_features(&window, wednesday());

        assert_eq!(f[0], 14.0); // lag_1
        assert_eq!(f[1], 12.0); // lag_3
        assert_eq!(f[2], 8.0); // lag_7
        assert!((f[3] - 11.0).abs() < 1e-9); // mean of 8..=14
        assert!((f[4] - 2.0).abs() < 1e-9); // population std of 8..=14
        assert!((f[5] - 9.5).abs() < 1e-9); // mean of 5..=14
        assert_eq!(f[6], 2.0); // Wednesday, Monday = 0
        assert_eq!(f[7], 4.0); // day of month
        assert_eq!(f[8], 6.0); // month
    }

    #[test]
    fn test_short_window_lags_degrade_to_zero() {
        let window = vec![5.0, 6.0];
        let f = numeric_features(&window, wednesday());

        assert_eq!(f[0], 6.0); // lag_1 still present
        assert_eq!(f[1], 0.0); // lag_3 missing
        assert_eq!(f[2], 0.0); // lag_7 missing
        assert!((f[3] - 5.5).abs() < 1e-9); // roll7 over the 2 that exist
    }

    #[test]
    fn test_rolling_std_is_zero_below_two_points() {
        assert_eq!(rolling_std(&[7.0], 7), 0.0);
        assert_eq!(rolling_std(&[], 7), 0.0);
    }

    #[test]
    fn test_calendar_fields_come_from_predict_date() {
        let window = vec![1.0; 14];
        let monday = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        let f = numeric_features(&window, monday);

        assert_eq!(f[6], 0.0);
        assert_eq!(f[7], 1.0);
        assert_eq!(f[8], 12.0);
    }

    #[test]
    fn test_one_hot_known_and_unknown() {
        let spec = FeatureSpec::default();

        let potatoes = one_hot("Potatoes", &spec.product_categories);
        assert_eq!(potatoes.iter().sum::<f32>(), 1.0);
        assert_eq!(potatoes[9], 1.0); // alphabetical position of "Potatoes"

        let unknown = one_hot("Durian", &spec.product_categories);
        assert!(unknown.iter().all(|&v| v == 0.0));
        assert_eq!(unknown.len(), spec.product_categories.len());
    }

    #[test]
    fn test_vector_width_is_invariant_for_unseen_categories() {
        let spec = FeatureSpec::default();
        let window = vec![10.0; 14];

        for (product, city) in [
            ("Potatoes", "Nanjing"),
            ("Durian", "Nanjing"),
            ("Potatoes", "Atlantis"),
            ("Durian", "Atlantis"),
        ] {
            let vector =
                build_feature_vector(&window, wednesday(), product, city, &spec).unwrap();
            assert_eq!(vector.len(), 35);
            assert_eq!(vector.len(), spec.width());
        }
    }

    #[test]
    fn test_default_spec_width_is_35() {
        assert_eq!(FeatureSpec::default().width(), 9 + 13 + 13);
    }
}
