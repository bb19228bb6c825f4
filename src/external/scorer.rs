use thiserror::Error;

use crate::errors::AppError;

/// Everything a scorer gets to see for one forecasted day.
#[derive(Debug, Clone)]
pub struct ScoringInput<'a> {
    /// Canonical feature vector: 9 numeric slots, then product one-hot,
    /// then city one-hot.
    pub features: &'a [f32],
    /// 1-based step within the forecast horizon.
    pub day_offset: u32,
}

#[derive(Debug, Error)]
pub enum ScorerError {
    #[error("model load error: {0}")]
    Load(String),

    #[error("inference error: {0}")]
    Inference(String),

    #[error("schema mismatch: expected width {expected}, got {got}")]
    SchemaMismatch { expected: usize, got: usize },
}

impl From<ScorerError> for AppError {
    fn from(value: ScorerError) -> Self {
        match value {
            ScorerError::SchemaMismatch { expected, got } => {
                AppError::SchemaMismatch { expected, got }
            }
            other => AppError::Scorer(other.to_string()),
        }
    }
}

/// Opaque prediction function mapping a feature vector to a price.
///
/// Implementations must clamp their output to be non-negative. A failure is
/// fatal for the whole forecast: later days depend on earlier predictions,
/// so there is no per-day retry.
pub trait Scorer: Send + Sync {
    /// Version tag recorded with every persisted prediction.
    fn model_version(&self) -> &str;

    /// Input width this scorer requires, when it requires one.
    fn expected_width(&self) -> Option<usize>;

    fn score(&self, input: &ScoringInput) -> Result<f64, ScorerError>;
}

/// Which scorer strategy the deployment uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorerMode {
    /// Trained ONNX model only; fail if it cannot be loaded.
    Onnx,
    /// Moving-average/trend heuristic only.
    Statistical,
    /// Prefer the model, fall back to the heuristic when it is unavailable.
    Auto,
}

impl ScorerMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "onnx" | "model" => Some(ScorerMode::Onnx),
            "statistical" => Some(ScorerMode::Statistical),
            "auto" => Some(ScorerMode::Auto),
            _ => None,
        }
    }
}
