use std::path::{Path, PathBuf};
use std::sync::Arc;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::{Mutex, RwLock};
use tracing::{info, warn};

use crate::external::scorer::{Scorer, ScorerError, ScoringInput};

pub const ONNX_MODEL_VERSION: &str = "ONNX-XGBoost-v1.0";

/// Input/output names fixed by the model conversion pipeline
/// (onnxmltools XGBoost converter defaults).
const INPUT_NAME: &str = "float_input";
const OUTPUT_NAME: &str = "variable";

/// Scorer backed by a trained regression model exported to ONNX.
///
/// Pure from the engine's point of view: one `(1, width)` tensor in, one
/// price out, no retries. The session is shared across concurrent forecasts.
pub struct OnnxScorer {
    session: Mutex<Session>,
    width: usize,
    version: String,
}

impl OnnxScorer {
    pub fn load(model_path: &Path, width: usize, version: &str) -> Result<Self, ScorerError> {
        let session = Session::builder()
            .map_err(|e| ScorerError::Load(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ScorerError::Load(e.to_string()))?
            .with_intra_threads(1)
            .map_err(|e| ScorerError::Load(e.to_string()))?
            .commit_from_file(model_path)
            .map_err(|e| {
                ScorerError::Load(format!("{}: {}", model_path.display(), e))
            })?;

        info!(
            "Loaded ONNX model {} ({}, input width {})",
            version,
            model_path.display(),
            width
        );

        Ok(Self {
            session: Mutex::new(session),
            width,
            version: version.to_string(),
        })
    }
}

impl Scorer for OnnxScorer {
    fn model_version(&self) -> &str {
        &self.version
    }

    fn expected_width(&self) -> Option<usize> {
        Some(self.width)
    }

    fn score(&self, input: &ScoringInput) -> Result<f64, ScorerError> {
        if input.features.len() != self.width {
            return Err(ScorerError::SchemaMismatch {
                expected: self.width,
                got: input.features.len(),
            });
        }

        let array = Array2::from_shape_vec((1, self.width), input.features.to_vec())
            .map_err(|e| ScorerError::Inference(e.to_string()))?;
        let tensor =
            Value::from_array(array).map_err(|e| ScorerError::Inference(e.to_string()))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![INPUT_NAME => tensor])
            .map_err(|e| ScorerError::Inference(e.to_string()))?;

        let output = outputs.get(OUTPUT_NAME).ok_or_else(|| {
            ScorerError::Inference(format!("model output '{}' missing", OUTPUT_NAME))
        })?;
        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| ScorerError::Inference(e.to_string()))?;
        let predicted = data
            .first()
            .copied()
            .ok_or_else(|| ScorerError::Inference("model returned an empty tensor".into()))?;

        Ok((predicted as f64).max(0.0))
    }
}

/// Load-once cache for the trained scorer.
///
/// The session is built on first use and reused by every subsequent forecast;
/// `reload` swaps in a fresh session for model-version upgrades without a
/// process restart.
pub struct ModelRegistry {
    model_path: PathBuf,
    width: usize,
    version: String,
    cached: RwLock<Option<Arc<OnnxScorer>>>,
}

impl ModelRegistry {
    pub fn new(model_path: PathBuf, width: usize, version: String) -> Self {
        Self {
            model_path,
            width,
            version,
            cached: RwLock::new(None),
        }
    }

    /// Build a registry from MODEL_PATH / MODEL_VERSION / MODEL_INPUT_WIDTH.
    ///
    /// `default_width` is the feature-spec width; the env override exists for
    /// deployments where model and catalogs drifted and the mismatch should
    /// surface as a schema error instead of a crash.
    pub fn from_env(default_width: usize) -> Self {
        let model_path = std::env::var("MODEL_PATH")
            .unwrap_or_else(|_| "price_prediction_model.onnx".to_string());
        let version =
            std::env::var("MODEL_VERSION").unwrap_or_else(|_| ONNX_MODEL_VERSION.to_string());
        let width = std::env::var("MODEL_INPUT_WIDTH")
            .ok()
            .and_then(|w| w.parse().ok())
            .unwrap_or(default_width);

        Self::new(PathBuf::from(model_path), width, version)
    }

    #[allow(dead_code)]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The cached scorer, loading it on first use.
    pub fn get(&self) -> Result<Arc<OnnxScorer>, ScorerError> {
        if let Some(scorer) = self.cached.read().as_ref() {
            return Ok(scorer.clone());
        }

        let mut guard = self.cached.write();
        if let Some(scorer) = guard.as_ref() {
            return Ok(scorer.clone());
        }

        let scorer = Arc::new(OnnxScorer::load(&self.model_path, self.width, &self.version)?);
        *guard = Some(scorer.clone());
        Ok(scorer)
    }

    /// Replace the cached session with a freshly loaded one.
    ///
    /// In-flight forecasts keep the session they already hold; only new
    /// forecasts see the reloaded model.
    pub fn reload(&self) -> Result<(), ScorerError> {
        let scorer = Arc::new(OnnxScorer::load(&self.model_path, self.width, &self.version)?);
        *self.cached.write() = Some(scorer);
        info!("Reloaded ONNX model {} from {}", self.version, self.model_path.display());
        Ok(())
    }

    /// Warm the cache at startup; returns whether the model is usable.
    pub fn warm_up(&self) -> bool {
        match self.get() {
            Ok(_) => true,
            Err(e) => {
                warn!("ONNX model not available: {}", e);
                false
            }
        }
    }
}
