pub mod onnx_scorer;
pub mod scorer;
pub mod statistical_scorer;
