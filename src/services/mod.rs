pub mod features;
pub mod forecast_engine;
pub mod forecast_service;
pub mod history_service;
