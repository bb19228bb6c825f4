pub mod market_price_queries;
pub mod prediction_queries;
pub mod product_queries;
