mod daily_series;
mod forecast;
mod market_price;
mod product;

pub use daily_series::{DailyPrice, DailySeries};
pub use forecast::{ForecastPoint, ForecastRequest, PriceForecast, PricePrediction};
pub use market_price::MarketPrice;
pub use product::Product;
