//! Weather state, trend records and static city data.

mod cities;
mod types;

pub use cities::{mock_trends, suggest_cities, PLACEHOLDER_LOCATION, POPULAR_CITIES};
pub use types::{
    today, GeneratedCanvas, ImageStyle, TemperatureUnit, TrendingItem, WeatherCondition,
    WeatherState, WeatherUpdate,
};
