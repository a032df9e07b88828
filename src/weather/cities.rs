//! Static city data used when live data is unavailable.

use crate::weather::types::TrendingItem;

/// Most suggestions returned for one query.
const MAX_SUGGESTIONS: usize = 5;

/// City used by the location shortcut. Real reverse geocoding is not wired up.
pub const PLACEHOLDER_LOCATION: &str = "San Francisco, USA";

/// Cities offered as completions.
pub const POPULAR_CITIES: &[&str] = &[
    "New York, USA",
    "London, UK",
    "Tokyo, Japan",
    "Paris, France",
    "Singapore",
    "Dubai, UAE",
    "Sydney, Australia",
    "Mumbai, India",
    "Chennai, India",
    "Delhi, India",
    "Bangalore, India",
    "San Francisco, USA",
    "Los Angeles, USA",
    "Chicago, USA",
    "Toronto, Canada",
    "Vancouver, Canada",
    "Berlin, Germany",
    "Munich, Germany",
    "Rome, Italy",
    "Milan, Italy",
    "Barcelona, Spain",
    "Madrid, Spain",
    "Amsterdam, Netherlands",
    "Seoul, South Korea",
    "Beijing, China",
    "Shanghai, China",
    "Hong Kong",
    "Bangkok, Thailand",
    "Istanbul, Turkey",
    "Moscow, Russia",
    "Sao Paulo, Brazil",
    "Rio de Janeiro, Brazil",
    "Buenos Aires, Argentina",
    "Mexico City, Mexico",
    "Cape Town, South Africa",
    "Cairo, Egypt",
    "Lagos, Nigeria",
    "Nairobi, Kenya",
    "Jakarta, Indonesia",
    "Manila, Philippines",
    "Karachi, Pakistan",
];

/// Trends shown when the live lookup comes back empty.
pub fn mock_trends() -> Vec<TrendingItem> {
    vec![
        TrendingItem::new("London", "Foggy"),
        TrendingItem::new("Tokyo", "Rain"),
        TrendingItem::new("Mumbai", "Monsoon"),
    ]
}

/// Case-insensitive substring match over [`POPULAR_CITIES`], at most five hits.
pub fn suggest_cities(query: &str) -> Vec<&'static str> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    POPULAR_CITIES
        .iter()
        .copied()
        .filter(|city| city.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .collect()
}
