//! Weather state and related records.

use crate::error::{CanvasError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Weather condition shown on the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum WeatherCondition {
    /// Clear skies.
    #[default]
    Sunny,
    /// Overcast.
    Cloudy,
    /// Rain.
    Rain,
    /// Thunderstorm.
    Storm,
    /// Snow.
    Snow,
    /// Fog or mist.
    Fog,
}

impl WeatherCondition {
    /// All conditions, in display order.
    pub const ALL: [Self; 6] = [
        Self::Sunny,
        Self::Cloudy,
        Self::Rain,
        Self::Storm,
        Self::Snow,
        Self::Fog,
    ];

    /// Returns the canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sunny => "Sunny",
            Self::Cloudy => "Cloudy",
            Self::Rain => "Rain",
            Self::Storm => "Storm",
            Self::Snow => "Snow",
            Self::Fog => "Fog",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeatherCondition {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CanvasError::InvalidRequest(format!("unknown weather condition: {s}")))
    }
}

impl TryFrom<String> for WeatherCondition {
    type Error = CanvasError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Temperature unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum TemperatureUnit {
    /// Celsius.
    #[default]
    C,
    /// Fahrenheit.
    F,
}

impl TemperatureUnit {
    /// Returns the unit letter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::C => "C",
            Self::F => "F",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemperatureUnit {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "C" | "CELSIUS" => Ok(Self::C),
            "F" | "FAHRENHEIT" => Ok(Self::F),
            _ => Err(CanvasError::InvalidRequest(format!(
                "unknown temperature unit: {s}"
            ))),
        }
    }
}

impl TryFrom<String> for TemperatureUnit {
    type Error = CanvasError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Visual art style of the generated image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum ImageStyle {
    /// Isometric 3D diorama.
    #[default]
    Isometric,
    /// Photorealistic cinematic shot.
    Realistic,
    /// Bright toy-like 3D render.
    Cartoonish,
    /// Neon night scene.
    Cyberpunk,
}

impl ImageStyle {
    /// All styles, in display order.
    pub const ALL: [Self; 4] = [
        Self::Isometric,
        Self::Realistic,
        Self::Cartoonish,
        Self::Cyberpunk,
    ];

    /// Returns the canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Isometric => "Isometric",
            Self::Realistic => "Realistic",
            Self::Cartoonish => "Cartoonish",
            Self::Cyberpunk => "Cyberpunk",
        }
    }

    /// Light styles render on a pale background and take dark overlay text.
    pub fn is_light(&self) -> bool {
        matches!(self, Self::Isometric | Self::Cartoonish)
    }

    /// Parses a style name, falling back to [`ImageStyle::Isometric`] for
    /// anything unrecognized.
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl fmt::Display for ImageStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageStyle {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CanvasError::InvalidRequest(format!("unknown image style: {s}")))
    }
}

impl TryFrom<String> for ImageStyle {
    type Error = CanvasError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Everything the canvas depends on.
///
/// Updates never mutate in place: each setter consumes the state and returns
/// the updated value, so a request always sees one consistent snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherState {
    /// City as entered, e.g. `"Tokyo, Japan"`.
    pub city: String,
    /// Weather condition.
    pub condition: WeatherCondition,
    /// Temperature in `unit`.
    pub temperature: i32,
    /// Temperature unit.
    pub unit: TemperatureUnit,
    /// Free-text date line.
    pub date: String,
    /// Art style.
    pub style: ImageStyle,
}

impl Default for WeatherState {
    fn default() -> Self {
        Self {
            city: String::new(),
            condition: WeatherCondition::Sunny,
            temperature: 24,
            unit: TemperatureUnit::C,
            date: today(),
            style: ImageStyle::Isometric,
        }
    }
}

impl WeatherState {
    /// Creates the default state for a city.
    pub fn for_city(city: impl Into<String>) -> Self {
        Self::default().with_city(city)
    }

    /// Returns the state with a new city.
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    /// Returns the state with a new condition.
    pub fn with_condition(mut self, condition: WeatherCondition) -> Self {
        self.condition = condition;
        self
    }

    /// Returns the state with a new temperature and unit.
    pub fn with_temperature(mut self, temperature: i32, unit: TemperatureUnit) -> Self {
        self.temperature = temperature;
        self.unit = unit;
        self
    }

    /// Returns the state with a new date line.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    /// Returns the state with a new style.
    pub fn with_style(mut self, style: ImageStyle) -> Self {
        self.style = style;
        self
    }

    /// Merges live weather data into the state.
    pub fn with_update(mut self, update: WeatherUpdate) -> Self {
        self.condition = update.condition;
        self.temperature = update.temperature;
        self.unit = update.unit;
        self
    }

    /// City name without region, e.g. `"Tokyo"` for `"Tokyo, Japan"`.
    pub fn display_city(&self) -> &str {
        self.city.split(',').next().unwrap_or_default().trim()
    }

    /// True when no city has been chosen yet.
    pub fn has_city(&self) -> bool {
        !self.city.trim().is_empty()
    }

    /// The `24°C, Sunny` line.
    pub fn temperature_line(&self) -> String {
        format!("{}°{}, {}", self.temperature, self.unit, self.condition)
    }
}

/// Today's date as shown on the canvas, e.g. `Monday, October 19`.
pub fn today() -> String {
    chrono::Local::now().format("%A, %B %-d").to_string()
}

/// Live weather for one city, as estimated by the text model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherUpdate {
    /// Current condition.
    pub condition: WeatherCondition,
    /// Current temperature, rounded to a whole degree.
    #[serde(deserialize_with = "deserialize_rounded")]
    pub temperature: i32,
    /// Unit of `temperature`.
    pub unit: TemperatureUnit,
}

fn deserialize_rounded<'de, D>(deserializer: D) -> std::result::Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value.abs() > f64::from(i32::MAX) {
        return Err(serde::de::Error::custom("temperature out of range"));
    }
    Ok(value.round() as i32)
}

/// A city with notable weather right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingItem {
    /// City name.
    pub city: String,
    /// Short reason, e.g. `"Heatwave"`.
    pub reason: String,
}

impl TrendingItem {
    /// Creates a trending item.
    pub fn new(city: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            reason: reason.into(),
        }
    }
}

/// A generated canvas, kept as the session's latest history record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCanvas {
    /// Unique record id.
    pub id: String,
    /// Data URL of the generated image.
    pub image_url: String,
    /// State the image was generated from.
    pub weather_state: WeatherState,
    /// Generation time in epoch milliseconds.
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = WeatherState::default();
        assert!(state.city.is_empty());
        assert!(!state.has_city());
        assert_eq!(state.condition, WeatherCondition::Sunny);
        assert_eq!(state.temperature, 24);
        assert_eq!(state.unit, TemperatureUnit::C);
        assert_eq!(state.style, ImageStyle::Isometric);
        assert!(!state.date.is_empty());
    }

    #[test]
    fn test_display_city() {
        assert_eq!(WeatherState::for_city("Tokyo, Japan").display_city(), "Tokyo");
        assert_eq!(WeatherState::for_city("Singapore").display_city(), "Singapore");
        assert_eq!(
            WeatherState::for_city("New York, USA").display_city(),
            "New York"
        );
        assert_eq!(WeatherState::default().display_city(), "");
    }

    #[test]
    fn test_with_update_merges_weather_only() {
        let state = WeatherState::for_city("Oslo")
            .with_style(ImageStyle::Cyberpunk)
            .with_date("Friday, January 2");
        let merged = state.clone().with_update(WeatherUpdate {
            condition: WeatherCondition::Snow,
            temperature: -4,
            unit: TemperatureUnit::C,
        });

        assert_eq!(merged.city, "Oslo");
        assert_eq!(merged.style, ImageStyle::Cyberpunk);
        assert_eq!(merged.date, "Friday, January 2");
        assert_eq!(merged.condition, WeatherCondition::Snow);
        assert_eq!(merged.temperature, -4);
    }

    #[test]
    fn test_temperature_line() {
        let state = WeatherState::for_city("Miami")
            .with_temperature(88, TemperatureUnit::F)
            .with_condition(WeatherCondition::Storm);
        assert_eq!(state.temperature_line(), "88°F, Storm");
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("rain".parse::<WeatherCondition>().unwrap(), WeatherCondition::Rain);
        assert_eq!(" FOG ".parse::<WeatherCondition>().unwrap(), WeatherCondition::Fog);
        assert!("hail".parse::<WeatherCondition>().is_err());

        assert_eq!("f".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::F);
        assert_eq!("Celsius".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::C);
        assert!("K".parse::<TemperatureUnit>().is_err());

        assert_eq!("cyberpunk".parse::<ImageStyle>().unwrap(), ImageStyle::Cyberpunk);
        assert!("watercolor".parse::<ImageStyle>().is_err());
    }

    #[test]
    fn test_unknown_style_defaults_to_isometric() {
        assert_eq!(ImageStyle::parse_or_default("watercolor"), ImageStyle::Isometric);
        assert_eq!(ImageStyle::parse_or_default(""), ImageStyle::Isometric);
        assert_eq!(ImageStyle::parse_or_default("Realistic"), ImageStyle::Realistic);
    }

    #[test]
    fn test_light_styles() {
        assert!(ImageStyle::Isometric.is_light());
        assert!(ImageStyle::Cartoonish.is_light());
        assert!(!ImageStyle::Realistic.is_light());
        assert!(!ImageStyle::Cyberpunk.is_light());
    }

    #[test]
    fn test_weather_update_deserialization() {
        let update: WeatherUpdate =
            serde_json::from_str(r#"{"condition":"Rain","temperature":18,"unit":"C"}"#).unwrap();
        assert_eq!(update.condition, WeatherCondition::Rain);
        assert_eq!(update.temperature, 18);

        let rounded: WeatherUpdate =
            serde_json::from_str(r#"{"condition":"Sunny","temperature":31.6,"unit":"F"}"#)
                .unwrap();
        assert_eq!(rounded.temperature, 32);
        assert_eq!(rounded.unit, TemperatureUnit::F);
    }

    #[test]
    fn test_weather_update_ignores_case() {
        let update: WeatherUpdate =
            serde_json::from_str(r#"{"condition":"rain","temperature":20,"unit":"c"}"#).unwrap();
        assert_eq!(update.condition, WeatherCondition::Rain);
        assert_eq!(update.unit, TemperatureUnit::C);

        let json = serde_json::to_value(update).unwrap();
        assert_eq!(json["condition"], "Rain");
        assert_eq!(json["unit"], "C");

        let style: ImageStyle = serde_json::from_str(r#""CYBERPUNK""#).unwrap();
        assert_eq!(style, ImageStyle::Cyberpunk);
    }

    #[test]
    fn test_weather_update_requires_all_keys() {
        assert!(serde_json::from_str::<WeatherUpdate>(r#"{"condition":"Rain"}"#).is_err());
        assert!(serde_json::from_str::<WeatherUpdate>(
            r#"{"condition":"Drizzle","temperature":10,"unit":"C"}"#
        )
        .is_err());
    }

    #[test]
    fn test_generated_canvas_serializes_camel_case() {
        let record = GeneratedCanvas {
            id: "abc".into(),
            image_url: "data:image/png;base64,AAAA".into(),
            weather_state: WeatherState::for_city("Lima"),
            timestamp: 1,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("imageUrl").is_some());
        assert!(json.get("weatherState").is_some());
    }
}
