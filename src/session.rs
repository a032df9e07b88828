//! A canvas-making session: current weather state, latest image, and the
//! fetch/generate/export steps that move it along.

use crate::compositor::{self, Export, FontSet};
use crate::error::{CanvasError, Result};
use crate::fetcher::WeatherFetcher;
use crate::image::{GeneratedImage, ImageProvider};
use crate::requester::ImageRequester;
use crate::text::TextProvider;
use crate::weather::{
    mock_trends, GeneratedCanvas, ImageStyle, TemperatureUnit, TrendingItem, WeatherCondition,
    WeatherState, WeatherUpdate, PLACEHOLDER_LOCATION,
};
use std::path::Path;

/// Ties the fetcher, the requester and the compositor to one weather state.
pub struct CanvasSession<T, I> {
    fetcher: WeatherFetcher<T>,
    requester: ImageRequester<I>,
    state: WeatherState,
    image: Option<GeneratedImage>,
    last_canvas: Option<GeneratedCanvas>,
}

impl<T: TextProvider, I: ImageProvider> CanvasSession<T, I> {
    /// Starts a session from the default state.
    pub fn new(text: T, image: I) -> Self {
        Self::with_state(text, image, WeatherState::default())
    }

    /// Starts a session from a given state.
    pub fn with_state(text: T, image: I, state: WeatherState) -> Self {
        Self {
            fetcher: WeatherFetcher::new(text),
            requester: ImageRequester::new(image),
            state,
            image: None,
            last_canvas: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> &WeatherState {
        &self.state
    }

    /// Latest generated image.
    pub fn image(&self) -> Option<&GeneratedImage> {
        self.image.as_ref()
    }

    /// Record of the latest successful generation.
    pub fn last_canvas(&self) -> Option<&GeneratedCanvas> {
        self.last_canvas.as_ref()
    }

    fn replace_state(&mut self, f: impl FnOnce(WeatherState) -> WeatherState) -> &WeatherState {
        let state = std::mem::take(&mut self.state);
        self.state = f(state);
        &self.state
    }

    /// Sets the city without fetching anything.
    pub fn set_city(&mut self, city: impl Into<String>) -> &WeatherState {
        let city = city.into();
        self.replace_state(|s| s.with_city(city))
    }

    /// Sets the style.
    pub fn set_style(&mut self, style: ImageStyle) -> &WeatherState {
        self.replace_state(|s| s.with_style(style))
    }

    /// Sets the condition.
    pub fn set_condition(&mut self, condition: WeatherCondition) -> &WeatherState {
        self.replace_state(|s| s.with_condition(condition))
    }

    /// Sets the temperature and unit.
    pub fn set_temperature(&mut self, temperature: i32, unit: TemperatureUnit) -> &WeatherState {
        self.replace_state(|s| s.with_temperature(temperature, unit))
    }

    /// Sets the date line.
    pub fn set_date(&mut self, date: impl Into<String>) -> &WeatherState {
        let date = date.into();
        self.replace_state(|s| s.with_date(date))
    }

    /// Merges live weather data.
    pub fn update(&mut self, update: WeatherUpdate) -> &WeatherState {
        self.replace_state(|s| s.with_update(update))
    }

    /// Live trends, or the built-in list when none came back.
    pub async fn trending(&self) -> Vec<TrendingItem> {
        let trends = self.fetcher.trending_cities().await;
        if trends.is_empty() {
            tracing::debug!("no live trends, using built-in list");
            mock_trends()
        } else {
            trends
        }
    }

    /// Selects a city and fills in its live weather when available.
    pub async fn select_city(&mut self, city: &str) -> &WeatherState {
        self.set_city(city);
        if let Some(update) = self.fetcher.city_weather(city).await {
            self.update(update);
        }
        &self.state
    }

    /// Selects the placeholder location. Coordinates are not resolved.
    pub async fn select_current_location(&mut self) -> &WeatherState {
        self.select_city(PLACEHOLDER_LOCATION).await
    }

    /// Generates the canvas for the current state.
    ///
    /// Refuses to run without a city. When the model returns nothing the
    /// previous image is kept and `Ok(None)` is returned.
    pub async fn generate(&mut self) -> Result<Option<&GeneratedImage>> {
        if !self.state.has_city() {
            return Err(CanvasError::InvalidRequest("no city selected".into()));
        }

        let Some(image) = self.requester.generate(&self.state).await else {
            return Ok(None);
        };

        let timestamp = compositor::timestamp_ms();
        self.last_canvas = Some(GeneratedCanvas {
            id: format!("canvas-{timestamp}"),
            image_url: image.to_data_url(),
            weather_state: self.state.clone(),
            timestamp,
        });
        self.image = Some(image);
        Ok(self.image.as_ref())
    }

    /// Writes the latest image, with overlay, into `out_dir`.
    pub fn export(&self, out_dir: &Path, fonts: Option<&FontSet>) -> Result<Export> {
        let image = self
            .image
            .as_ref()
            .ok_or_else(|| CanvasError::InvalidRequest("no image generated yet".into()))?;
        compositor::export(
            &image.data,
            &self.state,
            fonts,
            out_dir,
            compositor::timestamp_ms(),
        )
    }
}
