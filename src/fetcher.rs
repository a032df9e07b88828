//! Trending-city and live-weather lookups with a search-grounded first try.
//!
//! Each lookup asks the text model twice at most: once with Google Search
//! grounding, and once more without tools if the grounded call errors or
//! comes back empty. Every failure collapses into "no data" (an empty list or
//! `None`); nothing is returned as an error.

use crate::text::{TextProvider, TextRequest};
use crate::weather::{TrendingItem, WeatherUpdate};
use serde::de::DeserializeOwned;

/// Instruction for the trending-cities lookup.
pub const TRENDS_PROMPT: &str = "Identify 4 major global cities that are currently experiencing notable weather (storms, heatwaves, snow, etc) or are trending in search. Return ONLY a JSON list with keys 'city' and 'reason'. The 'reason' should be a short summary.";

/// Appended to the prompt of the ungrounded retry.
pub const FALLBACK_SUFFIX: &str =
    " Use your internal knowledge to estimate the answer instead of live search.";

/// Instruction for the single-city weather lookup.
pub fn city_weather_prompt(city: &str) -> String {
    format!(
        "What is the current weather condition and temperature in {city}? Return ONLY a JSON object with keys 'condition' (one of Sunny, Cloudy, Rain, Storm, Snow, Fog), 'temperature' (number), and 'unit' ('C' or 'F')."
    )
}

/// Removes every ```json and ``` marker and trims the rest.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parses model output that may be wrapped in markdown code fences.
pub fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Option<T> {
    match serde_json::from_str(&strip_code_fences(text)) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, "model reply was not the expected JSON");
            None
        }
    }
}

/// Looks up trends and city weather through a text provider.
pub struct WeatherFetcher<P> {
    provider: P,
}

impl<P: TextProvider> WeatherFetcher<P> {
    /// Wraps a text provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Returns the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Cities with notable weather right now. Empty when nothing usable came back.
    pub async fn trending_cities(&self) -> Vec<TrendingItem> {
        let Some(text) = self.ask(TRENDS_PROMPT).await else {
            return Vec::new();
        };
        parse_json_reply(&text).unwrap_or_default()
    }

    /// Current weather for `city`, or `None` when nothing usable came back.
    pub async fn city_weather(&self, city: &str) -> Option<WeatherUpdate> {
        let text = self.ask(&city_weather_prompt(city)).await?;
        parse_json_reply(&text)
    }

    /// Grounded attempt, then one ungrounded attempt if the first failed or
    /// produced no text.
    async fn ask(&self, prompt: &str) -> Option<String> {
        match self.provider.generate_text(&TextRequest::grounded(prompt)).await {
            Ok(Some(text)) => return Some(text),
            Ok(None) => {
                tracing::warn!(model = self.provider.model(), "grounded request returned no text")
            }
            Err(e) => {
                tracing::warn!(model = self.provider.model(), error = %e, "grounded request failed")
            }
        }

        let fallback = TextRequest::ungrounded(format!("{prompt}{FALLBACK_SUFFIX}"));
        match self.provider.generate_text(&fallback).await {
            Ok(Some(text)) => Some(text),
            Ok(None) => {
                tracing::warn!(model = self.provider.model(), "fallback request returned no text");
                None
            }
            Err(e) => {
                tracing::warn!(model = self.provider.model(), error = %e, "fallback request failed");
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::{CanvasError, Result};
    use crate::weather::{TemperatureUnit, WeatherCondition};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted replies and records every request.
    pub(crate) struct ScriptedText {
        replies: Mutex<VecDeque<Result<Option<String>>>>,
        pub(crate) requests: Mutex<Vec<TextRequest>>,
    }

    impl ScriptedText {
        pub(crate) fn new(replies: Vec<Result<Option<String>>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn requests(&self) -> Vec<TextRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextProvider for ScriptedText {
        async fn generate_text(&self, request: &TextRequest) -> Result<Option<String>> {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(None))
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    fn ok(text: &str) -> Result<Option<String>> {
        Ok(Some(text.to_string()))
    }

    fn network_down() -> Result<Option<String>> {
        Err(CanvasError::Api {
            status: 503,
            message: "unavailable".into(),
        })
    }

    const TRENDS_JSON: &str = r#"[{"city":"Oslo","reason":"Blizzard"},{"city":"Phoenix","reason":"Heatwave"}]"#;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n[]\n```"), "[]");
        assert_eq!(strip_code_fences("  {}  "), "{}");
    }

    #[test]
    fn test_fenced_and_unfenced_parse_identically() {
        let fenced = format!("```json\n{TRENDS_JSON}\n```");
        let a: Vec<TrendingItem> = parse_json_reply(TRENDS_JSON).unwrap();
        let b: Vec<TrendingItem> = parse_json_reply(&fenced).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0], TrendingItem::new("Oslo", "Blizzard"));
    }

    #[test]
    fn test_prose_around_json_is_rejected() {
        let reply = format!("Sure! Here are the cities: {TRENDS_JSON} Hope this helps.");
        assert!(parse_json_reply::<Vec<TrendingItem>>(&reply).is_none());
    }

    #[tokio::test]
    async fn test_grounded_success_makes_one_call() {
        let fetcher = WeatherFetcher::new(ScriptedText::new(vec![ok(TRENDS_JSON)]));
        let trends = fetcher.trending_cities().await;

        assert_eq!(trends.len(), 2);
        let requests = fetcher.provider().requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].grounded);
        assert_eq!(requests[0].prompt, TRENDS_PROMPT);
    }

    #[tokio::test]
    async fn test_grounded_error_triggers_single_fallback() {
        let fetcher = WeatherFetcher::new(ScriptedText::new(vec![
            network_down(),
            ok(&format!("```json\n{TRENDS_JSON}\n```")),
        ]));
        let trends = fetcher.trending_cities().await;

        assert_eq!(trends[1], TrendingItem::new("Phoenix", "Heatwave"));
        let requests = fetcher.provider().requests();
        assert_eq!(requests.len(), 2);
        assert!(!requests[1].grounded);
        assert!(requests[1].prompt.starts_with(TRENDS_PROMPT));
        assert!(requests[1].prompt.contains("Use your internal knowledge"));
        assert!(!requests[0].prompt.contains("Use your internal knowledge"));
    }

    #[tokio::test]
    async fn test_empty_grounded_reply_triggers_fallback() {
        let reply = r#"{"condition":"Fog","temperature":12,"unit":"C"}"#;
        let fetcher = WeatherFetcher::new(ScriptedText::new(vec![Ok(None), ok(reply)]));
        let weather = fetcher.city_weather("London").await.unwrap();

        assert_eq!(weather.condition, WeatherCondition::Fog);
        assert_eq!(weather.temperature, 12);
        assert_eq!(weather.unit, TemperatureUnit::C);
        assert_eq!(fetcher.provider().requests().len(), 2);
    }

    #[tokio::test]
    async fn test_both_attempts_failing_yield_no_data() {
        let fetcher =
            WeatherFetcher::new(ScriptedText::new(vec![network_down(), network_down()]));
        assert!(fetcher.trending_cities().await.is_empty());
        assert_eq!(fetcher.provider().requests().len(), 2);

        let fetcher =
            WeatherFetcher::new(ScriptedText::new(vec![network_down(), network_down()]));
        assert!(fetcher.city_weather("Paris").await.is_none());
        assert_eq!(fetcher.provider().requests().len(), 2);
    }

    #[tokio::test]
    async fn test_unparseable_reply_yields_no_data() {
        let fetcher = WeatherFetcher::new(ScriptedText::new(vec![ok("It is sunny, 25C.")]));
        assert!(fetcher.city_weather("Rome").await.is_none());
        assert_eq!(fetcher.provider().requests().len(), 1);

        let fetcher =
            WeatherFetcher::new(ScriptedText::new(vec![network_down(), ok("no idea, sorry")]));
        assert!(fetcher.trending_cities().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_keys_yield_no_data() {
        let fetcher = WeatherFetcher::new(ScriptedText::new(vec![ok(
            r#"{"condition":"Rain","temperature":9}"#,
        )]));
        assert!(fetcher.city_weather("Bergen").await.is_none());

        let fetcher =
            WeatherFetcher::new(ScriptedText::new(vec![ok(r#"[{"city":"Oslo"}]"#)]));
        assert!(fetcher.trending_cities().await.is_empty());
    }

    #[tokio::test]
    async fn test_city_weather_prompt_names_city() {
        let fetcher = WeatherFetcher::new(ScriptedText::new(vec![]));
        assert!(fetcher.city_weather("Chennai, India").await.is_none());

        let requests = fetcher.provider().requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].prompt.contains("in Chennai, India?"));
        assert_eq!(
            requests[1].prompt,
            format!("{}{FALLBACK_SUFFIX}", city_weather_prompt("Chennai, India"))
        );
    }

    #[tokio::test]
    async fn test_city_weather_accepts_lowercase_values() {
        let fetcher = WeatherFetcher::new(ScriptedText::new(vec![ok(
            r#"{"condition":"rain","temperature":20,"unit":"c"}"#,
        )]));
        let weather = fetcher.city_weather("Paris").await.unwrap();

        assert_eq!(weather.condition, WeatherCondition::Rain);
        assert_eq!(weather.temperature, 20);
        assert_eq!(weather.unit, TemperatureUnit::C);
    }
}
