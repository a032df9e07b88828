//! Gemini providers against a mock HTTP server.

use serde_json::json;
use weather_canvas::{
    CanvasError, GeminiImageProvider, GeminiTextProvider, GenerationRequest, ImageFormat,
    ImageProvider, ImageRequester, ImageStyle, TextProvider, TextRequest, WeatherCondition,
    WeatherFetcher, WeatherState,
};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEXT_PATH: &str = "/models/gemini-2.5-flash:generateContent";
const IMAGE_PATH: &str = "/models/gemini-2.5-flash-image:generateContent";

fn text_reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"parts": [{"text": text}], "role": "model"},
            "finishReason": "STOP"
        }]
    })
}

fn text_provider(server: &MockServer) -> GeminiTextProvider {
    GeminiTextProvider::builder()
        .api_key("test-key")
        .base_url(server.uri())
        .build()
        .unwrap()
}

fn image_provider(server: &MockServer) -> GeminiImageProvider {
    GeminiImageProvider::builder()
        .api_key("test-key")
        .base_url(server.uri())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_grounded_request_sends_search_tool_and_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TEXT_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_string_contains("google_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_reply("hello")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = text_provider(&server);
    let text = provider
        .generate_text(&TextRequest::grounded("hi"))
        .await
        .unwrap();
    assert_eq!(text.as_deref(), Some("hello"));
}

#[tokio::test]
async fn test_http_errors_are_typed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TEXT_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "12"))
        .mount(&server)
        .await;

    let err = text_provider(&server)
        .generate_text(&TextRequest::ungrounded("hi"))
        .await
        .unwrap_err();
    match err {
        CanvasError::RateLimited { retry_after } => {
            assert_eq!(retry_after, Some(std::time::Duration::from_secs(12)))
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetcher_falls_back_once_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TEXT_PATH))
        .and(body_string_contains("google_search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(TEXT_PATH))
        .and(body_string_contains("Use your internal knowledge"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_reply(
            "```json\n{\"condition\": \"Rain\", \"temperature\": 27, \"unit\": \"C\"}\n```",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = WeatherFetcher::new(text_provider(&server));
    let weather = fetcher.city_weather("Mumbai, India").await.unwrap();

    assert_eq!(weather.condition, WeatherCondition::Rain);
    assert_eq!(weather.temperature, 27);
}

#[tokio::test]
async fn test_fetcher_returns_empty_when_both_attempts_fail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TEXT_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let fetcher = WeatherFetcher::new(text_provider(&server));
    assert!(fetcher.trending_cities().await.is_empty());
}

#[tokio::test]
async fn test_image_provider_returns_first_inline_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(IMAGE_PATH))
        .and(body_string_contains("responseModalities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "Here is the diorama."},
                    {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgoAAAAA"}}
                ]},
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let image = image_provider(&server)
        .generate(&GenerationRequest::new("a city"))
        .await
        .unwrap();

    assert_eq!(image.format, ImageFormat::Png);
    assert_eq!(&image.data[..4], &[0x89, 0x50, 0x4E, 0x47]);
    assert_eq!(
        image.metadata.model.as_deref(),
        Some("gemini-2.5-flash-image")
    );
}

#[tokio::test]
async fn test_requester_sends_prompt_and_returns_data_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(IMAGE_PATH))
        .and(body_string_contains("No text on the image"))
        .and(body_string_contains("Subject: The city of Lisbon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"parts": [
                    {"inlineData": {"mimeType": "image/png", "data": "AAEC"}}
                ]}
            }]
        })))
        .mount(&server)
        .await;

    let requester = ImageRequester::new(image_provider(&server));
    let state = WeatherState::for_city("Lisbon").with_style(ImageStyle::Realistic);
    let url = requester.generate_data_url(&state).await.unwrap();
    assert_eq!(url, "data:image/png;base64,AAEC");
}

#[tokio::test]
async fn test_requester_yields_none_on_blocked_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(IMAGE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"finishReason": "IMAGE_SAFETY"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let requester = ImageRequester::new(image_provider(&server));
    assert!(requester
        .generate(&WeatherState::for_city("Lisbon"))
        .await
        .is_none());
}
