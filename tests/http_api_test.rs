use air_poetry::adapter::DatasetCatalog;
use air_poetry::app::{AppState, main_router};
use air_poetry::domain::{City, Pollutant, PollutionRecord};
use air_poetry::error::{GenerationError, MISSING_API_KEY};
use air_poetry::pipeline::{BoardRegistry, GenerationSettings, PoemPipeline};
use air_poetry::test_support::ScriptedGenerator;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use chrono::NaiveDate;
use serde_json::{Value, json};
use std::future::IntoFuture;
use std::sync::Arc;

fn session() -> HeaderName {
    HeaderName::from_static("x-session-id")
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, d).unwrap()
}

fn catalog() -> DatasetCatalog {
    DatasetCatalog::from_series([(
        (City::Bergamo, Pollutant::Pm10),
        vec![
            PollutionRecord::new(day(10), 30.0),
            PollutionRecord::new(day(20), 50.0),
            PollutionRecord::new(NaiveDate::from_ymd_opt(2022, 2, 5).unwrap(), 90.0),
        ],
    )])
}

fn create_test_server(generator: Arc<ScriptedGenerator>) -> TestServer {
    let pipeline = PoemPipeline::new(generator, GenerationSettings::default());
    let app = main_router(AppState::new(pipeline, catalog(), BoardRegistry::new()));
    TestServer::new(app).unwrap()
}

fn ode_body() -> Value {
    json!({
        "poem_type": "Ode",
        "city": "Bergamo",
        "pollutant": "pm10",
        "from_date": "2022-01-01",
        "to_date": "2022-01-31"
    })
}

#[tokio::test]
async fn test_health_endpoint_returns_healthy() {
    let server = create_test_server(Arc::new(ScriptedGenerator::new()));

    let response = server.get("/v1/health").await;

    response.assert_status_ok();
    response.assert_text("Healthy");
}

#[tokio::test]
async fn test_summary_averages_records_in_range() {
    let server = create_test_server(Arc::new(ScriptedGenerator::new()));

    let response = server
        .get("/v1/pollution/summary?city=Bergamo&pollutant=pm10&from=2022-01-01&to=2022-01-31")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["average_rate"], 40.0);
    assert_eq!(body["level"], "High");
    assert_eq!(body["level_label"], "High");
    assert_eq!(body["record_count"], 2);
    assert_eq!(body["gauge_max"], 100);
}

#[tokio::test]
async fn test_summary_of_empty_range_is_zero() {
    let server = create_test_server(Arc::new(ScriptedGenerator::new()));

    let response = server
        .get("/v1/pollution/summary?city=Treviglio&pollutant=pm2.5&from=2022-01-01&to=2022-01-31")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["average_rate"], 0.0);
    assert_eq!(body["level"], "Low");
    assert_eq!(body["gauge_max"], 60);
}

#[tokio::test]
async fn test_generate_poem_returns_generated_text() {
    let generator = Arc::new(ScriptedGenerator::new().respond_ok("O Bergamo, grey veil"));
    let server = create_test_server(Arc::clone(&generator));

    let response = server.post("/v1/poems").json(&ode_body()).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["poem"]["text"], "O Bergamo, grey veil");
    assert_eq!(body["poem"]["origin"], "ai_generated");
    assert_eq!(body["poem"]["summary"]["average_rate"], 40.0);
    assert_eq!(body["poem"]["source_request"]["length"], 16);
    assert_eq!(body["advisory"], Value::Null);
    assert_eq!(body["file_name"], "Bergamo_2022-01-01_2022-01-31.txt");

    let prompt = &generator.requests()[0].prompt;
    assert!(prompt.contains("40.00 pm10"));
    assert!(prompt.contains("January 1, 2022"));
}

#[tokio::test]
async fn test_generate_poem_falls_back_on_upstream_failure() {
    let generator = Arc::new(ScriptedGenerator::new().respond_err(GenerationError::Upstream {
        status: StatusCode::SERVICE_UNAVAILABLE,
        message: "overloaded".into(),
    }));
    let server = create_test_server(generator);

    let response = server.post("/v1/poems").json(&ode_body()).await;

    response.assert_status_ok();
    let body: Value = response.json();
    let text = body["poem"]["text"].as_str().unwrap();
    assert!(text.starts_with("[Fallback Ode - AI Service Unavailable]"));
    assert!(text.contains("40.0 µg/m³"));
    assert!(text.contains("high"));
    assert_eq!(body["poem"]["origin"], "fallback");
    assert!(
        body["advisory"]
            .as_str()
            .unwrap()
            .starts_with("Error using Google AI: ")
    );
}

#[tokio::test]
async fn test_generate_poem_without_api_key_is_server_error() {
    let generator = Arc::new(
        ScriptedGenerator::new()
            .respond_err(GenerationError::Configuration(MISSING_API_KEY.into())),
    );
    let server = create_test_server(generator);

    let response = server.post("/v1/poems").json(&ode_body()).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], MISSING_API_KEY);
}

#[tokio::test]
async fn test_generate_poem_rejects_zero_length() {
    let generator = Arc::new(ScriptedGenerator::new());
    let server = create_test_server(Arc::clone(&generator));
    let mut body = ode_body();
    body["length"] = json!(0);

    let response = server.post("/v1/poems").json(&body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(generator.requests().is_empty());
}

#[tokio::test]
async fn test_sonnet_length_is_always_fourteen() {
    let generator = Arc::new(ScriptedGenerator::new().respond_ok("fourteen lines"));
    let server = create_test_server(Arc::clone(&generator));
    let mut body = ode_body();
    body["poem_type"] = json!("Sonnet");
    body["length"] = json!(20);

    let response = server.post("/v1/poems").json(&body).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["poem"]["source_request"]["length"], 14);
    assert!(generator.requests()[0].prompt.contains("14 lines"));
}

#[tokio::test]
async fn test_latest_poem_follows_session() {
    let generator = Arc::new(ScriptedGenerator::new().respond_ok("first").respond_ok("second"));
    let server = create_test_server(generator);

    let missing = server
        .get("/v1/poems/latest")
        .add_header(session(), HeaderValue::from_static("s-1"))
        .await;
    missing.assert_status_not_found();

    for _ in 0..2 {
        server
            .post("/v1/poems")
            .add_header(session(), HeaderValue::from_static("s-1"))
            .json(&ode_body())
            .await
            .assert_status_ok();
    }

    let latest = server
        .get("/v1/poems/latest")
        .add_header(session(), HeaderValue::from_static("s-1"))
        .await;
    latest.assert_status_ok();
    let body: Value = latest.json();
    assert_eq!(body["poem"]["text"], "second");
    assert_eq!(body["ticket"], 2);
}

#[tokio::test]
async fn test_superseded_generation_is_discarded() {
    let (generator, release_a) = ScriptedGenerator::new().respond_ok_when_released("poem A");
    let (generator, release_b) = generator.respond_ok_when_released("poem B");
    let generator = Arc::new(generator);
    let server = create_test_server(Arc::clone(&generator));

    let request_a = server
        .post("/v1/poems")
        .add_header(session(), HeaderValue::from_static("s-2"))
        .json(&ode_body())
        .into_future();
    let request_b = server
        .post("/v1/poems")
        .add_header(session(), HeaderValue::from_static("s-2"))
        .json(&ode_body())
        .into_future();

    let release = async {
        while generator.requests().len() < 2 {
            tokio::task::yield_now().await;
        }
        release_b.send(()).unwrap();
        release_a.send(()).unwrap();
    };

    let (response_a, response_b, ()) = tokio::join!(request_a, request_b, release);

    response_a.assert_status(StatusCode::CONFLICT);
    response_b.assert_status_ok();

    let latest = server
        .get("/v1/poems/latest")
        .add_header(session(), HeaderValue::from_static("s-2"))
        .await;
    let body: Value = latest.json();
    assert_eq!(body["poem"]["text"], "poem B");
}

#[tokio::test]
async fn test_requests_without_session_are_independent() {
    let generator = Arc::new(ScriptedGenerator::new().respond_ok("one").respond_ok("two"));
    let server = create_test_server(generator);

    let (first, second) = tokio::join!(
        server.post("/v1/poems").json(&ode_body()).into_future(),
        server.post("/v1/poems").json(&ode_body()).into_future(),
    );

    first.assert_status_ok();
    second.assert_status_ok();
    let first: Value = first.json();
    assert!(first.get("ticket").is_none());
}

#[tokio::test]
async fn test_translate_returns_translation() {
    let generator = Arc::new(ScriptedGenerator::new().respond_ok("Aria di Bergamo"));
    let server = create_test_server(generator);

    let response = server
        .post("/v1/translate")
        .json(&json!({"text": "Air of Bergamo", "target_language": "Italian"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["text"], "Aria di Bergamo");
    assert_eq!(body["translated"], true);
}

#[tokio::test]
async fn test_translate_keeps_original_on_failure() {
    let generator = Arc::new(
        ScriptedGenerator::new().respond_err(GenerationError::MalformedResponse("no text".into())),
    );
    let server = create_test_server(generator);

    let response = server
        .post("/v1/translate")
        .json(&json!({"text": "Air of Bergamo", "target_language": "French"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["text"], "Air of Bergamo");
    assert_eq!(body["translated"], false);
}
