// tests for the model backends, against a local mock upstream

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use twintone::config::{LlmConfig, Provider};
use twintone::{Claude, CompletionClient, OpenAi, build_client};

type Seen = Arc<Mutex<Vec<(HeaderMap, Value)>>>;

async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

// replies like openai, echoing the prompt back
fn openai_upstream(seen: Seen) -> Router {
    Router::new().route(
        "/v1/chat/completions",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let seen = seen.clone();
            async move {
                let prompt = body["messages"][0]["content"].as_str().unwrap_or("").to_string();
                seen.lock().unwrap().push((headers, body));
                Json(json!({
                    "choices": [{"message": {"role": "assistant", "content": format!("echo: {prompt}")}}]
                }))
            }
        }),
    )
}

fn openai_config(base: &str) -> LlmConfig {
    LlmConfig::new(Provider::OpenAi, "test-key").with_base_url(Some(base.to_string()))
}

#[tokio::test]
async fn test_openai_completion() {
    let seen: Seen = Arc::default();
    let base = spawn_upstream(openai_upstream(seen.clone())).await;

    let client = OpenAi::new(&openai_config(&base)).unwrap();
    let text = client.complete("Explain tides").await.unwrap();
    assert_eq!(text, "echo: Explain tides");

    let seen = seen.lock().unwrap();
    let (headers, body) = &seen[0];
    assert_eq!(headers["authorization"], "Bearer test-key");
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["messages"][0]["role"], "user");
    assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
}

#[tokio::test]
async fn test_config_overrides_reach_request() {
    let seen: Seen = Arc::default();
    let base = spawn_upstream(openai_upstream(seen.clone())).await;

    let config = openai_config(&format!("{base}/"))
        .with_model(Some("gpt-4o".to_string()))
        .with_temperature(0.2);
    let client = build_client(&config).unwrap();

    client.complete("hi").await.unwrap();
    assert_eq!(client.model(), "gpt-4o");

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].1["model"], "gpt-4o");
    assert!((seen[0].1["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
}

#[tokio::test]
async fn test_upstream_error_keeps_body() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": {"message": "Incorrect API key provided"}})),
            )
        }),
    );
    let base = spawn_upstream(router).await;

    let client = OpenAi::new(&openai_config(&base)).unwrap();
    let err = client.complete("q").await.unwrap_err();

    let message = err.to_string();
    assert!(message.contains("401"));
    assert!(message.contains("Incorrect API key provided"));
}

#[tokio::test]
async fn test_empty_completion_is_failure() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|| async { Json(json!({"choices": []})) }),
    );
    let base = spawn_upstream(router).await;

    let client = OpenAi::new(&openai_config(&base)).unwrap();
    assert!(client.complete("q").await.is_err());
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"choices": [{"message": {"content": "late"}}]}))
        }),
    );
    let base = spawn_upstream(router).await;

    let config = openai_config(&base).with_timeout(Duration::from_millis(200));
    let client = OpenAi::new(&config).unwrap();

    let started = std::time::Instant::now();
    assert!(client.complete("q").await.is_err());
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn test_claude_completion() {
    let seen: Seen = Arc::default();
    let recorder = seen.clone();
    let router = Router::new().route(
        "/v1/messages",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let seen = recorder.clone();
            async move {
                seen.lock().unwrap().push((headers, body));
                Json(json!({"content": [{"type": "text", "text": "a formal reply"}]}))
            }
        }),
    );
    let base = spawn_upstream(router).await;

    let config = LlmConfig::new(Provider::Claude, "sk-ant").with_base_url(Some(base));
    let client = Claude::new(&config).unwrap();

    assert_eq!(client.complete("Explain tides").await.unwrap(), "a formal reply");
    assert_eq!(client.model(), "claude-sonnet-4-20250514");

    let seen = seen.lock().unwrap();
    let (headers, body) = &seen[0];
    assert_eq!(headers["x-api-key"], "sk-ant");
    assert_eq!(headers["anthropic-version"], "2023-06-01");
    assert_eq!(body["max_tokens"], 1024);
    assert_eq!(body["messages"][0]["content"], "Explain tides");
}
