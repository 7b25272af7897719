//! Routes served by a real axum server on an ephemeral port.

mod common;

use std::sync::Arc;
use std::time::Duration;

use classroom_coach::api::{router, AppState};
use classroom_coach::{CompletionConfig, GroqClient};
use common::ScriptedClient;
use serde_json::{json, Value};
use tokio::net::TcpListener;

async fn serve(client: ScriptedClient) -> String {
    let state = Arc::new(AppState::new(Arc::new(client), "test-model"));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{addr}")
}

const COACH_REPLY: &str = r#"Sure! {"now_fix": {"title": "a", "text": "b"}, "activity": {"title":"c","text":"d"}, "explain": {"title":"e","text":"f"}} Hope this helps!"#;

#[tokio::test]
async fn root_and_health() {
    let base = serve(ScriptedClient::replying("")).await;
    let http = reqwest::Client::new();

    let root: Value = http.get(&base).send().await.unwrap().json().await.unwrap();
    assert_eq!(root["status"], "Backend running");

    let health: Value = http
        .get(format!("{base}/api/v1/system/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["model"], "test-model");
}

#[tokio::test]
async fn coach_query_returns_validated_cards() {
    let base = serve(ScriptedClient::replying(COACH_REPLY)).await;

    let res = reqwest::Client::new()
        .post(format!("{base}/api/v1/coach/query"))
        .json(&json!({
            "class_level": "Grade 4",
            "subject": "Math",
            "problem_text": "noisy group work",
            "language": "Hindi/Hinglish"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["now_fix"], json!({ "title": "a", "text": "b" }));
    assert_eq!(body["explain"]["text"], "f");
}

#[tokio::test]
async fn contract_violation_is_a_502_naming_the_key() {
    let base = serve(ScriptedClient::replying(r#"{"steps": ["a"], "grouping": "pairs"}"#)).await;

    let res = reqwest::Client::new()
        .post(format!("{base}/api/v1/activities/generate"))
        .json(&json!({
            "class_size": 40,
            "learning_levels": ["beginner"],
            "time_left": 10,
            "materials_available": ["chalk"]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "validation_error");
    assert!(body["detail"].as_str().unwrap().contains("quick_assessment"));
}

#[tokio::test]
async fn unusable_text_is_a_502_without_raw_output() {
    let raw = "I think the class should sing a song.";
    let base = serve(ScriptedClient::replying(raw)).await;

    let res = reqwest::Client::new()
        .post(format!("{base}/api/v1/parent/message"))
        .json(&json!({ "student_name": "Asha", "topic": "fractions" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "extraction_error");
    assert!(!body["detail"].as_str().unwrap().contains(raw));
}

#[tokio::test]
async fn provider_outage_is_a_503() {
    let base = serve(ScriptedClient::unreachable()).await;

    let res = reqwest::Client::new()
        .post(format!("{base}/api/v1/planner/generate"))
        .json(&json!({ "grade": 5, "subject": "Science", "time_available": 40 }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 503);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "provider_error");
}

#[tokio::test]
async fn provider_timeout_is_a_503() {
    let silent = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let silent_addr = silent.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = silent.accept().await {
            held.push(socket);
        }
    });

    let config = CompletionConfig::new("test-key")
        .with_url(format!("http://{silent_addr}/openai/v1/chat/completions"))
        .with_timeout(Duration::from_millis(500));
    let groq = GroqClient::new(config).unwrap();
    let state = Arc::new(AppState::new(Arc::new(groq), "test-model"));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    let res = reqwest::Client::new()
        .post(format!("http://{addr}/api/v1/parent/message"))
        .json(&json!({ "student_name": "Asha", "topic": "fractions" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 503);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "provider_error");
    assert!(body["detail"].as_str().unwrap().contains("timed out"));
}

#[tokio::test]
async fn invalid_request_never_reaches_the_provider() {
    let client = Arc::new(ScriptedClient::replying(COACH_REPLY));
    let state = Arc::new(AppState::new(client.clone(), "test-model"));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    let res = reqwest::Client::new()
        .post(format!("http://{addr}/api/v1/coach/query"))
        .json(&json!({ "class_level": 40, "subject": "Math", "problem_text": "x" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 422);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn missing_body_field_is_invalid_request() {
    let base = serve(ScriptedClient::replying(COACH_REPLY)).await;

    let res = reqwest::Client::new()
        .post(format!("{base}/api/generate-plan"))
        .json(&json!({ "grade": 5 }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 422);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "invalid_request");
}

#[tokio::test]
async fn video_outage_still_succeeds_with_fallback() {
    let base = serve(ScriptedClient::unreachable()).await;

    let res = reqwest::Client::new()
        .post(format!("{base}/api/video-suggestions"))
        .json(&json!({ "grade": 3, "subject": "Math", "topic": "Shapes" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["source"], "curated_fallback");
    assert_eq!(body["videos"].as_array().unwrap().len(), 3);
    assert!(body["disclaimer"].as_str().unwrap().contains("curated"));
}

#[tokio::test]
async fn cluster_videos_fall_back_too() {
    let base = serve(ScriptedClient::replying("no videos today")).await;

    let res = reqwest::Client::new()
        .post(format!("{base}/api/v1/resources/cluster-videos"))
        .json(&json!({ "cluster_name": "Group work", "description": "managing groups" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["source"], "curated_fallback");
}
