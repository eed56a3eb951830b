use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use videoquiz_backend::services::ai_service::TextGenerator;
use videoquiz_backend::services::quiz_service::QuizSettings;
use videoquiz_backend::{routes, AppState};

const REPLY: &str = "Question 1: What does the speaker build?
A) A bridge
B) A boat
C) A house
D) A road
Answer: B) A boat
Explanation: The video shows the boat being built.

Question 2: Which wood is used?
A) Oak
B) Pine
C) Cedar
D) Birch
Answer: C
Explanation: Cedar resists rot.

Question 3: What tool is used first?
A) Saw
B) Hammer
C) Drill
Answer: A) Saw

Question 4: The boat is painted blue.
A) True
B) False
Answer: B) False
Explanation: It is painted red.";

struct StubGenerator {
    reply: Result<String, String>,
    calls: AtomicUsize,
}

impl StubGenerator {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(|e| anyhow::anyhow!(e))
    }
}

fn app(generator: Arc<StubGenerator>) -> Router {
    routes::router(AppState::with_generator(generator, QuizSettings::default()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<JsonValue>) -> (StatusCode, JsonValue) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let req = match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn lorem(len: usize) -> String {
    "the speaker explains how to build a small wooden boat ".repeat(len / 50 + 1)[..len].to_string()
}

#[tokio::test]
async fn generate_reports_partial_quiz() {
    let generator = StubGenerator::replying(REPLY);
    let app = app(generator.clone());

    let (status, body) = send(
        &app,
        "POST",
        "/api/quiz/generate",
        Some(json!({ "transcript": lorem(800), "target_count": 5 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    assert_eq!(body["requested"], 5);
    assert_eq!(body["produced"], 3);
    assert_eq!(body["partial"], true);

    let questions = body["questions"].as_array().unwrap();
    assert_eq!(questions[0]["id"], 1);
    assert_eq!(questions[1]["correct_answer"], "C) Cedar");
    assert_eq!(questions[2]["kind"], "true_false");
    assert_eq!(questions[2]["options"], json!(["True", "False"]));
    assert_eq!(questions[2]["correct_answer"], "False");
}

#[tokio::test]
async fn generate_chunks_long_transcripts() {
    let generator = StubGenerator::replying(REPLY);
    let app = app(generator.clone());

    let (status, body) = send(
        &app,
        "POST",
        "/api/quiz/generate",
        Some(json!({ "transcript": lorem(3200), "target_count": 5, "chunk_size": 3000 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    assert_eq!(body["produced"], 5);
    assert_eq!(body["partial"], false);
}

#[tokio::test]
async fn generate_maps_pipeline_errors() {
    let failing = app(StubGenerator::failing("rate limited"));
    let (status, body) = send(
        &failing,
        "POST",
        "/api/quiz/generate",
        Some(json!({ "transcript": "short text" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("rate limited"));

    let empty = app(StubGenerator::replying("Sorry, I can't do that."));
    let (status, _) = send(
        &empty,
        "POST",
        "/api/quiz/generate",
        Some(json!({ "transcript": "short text" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &empty,
        "POST",
        "/api/quiz/generate",
        Some(json!({ "transcript": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn grade_endpoint_normalizes_answers() {
    let app = app(StubGenerator::replying(REPLY));
    let question = json!({
        "id": 1,
        "prompt": "What is the capital of France?",
        "kind": "multiple_choice",
        "options": ["Paris", "London", "Berlin", "Madrid"],
        "correct_answer": "Paris",
        "explanation": "Paris is the capital of France."
    });

    let (status, body) = send(
        &app,
        "POST",
        "/api/quiz/grade",
        Some(json!({ "question": question, "answer": "  a) Paris  " })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["correct"], true);
    assert!(body.get("correct_answer").is_none());

    let (_, body) = send(
        &app,
        "POST",
        "/api/quiz/grade",
        Some(json!({ "question": question, "answer": "Berlin" })),
    )
    .await;
    assert_eq!(body["correct"], false);
    assert_eq!(body["correct_answer"], "Paris");

    let mut ungradable = question.clone();
    ungradable["correct_answer"] = json!("");
    let (status, _) = send(
        &app,
        "POST",
        "/api/quiz/grade",
        Some(json!({ "question": ungradable, "answer": "Paris" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn session_flow_tracks_score() {
    let app = app(StubGenerator::replying(REPLY));

    let (status, session) = send(
        &app,
        "POST",
        "/api/sessions",
        Some(json!({ "transcript": lorem(600), "target_count": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(session["total"], 3);
    assert_eq!(session["partial"], false);
    assert_eq!(session["states"], json!(["unanswered", "unanswered", "unanswered"]));
    let id = session["id"].as_str().unwrap().to_string();

    let answers_uri = format!("/api/sessions/{}/answers", id);
    let (status, outcome) = send(
        &app,
        "POST",
        &answers_uri,
        Some(json!({ "question_id": 1, "answer": "b) a boat" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["verdict"]["correct"], true);
    assert_eq!(outcome["score"], 1);

    let (status, _) = send(
        &app,
        "POST",
        &answers_uri,
        Some(json!({ "question_id": 1, "answer": "A bridge" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, outcome) = send(
        &app,
        "POST",
        &answers_uri,
        Some(json!({ "question_id": 3, "answer": "True" })),
    )
    .await;
    assert_eq!(outcome["verdict"]["correct"], false);
    assert_eq!(outcome["verdict"]["correct_answer"], "False");

    let (status, current) = send(&app, "GET", &format!("/api/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(current["score"], 1);
    assert_eq!(current["submitted"], json!([true, false, true]));
    assert_eq!(current["complete"], false);

    let (status, summary) = send(&app, "GET", "/api/sessions/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["sessions"], 1);
    assert_eq!(summary["total_score"], 1);
    assert_eq!(summary["total_questions"], 3);
}

#[tokio::test]
async fn deleted_session_is_discarded() {
    let app = app(StubGenerator::replying(REPLY));
    let (_, session) = send(
        &app,
        "POST",
        "/api/sessions",
        Some(json!({ "transcript": lorem(300), "target_count": 3 })),
    )
    .await;
    let uri = format!("/api/sessions/{}", session["id"].as_str().unwrap());

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, summary) = send(&app, "GET", "/api/sessions/summary", None).await;
    assert_eq!(summary["sessions"], 0);
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let app = app(StubGenerator::replying(REPLY));
    let (status, _) = send(
        &app,
        "GET",
        "/api/sessions/00000000-0000-0000-0000-000000000000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn score_endpoint_tallies_answers() {
    let app = app(StubGenerator::replying(REPLY));
    let (_, generated) = send(
        &app,
        "POST",
        "/api/quiz/generate",
        Some(json!({ "transcript": lorem(300), "target_count": 3 })),
    )
    .await;
    let questions = generated["questions"].clone();

    let (status, body) = send(
        &app,
        "POST",
        "/api/quiz/score",
        Some(json!({ "questions": questions, "answers": ["A boat", null, "False"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "score": 2, "graded": 2, "total": 3 }));

    let (status, _) = send(
        &app,
        "POST",
        "/api/quiz/score",
        Some(json!({ "questions": questions, "answers": ["A boat"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let app = app(StubGenerator::replying(REPLY));
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, doc) = send(&app, "GET", "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"].get("/api/quiz/generate").is_some());
}
