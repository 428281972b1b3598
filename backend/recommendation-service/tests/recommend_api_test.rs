use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use std::io::Write;
use tempfile::NamedTempFile;

use recommendation_service::error::ErrorResponse;
use recommendation_service::handlers::{self, RecommendHandlerState};
use recommendation_service::models::Recommendation;
use recommendation_service::{Artifacts, EngineConfig, RecommendationEngine};

fn write_artifact(value: &Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp artifact");
    write!(file, "{}", value).expect("write temp artifact");
    file
}

fn build_state(scores: &Value, metadata: &Value) -> web::Data<RecommendHandlerState> {
    let scores_file = write_artifact(scores);
    let metadata_file = write_artifact(metadata);
    let artifacts =
        Artifacts::load(scores_file.path(), metadata_file.path()).expect("load artifacts");

    web::Data::new(RecommendHandlerState {
        engine: RecommendationEngine::new(
            artifacts.scores,
            artifacts.metadata,
            EngineConfig::default(),
        ),
        default_k: 5,
    })
}

fn long_form_state() -> web::Data<RecommendHandlerState> {
    let mut rows = vec![
        json!({"user_id": 1, "movie_id": 10, "predicted_rating": 4.5}),
        json!({"user_id": 1, "movie_id": 20, "predicted_rating": 4.9}),
        json!({"user_id": 1, "movie_id": 30, "predicted_rating": 4.9}),
    ];
    for item in 100..108 {
        rows.push(json!({"user_id": 5, "movie_id": item, "predicted_rating": item as f64 / 100.0}));
    }

    build_state(
        &Value::Array(rows),
        &json!([
            {"movie_id": 10, "title": "A"},
            {"movie_id": 20, "title": "B"}
        ]),
    )
}

fn matrix_form_state() -> web::Data<RecommendHandlerState> {
    build_state(
        &json!({
            "2": {"100": 3.0, "200": 5.0, "300": null},
            "4": {}
        }),
        &json!([{"movie_id": 200, "title": "Alien", "genres": "Horror|Sci-Fi"}]),
    )
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state)
                .configure(handlers::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn recommend_long_form_returns_ranked_json() {
    let app = app!(long_form_state());

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/recommend?user_id=1&k=2")
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!([
            {"movie_id": 20, "title": "B", "predicted_rating": 4.9},
            {"movie_id": 30, "title": "Unknown title", "predicted_rating": 4.9}
        ])
    );
}

#[actix_web::test]
async fn recommend_matrix_form_returns_top_item() {
    let app = app!(matrix_form_state());

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/recommend?user_id=2&k=1")
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Vec<Recommendation> = test::read_body_json(resp).await;
    assert_eq!(
        body,
        vec![Recommendation {
            item_id: 200,
            title: "Alien".to_string(),
            score: 5.0
        }]
    );
}

#[actix_web::test]
async fn matrix_user_with_empty_row_returns_empty_list() {
    let app = app!(matrix_form_state());

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/recommend?user_id=4&k=3")
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Vec<Recommendation> = test::read_body_json(resp).await;
    assert!(body.is_empty());
}

#[actix_web::test]
async fn omitted_or_malformed_k_uses_default() {
    let app = app!(long_form_state());

    for uri in ["/recommend?user_id=5", "/recommend?user_id=5&k=abc"] {
        let resp =
            test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;

        assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
        let body: Vec<Recommendation> = test::read_body_json(resp).await;
        assert_eq!(body.len(), 5, "{}", uri);
        assert_eq!(body[0].item_id, 107);
    }
}

#[actix_web::test]
async fn missing_or_invalid_user_id_returns_400() {
    let app = app!(long_form_state());

    for uri in ["/recommend", "/recommend?k=3", "/recommend?user_id=abc"] {
        let resp =
            test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "missing user_id");
        assert_eq!(body.code, 400);
    }
}

#[actix_web::test]
async fn k_out_of_range_returns_400() {
    let app = app!(long_form_state());

    for k in [
        "0",
        "51",
        "-3",
        "100000000000000000000",
        "-100000000000000000000",
    ] {
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/recommend?user_id=1&k={}", k))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "k={}", k);
    }

    for k in ["1", "50"] {
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/recommend?user_id=1&k={}", k))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK, "k={}", k);
    }
}

#[actix_web::test]
async fn unknown_user_returns_404_in_both_layouts() {
    for state in [long_form_state(), matrix_form_state()] {
        let app = app!(state);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/recommend?user_id=99&k=5")
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "user_id 99 not found in score artifact");
        assert_eq!(body.code, 404);
    }
}

#[actix_web::test]
async fn user_id_beyond_i64_returns_404_unless_k_is_invalid() {
    let app = app!(long_form_state());

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/recommend?user_id=100000000000000000000&k=5")
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(
        body.error,
        "user_id 100000000000000000000 not found in score artifact"
    );
    assert_eq!(body.code, 404);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/recommend?user_id=100000000000000000000&k=0")
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn repeated_requests_are_identical() {
    let app = app!(long_form_state());

    let mut bodies = Vec::new();
    for _ in 0..2 {
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/recommend?user_id=5&k=8")
                .to_request(),
        )
        .await;
        let body: Value = test::read_body_json(resp).await;
        bodies.push(body);
    }

    assert_eq!(bodies[0], bodies[1]);
}

#[actix_web::test]
async fn index_health_and_metrics_endpoints() {
    let app = app!(matrix_form_state());

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["endpoints"][0], "/recommend?user_id=1&k=5");

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/health/ready")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["layout"], "matrix");
    assert_eq!(body["users"], 2);

    // Touch the engine so the recommendation counters are registered.
    test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/recommend?user_id=2&k=1")
            .to_request(),
    )
    .await;
    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/metrics").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).expect("metrics are utf-8");
    assert!(text.contains("recommendations_total"));
}

#[actix_web::test]
async fn openapi_document_is_served() {
    let app = app!(matrix_form_state());

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/openapi.json")
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["info"]["title"], "Recommendation Service API");

    let operation = &body["paths"]["/recommend"]["get"];
    assert!(operation.is_object(), "GET /recommend is not documented");
    for status in ["200", "400", "404"] {
        assert!(operation["responses"][status].is_object(), "status {}", status);
    }
    let params: Vec<&str> = operation["parameters"]
        .as_array()
        .expect("parameters")
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();
    assert_eq!(params, vec!["user_id", "k"]);
    assert!(body["components"]["schemas"]["Recommendation"]["properties"]["movie_id"].is_object());
    assert!(body["components"]["schemas"]["ErrorResponse"]["properties"]["code"].is_object());
}
