use actix_web::{get, web, HttpResponse};
use serde_json::json;

use super::RecommendHandlerState;

/// GET /
#[get("/")]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "Recommendation API is running",
        "endpoints": ["/recommend?user_id=1&k=5"]
    }))
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "recommendation-service"
    }))
}

/// Ready once artifacts are resident, which is always true after startup.
pub async fn readiness_check(state: web::Data<RecommendHandlerState>) -> HttpResponse {
    let scores = state.engine.scores();
    HttpResponse::Ok().json(json!({
        "status": "ready",
        "service": "recommendation-service",
        "layout": scores.layout().to_string(),
        "users": scores.user_count(),
        "items_with_metadata": state.engine.metadata().len()
    }))
}
