pub mod health;
pub mod recommend;

// Re-export handlers for convenience
pub use health::{health_check, index, readiness_check};
pub use recommend::{get_recommendations, RecommendHandlerState, RecommendQuery};

use actix_web::web;

use crate::{metrics, openapi};

/// Registers every route the service exposes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(get_recommendations)
        .route("/health", web::get().to(health_check))
        .route("/api/v1/health/live", web::get().to(health_check))
        .route("/api/v1/health/ready", web::get().to(readiness_check))
        .route("/metrics", web::get().to(metrics::serve_metrics))
        .route("/api/v1/openapi.json", web::get().to(openapi::openapi_json));
}
