/// OpenAPI documentation for the Recommendation Service
use actix_web::HttpResponse;
use utoipa::OpenApi;

use crate::error::{ErrorResponse, Result};
use crate::models::Recommendation;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Recommendation Service API",
        description = "Top-K recommendations served from precomputed user/item scores."
    ),
    paths(crate::handlers::recommend::get_recommendations),
    components(schemas(Recommendation, ErrorResponse)),
    tags(
        (name = "recommendations", description = "Top-K retrieval from precomputed scores"),
    ),
)]
pub struct ApiDoc;

pub fn doc() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub async fn openapi_json() -> Result<HttpResponse> {
    let body = serde_json::to_string(&doc())?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}
