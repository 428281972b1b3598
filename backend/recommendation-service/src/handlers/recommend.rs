/// Recommendation API Handlers
///
/// HTTP endpoint for top-K recommendations from precomputed scores
use actix_web::{get, web, HttpResponse};
use serde::Deserialize;
use std::num::IntErrorKind;
use tracing::debug;

use crate::error::{AppError, ErrorResponse, Result};
use crate::metrics;
use crate::models::Recommendation;
use crate::services::{user_not_found_message, RecommendError, RecommendationEngine};

/// Query parameters for GET /recommend
///
/// Both are taken raw: a `user_id` that is not an integer counts as missing,
/// and a `k` that is not an integer falls back to the default. Integers too
/// large for `i64` are still integers and are judged by value.
#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub user_id: Option<String>,
    pub k: Option<String>,
}

/// Handler state for the recommendation endpoint
pub struct RecommendHandlerState {
    pub engine: RecommendationEngine,
    /// `k` used when the request omits it
    pub default_k: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntParam {
    Value(i64),
    /// Well-formed integer outside the `i64` range
    Overflow { negative: bool },
    /// Absent or not an integer
    Malformed,
}

fn parse_int(raw: Option<&str>) -> IntParam {
    let Some(raw) = raw else {
        return IntParam::Malformed;
    };

    match raw.trim().parse::<i64>() {
        Ok(value) => IntParam::Value(value),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => IntParam::Overflow { negative: false },
            IntErrorKind::NegOverflow => IntParam::Overflow { negative: true },
            _ => IntParam::Malformed,
        },
    }
}

/// GET /recommend?user_id=<int>&k=<int>
#[utoipa::path(
    get,
    path = "/recommend",
    tag = "recommendations",
    params(
        ("user_id" = i64, Query, description = "User to recommend for"),
        ("k" = Option<i64>, Query, description = "Number of results, 1..=max_k (default 5)")
    ),
    responses(
        (status = 200, description = "Top-K items, highest score first", body = Vec<Recommendation>),
        (status = 400, description = "Missing user_id or k out of range", body = ErrorResponse),
        (status = 404, description = "User has no scores", body = ErrorResponse)
    )
)]
#[get("/recommend")]
pub async fn get_recommendations(
    query: web::Query<RecommendQuery>,
    state: web::Data<RecommendHandlerState>,
) -> Result<HttpResponse> {
    let k = match parse_int(query.k.as_deref()) {
        IntParam::Value(k) => k,
        // Saturated, so still rejected as out of range.
        IntParam::Overflow { negative: true } => i64::MIN,
        IntParam::Overflow { negative: false } => i64::MAX,
        IntParam::Malformed => state.default_k as i64,
    };

    let result = match parse_int(query.user_id.as_deref()) {
        IntParam::Value(user_id) => {
            debug!(user_id, k, "Recommendation request");
            state.engine.recommend(Some(user_id), k)
        }
        IntParam::Malformed => state.engine.recommend(None, k),
        IntParam::Overflow { .. } => {
            // Artifact ids all fit in i64, so this user cannot have scores.
            if let Err(err) = state.engine.validate_k(k) {
                return Err(rejected(err));
            }
            metrics::record_outcome("user_not_found");
            let raw = query.user_id.as_deref().unwrap_or_default().trim();
            return Err(AppError::NotFound(user_not_found_message(raw)));
        }
    };

    match result {
        Ok(recommendations) => {
            metrics::record_outcome("ok");
            Ok(HttpResponse::Ok().json(recommendations))
        }
        Err(err) => Err(rejected(err)),
    }
}

fn rejected(err: RecommendError) -> AppError {
    metrics::record_outcome(err.outcome());
    debug!(error = %err, "Recommendation request rejected");
    err.into()
}
