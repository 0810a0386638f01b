pub mod bookings;
pub mod health;
pub mod payments;
pub mod rooms;
pub mod summaries;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderMap, HeaderValue};
use axum::routing::{get, post, put};
use axum::Router;
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::errors::AppError;
use crate::state::AppState;

const DEFAULT_LIMIT: u64 = 20;
const MAX_LIMIT: u64 = 500;

pub fn router(state: Arc<AppState>) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs.max(1));
    let cors = cors_layer(&state.config.allowed_origins);

    let app = Router::new()
        .route("/health", get(health::health))
        .route(
            "/api/bookings",
            post(bookings::create_booking).get(bookings::list_bookings),
        )
        .route(
            "/api/bookings/with-payment",
            post(bookings::create_booking_with_payment),
        )
        .route(
            "/api/bookings/:id",
            get(bookings::get_booking)
                .put(bookings::update_booking)
                .delete(bookings::delete_booking),
        )
        .route("/api/bookings/details", get(bookings::list_booking_details))
        .route("/api/bookings/:id/detail", get(bookings::get_booking_detail))
        .route("/api/bookings/:id/payments", get(bookings::list_booking_payments))
        .route("/api/payments/:id", get(payments::get_payment))
        .route("/api/payments/:id/finalize", put(payments::finalize_payment))
        .route("/api/rooms", get(rooms::list_rooms))
        .route("/api/rooms/available", get(rooms::available_rooms))
        .route(
            "/api/daily-summary",
            get(summaries::get_summary).delete(summaries::delete_summary),
        )
        .route("/api/daily-summary/generate", post(summaries::generate_summary))
        .route("/api/daily-summary/status", put(summaries::update_summary_status))
        .route("/api/daily-summary/list", get(summaries::list_summaries))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match cors {
        Some(cors) => app.layer(cors),
        None => app,
    }
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

pub(crate) fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token.is_empty() || token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

/// The acting user for audit entries, from `X-User-Id`.
pub(crate) fn actor_id(headers: &HeaderMap) -> Option<i64> {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

impl Pagination {
    pub fn resolve(&self) -> (u64, u64) {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        (self.skip.unwrap_or(0), limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(*v));
        }
        map
    }

    #[test]
    fn test_check_auth() {
        assert!(check_auth(&headers(&[("authorization", "Bearer s3cret")]), "s3cret").is_ok());
        assert!(check_auth(&headers(&[("authorization", "Bearer nope")]), "s3cret").is_err());
        assert!(check_auth(&headers(&[("authorization", "s3cret")]), "s3cret").is_err());
        assert!(check_auth(&headers(&[]), "").is_err());
    }

    #[test]
    fn test_actor_id() {
        assert_eq!(actor_id(&headers(&[("x-user-id", "42")])), Some(42));
        assert_eq!(actor_id(&headers(&[("x-user-id", "abc")])), None);
        assert_eq!(actor_id(&headers(&[])), None);
    }

    #[test]
    fn test_pagination_limits() {
        let p = Pagination {
            skip: None,
            limit: Some(10_000),
        };
        assert_eq!(p.resolve(), (0, MAX_LIMIT));
        assert_eq!(Pagination::default().resolve(), (0, DEFAULT_LIMIT));
    }
}
