//! Gate endpoints: token issuance, status and guarded placeholders

use crate::core::csrf::CsrfToken;
use crate::core::rate_limiter::RateLimitResult;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::utils::error::GateError;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, web};
use serde_json::json;
use tracing::debug;

/// Configure gate routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/csrf-token", web::get().to(csrf_token))
        .route("/gate/status", web::get().to(gate_status));
}

/// Return the token the middleware issued for this request
pub async fn csrf_token(req: HttpRequest) -> HttpResponse {
    match req.extensions().get::<CsrfToken>() {
        Some(token) => HttpResponse::Ok().json(json!({
            "csrfToken": token.token,
            "expiresAt": token.expires_at,
        })),
        None => HttpResponse::ServiceUnavailable()
            .json(ApiResponse::<()>::error("CSRF token unavailable")),
    }
}

/// Active limiter keys per route class
pub async fn gate_status(state: web::Data<AppState>) -> Result<HttpResponse, GateError> {
    let routes = state.gate.status().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(json!({
        "backend": state.store.backend(),
        "routes": routes,
    }))))
}

/// Stand-in for the business handler behind a guarded route
pub async fn guarded_placeholder(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let route = state
        .gate
        .route_for(req.method().as_str(), req.path())
        .map(|route| route.config.name.clone());
    let remaining = req
        .extensions()
        .get::<RateLimitResult>()
        .map(|result| result.remaining);

    debug!(route = ?route, path = %req.path(), "Guarded request reached handler");
    HttpResponse::Ok().json(ApiResponse::success(json!({
        "route": route,
        "admitted": true,
        "remaining": remaining,
    })))
}
