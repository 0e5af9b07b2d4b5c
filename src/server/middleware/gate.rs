//! Admission gate middleware

use super::helpers::{
    BodyKind, CSRF_HEADER, body_kind, body_token, client_address, content_length, header_token,
    query_token, session_id,
};
use crate::config::GateConfig;
use crate::core::gate::{Admission, Gate, GateRequest};
use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{Error, HttpMessage, ResponseError, web};
use futures::StreamExt;
use futures::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, error};

/// Request-independent settings of the middleware
#[derive(Debug, Clone)]
struct GateOptions {
    trust_proxy_headers: bool,
    session_cookie: String,
    max_body_size: usize,
}

/// Gate middleware for Actix-web
///
/// Rejections short-circuit with the 403/429 response of the error; admitted requests
/// carry the issued [`CsrfToken`](crate::core::csrf::CsrfToken) and limiter result in
/// their extensions.
pub struct GateMiddleware {
    gate: Arc<Gate>,
    options: Rc<GateOptions>,
}

impl GateMiddleware {
    pub fn new(gate: Arc<Gate>, config: &GateConfig, max_body_size: usize) -> Self {
        Self {
            gate,
            options: Rc::new(GateOptions {
                trust_proxy_headers: config.trust_proxy_headers,
                session_cookie: config.session_cookie.clone(),
                max_body_size,
            }),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for GateMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = GateMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(GateMiddlewareService {
            service: Rc::new(service),
            gate: Arc::clone(&self.gate),
            options: Rc::clone(&self.options),
        }))
    }
}

/// Service implementation for gate middleware
pub struct GateMiddlewareService<S> {
    service: Rc<S>,
    gate: Arc<Gate>,
    options: Rc<GateOptions>,
}

impl<S, B> Service<ServiceRequest> for GateMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let gate = Arc::clone(&self.gate);
        let options = Rc::clone(&self.options);

        Box::pin(async move {
            let method = req.method().as_str().to_string();
            let path = req.path().to_string();

            let mut request = GateRequest::new(
                method.as_str(),
                path.as_str(),
                client_address(&req, options.trust_proxy_headers),
            );
            request.session_id = session_id(&req, &options.session_cookie);
            request.supplied_token = header_token(req.headers());

            if request.supplied_token.is_none() && gate.requires_csrf(&method, &path) {
                request.supplied_token = buffered_body_token(&mut req, options.max_body_size)
                    .await
                    .or_else(|| query_token(req.query_string()));
            }

            let admission = match gate.admit(&request).await {
                Ok(admission) => admission,
                Err(e) => {
                    if !e.is_rejection() {
                        error!(error = %e, path = %path, "Gate failed to decide request");
                    }
                    let response = e.error_response();
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            annotate_request(&req, &admission);
            let mut res = service.call(req).await?;
            decorate_response(&mut res, &admission);

            Ok(res.map_into_left_body())
        })
    }
}

/// Read the body looking for `_csrf`, then put it back for the handler
async fn buffered_body_token(req: &mut ServiceRequest, limit: usize) -> Option<String> {
    let kind: BodyKind = body_kind(req.headers())?;
    match content_length(req.headers()) {
        Some(len) if len <= limit => {}
        other => {
            debug!(content_length = ?other, limit, "Body not buffered for CSRF token lookup");
            return None;
        }
    }

    let mut payload = req.take_payload();
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        match chunk {
            Ok(chunk) => body.extend_from_slice(&chunk),
            Err(e) => {
                debug!(error = %e, "Failed to read request body");
                req.set_payload(Payload::from(body.freeze()));
                return None;
            }
        }
    }

    let body = body.freeze();
    let token = body_token(&body, kind);
    req.set_payload(Payload::from(body));
    token
}

fn annotate_request(req: &ServiceRequest, admission: &Admission) {
    let mut extensions = req.extensions_mut();
    if let Some(token) = &admission.csrf_token {
        extensions.insert(token.clone());
    }
    if let Some(result) = &admission.rate_limit {
        extensions.insert(result.clone());
    }
}

fn decorate_response<B>(res: &mut ServiceResponse<B>, admission: &Admission) {
    let headers = res.headers_mut();

    if let Some(token) = &admission.csrf_token {
        if let Ok(value) = HeaderValue::from_str(&token.token) {
            headers.insert(HeaderName::from_static(CSRF_HEADER), value);
        }
    }

    if let Some(result) = &admission.rate_limit {
        headers.insert(
            HeaderName::from_static("x-ratelimit-limit"),
            HeaderValue::from(result.limit),
        );
        headers.insert(
            HeaderName::from_static("x-ratelimit-remaining"),
            HeaderValue::from(result.remaining),
        );
    }
}
