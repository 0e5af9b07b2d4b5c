//! Common test utilities for admission-gate
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::common::{fixtures, memory_state};
//!
//! #[actix_web::test]
//! async fn my_test() {
//!     let app = actix_web::test::init_service(HttpServer::create_app(memory_state(fixtures::config()))).await;
//!     let token = fetch_csrf_token!(&app, "s1");
//!     // ...
//! }
//! ```

pub mod fixtures;

pub use stores::FailingStore;

use actix_web::web;
use admission_gate::Config;
use admission_gate::server::AppState;
use admission_gate::storage::MemoryStore;
use std::sync::Arc;

/// Peer address used by requests that do not set their own
pub const CLIENT_ADDR: &str = "198.51.100.7:40000";

/// Application state over a fresh in-memory store
pub fn memory_state(config: Config) -> web::Data<AppState> {
    web::Data::new(AppState::new(config, Arc::new(MemoryStore::new())))
}

/// Application state over a store that fails every call
pub fn failing_state(config: Config) -> web::Data<AppState> {
    web::Data::new(AppState::new(config, Arc::new(FailingStore)))
}

/// GET the token endpoint for `session` and return the issued token
macro_rules! fetch_csrf_token {
    ($app:expr, $session:expr) => {{
        let req = actix_web::test::TestRequest::get()
            .uri("/api/csrf-token")
            .insert_header(("cookie", format!("session={}", $session)))
            .peer_addr($crate::common::CLIENT_ADDR.parse().unwrap())
            .to_request();
        let body: serde_json::Value = actix_web::test::call_and_read_body_json($app, req).await;
        body["csrfToken"]
            .as_str()
            .expect("token endpoint returned a token")
            .to_string()
    }};
}

/// POST `uri` for `session` with the token in the header
macro_rules! post_with_token {
    ($app:expr, $uri:expr, $session:expr, $token:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri($uri)
            .insert_header(("cookie", format!("session={}", $session)))
            .insert_header(("x-csrf-token", $token.to_string()))
            .peer_addr($crate::common::CLIENT_ADDR.parse().unwrap())
            .to_request();
        actix_web::test::call_service($app, req).await
    }};
}
