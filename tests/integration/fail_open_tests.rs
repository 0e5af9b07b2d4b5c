//! Behavior when the store is unreachable

#[cfg(test)]
mod tests {
    use crate::common::{CLIENT_ADDR, failing_state, fixtures, memory_state};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use admission_gate::server::HttpServer;
    use serde_json::Value;

    #[actix_web::test]
    async fn test_store_outage_admits_guarded_requests() {
        let app = test::init_service(HttpServer::create_app(failing_state(fixtures::config()))).await;

        for _ in 0..10 {
            let resp = post_with_token!(&app, "/auth/login", "s1", "any-token");
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(resp.headers().get("x-ratelimit-remaining").unwrap(), "5");
        }
    }

    #[actix_web::test]
    async fn test_store_outage_still_requires_a_token() {
        let app = test::init_service(HttpServer::create_app(failing_state(fixtures::config()))).await;

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .peer_addr(CLIENT_ADDR.parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_store_outage_token_endpoint_unavailable() {
        let app = test::init_service(HttpServer::create_app(failing_state(fixtures::config()))).await;

        let req = test::TestRequest::get()
            .uri("/api/csrf-token")
            .insert_header(("cookie", "session=s1"))
            .peer_addr(CLIENT_ADDR.parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
    }

    #[actix_web::test]
    async fn test_status_surfaces_store_errors() {
        let app = test::init_service(HttpServer::create_app(failing_state(fixtures::config()))).await;

        let req = test::TestRequest::get().uri("/gate/status").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Internal server error");
    }

    #[actix_web::test]
    async fn test_health_reports_degraded_store() {
        let app = test::init_service(HttpServer::create_app(failing_state(fixtures::config()))).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"]["status"], "degraded");
        assert_eq!(body["data"]["store"]["backend"], "failing");
        assert_eq!(body["data"]["store"]["reachable"], false);
    }

    #[actix_web::test]
    async fn test_health_reports_healthy_store() {
        let app = test::init_service(HttpServer::create_app(memory_state(fixtures::config()))).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.headers().get("server").unwrap(), "admission-gate");

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["status"], "healthy");
        assert_eq!(body["data"]["store"]["backend"], "memory");
        assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
    }
}
