//! Exponential backoff on password reset through the HTTP stack

#[cfg(test)]
mod tests {
    use crate::common::{CLIENT_ADDR, fixtures, memory_state};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use admission_gate::server::HttpServer;
    use serde_json::Value;

    macro_rules! forgot_password {
        () => {
            test::TestRequest::post()
                .uri("/auth/forgot-password")
                .peer_addr(CLIENT_ADDR.parse().unwrap())
                .to_request()
        };
    }

    #[actix_web::test]
    async fn test_repeated_violations_escalate() {
        let app = test::init_service(HttpServer::create_app(memory_state(
            fixtures::config_without_csrf(),
        )))
        .await;

        for _ in 0..3 {
            let resp = test::call_service(&app, forgot_password!()).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let resp = test::call_service(&app, forgot_password!()).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(resp.headers().get("retry-after").unwrap(), "14400");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Too many attempts");
        assert_eq!(body["violationCount"], 1);
        assert_eq!(body["currentMax"], 1);
        assert_eq!(body["windowMs"], 14_400_000);
        assert_eq!(body["retryAfter"], 14_400);

        let resp = test::call_service(&app, forgot_password!()).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["violationCount"], 2);
        assert_eq!(body["currentMax"], 1);
        assert_eq!(body["windowMs"], 28_800_000);
    }

    #[actix_web::test]
    async fn test_reset_lifts_penalty() {
        let state = memory_state(fixtures::config_without_csrf());
        let gate = state.gate.clone();
        let app = test::init_service(HttpServer::create_app(state)).await;

        for _ in 0..4 {
            test::call_service(&app, forgot_password!()).await;
        }
        let resp = test::call_service(&app, forgot_password!()).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

        assert!(gate.reset("forgot-password", "198.51.100.7").await.unwrap());
        assert!(!gate.reset("no-such-route", "198.51.100.7").await.unwrap());

        let resp = test::call_service(&app, forgot_password!()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("x-ratelimit-limit").unwrap(), "3");
        assert_eq!(resp.headers().get("x-ratelimit-remaining").unwrap(), "2");
    }

    #[actix_web::test]
    async fn test_backoff_route_with_single_attempt() {
        let mut config = fixtures::config_with_routes(vec![fixtures::backoff_route(
            "verify-email",
            "/auth/verify",
            1,
        )]);
        config.settings.gate.csrf.enabled = false;
        let app = test::init_service(HttpServer::create_app(memory_state(config))).await;

        let verify = || {
            test::TestRequest::post()
                .uri("/auth/verify")
                .peer_addr(CLIENT_ADDR.parse().unwrap())
                .to_request()
        };

        let resp = test::call_service(&app, verify()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = test::call_service(&app, verify()).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["violationCount"], 1);
        assert_eq!(body["currentMax"], 1);
    }
}
