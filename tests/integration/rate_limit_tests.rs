//! Sliding-window rate limiting through the HTTP stack

#[cfg(test)]
mod tests {
    use crate::common::{CLIENT_ADDR, fixtures, memory_state};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use admission_gate::server::HttpServer;
    use serde_json::Value;

    #[actix_web::test]
    async fn test_sixth_login_is_rejected() {
        let app = test::init_service(HttpServer::create_app(memory_state(fixtures::config()))).await;
        let token = fetch_csrf_token!(&app, "s1");

        for expected_remaining in (0..5u32).rev() {
            let resp = post_with_token!(&app, "/auth/login", "s1", token);
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(
                resp.headers().get("x-ratelimit-remaining").unwrap(),
                &expected_remaining.to_string()
            );
            assert_eq!(resp.headers().get("x-ratelimit-limit").unwrap(), "5");
        }

        let resp = post_with_token!(&app, "/auth/login", "s1", token);
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        let retry_after: u64 = resp
            .headers()
            .get("retry-after")
            .unwrap()
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert!((1..=900).contains(&retry_after));

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Too many requests");
        assert_eq!(body["currentCount"], 5);
        assert_eq!(body["maxRequests"], 5);
        assert_eq!(body["windowMs"], 900_000);
        assert_eq!(body["retryAfter"], retry_after);
    }

    #[actix_web::test]
    async fn test_clients_have_separate_quotas() {
        let config = fixtures::config_with_routes(vec![fixtures::sliding_route(
            "login",
            "/auth/login",
            60_000,
            1,
        )]);
        let app = test::init_service(HttpServer::create_app(memory_state(config))).await;
        let token = fetch_csrf_token!(&app, "s1");

        let resp = post_with_token!(&app, "/auth/login", "s1", token);
        assert_eq!(resp.status(), StatusCode::OK);
        let resp = post_with_token!(&app, "/auth/login", "s1", token);
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .insert_header(("cookie", "session=s1"))
            .insert_header(("x-csrf-token", token.as_str()))
            .peer_addr("198.51.100.99:40000".parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_forwarded_address_used_when_trusted() {
        let mut config = fixtures::config_without_csrf();
        config.settings.gate.trust_proxy_headers = true;
        let app = test::init_service(HttpServer::create_app(memory_state(config))).await;

        let register = |forwarded: &'static str| {
            test::TestRequest::post()
                .uri("/auth/register")
                .insert_header(("x-forwarded-for", forwarded))
                .peer_addr(CLIENT_ADDR.parse().unwrap())
                .to_request()
        };

        for _ in 0..3 {
            let resp = test::call_service(&app, register("203.0.113.1")).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }
        let resp = test::call_service(&app, register("203.0.113.1")).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

        let resp = test::call_service(&app, register("203.0.113.2")).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_unguarded_requests_pass_without_headers() {
        let app = test::init_service(HttpServer::create_app(memory_state(fixtures::config()))).await;

        let req = test::TestRequest::get()
            .uri("/auth/login")
            .peer_addr(CLIENT_ADDR.parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get("x-ratelimit-limit").is_none());
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["route"], Value::Null);
    }

    #[actix_web::test]
    async fn test_status_reports_active_keys() {
        let app = test::init_service(HttpServer::create_app(memory_state(
            fixtures::config_without_csrf(),
        )))
        .await;

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .peer_addr(CLIENT_ADDR.parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["route"], "login");
        assert_eq!(body["data"]["remaining"], 4);

        let req = test::TestRequest::get().uri("/gate/status").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["backend"], "memory");
        let routes = body["data"]["routes"].as_array().unwrap();
        assert_eq!(routes.len(), 3);
        let login = routes.iter().find(|r| r["name"] == "login").unwrap();
        assert_eq!(login["strategy"], "sliding_window");
        assert_eq!(login["activeKeys"], 1);
        let register = routes.iter().find(|r| r["name"] == "register").unwrap();
        assert_eq!(register["activeKeys"], 0);
    }
}
