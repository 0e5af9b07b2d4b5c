//! CSRF issuance and validation through the HTTP stack

#[cfg(test)]
mod tests {
    use crate::common::{CLIENT_ADDR, fixtures, memory_state};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use admission_gate::server::HttpServer;
    use admission_gate::server::middleware::GateMiddleware;
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn test_token_endpoint_issues_header_and_body() {
        let app = test::init_service(HttpServer::create_app(memory_state(fixtures::config()))).await;

        let req = test::TestRequest::get()
            .uri("/api/csrf-token")
            .insert_header(("cookie", "session=s1"))
            .peer_addr(CLIENT_ADDR.parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let header = resp
            .headers()
            .get("x-csrf-token")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let body: Value = test::read_body_json(resp).await;

        assert_eq!(body["csrfToken"], header.as_str());
        assert_eq!(header.len(), 64);
        assert!(body["expiresAt"].as_u64().unwrap() > 0);
    }

    #[actix_web::test]
    async fn test_missing_token_is_forbidden() {
        let app = test::init_service(HttpServer::create_app(memory_state(fixtures::config()))).await;

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .insert_header(("cookie", "session=s1"))
            .peer_addr(CLIENT_ADDR.parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "CSRF token missing");
    }

    #[actix_web::test]
    async fn test_token_bound_to_session() {
        let app = test::init_service(HttpServer::create_app(memory_state(fixtures::config()))).await;
        let token = fetch_csrf_token!(&app, "s1");

        let resp = post_with_token!(&app, "/auth/login", "s2", token);
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid CSRF token");

        let resp = post_with_token!(&app, "/auth/login", "s1", token);
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_tampered_token_is_invalid() {
        let app = test::init_service(HttpServer::create_app(memory_state(fixtures::config()))).await;
        let token = fetch_csrf_token!(&app, "s1");
        let tampered = format!("{}{}", &token[..63], if token.ends_with('0') { "1" } else { "0" });

        let resp = post_with_token!(&app, "/auth/login", "s1", tampered);
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid CSRF token");
    }

    #[actix_web::test]
    async fn test_rejected_token_does_not_consume_quota() {
        let app = test::init_service(HttpServer::create_app(memory_state(fixtures::config()))).await;
        let token = fetch_csrf_token!(&app, "s1");

        for _ in 0..10 {
            let resp = post_with_token!(&app, "/auth/login", "s1", "not-a-token");
            assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        }

        let resp = post_with_token!(&app, "/auth/login", "s1", token);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("x-ratelimit-remaining").unwrap(), "4");
    }

    #[actix_web::test]
    async fn test_token_from_json_body() {
        let app = test::init_service(HttpServer::create_app(memory_state(fixtures::config()))).await;
        let token = fetch_csrf_token!(&app, "s1");

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .insert_header(("cookie", "session=s1"))
            .peer_addr(CLIENT_ADDR.parse().unwrap())
            .set_json(json!({ "email": "a@example.com", "_csrf": token }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_token_from_form_body() {
        let app = test::init_service(HttpServer::create_app(memory_state(fixtures::config()))).await;
        let token = fetch_csrf_token!(&app, "s1");

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .insert_header(("cookie", "session=s1"))
            .peer_addr(CLIENT_ADDR.parse().unwrap())
            .set_form([("email", "a@example.com"), ("_csrf", token.as_str())])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_token_from_query() {
        let app = test::init_service(HttpServer::create_app(memory_state(fixtures::config()))).await;
        let token = fetch_csrf_token!(&app, "s1");

        let req = test::TestRequest::post()
            .uri(&format!("/auth/login?_csrf={token}"))
            .insert_header(("cookie", "session=s1"))
            .peer_addr(CLIENT_ADDR.parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_body_reaches_handler_after_token_lookup() {
        let state = memory_state(fixtures::config());
        let gate = state.gate.clone();
        let gate_config = state.config.gate().clone();

        let app = test::init_service(
            App::new()
                .app_data(state)
                .route(
                    "/auth/login",
                    web::post().to(|body: web::Json<Value>| async move {
                        HttpResponse::Ok().json(body.into_inner())
                    }),
                )
                .route(
                    "/api/csrf-token",
                    web::get().to(admission_gate::server::routes::gate::csrf_token),
                )
                .wrap(GateMiddleware::new(gate, &gate_config, 1024)),
        )
        .await;
        let token = fetch_csrf_token!(&app, "s1");

        let payload = json!({ "email": "a@example.com", "_csrf": token });
        let req = test::TestRequest::post()
            .uri("/auth/login")
            .insert_header(("cookie", "session=s1"))
            .peer_addr(CLIENT_ADDR.parse().unwrap())
            .set_json(&payload)
            .to_request();
        let echoed: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(echoed, payload);
    }

    #[actix_web::test]
    async fn test_oversized_body_is_not_searched() {
        let state = memory_state(fixtures::config());
        let gate = state.gate.clone();
        let gate_config = state.config.gate().clone();

        let app = test::init_service(
            App::new()
                .app_data(state)
                .route(
                    "/auth/login",
                    web::post().to(|| async { HttpResponse::Ok().finish() }),
                )
                .route(
                    "/api/csrf-token",
                    web::get().to(admission_gate::server::routes::gate::csrf_token),
                )
                .wrap(GateMiddleware::new(gate, &gate_config, 16)),
        )
        .await;
        let token = fetch_csrf_token!(&app, "s1");

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .insert_header(("cookie", "session=s1"))
            .peer_addr(CLIENT_ADDR.parse().unwrap())
            .set_json(json!({ "_csrf": token }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_exempt_path_skips_validation() {
        let mut config = fixtures::config();
        config.settings.gate.csrf.exempt_paths = vec!["/auth/login".to_string()];
        let app = test::init_service(HttpServer::create_app(memory_state(config))).await;

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .peer_addr(CLIENT_ADDR.parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_disabled_csrf_issues_nothing() {
        let app = test::init_service(HttpServer::create_app(memory_state(
            fixtures::config_without_csrf(),
        )))
        .await;

        let req = test::TestRequest::get()
            .uri("/api/csrf-token")
            .peer_addr(CLIENT_ADDR.parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(resp.headers().get("x-csrf-token").is_none());
    }
}
