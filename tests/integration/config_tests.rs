//! Configuration loading integration tests

#[cfg(test)]
mod tests {
    use admission_gate::Config;
    use admission_gate::config::{LimiterConfig, Validate};
    use admission_gate::server::ServerBuilder;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const EXAMPLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/config/gate.yaml.example");

    #[tokio::test]
    async fn test_example_config_matches_defaults() {
        let config = Config::from_file(EXAMPLE).await.unwrap();
        let defaults = Config::default();

        assert_eq!(config.gate().routes, defaults.gate().routes);
        assert_eq!(config.gate().csrf, defaults.gate().csrf);
        assert_eq!(config.storage().operation_timeout_ms, 500);
        assert!(config.gate().validate().is_ok());
    }

    #[tokio::test]
    async fn test_custom_route_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
gate:
  routes:
    - name: api-keys
      path: /api/keys
      limiter:
        strategy: backoff
        base_window_ms: 1000
        max_window_ms: 8000
        base_quota: 2
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).await.unwrap();
        let routes = &config.gate().routes;

        assert_eq!(routes.len(), 1);
        assert!(routes[0].methods.is_empty());
        assert!(routes[0].matches("DELETE", "/api/keys/42"));
        match &routes[0].limiter {
            LimiterConfig::Backoff(backoff) => {
                assert_eq!(backoff.base_quota, 2);
                assert_eq!(backoff.key_prefix, "backoff");
            }
            other => panic!("expected backoff limiter, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_builder_rejects_invalid_config() {
        let mut config = Config::default();
        config.settings.gate.routes[0].name = "bad:name".to_string();

        let result = ServerBuilder::new().with_config(config).build().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_builder_requires_config() {
        assert!(ServerBuilder::new().build().await.is_err());
    }

    #[tokio::test]
    async fn test_builder_uses_memory_store_by_default() {
        let server = ServerBuilder::new()
            .with_config(Config::default())
            .build()
            .await
            .unwrap();

        assert_eq!(server.state().store.backend(), "memory");
        assert_eq!(server.config().port, 8000);
        assert_eq!(server.state().gate.routes().len(), 3);
    }
}
