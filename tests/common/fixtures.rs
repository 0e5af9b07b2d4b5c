//! Configuration fixtures

use admission_gate::Config;
use admission_gate::config::{
    BackoffConfig, GateSettings, LimiterConfig, RouteConfig, SlidingWindowConfig,
};

/// Default configuration: login, registration and password reset guarded, CSRF on
pub fn config() -> Config {
    Config::default()
}

/// Default configuration with CSRF protection disabled
pub fn config_without_csrf() -> Config {
    let mut config = config();
    config.settings.gate.csrf.enabled = false;
    config
}

/// A single sliding-window route at `path`
pub fn sliding_route(name: &str, path: &str, window_ms: u64, max_requests: u32) -> RouteConfig {
    RouteConfig {
        name: name.to_string(),
        path: path.to_string(),
        methods: vec!["POST".to_string()],
        limiter: LimiterConfig::SlidingWindow(SlidingWindowConfig {
            window_ms,
            max_requests,
            key_prefix: "ratelimit".to_string(),
        }),
    }
}

/// A single backoff route at `path`
pub fn backoff_route(name: &str, path: &str, base_quota: u32) -> RouteConfig {
    RouteConfig {
        name: name.to_string(),
        path: path.to_string(),
        methods: vec!["POST".to_string()],
        limiter: LimiterConfig::Backoff(BackoffConfig {
            base_window_ms: 60 * 60 * 1000,
            max_window_ms: 24 * 60 * 60 * 1000,
            base_quota,
            key_prefix: "backoff".to_string(),
        }),
    }
}

/// Configuration guarding exactly `routes`
pub fn config_with_routes(routes: Vec<RouteConfig>) -> Config {
    let mut settings = GateSettings::default();
    settings.gate.routes = routes;
    Config { settings }
}
