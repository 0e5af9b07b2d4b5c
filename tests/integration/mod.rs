//! Integration tests

pub mod backoff_tests;
pub mod config_tests;
pub mod csrf_tests;
pub mod fail_open_tests;
pub mod rate_limit_tests;
