//! CORS policy derived from configuration.

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::AppConfig;

/// Parses `cors_allowed_origins`, dropping blanks and values that are not
/// valid header values.
pub fn allowed_origins(cfg: &AppConfig) -> Vec<HeaderValue> {
    cfg.cors_allowed_origins
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect()
}

/// Explicit origins win. Without them the policy is permissive in
/// development or when `cors_allow_any_origin` is set, and `None` otherwise.
pub fn cors_layer(cfg: &AppConfig) -> Option<CorsLayer> {
    let origins = allowed_origins(cfg);
    if !origins.is_empty() {
        info!(origins = origins.len(), "CORS restricted to configured origins");
        return Some(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }
    if cfg.should_allow_permissive_cors() {
        info!(environment = %cfg.environment, "CORS allows any origin");
        return Some(CorsLayer::permissive());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blanks_dropped() {
        let mut cfg = AppConfig::new("sqlite::memory:", "production");
        cfg.cors_allowed_origins = Some(" https://pos.lakeview.example, ,https://bar.lakeview.example".into());
        let origins = allowed_origins(&cfg);
        assert_eq!(
            origins,
            vec![
                HeaderValue::from_static("https://pos.lakeview.example"),
                HeaderValue::from_static("https://bar.lakeview.example"),
            ]
        );
        assert!(cors_layer(&cfg).is_some());
    }

    #[test]
    fn production_without_origins_has_no_policy() {
        let cfg = AppConfig::new("sqlite::memory:", "production");
        assert!(cors_layer(&cfg).is_none());

        let dev = AppConfig::new("sqlite::memory:", "development");
        assert!(cors_layer(&dev).is_some());
    }
}
