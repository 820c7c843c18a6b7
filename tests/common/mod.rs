use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use bus_seat_finder::config::toml_config::TomlConfig;
use bus_seat_finder::{build_app_router, AppState};
use http_body_util::BodyExt;
use tower::ServiceExt;

/// 讓供應商客戶端指向模擬伺服器的設定
pub fn test_config(vendor_base_url: String) -> TomlConfig {
    let mut config = TomlConfig::default();
    config.vendor.base_url = vendor_base_url;
    config.vendor.timeout_seconds = 5;
    config
}

/// 建立與執行檔相同的路由
pub fn build_test_app(vendor_base_url: String) -> Router {
    let config = test_config(vendor_base_url);
    let state = AppState::from_config(&config).unwrap();
    build_app_router(state, Duration::from_secs(30))
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
