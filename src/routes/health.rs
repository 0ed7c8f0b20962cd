use axum::{Router, routing::get};
use serde::Serialize;

use crate::response::PrettyJson;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn router() -> Router {
    Router::new().route(
        "/healthcheck",
        get(healthcheck).fallback(super::method_not_allowed),
    )
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    status: &'static str,
    version: &'static str,
}

pub async fn healthcheck() -> PrettyJson<HealthStatus> {
    PrettyJson::ok(HealthStatus {
        status: "available",
        version: VERSION,
    })
}
