use std::any::Any;

use axum::{
    Extension, Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header::CONNECTION},
    response::{IntoResponse, Response},
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::errors::AppError;
use crate::security::json::MAX_BODY_SIZE_BYTES;
use crate::store::SharedStore;

pub mod health;
pub mod persons;


pub fn create_router(store: SharedStore) -> Router {
    tracing::debug!("Creating application router");
    with_middleware(
        Router::new()
            .merge(health::router())
            .merge(persons::router()),
        store,
    )
}

/// Shared layer stack: fallbacks, body limit, tracing, panic recovery and the
/// store handle.
pub fn with_middleware(router: Router, store: SharedStore) -> Router {
    router
        .fallback(not_found)
        .layer(Extension(store))
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(recover_panic))
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}

pub async fn method_not_allowed(method: Method) -> AppError {
    AppError::MethodNotAllowed(method)
}

fn recover_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = err.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = err.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "unknown panic payload".to_string()
    };

    let mut response = AppError::Internal(format!("handler panicked: {detail}")).into_response();
    response
        .headers_mut()
        .insert(CONNECTION, HeaderValue::from_static("close"));
    response
}
