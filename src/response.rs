use axum::{
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Pretty-printed, newline-terminated JSON response with optional extra headers.
#[derive(Debug)]
pub struct PrettyJson<T> {
    status: StatusCode,
    value: T,
    headers: HeaderMap,
}

impl<T: Serialize> PrettyJson<T> {
    pub fn new(status: StatusCode, value: T) -> Self {
        Self {
            status,
            value,
            headers: HeaderMap::new(),
        }
    }

    pub fn ok(value: T) -> Self {
        Self::new(StatusCode::OK, value)
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        merge_headers(&mut self.headers, headers);
        self
    }
}

impl<U: Serialize> PrettyJson<Vec<U>> {
    /// A collection response; always encodes as an array, `[]` when empty.
    pub fn list(status: StatusCode, items: impl IntoIterator<Item = U>) -> Self {
        Self::new(status, items.into_iter().collect())
    }
}

/// Serializes `value` the way every response body is written.
pub fn encode<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut body = serde_json::to_vec_pretty(value)?;
    body.push(b'\n');
    Ok(body)
}

/// Copies `extra` into `target`, keeping any header `target` already has.
pub fn merge_headers(target: &mut HeaderMap, extra: HeaderMap) {
    let mut current: Option<HeaderName> = None;
    let mut accept = false;

    for (name, value) in extra {
        if let Some(name) = name {
            accept = !target.contains_key(&name);
            current = Some(name);
        }
        if accept {
            if let Some(name) = &current {
                target.append(name.clone(), value);
            }
        }
    }
}

impl<T: Serialize> IntoResponse for PrettyJson<T> {
    fn into_response(self) -> Response {
        match encode(&self.value) {
            Ok(body) => {
                let mut response = (self.status, body).into_response();
                let headers = response.headers_mut();
                merge_headers(headers, self.headers);
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                response
            }
            Err(err) => crate::errors::AppError::Internal(format!(
                "failed to encode response body: {err}"
            ))
            .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_of(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_empty_list_encodes_as_array() {
        let response = PrettyJson::list(StatusCode::OK, Vec::<u32>::new()).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_of(response).await, "[]\n");
    }

    #[tokio::test]
    async fn test_output_is_pretty_and_newline_terminated() {
        let response = PrettyJson::ok(serde_json::json!({"status": "available"})).into_response();
        assert_eq!(
            response.headers()[CONTENT_TYPE],
            HeaderValue::from_static("application/json")
        );
        assert_eq!(body_of(response).await, "{\n  \"status\": \"available\"\n}\n");
    }

    #[test]
    fn test_merge_keeps_existing_headers() {
        let mut target = HeaderMap::new();
        target.insert("x-request-id", HeaderValue::from_static("original"));

        let mut extra = HeaderMap::new();
        extra.insert(
            HeaderName::from_bytes(b"X-Request-Id").unwrap(),
            HeaderValue::from_static("replacement"),
        );
        extra.append("location", HeaderValue::from_static("/persons/1"));
        extra.append("vary", HeaderValue::from_static("accept"));
        extra.append("vary", HeaderValue::from_static("origin"));

        merge_headers(&mut target, extra);

        assert_eq!(target["x-request-id"], "original");
        assert_eq!(target["location"], "/persons/1");
        assert_eq!(target.get_all("vary").iter().count(), 2);
    }
}
