use axum::{
    async_trait,
    body::Bytes,
    extract::{
        FromRequest, Request,
        rejection::{BytesRejection, FailedToBufferBody},
    },
};
use serde::de::DeserializeOwned;
use serde_json::{Deserializer, error::Category};
use thiserror::Error;

pub const MAX_BODY_SIZE_BYTES: usize = 1_048_576; // 1 MiB upper bound for request bodies

/// Request body decoded from exactly one JSON value with no unknown fields.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

/// Every way a request body can fail to decode. All of them are client errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JsonRejection {
    #[error("body contains badly-formed JSON (at character {offset})")]
    Syntax { offset: usize },

    #[error("body contains badly-formed JSON")]
    Truncated,

    #[error("body contains incorrect JSON type for field {field:?}")]
    FieldType { field: String },

    #[error("body contains incorrect JSON type (at character {offset})")]
    Type { offset: usize },

    #[error("body must not be empty")]
    Empty,

    #[error("body contains unknown key \"{0}\"")]
    UnknownField(String),

    #[error("body must not be larger than {limit} bytes")]
    TooLarge { limit: usize },

    #[error("body must only contain a single JSON value")]
    TrailingData,

    #[error("{0}")]
    Other(String),
}

impl JsonRejection {
    fn from_bytes_rejection(rejection: BytesRejection) -> Self {
        match rejection {
            BytesRejection::FailedToBufferBody(FailedToBufferBody::LengthLimitError(_)) => {
                Self::TooLarge {
                    limit: MAX_BODY_SIZE_BYTES,
                }
            }
            other => Self::Other(other.body_text()),
        }
    }

    fn parsing_error(body: &[u8], err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = err.path().to_string();
        let error = err.into_inner();
        let offset = byte_offset(body, error.line(), error.column());

        match error.classify() {
            Category::Eof if body.iter().all(u8::is_ascii_whitespace) => Self::Empty,
            Category::Eof => Self::Truncated,
            Category::Syntax => Self::Syntax { offset },
            Category::Data => {
                let message = error.to_string();
                if let Some(field) = unknown_field_name(&message) {
                    Self::UnknownField(field.to_string())
                } else if is_type_mismatch(&message) {
                    if path.is_empty() || path == "." {
                        Self::Type { offset }
                    } else {
                        Self::FieldType { field: path }
                    }
                } else {
                    Self::Other(message)
                }
            }
            Category::Io => Self::Other(error.to_string()),
        }
    }
}

/// Decodes `body` into `T`, classifying failures into [`JsonRejection`].
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, JsonRejection> {
    let mut deserializer = Deserializer::from_slice(body);
    let value = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|err| JsonRejection::parsing_error(body, err))?;

    deserializer
        .end()
        .map_err(|_| JsonRejection::TrailingData)?;

    Ok(value)
}

// serde_json reports `unknown field `name`, expected ...`.
fn unknown_field_name(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("unknown field `")?;
    rest.split_once('`').map(|(name, _)| name)
}

fn is_type_mismatch(message: &str) -> bool {
    message.starts_with("invalid type") || message.starts_with("invalid value")
}

/// Converts serde_json's 1-based line/column position into a byte count from
/// the start of the body.
fn byte_offset(body: &[u8], line: usize, column: usize) -> usize {
    let preceding: usize = body
        .split(|byte| *byte == b'\n')
        .take(line.saturating_sub(1))
        .map(|line| line.len() + 1)
        .sum();
    preceding + column
}

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = JsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(JsonRejection::from_bytes_rejection)?;

        decode_json(&body).map(ValidatedJson)
    }
}
