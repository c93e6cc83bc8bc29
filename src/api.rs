//! Endpoint paths and the response validator shared by every operation.

use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::error::{Result, SberQrError};

/// Production host all endpoints live under.
pub const DEFAULT_BASE_URL: &str = "https://mc.api.sberbank.ru/prod/";

/// Fixed per-operation paths under the base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    OAuth,
    Creation,
    Status,
    Revocation,
    Cancel,
    Registry,
}

impl Method {
    pub fn path(&self) -> &'static str {
        match self {
            Self::OAuth => "tokens/v2/oauth",
            Self::Creation => "qr/order/v3/creation",
            Self::Status => "qr/order/v3/status",
            Self::Revocation => "qr/order/v3/revocation",
            Self::Cancel => "qr/order/v3/cancel",
            Self::Registry => "qr/order/v3/registry",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Classify an HTTP response into a success body or a typed error.
///
/// Success is the whole 2xx family (200 OK through 226 IM Used); the body
/// is returned unchanged. 400/404/409 (business rejections), 401/403
/// (authorization rejected) and every 5xx surface as [`SberQrError::Api`]
/// with the status and parsed body attached. A non-JSON content type, or a
/// JSON-labelled body that does not parse, is a transport-level failure.
/// Every other status fails closed as [`SberQrError::UnexpectedStatus`].
pub fn check_response(method: Method, content_type: &str, status: u16, body: &str) -> Result<Value> {
    debug!(%method, status, content_type, "response");

    if !is_json(content_type) {
        return Err(SberQrError::InvalidResponse {
            content_type: content_type.to_string(),
            body: body.to_string(),
        });
    }
    let body: Value = serde_json::from_str(body).map_err(|_| SberQrError::InvalidResponse {
        content_type: content_type.to_string(),
        body: body.to_string(),
    })?;

    match status {
        200..=226 => Ok(body),
        400 | 404 | 409 => Err(SberQrError::Api { status, body }),
        401 | 403 => Err(SberQrError::Api { status, body }),
        500..=599 => Err(SberQrError::Api { status, body }),
        _ => Err(SberQrError::UnexpectedStatus { status, body }),
    }
}

fn is_json(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(str::trim)
        .is_some_and(|essence| essence.eq_ignore_ascii_case("application/json"))
}
