//! Connection-establishment policy: which browser origins and request
//! methods may open a relay socket. Checked once, during the handshake.

use duet_config::CorsConfig;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::{header, StatusCode};

#[derive(Debug, Clone)]
pub struct OriginPolicy {
    allowed_origin: String,
    allowed_methods: Vec<String>,
}

impl OriginPolicy {
    pub fn new(config: &CorsConfig) -> Self {
        Self {
            allowed_origin: config.allowed_origin.trim_end_matches('/').to_string(),
            allowed_methods: config
                .allowed_methods
                .iter()
                .map(|m| m.to_ascii_uppercase())
                .collect(),
        }
    }

    /// Whether a browser sending `origin` may connect. A missing origin
    /// means a non-browser client and is always allowed.
    pub fn allows_origin(&self, origin: Option<&str>) -> bool {
        match origin {
            None => true,
            Some(_) if self.allowed_origin == "*" => true,
            Some(origin) => origin.trim_end_matches('/') == self.allowed_origin,
        }
    }

    pub fn allows_method(&self, method: &str) -> bool {
        self.allowed_methods
            .iter()
            .any(|m| m.eq_ignore_ascii_case(method))
    }

    /// Handshake callback: pass the response through, or refuse with 403.
    pub fn check(&self, request: &Request, response: Response) -> Result<Response, ErrorResponse> {
        if !self.allows_method(request.method().as_str()) {
            return Err(reject(
                StatusCode::METHOD_NOT_ALLOWED,
                format!("method {} not allowed", request.method()),
            ));
        }

        let origin = request
            .headers()
            .get(header::ORIGIN)
            .and_then(|v| v.to_str().ok());
        if !self.allows_origin(origin) {
            return Err(reject(
                StatusCode::FORBIDDEN,
                format!("origin {} not allowed", origin.unwrap_or_default()),
            ));
        }

        Ok(response)
    }
}

fn reject(status: StatusCode, reason: String) -> ErrorResponse {
    let mut response = ErrorResponse::new(Some(reason));
    *response.status_mut() = status;
    response
}
