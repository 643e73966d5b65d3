//! Response types.
//!
//! Operation results and errors are plaintext; only `/health` is JSON.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::RequestError;
use crate::models::OperationOutput;

/// Body: `error <message>`, status from [`RequestError::status_code`].
impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        (self.status_code(), error_body(&self.to_string())).into_response()
    }
}

impl IntoResponse for OperationOutput {
    fn into_response(self) -> Response {
        (StatusCode::OK, self.to_string()).into_response()
    }
}

/// Plaintext error body.
pub fn error_body(message: &str) -> String {
    format!("error {}\n", message)
}

/// Response of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    /// `"POST /sum"`-style descriptions of every route.
    pub endpoints: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn test_error_body() {
        assert_eq!(error_body("no data provided"), "error no data provided\n");
    }

    #[test]
    fn test_error_into_response_status() {
        let response = RequestError::from(ValidationError::EmptyInput).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = RequestError::FileRetrieval("no file".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_output_into_response_is_plaintext() {
        let response = OperationOutput::Scalar(45).into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let content_type = response.headers()["content-type"].to_str().unwrap();
        assert!(content_type.starts_with("text/plain"));
    }

    #[test]
    fn test_health_response_camel_case() {
        let health = HealthResponse {
            status: "ok".into(),
            service: "csvmatrix".into(),
            version: "0.1.0".into(),
            endpoints: vec!["POST /echo".into()],
        };
        let json = serde_json::to_value(&health).unwrap();
        assert_eq!(json["endpoints"][0], "POST /echo");
    }
}
