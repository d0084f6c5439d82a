//! The `{code, data, msg}` envelope every API route answers with.
//!
//! The envelope is always sent with HTTP 200; `code` carries the outcome so
//! that browser clients can render the payload (including fallback bot
//! replies) without inspecting the transport status.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub const MSG_OK: &str = "Ok";
pub const MSG_FAILED: &str = "Failed";
pub const MSG_SERVER_ERROR: &str = "Server Error Failed";

pub const CODE_OK: u16 = 200;
pub const CODE_UNSUPPORTED: u16 = 400;
pub const CODE_SERVER_ERROR: u16 = 500;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub data: Option<T>,
    pub msg: String,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: CODE_OK,
            data: Some(data),
            msg: MSG_OK.to_string(),
        }
    }

    /// Returned for HTTP methods a route does not handle.
    pub fn failed() -> Self {
        Self {
            code: CODE_UNSUPPORTED,
            data: None,
            msg: MSG_FAILED.to_string(),
        }
    }

    pub fn server_error(fallback: Option<T>) -> Self {
        Self {
            code: CODE_SERVER_ERROR,
            data: fallback,
            msg: MSG_SERVER_ERROR.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == CODE_OK
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        crate::services::metrics::record_envelope(self.code);
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn holds_invariant<T>(resp: &ApiResponse<T>) -> bool {
        (resp.code == CODE_OK) == (resp.msg == MSG_OK && resp.data.is_some())
    }

    #[test]
    fn ok_envelope() {
        let resp = ApiResponse::ok("hello".to_string());
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({"code": 200, "data": "hello", "msg": "Ok"})
        );
        assert!(resp.is_success());
    }

    #[test]
    fn failed_envelope_has_null_data() {
        let resp: ApiResponse<String> = ApiResponse::failed();
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({"code": 400, "data": null, "msg": "Failed"})
        );
    }

    #[test]
    fn server_error_carries_optional_fallback() {
        let bare: ApiResponse<String> = ApiResponse::server_error(None);
        assert_eq!(bare.code, 500);
        assert!(bare.data.is_none());
        assert_eq!(bare.msg, "Server Error Failed");

        let with_fallback = ApiResponse::server_error(Some("sorry".to_string()));
        assert_eq!(with_fallback.data.as_deref(), Some("sorry"));
        assert!(!with_fallback.is_success());
    }

    #[test]
    fn every_constructor_keeps_the_code_msg_data_invariant() {
        assert!(holds_invariant(&ApiResponse::ok(1)));
        assert!(holds_invariant(&ApiResponse::<i32>::failed()));
        assert!(holds_invariant(&ApiResponse::<i32>::server_error(None)));
        assert!(holds_invariant(&ApiResponse::server_error(Some(1))));
    }
}
