//! Response conversion for the HTTP surface.

use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};

use crate::gate::GateResponse;

impl IntoResponse for GateResponse {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, [(CONTENT_TYPE, self.headers.content_type)], self.body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_into_response() {
        let res = GateResponse::relayed(StatusCode::BAD_REQUEST).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(res.headers()[CONTENT_TYPE], "text/plain");

        let body = axum::body::to_bytes(res.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"Bad Request");
    }
}
