//! 路径参数提取器
//!
//! 解析失败时直接返回统一格式的 400 响应，处理函数无需再校验。

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload, http::StatusCode,
};
use futures_util::future::{Ready, ready};
use std::fmt;

use crate::models::{ApiResponse, ErrorCode};

#[derive(Debug)]
pub struct PathIdError {
    param: &'static str,
}

impl fmt::Display for PathIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path parameter '{}' must be a positive integer", self.param)
    }
}

impl ResponseError for PathIdError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            self.to_string(),
        ))
    }
}

fn parse_positive_id(req: &HttpRequest, param: &'static str) -> Result<i64, PathIdError> {
    req.match_info()
        .get(param)
        .and_then(|raw| raw.parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or(PathIdError { param })
}

/// 路径中的 `{id}`，必须为正整数
#[derive(Debug, Clone, Copy)]
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = PathIdError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse_positive_id(req, "id").map(SafeIDI64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_parse_positive_id() {
        let req = TestRequest::default().param("id", "42").to_http_request();
        assert_eq!(parse_positive_id(&req, "id").unwrap(), 42);

        let req = TestRequest::default().param("id", "0").to_http_request();
        assert!(parse_positive_id(&req, "id").is_err());

        let req = TestRequest::default().param("id", "abc").to_http_request();
        assert!(parse_positive_id(&req, "id").is_err());

        let req = TestRequest::default().to_http_request();
        assert!(parse_positive_id(&req, "id").is_err());
    }
}
