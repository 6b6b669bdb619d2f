//! 路径参数提取器
//!
//! 解析失败时直接返回统一的 400 响应，处理函数拿到的总是合法值。

use actix_web::error::InternalError;
use actix_web::{Error, FromRequest, HttpRequest, HttpResponse, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::validate_username;

fn reject(message: String) -> Error {
    let response = HttpResponse::BadRequest()
        .json(ApiResponse::error_empty(ErrorCode::BadRequest, message.clone()));
    InternalError::from_response(message, response).into()
}

/// 路径中的正整数 `{id}`
#[derive(Debug, Clone, Copy)]
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("id").unwrap_or_default();
        ready(match raw.parse::<i64>() {
            Ok(id) if id > 0 => Ok(SafeIDI64(id)),
            _ => Err(reject(format!("Invalid id: '{raw}'"))),
        })
    }
}

/// 路径中的 `{intern}` 用户名
#[derive(Debug, Clone)]
pub struct SafeUsername(pub String);

impl FromRequest for SafeUsername {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("intern").unwrap_or_default();
        ready(match validate_username(raw) {
            Ok(()) => Ok(SafeUsername(raw.to_string())),
            Err(msg) => Err(reject(format!("Invalid username '{raw}': {msg}"))),
        })
    }
}
