use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NotificationService;
use crate::middlewares::RequireJWT;
use crate::models::common::pagination::clamp_page;
use crate::models::{ApiResponse, ErrorCode, PaginationQuery};

pub async fn list_notifications(
    service: &NotificationService,
    request: &HttpRequest,
    query: PaginationQuery,
) -> ActixResult<HttpResponse> {
    let Some(username) = RequireJWT::extract_username(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "无法获取用户信息",
        )));
    };
    let Some(storage) = service.get_storage(request) else {
        tracing::error!("Storage not found in app data");
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "服务器内部错误",
            )),
        );
    };

    let (page, size) = clamp_page(Some(query.page), Some(query.size));
    match storage
        .list_notifications_with_pagination(&username, page, size)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功"))),
        Err(e) => {
            tracing::error!("查询通知列表失败: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "查询通知列表失败",
                )),
            )
        }
    }
}
