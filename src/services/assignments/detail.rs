use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::ApiResponse;
use crate::services::{ErrorDomain, error_response};

pub async fn get_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let (account, workflow) = match service.context(request) {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    // 实习生只会拿到本人的提交
    match workflow.get_assignment(assignment_id, &account).await {
        Ok(assignment) => Ok(HttpResponse::Ok().json(ApiResponse::success(assignment, "查询成功"))),
        Err(e) => Ok(error_response(&e, ErrorDomain::Assignment)),
    }
}
