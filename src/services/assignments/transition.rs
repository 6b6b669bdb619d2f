use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::ApiResponse;
use crate::models::assignments::entities::AssignmentStatus;
use crate::services::{ErrorDomain, error_response};

pub async fn transition_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    target: AssignmentStatus,
) -> ActixResult<HttpResponse> {
    let (account, workflow) = match service.context(request) {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match workflow.transition(assignment_id, target, &account).await {
        Ok(moved) => Ok(HttpResponse::Ok().json(ApiResponse::success(moved, "状态已更新"))),
        Err(e) => Ok(error_response(&e, ErrorDomain::Assignment)),
    }
}
