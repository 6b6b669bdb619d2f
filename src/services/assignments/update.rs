use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::ApiResponse;
use crate::models::assignments::requests::UpdateAssignmentRequest;
use crate::services::{ErrorDomain, error_response};

pub async fn update_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    req: UpdateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let (account, workflow) = match service.context(request) {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match workflow
        .update_assignment(assignment_id, req, &account)
        .await
    {
        Ok(assignment) => Ok(HttpResponse::Ok().json(ApiResponse::success(assignment, "作业更新成功"))),
        Err(e) => Ok(error_response(&e, ErrorDomain::Assignment)),
    }
}
