use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::ApiResponse;
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::services::{ErrorDomain, error_response};

pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    req: CreateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let (account, workflow) = match service.context(request) {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match workflow.create_assignment(req, &account).await {
        Ok(assignment) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(assignment, "作业创建成功")))
        }
        Err(e) => Ok(error_response(&e, ErrorDomain::Assignment)),
    }
}
