use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::ApiResponse;
use crate::models::accounts::entities::AccountInfo;
use crate::models::submissions::requests::ReviewRequest;
use crate::services::{ErrorDomain, error_response};

pub async fn review(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    intern_username: &str,
    req: ReviewRequest,
) -> ActixResult<HttpResponse> {
    let (account, workflow) = match service.context(request) {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match workflow
        .review(
            assignment_id,
            intern_username,
            req.rating,
            &req.comments,
            account.username(),
        )
        .await
    {
        Ok(submission) => Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "评审成功"))),
        Err(e) => Ok(error_response(&e, ErrorDomain::Submission)),
    }
}
