use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::ApiResponse;
use crate::models::accounts::entities::AccountInfo;
use crate::models::submissions::requests::{SubmissionPayload, SubmitRequest};
use crate::services::{ErrorDomain, error_response};

pub async fn submit(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    req: SubmitRequest,
) -> ActixResult<HttpResponse> {
    let (account, workflow) = match service.context(request) {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    // JSON 请求体不携带文件，pdf 类型在工作流中被拒绝
    let payload = SubmissionPayload::from(req);
    match workflow
        .submit(assignment_id, account.username(), payload)
        .await
    {
        Ok(submission) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(submission, "提交成功")))
        }
        Err(e) => Ok(error_response(&e, ErrorDomain::Submission)),
    }
}
