pub mod assignments;
pub mod notifications;
pub mod submissions;

pub use assignments::AssignmentService;
pub use notifications::NotificationService;
pub use submissions::SubmissionService;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, http::StatusCode, web};
use tracing::error;

use crate::errors::InternHubError;
use crate::middlewares::RequireJWT;
use crate::models::accounts::entities::Account;
use crate::models::{ApiResponse, ErrorCode};
use crate::workflow::AssignmentWorkflow;

/// 错误所属的业务域，决定响应中的细分错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorDomain {
    Assignment,
    Submission,
}

pub(crate) fn status_and_code(err: &InternHubError, domain: ErrorDomain) -> (StatusCode, ErrorCode) {
    use ErrorDomain::*;
    match (err, domain) {
        (InternHubError::NotFound(_), Assignment) => {
            (StatusCode::NOT_FOUND, ErrorCode::AssignmentNotFound)
        }
        (InternHubError::NotFound(_), Submission) => {
            (StatusCode::NOT_FOUND, ErrorCode::SubmissionNotFound)
        }
        (InternHubError::Unauthorized(_), _) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
        (InternHubError::Authentication(_), _) => {
            (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized)
        }
        (InternHubError::InvalidTransition(_), _) => {
            (StatusCode::CONFLICT, ErrorCode::AssignmentInvalidTransition)
        }
        (InternHubError::Conflict(_), _) => (StatusCode::CONFLICT, ErrorCode::Conflict),
        (InternHubError::PreconditionFailed(_), Assignment) => {
            (StatusCode::BAD_REQUEST, ErrorCode::AssignmentPreconditionFailed)
        }
        (InternHubError::PreconditionFailed(_), Submission) => {
            (StatusCode::BAD_REQUEST, ErrorCode::SubmissionRejected)
        }
        (InternHubError::Validation(_), _) => (StatusCode::BAD_REQUEST, ErrorCode::BadRequest),
        (InternHubError::StorageFailure(_), _) => {
            (StatusCode::SERVICE_UNAVAILABLE, ErrorCode::FileUploadFailed)
        }
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
        ),
    }
}

/// 把工作流错误转换为统一响应，基础设施错误不向客户端暴露细节
pub(crate) fn error_response(err: &InternHubError, domain: ErrorDomain) -> HttpResponse {
    let (status, code) = status_and_code(err, domain);
    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        "服务器内部错误".to_string()
    } else {
        err.message().to_string()
    };
    HttpResponse::build(status).json(ApiResponse::error_empty(code, message))
}

/// 已认证账号与工作流实例
///
/// 服务实例未注入工作流时从 app data 中获取。
pub(crate) fn request_context(
    request: &HttpRequest,
    injected: Option<&Arc<AssignmentWorkflow>>,
) -> Result<(Account, Arc<AssignmentWorkflow>), HttpResponse> {
    let Some(account) = RequireJWT::extract_account(request) else {
        return Err(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "无法获取用户信息",
        )));
    };
    let workflow = injected.cloned().or_else(|| {
        request
            .app_data::<web::Data<Arc<AssignmentWorkflow>>>()
            .map(|data| data.get_ref().clone())
    });
    let Some(workflow) = workflow else {
        error!("AssignmentWorkflow not found in app data");
        return Err(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::InternalServerError,
            "服务器内部错误",
        )));
    };
    Ok((account, workflow))
}
