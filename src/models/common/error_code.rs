use serde::Serialize;
use ts_rs::TS;

/// 响应体中的业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "api.ts")]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 作业 3xxx
    AssignmentNotFound = 3004,
    AssignmentInvalidTransition = 3009,
    AssignmentPreconditionFailed = 3012,

    // 提交 4xxx
    SubmissionNotFound = 4004,
    SubmissionRejected = 4012,
    FileUploadFailed = 4100,
    FileSizeExceeded = 4101,
}
