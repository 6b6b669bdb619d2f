use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::StreamExt;

use super::SubmissionService;
use crate::models::accounts::entities::AccountInfo;
use crate::models::submissions::requests::{FilePayload, SubmissionPayload};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{ErrorDomain, error_response};

/// 读取 multipart 中的 `file` 字段并作为 PDF 提交
///
/// 文件整体读入内存，超过上传硬上限立即中止。
pub async fn upload(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let (account, workflow) = match service.context(request) {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };
    let max_size = workflow.limits().max_upload_size.max(0) as usize;

    let mut file: Option<FilePayload> = None;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let (name, file_name) = match field.content_disposition() {
            Some(cd) => (
                cd.get_name().unwrap_or_default().to_string(),
                cd.get_filename().map(|s| s.to_string()),
            ),
            None => (String::new(), None),
        };
        if name != "file" {
            continue;
        }
        if file.is_some() {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "Only one file can be uploaded at a time",
            )));
        }

        // 声明的类型由工作流校验
        let content_type = field
            .content_type()
            .map(|ct| ct.to_string())
            .unwrap_or_default();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk?;
            if bytes.len() + data.len() > max_size {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::FileSizeExceeded,
                    format!("File size exceeds the upload limit of {max_size} bytes"),
                )));
            }
            bytes.extend_from_slice(&data);
        }

        file = Some(FilePayload {
            file_name: file_name.unwrap_or_else(|| "submission.pdf".to_string()),
            content_type,
            bytes,
        });
    }

    let Some(file) = file else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "No file found in upload payload",
        )));
    };

    match workflow
        .submit(assignment_id, account.username(), SubmissionPayload::pdf(file))
        .await
    {
        Ok(submission) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(submission, "提交成功")))
        }
        Err(e) => Ok(error_response(&e, ErrorDomain::Submission)),
    }
}
