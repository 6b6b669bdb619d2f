use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::ApiResponse;
use crate::models::assignments::requests::{AssignmentListParams, AssignmentListQuery};
use crate::services::{ErrorDomain, error_response};

pub async fn list_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
    query: AssignmentListParams,
) -> ActixResult<HttpResponse> {
    let (account, workflow) = match service.context(request) {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    // 可见范围由账号角色决定：管理员看组织全部，员工看自己创建的，实习生看分发给自己的
    let query = AssignmentListQuery::from(query);
    match workflow.list_assignments(query, &account).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功"))),
        Err(e) => Ok(error_response(&e, ErrorDomain::Assignment)),
    }
}
