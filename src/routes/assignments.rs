use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit, RequireRole};
use crate::models::accounts::entities::Role;
use crate::models::assignments::requests::{
    AssignmentListParams, CreateAssignmentRequest, TransitionRequest, UpdateAssignmentRequest,
};
use crate::models::submissions::requests::{ReviewRequest, SubmitRequest};
use crate::services::{AssignmentService, SubmissionService};
use crate::utils::{SafeIDI64, SafeUsername};

// 懒加载的全局服务实例
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

// 列出可见作业
pub async fn list_assignments(
    req: HttpRequest,
    query: web::Query<AssignmentListParams>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .list_assignments(&req, query.into_inner())
        .await
}

// 创建作业
pub async fn create_assignment(
    req: HttpRequest,
    body: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .create_assignment(&req, body.into_inner())
        .await
}

// 获取作业详情
pub async fn get_assignment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.get_assignment(&req, id.0).await
}

// 更新作业
pub async fn update_assignment(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .update_assignment(&req, id.0, body.into_inner())
        .await
}

// 变更作业状态
pub async fn transition_assignment(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<TransitionRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .transition_assignment(&req, id.0, body.into_inner().status)
        .await
}

// 提交链接
pub async fn submit(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<SubmitRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .submit(&req, id.0, body.into_inner())
        .await
}

// 上传 PDF 提交
pub async fn upload_submission(
    req: HttpRequest,
    id: SafeIDI64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.upload(&req, id.0, payload).await
}

// 评审提交
pub async fn review_submission(
    req: HttpRequest,
    id: SafeIDI64,
    intern: SafeUsername,
    body: web::Json<ReviewRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .review(&req, id.0, &intern.0, body.into_inner())
        .await
}

// 配置路由
pub fn configure_assignment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(RateLimit::api())
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_assignments))
                    .route(
                        web::post()
                            .to(create_assignment)
                            .wrap(RequireRole::new_any(Role::staff_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_assignment))
                    .route(
                        web::put()
                            .to(update_assignment)
                            .wrap(RequireRole::new_any(Role::staff_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/status").route(
                    web::post()
                        .to(transition_assignment)
                        .wrap(RequireRole::new_any(Role::staff_roles())),
                ),
            )
            .service(
                web::resource("/{id}/submissions")
                    .route(web::post().to(submit))
                    .wrap(RateLimit::submission())
                    .wrap(RequireRole::new(&Role::Intern)),
            )
            .service(
                web::resource("/{id}/submissions/upload")
                    .route(web::post().to(upload_submission))
                    .wrap(RateLimit::submission())
                    .wrap(RequireRole::new(&Role::Intern)),
            )
            .service(
                web::resource("/{id}/submissions/{intern}/review").route(
                    web::post()
                        .to(review_submission)
                        .wrap(RequireRole::new_any(Role::staff_roles())),
                ),
            ),
    );
}
