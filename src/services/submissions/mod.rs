pub mod review;
pub mod submit;
pub mod upload;

use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::request_context;
use crate::models::accounts::entities::Account;
use crate::models::submissions::requests::{ReviewRequest, SubmitRequest};
use crate::workflow::AssignmentWorkflow;

pub struct SubmissionService {
    workflow: Option<Arc<AssignmentWorkflow>>,
}

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self { workflow: None }
    }

    pub fn with_workflow(workflow: Arc<AssignmentWorkflow>) -> Self {
        Self {
            workflow: Some(workflow),
        }
    }

    pub(crate) fn context(
        &self,
        request: &HttpRequest,
    ) -> Result<(Account, Arc<AssignmentWorkflow>), HttpResponse> {
        request_context(request, self.workflow.as_ref())
    }

    pub async fn submit(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        req: SubmitRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit(self, request, assignment_id, req).await
    }

    pub async fn upload(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        upload::upload(self, request, assignment_id, payload).await
    }

    pub async fn review(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        intern_username: &str,
        req: ReviewRequest,
    ) -> ActixResult<HttpResponse> {
        review::review(self, request, assignment_id, intern_username, req).await
    }
}
