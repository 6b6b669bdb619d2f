pub mod create;
pub mod detail;
pub mod list;
pub mod transition;
pub mod update;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::request_context;
use crate::models::accounts::entities::Account;
use crate::models::assignments::entities::AssignmentStatus;
use crate::models::assignments::requests::{
    AssignmentListParams, CreateAssignmentRequest, UpdateAssignmentRequest,
};
use crate::workflow::AssignmentWorkflow;

pub struct AssignmentService {
    workflow: Option<Arc<AssignmentWorkflow>>,
}

impl AssignmentService {
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

    pub async fn list_assignments(
        &self,
        request: &HttpRequest,
        query: AssignmentListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_assignments(self, request, query).await
    }

    pub async fn create_assignment(
        &self,
        request: &HttpRequest,
        req: CreateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_assignment(self, request, req).await
    }

    pub async fn get_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_assignment(self, request, assignment_id).await
    }

    pub async fn update_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        req: UpdateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_assignment(self, request, assignment_id, req).await
    }

    pub async fn transition_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        target: AssignmentStatus,
    ) -> ActixResult<HttpResponse> {
        transition::transition_assignment(self, request, assignment_id, target).await
    }
}
