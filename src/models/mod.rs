pub mod accounts;
pub mod assignments;
pub mod common;
pub mod notifications;
pub mod submissions;
pub mod teams;

pub use common::error_code::ErrorCode;
pub use common::pagination::{PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;
