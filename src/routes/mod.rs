pub mod assignments;

pub mod notifications;

pub use assignments::configure_assignment_routes;
pub use notifications::configure_notification_routes;
