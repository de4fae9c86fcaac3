pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use router::schedule_release_routes;
pub use services::calendar::GoogleCalendarClient;
pub use services::release::ScheduleReleaseService;
