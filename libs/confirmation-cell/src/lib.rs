pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use router::{appointment_confirmation_routes, confirmation_routes};
pub use services::confirmation::ConfirmationService;
pub use services::lifecycle::ConfirmationLifecycleService;
pub use services::token::ConfirmationTokenService;
