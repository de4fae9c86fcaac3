pub mod models;
pub mod services;

pub use models::*;
pub use services::template;
pub use services::whatsapp::WhatsappClient;
