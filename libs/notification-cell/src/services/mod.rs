pub mod template;
pub mod whatsapp;
