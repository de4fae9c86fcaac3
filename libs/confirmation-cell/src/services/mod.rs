pub mod confirmation;
pub mod lifecycle;
pub mod token;
