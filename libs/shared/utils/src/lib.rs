pub mod rut;
pub mod test_utils;

pub use rut::validate_rut;
