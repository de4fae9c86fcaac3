pub mod calendar;
pub mod release;
