pub mod base;
pub mod registration;
