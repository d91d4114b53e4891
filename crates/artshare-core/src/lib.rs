pub mod domain;
pub mod errors;
pub mod ports;
pub mod services;
pub mod views;

#[cfg(test)]
mod testing;

pub use errors::{ApiError, FieldErrors};
