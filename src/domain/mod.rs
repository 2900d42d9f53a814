pub mod error;
pub mod model;
pub mod ports;
pub mod query;

pub use error::{ServiceError, ValidationError};
