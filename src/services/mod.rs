mod errors;

pub use errors::{ServiceError, ServiceResult};

pub mod main;
pub mod products;
