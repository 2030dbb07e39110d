pub mod categories;
pub mod errors;
pub mod products;
pub mod shop;

pub use errors::{ServiceError, ServiceResult};
