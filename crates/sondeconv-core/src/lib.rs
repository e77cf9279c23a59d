pub mod convert;
pub mod dew_point;
pub mod engine;
pub mod error;
pub mod geodesy;
pub mod outputs;
pub mod rows;

pub use error::{ConversionError, DomainError, Result};
