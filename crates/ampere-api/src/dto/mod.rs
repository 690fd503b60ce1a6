//! Data Transfer Objects (DTOs) for API requests and responses

pub mod common;
pub mod customer;
pub mod meter;
pub mod supplier;

pub use common::*;
pub use customer::*;
pub use meter::*;
pub use supplier::*;
