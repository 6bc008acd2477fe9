pub mod balance_service;

pub use balance_service::*;
