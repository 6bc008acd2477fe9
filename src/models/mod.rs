pub mod balance;
pub mod user;

pub use balance::*;
pub use user::*;
