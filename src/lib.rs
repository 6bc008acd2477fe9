//! Administrative balance assignment: set the token credits of one user, or
//! of every user, in the application's MongoDB store.

pub mod cli;
pub mod config;
pub mod database;
pub mod models;
pub mod services;
pub mod utils;
