// src/lib.rs

//! namecheck: find which sites have an account registered under a username.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod transport;
pub mod utils;
