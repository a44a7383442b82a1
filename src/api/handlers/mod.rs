//! API handlers for accesso.

pub mod auth;
pub mod health;
pub mod user;
