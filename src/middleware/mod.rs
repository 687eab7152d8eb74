pub mod auth;
pub mod authorization;
