//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - Local sign-up and login with argon2 password hashes
//! - Google OAuth authorization-code login
//! - Server-side sessions behind a signed cookie
//! - AuthedUser extractor for protected routes

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod validators;


pub use extractors::AuthedUser;
pub use routes::auth_routes;
