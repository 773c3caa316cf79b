// src/services/mod.rs
//
// External service clients shared across domain modules

pub mod google;

pub use google::{GoogleIdentity, GoogleService, OAuthProvider};
