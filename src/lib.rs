//! slugly - a small URL shortener.
//!
//! `GET /s?url=...` hands out a random six character slug, `GET /{slug}`
//! redirects and counts the hit, and every other path falls back to a
//! configured default URL.

pub mod admin;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware_impls;
pub mod models;
pub mod routes;
pub mod server;
pub mod services;
pub mod state;
