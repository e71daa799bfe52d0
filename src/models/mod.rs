//! Diesel row models and typed configuration.

#[cfg(feature = "server")]
pub mod config;
pub mod product;
