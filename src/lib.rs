//! Core library exports for the store catalog service.
//!
//! The `data` feature exposes the domain model, Diesel schema and
//! repositories; `server` adds image storage, forms, services and the Actix
//! routes used by the binary.

#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "data")]
pub mod schema;

#[cfg(feature = "server")]
pub mod assets;
#[cfg(feature = "server")]
mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
