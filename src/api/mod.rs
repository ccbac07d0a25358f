//! API client and domain services for the DermaCare backend
//!
//! One module per resource; each function maps to one REST endpoint.

pub mod admin;
pub mod ai;
pub mod appointments;
pub mod auth;
pub mod chat;
pub mod client;
pub mod dermatologist;
mod error;
pub mod notifications;
pub mod products;
pub mod progress;
pub mod routines;
pub mod skin;
pub mod users;

pub use client::ApiClient;
pub use error::ApiError;
