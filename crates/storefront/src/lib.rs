//! Fusion Food Lab Storefront library.
//!
//! This crate provides the ordering site as a library, allowing it to be
//! tested and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod gemini;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod twilio;

pub use routes::app;
