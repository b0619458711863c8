//! E-learning API server library.
//!
//! Exposes the core building blocks (config, state, error handling, routes,
//! the lesson ordering manager) so integration tests and the binary
//! entrypoint can both access them.

pub mod access;
pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod handlers;
pub mod lessons;
pub mod middleware;
pub mod query;
pub mod response;
pub mod routes;
pub mod state;
