//! Test environment and fixtures for the pedidos service.
//!
//! Provides an isolated database-backed [`TestEnv`] and builder-pattern
//! fixtures for customers and orders. Suites call [`TestEnv::try_new`] and
//! skip gracefully when PostgreSQL is unavailable.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod env;
pub mod fixtures;

pub use env::TestEnv;
pub use fixtures::{ClienteBuilder, PedidoBuilder};
