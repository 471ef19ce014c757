//! Core domain models and repository layer for the pedidos service.
//!
//! Provides strongly-typed domain primitives, the persistence error
//! taxonomy, and the repository layer over PostgreSQL. The API crate
//! depends on these types for all database access.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod models;
pub mod storage;

pub use error::{CoreError, Result};
pub use models::{Cliente, ClienteId, NewCliente, NewPedido, Pedido, PedidoId};
