//! HTTP request handlers for the pedidos API.
//!
//! Handlers follow a consistent pattern: parse identifiers and body fields,
//! resolve referenced entities, branch to 404 when a required entity is
//! missing, then mutate or read and serialize the outcome. Error mapping
//! lives in [`crate::error`]; handlers never build status codes by hand.
//!
//! Handlers are grouped by functionality:
//! - `pedidos` - order CRUD and the customer-with-orders lookup
//! - `health` - health check and readiness probes

pub mod health;
pub mod pedidos;

pub use health::{health_check, liveness_check, readiness_check};
pub use pedidos::{
    atualizar_pedido, criar_pedido_para_cliente, excluir_pedido, get_cliente_com_pedidos,
    get_pedido_by_id, incluir_pedido, listar_pedidos,
};
