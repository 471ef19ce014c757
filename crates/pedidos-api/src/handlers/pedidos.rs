//! Order request handlers.
//!
//! Every handler follows the same three-phase contract: resolve (parse
//! identifiers, fetch the referenced entities), branch (404 when a required
//! entity is missing), act-and-respond (mutate or read, then serialize).
//! Order-returning endpoints flatten the joined customer into a plain
//! `cliente` object (or null) instead of exposing the raw joined row, so
//! the wire format stays decoupled from the storage schema.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use pedidos_core::{Cliente, ClienteId, NewPedido, Pedido, PedidoId};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    error::{ApiError, MessageResponse},
    AppState,
};

/// Order projection nested under `"pedido"` in joined responses.
///
/// Deliberately omits `id_cliente`; the customer travels as its own object.
#[derive(Debug, Serialize)]
pub struct PedidoView {
    /// Order identifier.
    pub id: PedidoId,
    /// Order reference date.
    pub data: NaiveDate,
}

impl From<Pedido> for PedidoView {
    fn from(pedido: Pedido) -> Self {
        Self { id: pedido.id, data: pedido.data }
    }
}

/// An order paired with its owning customer, or null when the customer
/// does not resolve.
#[derive(Debug, Serialize)]
pub struct PedidoComCliente {
    /// The order projection.
    pub pedido: PedidoView,
    /// The owning customer, if it resolves.
    pub cliente: Option<Cliente>,
}

impl PedidoComCliente {
    fn from_pair((pedido, cliente): (Pedido, Option<Cliente>)) -> Self {
        Self { pedido: pedido.into(), cliente }
    }
}

/// Response body for the order listing.
#[derive(Debug, Serialize)]
pub struct ListarPedidosResponse {
    /// All orders, each paired with its customer.
    pub pedidos: Vec<PedidoComCliente>,
}

/// A customer with its orders nested under `"pedidos"`.
#[derive(Debug, Serialize)]
pub struct ClienteComPedidos {
    /// Customer fields, flattened into the top-level object.
    #[serde(flatten)]
    pub cliente: Cliente,
    /// The customer's orders.
    pub pedidos: Vec<Pedido>,
}

/// Request body for the customer-scoped creation path.
#[derive(Debug, Deserialize)]
pub struct CriarPedidoParaClienteRequest {
    /// Order reference date.
    pub data: NaiveDate,
}

/// Request body for the generic creation path.
#[derive(Debug, Deserialize)]
pub struct IncluirPedidoRequest {
    /// Order reference date.
    pub data: NaiveDate,
    /// Owning customer; existence is NOT checked on this path.
    pub id_cliente: ClienteId,
}

/// Request body for order updates.
///
/// Omitted fields keep the stored value; the overwrite is delegated to the
/// storage layer.
#[derive(Debug, Default, Deserialize)]
pub struct AtualizarPedidoRequest {
    /// New reference date, if present.
    #[serde(default)]
    pub data: Option<NaiveDate>,
    /// New owning customer, if present.
    #[serde(default)]
    pub id_cliente: Option<ClienteId>,
}

/// Lists every order, left-joined with its customer.
#[instrument(name = "listar_pedidos", skip(state))]
pub async fn listar_pedidos(
    State(state): State<AppState>,
) -> Result<Json<ListarPedidosResponse>, ApiError> {
    let pares = state
        .storage
        .pedidos
        .find_all_with_cliente()
        .await
        .map_err(ApiError::database("Erro ao listar pedidos"))?;

    let pedidos = pares.into_iter().map(PedidoComCliente::from_pair).collect();

    Ok(Json(ListarPedidosResponse { pedidos }))
}

/// Creates an order for an existing customer.
///
/// Verifies the customer exists before inserting; a missing customer is a
/// 404, never a constraint error.
#[instrument(name = "criar_pedido_para_cliente", skip(state, body))]
pub async fn criar_pedido_para_cliente(
    State(state): State<AppState>,
    Path(id_cliente): Path<i32>,
    Json(body): Json<CriarPedidoParaClienteRequest>,
) -> Result<Response, ApiError> {
    let id_cliente = ClienteId(id_cliente);

    let cliente = state
        .storage
        .clientes
        .find_by_id(id_cliente)
        .await
        .map_err(ApiError::database("Erro ao criar pedido para cliente"))?;

    if cliente.is_none() {
        return Err(ApiError::ClienteNotFound);
    }

    let pedido = state
        .storage
        .pedidos
        .create(&NewPedido { data: body.data, id_cliente })
        .await
        .map_err(ApiError::database("Erro ao criar pedido para cliente"))?;

    info!(id_pedido = %pedido.id, %id_cliente, "pedido criado");

    Ok((StatusCode::CREATED, Json(pedido)).into_response())
}

/// Returns a customer together with all of its orders.
#[instrument(name = "get_cliente_com_pedidos", skip(state))]
pub async fn get_cliente_com_pedidos(
    State(state): State<AppState>,
    Path(id_cliente): Path<i32>,
) -> Result<Json<ClienteComPedidos>, ApiError> {
    let id_cliente = ClienteId(id_cliente);

    let cliente = state
        .storage
        .clientes
        .find_by_id(id_cliente)
        .await
        .map_err(ApiError::database("Erro ao buscar cliente com pedidos"))?
        .ok_or(ApiError::ClienteNotFound)?;

    let pedidos = state
        .storage
        .pedidos
        .find_by_cliente(id_cliente)
        .await
        .map_err(ApiError::database("Erro ao buscar cliente com pedidos"))?;

    Ok(Json(ClienteComPedidos { cliente, pedidos }))
}

/// Returns one order with its customer object, or null when the customer
/// does not resolve.
#[instrument(name = "get_pedido_by_id", skip(state))]
pub async fn get_pedido_by_id(
    State(state): State<AppState>,
    Path(id_pedido): Path<i32>,
) -> Result<Json<PedidoComCliente>, ApiError> {
    let par = state
        .storage
        .pedidos
        .find_with_cliente(PedidoId(id_pedido))
        .await
        .map_err(ApiError::database("Erro ao buscar pedido"))?
        .ok_or(ApiError::PedidoNotFound)?;

    Ok(Json(PedidoComCliente::from_pair(par)))
}

/// Creates an order without checking customer existence.
///
/// A dangling `id_cliente` is rejected by the foreign key and surfaces as a
/// persistence failure, never a 404.
#[instrument(name = "incluir_pedido", skip(state, body))]
pub async fn incluir_pedido(
    State(state): State<AppState>,
    Json(body): Json<IncluirPedidoRequest>,
) -> Result<Response, ApiError> {
    let pedido = state
        .storage
        .pedidos
        .create(&NewPedido { data: body.data, id_cliente: body.id_cliente })
        .await
        .map_err(ApiError::database("Erro ao incluir pedido"))?;

    info!(id_pedido = %pedido.id, id_cliente = %pedido.id_cliente, "pedido incluído");

    Ok((StatusCode::CREATED, Json(pedido)).into_response())
}

/// Overwrites an order's date and owning customer.
#[instrument(name = "atualizar_pedido", skip(state, body))]
pub async fn atualizar_pedido(
    State(state): State<AppState>,
    Path(id_pedido): Path<i32>,
    Json(body): Json<AtualizarPedidoRequest>,
) -> Result<Json<Pedido>, ApiError> {
    let id_pedido = PedidoId(id_pedido);

    let existente = state
        .storage
        .pedidos
        .find_by_id(id_pedido)
        .await
        .map_err(ApiError::database("Erro ao atualizar pedido"))?;

    if existente.is_none() {
        return Err(ApiError::PedidoNotFound);
    }

    let pedido = state
        .storage
        .pedidos
        .update(id_pedido, body.data, body.id_cliente)
        .await
        .map_err(ApiError::database("Erro ao atualizar pedido"))?;

    Ok(Json(pedido))
}

/// Deletes an order, confirming with a message payload.
///
/// Not idempotent at the handler level: the second delete of the same id
/// hits the not-found branch.
#[instrument(name = "excluir_pedido", skip(state))]
pub async fn excluir_pedido(
    State(state): State<AppState>,
    Path(id_pedido): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id_pedido = PedidoId(id_pedido);

    let existente = state
        .storage
        .pedidos
        .find_by_id(id_pedido)
        .await
        .map_err(ApiError::database("Erro ao excluir pedido"))?;

    if existente.is_none() {
        return Err(ApiError::PedidoNotFound);
    }

    state
        .storage
        .pedidos
        .delete(id_pedido)
        .await
        .map_err(ApiError::database("Erro ao excluir pedido"))?;

    info!(%id_pedido, "pedido excluído");

    Ok(Json(MessageResponse::new("Pedido excluído com sucesso")))
}
