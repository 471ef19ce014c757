//! Repository for order database operations.
//!
//! Orders reference their owning customer through `id_cliente`. The joined
//! lookups return the customer as an `Option` so callers can shape the wire
//! response without re-querying.

use std::sync::Arc;

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::{
    error::Result,
    models::{Cliente, ClienteId, NewPedido, Pedido, PedidoId},
};

/// Row shape for order lookups left-joined with the owning customer.
///
/// The customer columns are nullable in the join, so they decode into
/// `Option`s and collapse into `Option<Cliente>` only when all are present.
#[derive(sqlx::FromRow)]
struct PedidoClienteRow {
    id: PedidoId,
    data: NaiveDate,
    id_cliente: ClienteId,
    cliente_id: Option<ClienteId>,
    nome: Option<String>,
    sobrenome: Option<String>,
    cpf: Option<String>,
}

impl PedidoClienteRow {
    fn into_pair(self) -> (Pedido, Option<Cliente>) {
        let pedido = Pedido { id: self.id, data: self.data, id_cliente: self.id_cliente };

        let cliente = match (self.cliente_id, self.nome, self.sobrenome, self.cpf) {
            (Some(id), Some(nome), Some(sobrenome), Some(cpf)) => {
                Some(Cliente { id, nome, sobrenome, cpf })
            },
            _ => None,
        };

        (pedido, cliente)
    }
}

const PEDIDO_CLIENTE_SELECT: &str = r"
    SELECT p.id, p.data, p.id_cliente,
           c.id AS cliente_id, c.nome, c.sobrenome, c.cpf
    FROM pedidos p
    LEFT JOIN clientes c ON c.id = p.id_cliente
";

/// Repository for order database operations.
pub struct Repository {
    pool: Arc<PgPool>,
}

impl Repository {
    /// Creates a new repository instance.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Returns a reference to the database pool.
    pub fn pool(&self) -> Arc<PgPool> {
        self.pool.clone()
    }

    /// Creates a new order.
    ///
    /// Performs no customer existence check; the foreign key constraint is
    /// the only guard on this path.
    ///
    /// # Errors
    ///
    /// Returns error if the insert fails, including when `id_cliente` does
    /// not reference an existing customer.
    pub async fn create(&self, pedido: &NewPedido) -> Result<Pedido> {
        let created = sqlx::query_as::<_, Pedido>(
            r"
            INSERT INTO pedidos (data, id_cliente)
            VALUES ($1, $2)
            RETURNING id, data, id_cliente
            ",
        )
        .bind(pedido.data)
        .bind(pedido.id_cliente)
        .fetch_one(&*self.pool)
        .await?;

        Ok(created)
    }

    /// Finds an order by ID.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    pub async fn find_by_id(&self, pedido_id: PedidoId) -> Result<Option<Pedido>> {
        let pedido = sqlx::query_as::<_, Pedido>(
            r"
            SELECT id, data, id_cliente
            FROM pedidos
            WHERE id = $1
            ",
        )
        .bind(pedido_id)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(pedido)
    }

    /// Finds an order by ID together with its owning customer.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    pub async fn find_with_cliente(
        &self,
        pedido_id: PedidoId,
    ) -> Result<Option<(Pedido, Option<Cliente>)>> {
        let row = sqlx::query_as::<_, PedidoClienteRow>(&format!(
            "{PEDIDO_CLIENTE_SELECT} WHERE p.id = $1"
        ))
        .bind(pedido_id)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(row.map(PedidoClienteRow::into_pair))
    }

    /// Finds all orders together with their owning customers.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    pub async fn find_all_with_cliente(&self) -> Result<Vec<(Pedido, Option<Cliente>)>> {
        let rows = sqlx::query_as::<_, PedidoClienteRow>(&format!(
            "{PEDIDO_CLIENTE_SELECT} ORDER BY p.id"
        ))
        .fetch_all(&*self.pool)
        .await?;

        Ok(rows.into_iter().map(PedidoClienteRow::into_pair).collect())
    }

    /// Finds all orders belonging to a customer.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    pub async fn find_by_cliente(&self, cliente_id: ClienteId) -> Result<Vec<Pedido>> {
        let pedidos = sqlx::query_as::<_, Pedido>(
            r"
            SELECT id, data, id_cliente
            FROM pedidos
            WHERE id_cliente = $1
            ORDER BY id
            ",
        )
        .bind(cliente_id)
        .fetch_all(&*self.pool)
        .await?;

        Ok(pedidos)
    }

    /// Overwrites an order's date and owning customer.
    ///
    /// A `None` field keeps the stored value, matching the contract that
    /// omitted body fields are delegated to the storage layer.
    ///
    /// # Errors
    ///
    /// Returns error if the update fails or the order does not exist.
    pub async fn update(
        &self,
        pedido_id: PedidoId,
        data: Option<NaiveDate>,
        id_cliente: Option<ClienteId>,
    ) -> Result<Pedido> {
        let updated = sqlx::query_as::<_, Pedido>(
            r"
            UPDATE pedidos
            SET data = COALESCE($2, data),
                id_cliente = COALESCE($3, id_cliente)
            WHERE id = $1
            RETURNING id, data, id_cliente
            ",
        )
        .bind(pedido_id)
        .bind(data)
        .bind(id_cliente)
        .fetch_one(&*self.pool)
        .await?;

        Ok(updated)
    }

    /// Deletes an order.
    ///
    /// # Errors
    ///
    /// Returns error if the delete fails.
    pub async fn delete(&self, pedido_id: PedidoId) -> Result<()> {
        sqlx::query(
            r"
            DELETE FROM pedidos
            WHERE id = $1
            ",
        )
        .bind(pedido_id)
        .execute(&*self.pool)
        .await?;

        Ok(())
    }

    /// Checks if an order exists.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    pub async fn exists(&self, pedido_id: PedidoId) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as(
            r"
            SELECT EXISTS(SELECT 1 FROM pedidos WHERE id = $1)
            ",
        )
        .bind(pedido_id)
        .fetch_one(&*self.pool)
        .await?;

        Ok(exists.0)
    }

    /// Counts all orders.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            r"
            SELECT COUNT(*) FROM pedidos
            ",
        )
        .fetch_one(&*self.pool)
        .await?;

        Ok(count.0)
    }
}
