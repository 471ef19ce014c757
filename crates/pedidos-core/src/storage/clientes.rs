//! Repository for customer database operations.
//!
//! Customers are read-mostly from the order handlers' perspective: lookups
//! back the existence check on the customer-scoped creation path and the
//! customer-with-orders endpoint. Creation exists for provisioning and test
//! fixtures.

use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    error::Result,
    models::{Cliente, ClienteId, NewCliente},
};

/// Repository for customer database operations.
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

    /// Creates a new customer.
    ///
    /// # Errors
    ///
    /// Returns error if the insert fails or the CPF is already in use.
    pub async fn create(&self, cliente: &NewCliente) -> Result<Cliente> {
        let created = sqlx::query_as::<_, Cliente>(
            r"
            INSERT INTO clientes (nome, sobrenome, cpf)
            VALUES ($1, $2, $3)
            RETURNING id, nome, sobrenome, cpf
            ",
        )
        .bind(&cliente.nome)
        .bind(&cliente.sobrenome)
        .bind(&cliente.cpf)
        .fetch_one(&*self.pool)
        .await?;

        Ok(created)
    }

    /// Finds a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    pub async fn find_by_id(&self, cliente_id: ClienteId) -> Result<Option<Cliente>> {
        let cliente = sqlx::query_as::<_, Cliente>(
            r"
            SELECT id, nome, sobrenome, cpf
            FROM clientes
            WHERE id = $1
            ",
        )
        .bind(cliente_id)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(cliente)
    }

    /// Checks if a customer exists.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    pub async fn exists(&self, cliente_id: ClienteId) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as(
            r"
            SELECT EXISTS(SELECT 1 FROM clientes WHERE id = $1)
            ",
        )
        .bind(cliente_id)
        .fetch_one(&*self.pool)
        .await?;

        Ok(exists.0)
    }

    /// Counts all customers.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            r"
            SELECT COUNT(*) FROM clientes
            ",
        )
        .fetch_one(&*self.pool)
        .await?;

        Ok(count.0)
    }
}
