//! Database access layer implementing the repository pattern.
//!
//! The repository layer translates between domain models and the database
//! schema. All database operations go through these repositories; handlers
//! never issue SQL directly.

use std::sync::Arc;

use sqlx::PgPool;

pub mod clientes;
pub mod pedidos;

use crate::error::Result;

/// Container for all repository instances providing unified database access.
///
/// `Storage` is the entry point for every database operation in the service.
/// It owns a shared connection pool and hands out type-safe access to each
/// entity repository, so handlers receive one injectable dependency that a
/// test environment can construct against its own pool.
#[derive(Clone)]
pub struct Storage {
    /// Repository for customer operations.
    pub clientes: Arc<clientes::Repository>,

    /// Repository for order operations.
    pub pedidos: Arc<pedidos::Repository>,
}

impl Storage {
    /// Creates a new storage instance with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        let pool = Arc::new(pool);

        Self {
            clientes: Arc::new(clientes::Repository::new(pool.clone())),
            pedidos: Arc::new(pedidos::Repository::new(pool)),
        }
    }

    /// Performs a health check on the database connection.
    ///
    /// Executes a trivial query to verify connectivity. Used by the
    /// `/health` and `/ready` endpoints.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Database` if the connection is unhealthy.
    pub async fn health_check(&self) -> Result<()> {
        let _: (i32,) = sqlx::query_as("SELECT 1").fetch_one(&*self.pedidos.pool()).await?;

        Ok(())
    }
}

/// Creates the `clientes` and `pedidos` tables if they do not exist.
///
/// The DDL is idempotent so the binary and the test environment can both
/// call it at startup. `pedidos.id_cliente` carries a foreign key to
/// `clientes`, which is what rejects dangling customer ids on the creation
/// path that performs no explicit existence check.
///
/// # Errors
///
/// Returns error if any statement fails.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS clientes (
            id SERIAL PRIMARY KEY,
            nome TEXT NOT NULL,
            sobrenome TEXT NOT NULL,
            cpf TEXT NOT NULL UNIQUE
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS pedidos (
            id SERIAL PRIMARY KEY,
            data DATE NOT NULL,
            id_cliente INTEGER NOT NULL REFERENCES clientes(id)
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r"
        CREATE INDEX IF NOT EXISTS idx_pedidos_id_cliente
        ON pedidos(id_cliente)
        ",
    )
    .execute(pool)
    .await?;

    Ok(())
}
