//! Test data builders for customers and orders.
//!
//! Builder patterns with configurable properties and sensible defaults,
//! inserting through the repository layer so fixtures exercise the same
//! code paths as production.

use anyhow::Result;
use chrono::NaiveDate;
use pedidos_core::{
    storage::Storage, Cliente, ClienteId, NewCliente, NewPedido, Pedido,
};
use rand::Rng;

/// Builder for test customers.
pub struct ClienteBuilder {
    nome: String,
    sobrenome: String,
    cpf: String,
}

impl ClienteBuilder {
    /// Creates a builder with sensible defaults and a random CPF, so
    /// repeated inserts do not collide on the unique constraint.
    pub fn with_defaults() -> Self {
        Self {
            nome: "Maria".to_string(),
            sobrenome: "Silva".to_string(),
            cpf: random_cpf(),
        }
    }

    /// Sets the first name.
    #[must_use]
    pub fn nome(mut self, nome: impl Into<String>) -> Self {
        self.nome = nome.into();
        self
    }

    /// Sets the last name.
    #[must_use]
    pub fn sobrenome(mut self, sobrenome: impl Into<String>) -> Self {
        self.sobrenome = sobrenome.into();
        self
    }

    /// Sets the CPF.
    #[must_use]
    pub fn cpf(mut self, cpf: impl Into<String>) -> Self {
        self.cpf = cpf.into();
        self
    }

    /// Builds the creation payload without inserting.
    pub fn build(self) -> NewCliente {
        NewCliente { nome: self.nome, sobrenome: self.sobrenome, cpf: self.cpf }
    }

    /// Inserts the customer through the repository layer.
    ///
    /// # Errors
    ///
    /// Returns error if the insert fails.
    pub async fn insert(self, storage: &Storage) -> Result<Cliente> {
        Ok(storage.clientes.create(&self.build()).await?)
    }
}

/// Builder for test orders.
pub struct PedidoBuilder {
    data: NaiveDate,
    id_cliente: Option<ClienteId>,
}

impl PedidoBuilder {
    /// Creates a builder with a fixed default date; the owning customer
    /// must be set before inserting.
    pub fn with_defaults() -> Self {
        Self { data: NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date"), id_cliente: None }
    }

    /// Sets the order reference date.
    #[must_use]
    pub fn data(mut self, data: NaiveDate) -> Self {
        self.data = data;
        self
    }

    /// Sets the owning customer.
    #[must_use]
    pub fn cliente(mut self, id: ClienteId) -> Self {
        self.id_cliente = Some(id);
        self
    }

    /// Builds the creation payload without inserting.
    ///
    /// # Panics
    ///
    /// Panics if the owning customer was not set; fixtures must be
    /// explicit about ownership.
    pub fn build(self) -> NewPedido {
        let id_cliente = self.id_cliente.expect("PedidoBuilder requires a cliente");
        NewPedido { data: self.data, id_cliente }
    }

    /// Inserts the order through the repository layer.
    ///
    /// # Errors
    ///
    /// Returns error if the insert fails.
    pub async fn insert(self, storage: &Storage) -> Result<Pedido> {
        Ok(storage.pedidos.create(&self.build()).await?)
    }
}

/// Generates a random 11-digit CPF-shaped string.
fn random_cpf() -> String {
    let mut rng = rand::thread_rng();
    (0..11).map(|_| char::from(b'0' + rng.gen_range(0..10))).collect()
}
