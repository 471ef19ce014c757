//! Domain models and strongly-typed identifiers.
//!
//! Defines the `Cliente` and `Pedido` entities together with newtype ID
//! wrappers for compile-time type safety, plus the database serialization
//! traits needed to bind them in queries.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

type PgDb = sqlx::Postgres;
type PgValueRef<'r> = sqlx::postgres::PgValueRef<'r>;
type PgTypeInfo = sqlx::postgres::PgTypeInfo;
type PgArgumentBuffer = sqlx::postgres::PgArgumentBuffer;
type EncodeResult =
    Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync + 'static>>;
type BoxDynError = sqlx::error::BoxDynError;

/// Strongly-typed customer identifier.
///
/// Wraps the serial primary key of the `clientes` table to prevent mixing
/// with order identifiers at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClienteId(pub i32);

impl fmt::Display for ClienteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ClienteId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl sqlx::Type<PgDb> for ClienteId {
    fn type_info() -> PgTypeInfo {
        <i32 as sqlx::Type<PgDb>>::type_info()
    }
}

impl<'r> sqlx::Decode<'r, PgDb> for ClienteId {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let id = <i32 as sqlx::Decode<PgDb>>::decode(value)?;
        Ok(Self(id))
    }
}

impl sqlx::Encode<'_, PgDb> for ClienteId {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> EncodeResult {
        <i32 as sqlx::Encode<PgDb>>::encode_by_ref(&self.0, buf)
    }
}

/// Strongly-typed order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PedidoId(pub i32);

impl fmt::Display for PedidoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for PedidoId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl sqlx::Type<PgDb> for PedidoId {
    fn type_info() -> PgTypeInfo {
        <i32 as sqlx::Type<PgDb>>::type_info()
    }
}

impl<'r> sqlx::Decode<'r, PgDb> for PedidoId {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let id = <i32 as sqlx::Decode<PgDb>>::decode(value)?;
        Ok(Self(id))
    }
}

impl sqlx::Encode<'_, PgDb> for PedidoId {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> EncodeResult {
        <i32 as sqlx::Encode<PgDb>>::encode_by_ref(&self.0, buf)
    }
}

/// A customer.
///
/// Customers own orders through the `pedidos.id_cliente` foreign key. This
/// service reads customers and only creates them through the repository
/// layer (fixtures, provisioning).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Cliente {
    /// Primary key.
    pub id: ClienteId,

    /// First name.
    pub nome: String,

    /// Last name.
    pub sobrenome: String,

    /// National identification number (CPF), unique per customer.
    pub cpf: String,
}

/// An order.
///
/// Every order belongs to exactly one customer at creation time; the
/// foreign key may be reassigned by an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Pedido {
    /// Primary key.
    pub id: PedidoId,

    /// Reference date of the order, `"YYYY-MM-DD"` on the wire.
    pub data: NaiveDate,

    /// Owning customer.
    pub id_cliente: ClienteId,
}

/// Fields required to create a new customer.
#[derive(Debug, Clone)]
pub struct NewCliente {
    /// First name.
    pub nome: String,
    /// Last name.
    pub sobrenome: String,
    /// National identification number.
    pub cpf: String,
}

/// Fields required to create a new order.
#[derive(Debug, Clone, Copy)]
pub struct NewPedido {
    /// Reference date of the order.
    pub data: NaiveDate,
    /// Owning customer.
    pub id_cliente: ClienteId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_plain_integers() {
        assert_eq!(serde_json::to_string(&ClienteId(5)).unwrap(), "5");
        assert_eq!(serde_json::to_string(&PedidoId(42)).unwrap(), "42");
    }

    #[test]
    fn pedido_wire_format_uses_plain_date() {
        let pedido = Pedido {
            id: PedidoId(1),
            data: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            id_cliente: ClienteId(5),
        };

        let json = serde_json::to_value(pedido).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["data"], "2024-01-10");
        assert_eq!(json["id_cliente"], 5);
    }

    #[test]
    fn pedido_round_trips_through_json() {
        let pedido = Pedido {
            id: PedidoId(7),
            data: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            id_cliente: ClienteId(3),
        };

        let json = serde_json::to_string(&pedido).unwrap();
        let parsed: Pedido = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, pedido);
    }

    #[test]
    fn ids_display_their_inner_value() {
        assert_eq!(ClienteId(9).to_string(), "9");
        assert_eq!(PedidoId(12).to_string(), "12");
    }
}
