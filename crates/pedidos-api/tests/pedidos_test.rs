//! Integration tests for the order endpoints.
//!
//! Drives the full router against an isolated PostgreSQL database. Each
//! test provisions its own database through `TestEnv` and skips when no
//! server is reachable.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use pedidos_api::{create_router, AppState};
use pedidos_testing::{ClienteBuilder, PedidoBuilder, TestEnv};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(env: &TestEnv) -> Router {
    create_router(AppState::new(env.pool().clone()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).expect("serialize body")))
            .expect("build request"),
        None => Request::builder().method(method).uri(uri).body(Body::empty()).expect("build request"),
    };

    let response = app.clone().oneshot(request).await.expect("execute request");
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body should be JSON")
    };

    (status, value)
}

#[tokio::test]
async fn listar_pedidos_returns_separated_pedido_and_cliente_objects() {
    let Some(env) = TestEnv::try_new().await else { return };
    let storage = env.storage();

    let cliente = ClienteBuilder::with_defaults()
        .nome("Ana")
        .sobrenome("Souza")
        .insert(&storage)
        .await
        .expect("insert cliente");
    let pedido =
        PedidoBuilder::with_defaults().cliente(cliente.id).insert(&storage).await.expect("insert");

    let (status, body) = send(&app(&env), "GET", "/pedidos", None).await;

    assert_eq!(status, StatusCode::OK);
    let pedidos = body["pedidos"].as_array().expect("pedidos array");
    assert_eq!(pedidos.len(), 1);

    let entry = &pedidos[0];
    assert_eq!(entry["pedido"]["id"], pedido.id.0);
    assert_eq!(entry["pedido"]["data"], "2024-01-10");
    assert!(entry["pedido"].get("id_cliente").is_none());
    assert_eq!(entry["cliente"]["id"], cliente.id.0);
    assert_eq!(entry["cliente"]["nome"], "Ana");
    assert_eq!(entry["cliente"]["sobrenome"], "Souza");
    assert_eq!(entry["cliente"]["cpf"], cliente.cpf);
}

#[tokio::test]
async fn criar_pedido_para_cliente_returns_201_with_created_pedido() {
    let Some(env) = TestEnv::try_new().await else { return };
    let storage = env.storage();

    let cliente = ClienteBuilder::with_defaults().insert(&storage).await.expect("insert cliente");

    let (status, body) = send(
        &app(&env),
        "POST",
        &format!("/clientes/{}/pedidos", cliente.id),
        Some(json!({"data": "2024-01-10"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].is_number());
    assert_eq!(body["data"], "2024-01-10");
    assert_eq!(body["id_cliente"], cliente.id.0);
}

#[tokio::test]
async fn criar_pedido_para_cliente_missing_cliente_returns_404_and_creates_nothing() {
    let Some(env) = TestEnv::try_new().await else { return };
    let storage = env.storage();

    let (status, body) =
        send(&app(&env), "POST", "/clientes/999999/pedidos", Some(json!({"data": "2024-01-10"})))
            .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Cliente não encontrado");
    assert_eq!(storage.pedidos.count().await.expect("count"), 0);
}

#[tokio::test]
async fn get_cliente_com_pedidos_returns_nested_pedidos() {
    let Some(env) = TestEnv::try_new().await else { return };
    let storage = env.storage();

    let cliente = ClienteBuilder::with_defaults().insert(&storage).await.expect("insert cliente");
    for _ in 0..2 {
        PedidoBuilder::with_defaults()
            .cliente(cliente.id)
            .insert(&storage)
            .await
            .expect("insert pedido");
    }

    let (status, body) = send(&app(&env), "GET", &format!("/clientes/{}", cliente.id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], cliente.id.0);
    assert_eq!(body["cpf"], cliente.cpf);
    let pedidos = body["pedidos"].as_array().expect("pedidos array");
    assert_eq!(pedidos.len(), 2);
    assert_eq!(pedidos[0]["id_cliente"], cliente.id.0);
}

#[tokio::test]
async fn get_cliente_com_pedidos_missing_cliente_returns_404() {
    let Some(env) = TestEnv::try_new().await else { return };

    let (status, body) = send(&app(&env), "GET", "/clientes/999999", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Cliente não encontrado");
}

#[tokio::test]
async fn get_pedido_by_id_returns_pedido_with_cliente() {
    let Some(env) = TestEnv::try_new().await else { return };
    let storage = env.storage();

    let cliente = ClienteBuilder::with_defaults().insert(&storage).await.expect("insert cliente");
    let pedido =
        PedidoBuilder::with_defaults().cliente(cliente.id).insert(&storage).await.expect("insert");

    let (status, body) = send(&app(&env), "GET", &format!("/pedidos/{}", pedido.id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pedido"]["id"], pedido.id.0);
    assert_eq!(body["cliente"]["id"], cliente.id.0);
}

#[tokio::test]
async fn get_pedido_by_id_missing_pedido_returns_404() {
    let Some(env) = TestEnv::try_new().await else { return };

    let (status, body) = send(&app(&env), "GET", "/pedidos/99", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Pedido não encontrado");
}

#[tokio::test]
async fn get_pedido_by_id_serializes_unresolved_cliente_as_null() {
    let Some(env) = TestEnv::try_new().await else { return };
    let storage = env.storage();

    let cliente = ClienteBuilder::with_defaults().insert(&storage).await.expect("insert cliente");
    let pedido =
        PedidoBuilder::with_defaults().cliente(cliente.id).insert(&storage).await.expect("insert");

    // Detach the order from any existing customer by lifting the
    // constraint, so the left join's null branch is observable.
    sqlx::query("ALTER TABLE pedidos DROP CONSTRAINT pedidos_id_cliente_fkey")
        .execute(env.pool())
        .await
        .expect("drop fk");
    sqlx::query("UPDATE pedidos SET id_cliente = 999999 WHERE id = $1")
        .bind(pedido.id.0)
        .execute(env.pool())
        .await
        .expect("detach pedido");

    let (status, body) = send(&app(&env), "GET", &format!("/pedidos/{}", pedido.id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pedido"]["id"], pedido.id.0);
    assert!(body["cliente"].is_null());
}

#[tokio::test]
async fn incluir_pedido_returns_201_without_checking_cliente() {
    let Some(env) = TestEnv::try_new().await else { return };
    let storage = env.storage();

    let cliente = ClienteBuilder::with_defaults().insert(&storage).await.expect("insert cliente");

    let (status, body) = send(
        &app(&env),
        "POST",
        "/pedidos",
        Some(json!({"data": "2024-02-20", "id_cliente": cliente.id.0})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"], "2024-02-20");
    assert_eq!(body["id_cliente"], cliente.id.0);
}

#[tokio::test]
async fn incluir_pedido_with_missing_cliente_is_a_persistence_failure_not_404() {
    let Some(env) = TestEnv::try_new().await else { return };

    let (status, body) = send(
        &app(&env),
        "POST",
        "/pedidos",
        Some(json!({"data": "2024-02-20", "id_cliente": 999999})),
    )
    .await;

    // This path performs no existence check; the dangling id is rejected
    // by the foreign key and surfaces as the operation's 500 message.
    assert_ne!(status, StatusCode::NOT_FOUND);
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Erro ao incluir pedido");
}

#[tokio::test]
async fn atualizar_pedido_overwrites_date_and_cliente() {
    let Some(env) = TestEnv::try_new().await else { return };
    let storage = env.storage();

    let dono_original =
        ClienteBuilder::with_defaults().insert(&storage).await.expect("insert cliente");
    let novo_dono = ClienteBuilder::with_defaults().insert(&storage).await.expect("insert cliente");
    let pedido = PedidoBuilder::with_defaults()
        .cliente(dono_original.id)
        .insert(&storage)
        .await
        .expect("insert pedido");

    let update = json!({"data": "2024-06-01", "id_cliente": novo_dono.id.0});
    let (status, body) =
        send(&app(&env), "PUT", &format!("/pedidos/{}", pedido.id), Some(update.clone())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], "2024-06-01");
    assert_eq!(body["id_cliente"], novo_dono.id.0);

    // Applying the same update again yields the same stored state.
    let (status, second) =
        send(&app(&env), "PUT", &format!("/pedidos/{}", pedido.id), Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second, body);

    let stored = storage
        .pedidos
        .find_by_id(pedido.id)
        .await
        .expect("find")
        .expect("pedido should still exist");
    assert_eq!(stored.id_cliente, novo_dono.id);
}

#[tokio::test]
async fn atualizar_pedido_with_omitted_fields_keeps_stored_values() {
    let Some(env) = TestEnv::try_new().await else { return };
    let storage = env.storage();

    let cliente = ClienteBuilder::with_defaults().insert(&storage).await.expect("insert cliente");
    let pedido =
        PedidoBuilder::with_defaults().cliente(cliente.id).insert(&storage).await.expect("insert");

    let (status, body) =
        send(&app(&env), "PUT", &format!("/pedidos/{}", pedido.id), Some(json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], "2024-01-10");
    assert_eq!(body["id_cliente"], cliente.id.0);
}

#[tokio::test]
async fn atualizar_pedido_missing_pedido_returns_404() {
    let Some(env) = TestEnv::try_new().await else { return };

    let (status, body) = send(
        &app(&env),
        "PUT",
        "/pedidos/999999",
        Some(json!({"data": "2024-06-01", "id_cliente": 1})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Pedido não encontrado");
}

#[tokio::test]
async fn excluir_pedido_returns_200_then_404() {
    let Some(env) = TestEnv::try_new().await else { return };
    let storage = env.storage();

    let cliente = ClienteBuilder::with_defaults().insert(&storage).await.expect("insert cliente");
    let pedido =
        PedidoBuilder::with_defaults().cliente(cliente.id).insert(&storage).await.expect("insert");

    let router = app(&env);

    let (status, body) = send(&router, "DELETE", &format!("/pedidos/{}", pedido.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Pedido excluído com sucesso");
    assert!(!storage.pedidos.exists(pedido.id).await.expect("exists"));

    // Deleting the same order again hits the not-found branch.
    let (status, body) = send(&router, "DELETE", &format!("/pedidos/{}", pedido.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Pedido não encontrado");
}
