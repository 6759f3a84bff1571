// src/pedidos/pedido_structs.rs

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Pedido como armazenado no banco.
///
/// Imutável depois de criado, exceto pelo campo `status`; pedidos nunca são
/// apagados, apenas marcados como cancelados.
#[derive(Serialize, FromRow)]
pub struct Pedido {
    pub id: i32,
    pub numero_pedido: String,
    pub nome_cliente: String,
    pub email_cliente: String,
    pub telefone_cliente: String,
    pub total: BigDecimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Linha de pedido: snapshot imutável da linha do carrinho no fechamento.
#[derive(Serialize, FromRow)]
pub struct ItemPedido {
    pub id: i32,
    pub pedido_id: i32,
    pub produto_id: i32,
    pub quantidade: i32,
    pub preco_unitario: BigDecimal,
    pub subtotal: BigDecimal,
}

/// Pedido com suas linhas, para a resposta da API.
#[derive(Serialize)]
pub struct PedidoResponse {
    #[serde(flatten)]
    pub pedido: Pedido,
    pub itens: Vec<ItemPedido>,
}

/// Corpo da requisição de fechamento de pedido.
#[derive(Deserialize)]
pub struct NovoPedido {
    pub cliente_id: i32,
    pub nome_cliente: String,
    pub email_cliente: String,
    pub telefone_cliente: String,
}

/// Corpo da requisição de atualização de status.
#[derive(Deserialize)]
pub struct AtualizaStatus {
    pub status: String,
}

/// Filtro opcional da listagem de pedidos (GET /pedidos?status=).
#[derive(Deserialize)]
pub struct FiltroStatus {
    pub status: Option<String>,
}
