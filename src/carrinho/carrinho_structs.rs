// src/carrinho/carrinho_structs.rs

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Carrinho como armazenado no banco: um por usuário, com o total em cache.
///
/// Invariante: `total` é sempre a soma dos subtotais dos itens; toda mutação
/// recalcula o campo na mesma transação.
#[derive(Serialize, FromRow)]
pub struct Carrinho {
    pub id: i32,
    pub usuario_id: i32,
    pub total: BigDecimal,
}

/// Item de carrinho como armazenado no banco.
///
/// `preco_unitario` é o preço vigente (promocional ou base) resolvido na
/// última mutação da linha; `subtotal = quantidade * preco_unitario`.
#[derive(Serialize, FromRow, Clone)]
pub struct ItemCarrinho {
    pub id: i32,
    pub carrinho_id: i32,
    pub produto_id: i32,
    pub quantidade: i32,
    pub preco_unitario: BigDecimal,
    pub subtotal: BigDecimal,
}

/// Item com os dados do produto anexados, para a resposta da API.
#[derive(Serialize, FromRow)]
pub struct ItemCarrinhoDetalhado {
    pub id: i32,
    pub produto_id: i32,
    pub nome_produto: String,
    pub quantidade: i32,
    pub preco_unitario: BigDecimal,
    pub subtotal: BigDecimal,
}

/// Resposta completa do carrinho.
#[derive(Serialize)]
pub struct CarrinhoResponse {
    pub id: i32,
    pub usuario_id: i32,
    pub total: BigDecimal,
    pub itens: Vec<ItemCarrinhoDetalhado>,
}

/// Corpo da requisição de adição de item.
#[derive(Deserialize)]
pub struct AdicionaItem {
    pub produto_id: i32,
    pub quantidade: i32,
}

/// Corpo da requisição de atualização de quantidade.
#[derive(Deserialize)]
pub struct AtualizaQuantidade {
    pub quantidade: i32,
}
